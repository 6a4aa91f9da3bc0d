//! Streaming tag tokenizer.
//!
//! Wraps html5ever's tokenizer so a byte stream becomes an iterator of
//! start/end tag events. Text, comments and doctypes are dropped.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Read};

use encoding_rs::{Decoder, UTF_8};
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind as Html5TagKind, Token, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};

use crate::error::TokenizeError;

const CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Start,
    End,
}

/// A single tag as seen by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEvent {
    pub kind: TagKind,
    /// Lower-cased tag name.
    pub name: String,
    /// Attributes in source order, names lower-cased.
    pub attrs: Vec<(String, String)>,
}

impl TagEvent {
    pub fn start(name: &str, attrs: &[(&str, &str)]) -> Self {
        Self {
            kind: TagKind::Start,
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn end(name: &str) -> Self {
        Self {
            kind: TagKind::End,
            name: name.to_string(),
            attrs: Vec::new(),
        }
    }

    pub fn is_start(&self, name: &str) -> bool {
        self.kind == TagKind::Start && self.name == name
    }

    pub fn is_end(&self, name: &str) -> bool {
        self.kind == TagKind::End && self.name == name
    }
}

impl From<Tag> for TagEvent {
    fn from(tag: Tag) -> Self {
        Self {
            kind: match tag.kind {
                Html5TagKind::StartTag => TagKind::Start,
                Html5TagKind::EndTag => TagKind::End,
            },
            name: tag.name.to_string(),
            attrs: tag
                .attrs
                .iter()
                .map(|a| (a.name.local.to_string(), a.value.to_string()))
                .collect(),
        }
    }
}

/// Collects tag events and switches the tokenizer into raw-text states so
/// markup inside `<script>` and friends is not mistaken for tags.
struct TagSink {
    events: RefCell<VecDeque<TagEvent>>,
}

impl TokenSink for TagSink {
    type Handle = ();

    fn process_token(&self, token: Token, line: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => {
                let raw = match (tag.kind, &*tag.name) {
                    (Html5TagKind::StartTag, "script") => Some(TokenSinkResult::RawData(RawKind::ScriptData)),
                    (Html5TagKind::StartTag, "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript") => {
                        Some(TokenSinkResult::RawData(RawKind::Rawtext))
                    }
                    (Html5TagKind::StartTag, "title" | "textarea") => {
                        Some(TokenSinkResult::RawData(RawKind::Rcdata))
                    }
                    (Html5TagKind::StartTag, "plaintext") => Some(TokenSinkResult::Plaintext),
                    _ => None,
                };
                self.events.borrow_mut().push_back(TagEvent::from(tag));
                raw.unwrap_or(TokenSinkResult::Continue)
            }
            Token::ParseError(err) => {
                tracing::trace!("html parse error on line {}: {}", line, err);
                TokenSinkResult::Continue
            }
            _ => TokenSinkResult::Continue,
        }
    }
}

/// Iterator over the tag events of an HTML byte stream.
///
/// Exhaustion means the stream ended; an `Err` item means reading failed,
/// after which the iterator yields nothing more.
pub struct TagTokenizer<R> {
    reader: R,
    decoder: Decoder,
    tokenizer: Tokenizer<TagSink>,
    input: BufferQueue,
    finished: bool,
}

impl<R: Read> TagTokenizer<R> {
    pub fn new(reader: R) -> Self {
        let sink = TagSink {
            events: RefCell::new(VecDeque::new()),
        };
        Self {
            reader,
            decoder: UTF_8.new_decoder_with_bom_removal(),
            tokenizer: Tokenizer::new(sink, TokenizerOpts::default()),
            input: BufferQueue::default(),
            finished: false,
        }
    }

    /// Read one chunk and run it through the tokenizer.
    fn fill(&mut self) -> Result<(), TokenizeError> {
        let mut chunk = [0u8; CHUNK_SIZE];
        let read = loop {
            match self.reader.read(&mut chunk) {
                Ok(n) => break n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };
        let last = read == 0;

        let capacity = self
            .decoder
            .max_utf8_buffer_length(read)
            .unwrap_or(read * 3 + 4);
        let mut text = String::with_capacity(capacity);
        let (_, _, replaced) = self.decoder.decode_to_string(&chunk[..read], &mut text, last);
        if replaced {
            tracing::trace!("replaced malformed UTF-8 in input");
        }

        if !text.is_empty() {
            self.input.push_back(StrTendril::from(text));
            let _ = self.tokenizer.feed(&self.input);
        }
        if last {
            self.tokenizer.end();
            self.finished = true;
        }
        Ok(())
    }
}

impl<R: Read> Iterator for TagTokenizer<R> {
    type Item = Result<TagEvent, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.tokenizer.sink.events.borrow_mut().pop_front() {
                return Some(Ok(event));
            }
            if self.finished {
                return None;
            }
            if let Err(err) = self.fill() {
                self.finished = true;
                return Some(Err(err));
            }
        }
    }
}
