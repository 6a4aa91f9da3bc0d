//! Extraction driver and the default metadata handler.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use reqwest::Client;

use crate::classify::{LinkAttrs, MetaAttrs};
use crate::error::{CollectError, PartialExtraction, TokenizeError};
use crate::fetch;
use crate::fields;
use crate::groups::{AppGroup, VideoGroup};
use crate::links;
use crate::model::{Attributes, Player, Twitter};
use crate::tokenizer::{TagEvent, TagKind, TagTokenizer};

/// Receives the classified `meta` and `link` tags of one document.
///
/// Links reach the handler only if they are icons or non-stylesheet alternates.
pub trait MetaHandler {
    type Output: std::fmt::Debug;

    fn meta(&mut self, meta: MetaAttrs);
    fn link(&mut self, link: LinkAttrs);
    fn finish(self) -> Self::Output;
}

/// Where a meta key is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Top-level fields of [`Attributes`], including `og:video:tag`.
    Record,
    Video,
    App,
    Twitter,
    Player,
}

pub fn route(key: &str) -> Route {
    if key.starts_with("og:") || key.starts_with("fb:") {
        if key.starts_with("og:video") && key != "og:video:tag" {
            Route::Video
        } else {
            Route::Record
        }
    } else if key.starts_with("al:") {
        Route::App
    } else if key.starts_with("twitter:player") {
        Route::Player
    } else if key.starts_with("twitter:") {
        Route::Twitter
    } else {
        Route::Record
    }
}

/// Default handler building an [`Attributes`] record.
#[derive(Debug, Default)]
pub struct AttrsCollector {
    attrs: Attributes,
    videos: VideoGroup,
    apps: AppGroup,
}

impl MetaHandler for AttrsCollector {
    type Output = Attributes;

    fn meta(&mut self, meta: MetaAttrs) {
        let MetaAttrs { name, content } = meta;
        match route(&name) {
            Route::Record => {
                fields::assign(&mut self.attrs, &name, &content);
            }
            Route::Video => self.videos.accept(&name, &content),
            Route::App => self.apps.accept(&name, &content),
            Route::Twitter => {
                let twitter = self.attrs.twitter.get_or_insert_with(Twitter::default);
                fields::assign(twitter, &name, &content);
            }
            Route::Player => {
                let player = self.attrs.player.get_or_insert_with(Player::default);
                fields::assign(player, &name, &content);
            }
        }
    }

    fn link(&mut self, link: LinkAttrs) {
        if let Some(icon) = links::icon_from_link(&link) {
            self.attrs.icons.push(icon);
        }
    }

    fn finish(self) -> Attributes {
        Attributes {
            videos: self.videos.into_entries(),
            apps: self.apps.into_entries(),
            ..self.attrs
        }
    }
}

/// Feed tag events to `handler` until `</head>` or the end of the stream.
///
/// A tokenizer failure stops the pass; the handler's output so far is
/// returned inside the error.
pub fn extract_with<I, H>(events: I, mut handler: H) -> Result<H::Output, PartialExtraction<H::Output>>
where
    I: IntoIterator<Item = Result<TagEvent, TokenizeError>>,
    H: MetaHandler,
{
    for event in events {
        let event = match event {
            Ok(event) => event,
            Err(source) => {
                return Err(PartialExtraction {
                    record: handler.finish(),
                    source,
                })
            }
        };

        if event.is_end("head") {
            tracing::debug!("reached </head>, stopping");
            break;
        }
        if event.kind != TagKind::Start {
            continue;
        }

        match event.name.as_str() {
            "meta" => {
                if let Some(meta) = MetaAttrs::from_attrs(&event.attrs) {
                    handler.meta(meta);
                }
            }
            "link" => {
                let link = LinkAttrs::from_attrs(&event.attrs);
                if link.is_relevant() {
                    handler.link(link);
                }
            }
            _ => {}
        }
    }

    Ok(handler.finish())
}

/// Extract metadata from an HTML byte stream with the default handler.
pub fn extract_meta<R: Read>(doc: R) -> Result<Attributes, PartialExtraction<Attributes>> {
    extract_with(TagTokenizer::new(doc), AttrsCollector::default())
}

/// Extract metadata from a local HTML file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Attributes, CollectError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CollectError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => CollectError::OpenFile {
            path: path.to_path_buf(),
            source,
        },
    })?;

    tracing::debug!("Parsing file: {}", path.display());
    Ok(extract_meta(file)?)
}

/// Fetch a page and extract its metadata.
pub async fn parse_url(client: &Client, url: &str) -> Result<Attributes, CollectError> {
    let body = fetch::fetch_url_bytes(client, url).await?;
    Ok(extract_meta(body.as_ref())?)
}
