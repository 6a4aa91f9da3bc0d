//! Social metadata extraction for HTML pages.
//!
//! A single pass over a page's tags collects Open Graph, Facebook, App Links
//! and Twitter Card `meta` values plus icon `link`s into one [`Attributes`]
//! record. Repeated video and app blocks become separate entries.
//!
//! ```no_run
//! let attrs = meta_collector::parse_file("./page.html")?;
//! println!("{:?}", attrs.title);
//! # Ok::<(), meta_collector::CollectError>(())
//! ```

pub mod classify;
pub mod collector;
pub mod error;
pub mod fetch;
pub mod fields;
pub mod groups;
pub mod links;
pub mod logging;
pub mod model;
pub mod tokenizer;

pub use collector::{extract_meta, extract_with, parse_file, parse_url, AttrsCollector, MetaHandler};
pub use error::{CollectError, ErrorKind, PartialExtraction, TokenizeError};
pub use model::{App, Attributes, Icon, Player, Twitter, Video};
