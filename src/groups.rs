//! Accumulators for repeatable tag blocks.
//!
//! Pages describe several videos or several platform apps by repeating the
//! same keys. Each accumulator owns its entries and tracks whether the
//! current entry is still being filled or a new one must begin.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fields;
use crate::model::{App, Video};

/// Keys that carry a video URL and may open a new entry.
const VIDEO_URL_KEYS: &[&str] = &["og:video", "og:video:url", "og:video:secure_url"];

/// `al:<platform>:<property>`; the platform is ASCII word characters only.
static APP_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^al:([A-Za-z0-9_]*):(.*)$").expect("App Links key pattern is valid")
});

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    /// No entry yet.
    #[default]
    Empty,
    /// The last entry is still collecting its URLs.
    Open,
    /// The last entry has both URLs; the next URL key starts a new one.
    Closed,
}

#[derive(Debug, Default)]
pub struct VideoGroup {
    entries: Vec<Video>,
    state: EntryState,
}

impl VideoGroup {
    /// Route an `og:video*` key (other than `og:video:tag`) into the entries.
    pub fn accept(&mut self, key: &str, content: &str) {
        let opens_entry = VIDEO_URL_KEYS.contains(&key);
        let start_new = match self.state {
            EntryState::Empty => true,
            EntryState::Closed => opens_entry,
            EntryState::Open => false,
        };
        if start_new {
            tracing::trace!("starting video entry {}", self.entries.len());
            self.entries.push(Video::default());
        }

        if let Some(video) = self.entries.last_mut() {
            fields::assign(video, key, content);
            self.state = if video.is_closed() {
                EntryState::Closed
            } else {
                EntryState::Open
            };
        }
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> &[Video] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Video> {
        self.entries
    }
}

#[derive(Debug, Default)]
pub struct AppGroup {
    entries: Vec<App>,
    /// Platform of the entry currently being filled.
    current: Option<String>,
}

impl AppGroup {
    /// Route an `al:` key. Keys without a platform and property segment are ignored.
    pub fn accept(&mut self, key: &str, content: &str) {
        let Some((platform, property)) = split_app_key(key) else {
            tracing::trace!("ignoring malformed App Links key {}", key);
            return;
        };

        if self.current.as_deref() != Some(platform) {
            tracing::trace!("starting {} app entry", platform);
            self.entries.push(App::new(platform));
            self.current = Some(platform.to_string());
        }

        if let Some(app) = self.entries.last_mut() {
            fields::assign(app, normalize_app_property(property), content);
        }
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> &[App] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<App> {
        self.entries
    }
}

/// Split `al:ios:app_store_id` into `("ios", "app_store_id")`.
///
/// Only the first three segments count: `al:ios:url:extra` yields `("ios", "url")`.
pub fn split_app_key(key: &str) -> Option<(&str, &str)> {
    let caps = APP_KEY_RE.captures(key)?;
    let platform = caps.get(1)?.as_str();
    let rest = caps.get(2)?.as_str();
    let property = rest.split(':').next().unwrap_or(rest);
    Some((platform, property))
}

/// Store identifiers of every platform share the `app_id` field.
pub fn normalize_app_property(property: &str) -> &str {
    match property {
        "app_store_id" | "package" | "app_id" => "app_id",
        other => other,
    }
}
