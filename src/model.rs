use std::io::Write;

use serde::{Deserialize, Serialize, Serializer};

use crate::fields::{Field, MetaFields, Slot};

/// Social metadata collected from one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    /// Site name (og:site_name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,

    /// Canonical URL (og:url), always emitted
    #[serde(serialize_with = "empty_if_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Primary image (og:image)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Content type (og:type)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Facebook application id (fb:app_id)
    #[serde(rename = "fbapp", skip_serializing_if = "Option::is_none")]
    pub fb_app: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots: Option<String>,

    /// Free-text video tags (og:video:tag)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub video_tags: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<Video>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub apps: Vec<App>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<Twitter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<Player>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<Icon>,
}

impl Attributes {
    /// Write the record as tab-indented JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), serde_json::Error> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)
    }
}

/// Fields that are always present in the output render an absent value as `""`.
fn empty_if_none<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or_default())
}

/// Open Graph video entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    #[serde(serialize_with = "empty_if_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl Video {
    /// A video is complete once both its URL and secure URL are known.
    /// The next URL-bearing key then starts a new entry.
    pub fn is_closed(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.url) && filled(&self.secure_url)
    }
}

/// App Links target for one platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct App {
    /// Platform discriminator (ios, android, web, ...)
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl App {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            ..Self::default()
        }
    }
}

/// Twitter Card account data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Twitter {
    #[serde(rename = "user_name", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
}

/// Twitter player card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    #[serde(rename = "player", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Icon {
    /// Declared `sizes`, or a label derived from the link relation
    #[serde(skip_serializing_if = "String::is_empty")]
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl MetaFields for Attributes {
    const FIELDS: &'static [Field<Self>] = &[
        Field { name: "site_name", aliases: &["og:site_name"], slot: Slot::Text(|a| &mut a.site_name) },
        Field { name: "url", aliases: &["og:url"], slot: Slot::Text(|a| &mut a.url) },
        Field { name: "description", aliases: &["og:description"], slot: Slot::Text(|a| &mut a.description) },
        Field { name: "title", aliases: &["og:title"], slot: Slot::Text(|a| &mut a.title) },
        Field { name: "image", aliases: &["og:image"], slot: Slot::Text(|a| &mut a.image) },
        Field { name: "type", aliases: &["og:type"], slot: Slot::Text(|a| &mut a.kind) },
        Field { name: "fbapp", aliases: &["fb:app_id"], slot: Slot::Text(|a| &mut a.fb_app) },
        Field { name: "robots", aliases: &["robots"], slot: Slot::Text(|a| &mut a.robots) },
        Field { name: "video_tags", aliases: &["og:video:tag"], slot: Slot::Tags(|a| &mut a.video_tags) },
    ];
}

impl MetaFields for Video {
    const FIELDS: &'static [Field<Self>] = &[
        Field { name: "url", aliases: &["og:video:url", "og:video"], slot: Slot::Text(|v| &mut v.url) },
        Field { name: "secure_url", aliases: &["og:video:secure_url"], slot: Slot::Text(|v| &mut v.secure_url) },
        Field { name: "type", aliases: &["og:video:type"], slot: Slot::Text(|v| &mut v.kind) },
        Field { name: "width", aliases: &["og:video:width"], slot: Slot::Text(|v| &mut v.width) },
        Field { name: "height", aliases: &["og:video:height"], slot: Slot::Text(|v| &mut v.height) },
        Field { name: "duration", aliases: &["og:video:duration"], slot: Slot::Text(|v| &mut v.duration) },
        Field { name: "release_date", aliases: &["og:video:release_date"], slot: Slot::Text(|v| &mut v.release_date) },
    ];
}

/// App keys arrive normalized to their last segment (`al:ios:url` -> `url`).
impl MetaFields for App {
    const FIELDS: &'static [Field<Self>] = &[
        Field { name: "name", aliases: &["app_name"], slot: Slot::Text(|a| &mut a.name) },
        Field { name: "app_id", aliases: &["app_id"], slot: Slot::Text(|a| &mut a.app_id) },
        Field { name: "url", aliases: &["url"], slot: Slot::Text(|a| &mut a.url) },
        Field { name: "class", aliases: &["class"], slot: Slot::Text(|a| &mut a.class) },
    ];
}

impl MetaFields for Twitter {
    const FIELDS: &'static [Field<Self>] = &[
        Field { name: "user_name", aliases: &["twitter:site"], slot: Slot::Text(|t| &mut t.username) },
        Field { name: "user_id", aliases: &["twitter:site:id"], slot: Slot::Text(|t| &mut t.user_id) },
        Field { name: "image", aliases: &["twitter:image"], slot: Slot::Text(|t| &mut t.image) },
        Field { name: "image_alt", aliases: &["twitter:image:alt"], slot: Slot::Text(|t| &mut t.image_alt) },
        Field { name: "creator", aliases: &["twitter:creator"], slot: Slot::Text(|t| &mut t.creator) },
        Field { name: "creator_id", aliases: &["twitter:creator:id"], slot: Slot::Text(|t| &mut t.creator_id) },
    ];
}

impl MetaFields for Player {
    const FIELDS: &'static [Field<Self>] = &[
        Field { name: "player", aliases: &["twitter:player"], slot: Slot::Text(|p| &mut p.url) },
        Field { name: "width", aliases: &["twitter:player:width"], slot: Slot::Text(|p| &mut p.width) },
        Field { name: "height", aliases: &["twitter:player:height"], slot: Slot::Text(|p| &mut p.height) },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::assign;

    fn to_json(attrs: &Attributes) -> String {
        let mut buf = Vec::new();
        attrs.write_json(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_video_closure() {
        let mut video = Video::default();
        assert!(!video.is_closed());

        assign(&mut video, "og:video", "http://example.com/v.mp4");
        assert!(!video.is_closed());

        assign(&mut video, "og:video:secure_url", "https://example.com/v.mp4");
        assert!(video.is_closed());
    }

    #[test]
    fn test_video_url_aliases() {
        let mut video = Video::default();
        assign(&mut video, "og:video", "a");
        assign(&mut video, "og:video:url", "b");
        assert_eq!(video.url.as_deref(), Some("b"));
    }

    #[test]
    fn test_empty_record_json() {
        let json = to_json(&Attributes::default());
        assert_eq!(json, "{\n\t\"url\": \"\"\n}");
    }

    #[test]
    fn test_json_field_names() {
        let attrs = Attributes {
            kind: Some("video.movie".to_string()),
            fb_app: Some("42".to_string()),
            apps: vec![App {
                app_id: Some("111".to_string()),
                ..App::new("ios")
            }],
            twitter: Some(Twitter {
                username: Some("@site".to_string()),
                ..Twitter::default()
            }),
            player: Some(Player {
                url: Some("https://example.com/embed".to_string()),
                ..Player::default()
            }),
            ..Attributes::default()
        };

        let value: serde_json::Value = serde_json::from_str(&to_json(&attrs)).unwrap();
        assert_eq!(value["type"], "video.movie");
        assert_eq!(value["fbapp"], "42");
        assert_eq!(value["apps"][0]["type"], "ios");
        assert_eq!(value["apps"][0]["app_id"], "111");
        assert_eq!(value["twitter"]["user_name"], "@site");
        assert_eq!(value["player"]["player"], "https://example.com/embed");
        assert!(value.get("videos").is_none());
        assert!(value.get("icons").is_none());
    }

    #[test]
    fn test_video_without_url_emits_empty_string() {
        let attrs = Attributes {
            videos: vec![Video {
                width: Some("640".to_string()),
                ..Video::default()
            }],
            ..Attributes::default()
        };
        let value: serde_json::Value = serde_json::from_str(&to_json(&attrs)).unwrap();
        assert_eq!(value["videos"][0]["url"], "");
        assert_eq!(value["videos"][0]["width"], "640");
        assert!(value["videos"][0].get("secure_url").is_none());
    }

    #[test]
    fn test_json_uses_tabs() {
        let attrs = Attributes {
            title: Some("T".to_string()),
            ..Attributes::default()
        };
        let json = to_json(&attrs);
        assert!(json.contains("\n\t\"title\": \"T\""));
        assert!(!json.contains("  "));
    }
}
