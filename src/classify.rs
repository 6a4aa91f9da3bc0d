//! Turns raw `meta`/`link` attribute lists into the key/value pairs the
//! handlers work with.

/// A `meta` tag reduced to its effective key and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaAttrs {
    pub name: String,
    pub content: String,
}

impl MetaAttrs {
    /// Resolve the key (`property`, falling back to `name`) and content.
    ///
    /// Returns `None` when either ends up empty after trimming.
    pub fn from_attrs(attrs: &[(String, String)]) -> Option<Self> {
        let (mut property, mut name, mut content) = ("", "", "");
        for (key, value) in attrs {
            match key.as_str() {
                "property" => property = value.trim(),
                "name" => name = value.trim(),
                "content" => content = value.trim(),
                _ => {}
            }
        }

        let key = if property.is_empty() { name } else { property };
        if key.is_empty() || content.is_empty() {
            return None;
        }

        Some(Self {
            name: key.to_string(),
            content: content.to_string(),
        })
    }
}

/// The attributes of a `link` tag that matter for icons and alternates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkAttrs {
    pub rel: String,
    pub sizes: String,
    pub id: String,
    pub href: String,
}

impl LinkAttrs {
    pub fn from_attrs(attrs: &[(String, String)]) -> Self {
        let mut link = Self::default();
        for (key, value) in attrs {
            let slot = match key.as_str() {
                "rel" => &mut link.rel,
                "sizes" => &mut link.sizes,
                "href" => &mut link.href,
                "id" => &mut link.id,
                _ => continue,
            };
            *slot = value.trim().to_string();
        }
        link
    }

    pub fn is_icon(&self) -> bool {
        self.rel.contains("icon")
    }

    pub fn is_alternate(&self) -> bool {
        self.rel.contains("alternate") && !self.rel.contains("stylesheet")
    }

    /// Links worth handing to a handler: icons and non-stylesheet alternates.
    pub fn is_relevant(&self) -> bool {
        self.is_icon() || self.is_alternate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_property_preferred_over_name() {
        let meta = MetaAttrs::from_attrs(&attrs(&[
            ("name", "description"),
            ("property", "og:description"),
            ("content", "Desc"),
        ]))
        .unwrap();
        assert_eq!(meta.name, "og:description");
        assert_eq!(meta.content, "Desc");
    }

    #[test]
    fn test_empty_property_falls_back_to_name() {
        let with_empty = MetaAttrs::from_attrs(&attrs(&[
            ("property", ""),
            ("name", "og:title"),
            ("content", "T"),
        ]));
        let with_property =
            MetaAttrs::from_attrs(&attrs(&[("property", "og:title"), ("content", "T")]));
        assert_eq!(with_empty, with_property);
        assert_eq!(with_empty.unwrap().name, "og:title");
    }

    #[test]
    fn test_values_are_trimmed() {
        let meta = MetaAttrs::from_attrs(&attrs(&[
            ("property", "  og:title\n"),
            ("content", "\t Hello  "),
        ]))
        .unwrap();
        assert_eq!(meta.name, "og:title");
        assert_eq!(meta.content, "Hello");
    }

    #[test]
    fn test_empty_key_or_content_discarded() {
        assert!(MetaAttrs::from_attrs(&attrs(&[("property", "og:title"), ("content", "")])).is_none());
        assert!(MetaAttrs::from_attrs(&attrs(&[("property", "og:title"), ("content", "   ")])).is_none());
        assert!(MetaAttrs::from_attrs(&attrs(&[("charset", "utf-8")])).is_none());
        assert!(MetaAttrs::from_attrs(&attrs(&[("name", " "), ("content", "x")])).is_none());
    }

    #[test]
    fn test_link_filter() {
        let link = |rel: &str| LinkAttrs::from_attrs(&attrs(&[("rel", rel), ("href", "/x")]));

        assert!(link("icon").is_relevant());
        assert!(link("apple-touch-icon").is_relevant());
        assert!(link("alternate").is_relevant());
        assert!(!link("alternate").is_icon());
        assert!(!link("alternate stylesheet").is_relevant());
        assert!(!link("stylesheet").is_relevant());
        assert!(!link("canonical").is_relevant());
    }

    #[test]
    fn test_link_attrs_trimmed() {
        let link = LinkAttrs::from_attrs(&attrs(&[
            ("rel", " icon "),
            ("sizes", " 32x32"),
            ("href", "/favicon.png "),
            ("id", "fav"),
            ("type", "image/png"),
        ]));
        assert_eq!(
            link,
            LinkAttrs {
                rel: "icon".to_string(),
                sizes: "32x32".to_string(),
                id: "fav".to_string(),
                href: "/favicon.png".to_string(),
            }
        );
    }
}
