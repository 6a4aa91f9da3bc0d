use crate::classify::LinkAttrs;
use crate::model::Icon;

/// Size label for an icon link that declares no `sizes`.
pub fn default_icon_size(rel: &str) -> &'static str {
    if rel == "mask-icon" {
        "mask-icon"
    } else if rel.contains("shortcut") {
        "16x16"
    } else {
        "unknown"
    }
}

/// Build an icon entry from a link, or `None` if the link is not an icon.
///
/// Alternate links pass the relation filter but have no entry of their own.
pub fn icon_from_link(link: &LinkAttrs) -> Option<Icon> {
    if !link.is_icon() {
        if link.is_alternate() {
            tracing::trace!("skipping alternate link {}", link.href);
        }
        return None;
    }

    let size = if link.sizes.is_empty() {
        default_icon_size(&link.rel).to_string()
    } else {
        link.sizes.clone()
    };

    Some(Icon {
        size,
        url: (!link.href.is_empty()).then(|| link.href.clone()),
    })
}
