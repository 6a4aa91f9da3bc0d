//! Declarative key-to-field mapping.
//!
//! Every record that can receive meta values publishes a static table of
//! fields, each listing the meta keys it accepts. Assigning a value is a
//! lookup in that table: text fields are overwritten, tag lists are appended.

/// Where a matched value lands inside a record.
pub enum Slot<T> {
    /// Single value, last write wins.
    Text(fn(&mut T) -> &mut Option<String>),
    /// Append-only list of values.
    Tags(fn(&mut T) -> &mut Vec<String>),
}

/// One entry of a record's field table.
pub struct Field<T: 'static> {
    /// Name used in serialized output, for diagnostics.
    pub name: &'static str,
    /// Meta keys routed to this field.
    pub aliases: &'static [&'static str],
    pub slot: Slot<T>,
}

/// A record that can be populated from meta key/value pairs.
pub trait MetaFields: Sized + 'static {
    const FIELDS: &'static [Field<Self>];
}

/// Store `content` in every field of `target` that accepts `key`.
///
/// Returns `false` when no field accepts the key, which is not an error.
pub fn assign<T: MetaFields>(target: &mut T, key: &str, content: &str) -> bool {
    let mut matched = false;
    for field in T::FIELDS.iter().filter(|f| f.aliases.contains(&key)) {
        tracing::trace!("{} -> {}", key, field.name);
        match &field.slot {
            Slot::Text(get) => *get(target) = Some(content.to_owned()),
            Slot::Tags(get) => get(target).push(content.to_owned()),
        }
        matched = true;
    }

    if !matched {
        tracing::trace!("no field for key {}", key);
    }
    matched
}
