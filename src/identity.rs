//! Identity keys used to join stream events against library entries.
//!
//! A key is `artist:track` with no escaping. Names that themselves contain
//! a colon can collide (`"A:B" + "C"` and `"A" + "B:C"` both give `A:B:C`);
//! the join inherits that imprecision.

/// Separator between the two key parts, and between resource identifier segments.
pub const KEY_SEPARATOR: char = ':';

/// Build the composite key `primary:secondary`.
#[must_use]
pub fn build_key(primary: &str, secondary: &str) -> String {
    let mut key = String::with_capacity(primary.len() + secondary.len() + 1);
    key.push_str(primary);
    key.push(KEY_SEPARATOR);
    key.push_str(secondary);
    key
}

/// Extract the track identifier (third segment) from a resource identifier
/// such as `spotify:track:4uLU6hMCjMI75M1A2tKUQC`.
///
/// Returns `None` when the identifier has fewer than three segments.
#[must_use]
pub fn track_uri(uri: &str) -> Option<&str> {
    uri.split(KEY_SEPARATOR).nth(2)
}

/// Records that can be keyed by an artist and a track name.
pub trait Identity {
    fn artist(&self) -> &str;
    fn track(&self) -> &str;

    /// The join key for this record.
    fn unique_id(&self) -> String {
        build_key(self.artist(), self.track())
    }
}
