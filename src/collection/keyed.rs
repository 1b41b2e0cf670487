//! The capability every value stored in an [`OrderedCollection`] exposes
//!
//! [`OrderedCollection`]: super::OrderedCollection

use std::fmt::Debug;

use super::error::InvalidKey;

/// A value that knows its own key and how a change would affect it
///
/// `preview_key` must be pure: it reports the key the value *would* have after
/// `set_key(change)` without touching the value, and it must reject exactly
/// the inputs `set_key` rejects. Collections rely on this to detect
/// collisions before committing anything.
pub trait Keyed {
    /// The ordering key derived from the value's fields
    type Key: Ord + Clone + Debug;

    /// A requested change to one or more key fields
    type Change;

    /// The key this value is currently stored under
    fn key(&self) -> Self::Key;

    /// Reject a value whose current key is unusable (checked on insert)
    fn check_key(&self) -> Result<(), InvalidKey> {
        Ok(())
    }

    /// Apply a key change
    fn set_key(&mut self, change: Self::Change) -> Result<(), InvalidKey>;

    /// The key this value would have after `set_key(change)`
    fn preview_key(&self, change: &Self::Change) -> Result<Self::Key, InvalidKey>;
}

/// Trim a key component, rejecting it if nothing is left
pub fn required_component(value: &str, component: &str) -> Result<String, InvalidKey> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(InvalidKey::empty(component))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_component() {
        assert_eq!(required_component("  Lima ", "City").unwrap(), "Lima");
        assert_eq!(
            required_component("   ", "City"),
            Err(InvalidKey::empty("City"))
        );
    }
}
