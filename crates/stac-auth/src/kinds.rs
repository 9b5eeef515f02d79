//! Named access kinds.
//!
//! [`AccessKinds`] maps human-readable names to [`AccessBits`]. It is
//! seeded with the built-in kinds and grows as the facade allocates new
//! ones through
//! [`add_named_access_type`](crate::StorageAccessControl::add_named_access_type).
//! Names are matched case-insensitively and used to render denials.

use crate::access::AccessBits;
use crate::error::StorageAccessError;

/// Names reserved for masks that are not single kinds.
const RESERVED: [(&str, AccessBits); 3] = [
    ("NOTHING", AccessBits::NOTHING),
    ("ANY", AccessBits::ANY),
    ("DIR", AccessBits::DIR),
];

/// Registry of access kind names.
///
/// # Example
///
/// ```
/// use stac_auth::{AccessBits, AccessKinds};
///
/// let mut kinds = AccessKinds::new();
/// kinds.insert("image", AccessBits::from_bits_retain(8)).unwrap();
///
/// assert_eq!(kinds.lookup("Image"), Some(AccessBits::from_bits_retain(8)));
/// assert_eq!(kinds.describe(AccessBits::BINARY | AccessBits::from_bits_retain(8)), "BINARY | IMAGE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKinds {
    /// Single-bit kinds in allocation order.
    entries: Vec<(String, AccessBits)>,
}

impl AccessKinds {
    /// Creates a registry holding `BINARY`, `JSON` and `TEXT`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: vec![
                ("BINARY".to_string(), AccessBits::BINARY),
                ("JSON".to_string(), AccessBits::JSON),
                ("TEXT".to_string(), AccessBits::TEXT),
            ],
        }
    }

    /// Records `name` for a single allocated bit.
    ///
    /// # Errors
    ///
    /// Returns [`StorageAccessError::DuplicateKind`] if the name is already
    /// known (including reserved names such as `ANY`).
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        bit: AccessBits,
    ) -> Result<(), StorageAccessError> {
        let name = name.into().to_uppercase();
        if self.lookup(&name).is_some() {
            return Err(StorageAccessError::DuplicateKind { name });
        }
        self.entries.push((name, bit));
        Ok(())
    }

    /// Looks up a kind or reserved mask by name (case-insensitive).
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<AccessBits> {
        let upper = name.to_uppercase();
        RESERVED
            .iter()
            .find(|(n, _)| *n == upper)
            .map(|(_, bits)| *bits)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(n, _)| *n == upper)
                    .map(|(_, bits)| *bits)
            })
    }

    /// Combines a list of names into one mask.
    ///
    /// Returns the combined bits and the names that were not recognised.
    #[must_use]
    pub fn parse_list<'a, S: AsRef<str>>(&self, names: &'a [S]) -> (AccessBits, Vec<&'a str>) {
        let mut bits = AccessBits::NOTHING;
        let mut unknown = Vec::new();
        for name in names {
            match self.lookup(name.as_ref()) {
                Some(b) => bits |= b,
                None => unknown.push(name.as_ref()),
            }
        }
        (bits, unknown)
    }

    /// Names of the known kinds contained in `bits`, in allocation order.
    #[must_use]
    pub fn names(&self, bits: AccessBits) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, b)| bits.contains(*b))
            .map(|(n, _)| n.as_str())
            .collect();
        if bits.contains(AccessBits::DIR) {
            names.push("DIR");
        }
        names
    }

    /// Renders `bits` as `"A | B"`, with unnamed bits in hex.
    #[must_use]
    pub fn describe(&self, bits: AccessBits) -> String {
        if bits.is_empty() {
            return "NOTHING".to_string();
        }

        let mut parts: Vec<String> = self.names(bits).into_iter().map(str::to_string).collect();

        let named = self
            .entries
            .iter()
            .fold(AccessBits::DIR, |acc, (_, b)| acc | *b);
        let rest = bits.difference(named);
        if !rest.is_empty() {
            parts.push(format!("{:#x}", rest.bits()));
        }
        parts.join(" | ")
    }

    /// Iterates over `(name, bit)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, AccessBits)> {
        self.entries.iter().map(|(n, b)| (n.as_str(), *b))
    }

    /// Number of named kinds (reserved masks excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the built-in kinds are never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AccessKinds {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_with_builtins() {
        let kinds = AccessKinds::new();
        assert_eq!(kinds.len(), 3);
        assert_eq!(kinds.lookup("binary"), Some(AccessBits::BINARY));
        assert_eq!(kinds.lookup("JSON"), Some(AccessBits::JSON));
        assert_eq!(kinds.lookup("Text"), Some(AccessBits::TEXT));
    }

    #[test]
    fn reserved_names_resolve() {
        let kinds = AccessKinds::new();
        assert_eq!(kinds.lookup("any"), Some(AccessBits::ANY));
        assert_eq!(kinds.lookup("NOTHING"), Some(AccessBits::NOTHING));
        assert_eq!(kinds.lookup("dir"), Some(AccessBits::DIR));
        assert_eq!(kinds.lookup("video"), None);
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut kinds = AccessKinds::new();
        kinds
            .insert("image", AccessBits::from_bits_retain(8))
            .expect("first insert");
        let err = kinds
            .insert("IMAGE", AccessBits::from_bits_retain(16))
            .unwrap_err();
        assert!(matches!(err, StorageAccessError::DuplicateKind { ref name } if name == "IMAGE"));

        let err = kinds
            .insert("any", AccessBits::from_bits_retain(16))
            .unwrap_err();
        assert!(matches!(err, StorageAccessError::DuplicateKind { .. }));
    }

    #[test]
    fn parse_list_reports_unknown() {
        let kinds = AccessKinds::new();
        let (bits, unknown) = kinds.parse_list(&["binary", "bogus", "TEXT"]);
        assert_eq!(bits, AccessBits::BINARY | AccessBits::TEXT);
        assert_eq!(unknown, vec!["bogus"]);
    }

    #[test]
    fn describe_named_and_unnamed() {
        let mut kinds = AccessKinds::new();
        kinds
            .insert("image", AccessBits::from_bits_retain(8))
            .expect("insert");

        assert_eq!(kinds.describe(AccessBits::NOTHING), "NOTHING");
        assert_eq!(kinds.describe(AccessBits::JSON), "JSON");
        assert_eq!(
            kinds.describe(AccessBits::BINARY | AccessBits::from_bits_retain(8)),
            "BINARY | IMAGE"
        );
        assert_eq!(
            kinds.describe(AccessBits::TEXT | AccessBits::from_bits_retain(64)),
            "TEXT | 0x40"
        );
        assert_eq!(kinds.describe(AccessBits::DIR), "DIR");
    }

    #[test]
    fn iter_preserves_allocation_order() {
        let mut kinds = AccessKinds::new();
        kinds
            .insert("audio", AccessBits::from_bits_retain(8))
            .expect("insert");
        let names: Vec<&str> = kinds.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["BINARY", "JSON", "TEXT", "AUDIO"]);
    }
}
