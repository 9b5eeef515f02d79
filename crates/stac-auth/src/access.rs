//! Bit permission model.
//!
//! [`AccessBits`] is a fixed-width (32-bit) mask of access kinds. Three
//! kinds are built in; the rest of the low 31 bits are handed out at
//! runtime by [`BitAllocator`], doubling from the lowest unused bit.
//!
//! ```text
//! bit  31      30 ..... 3   2     1     0
//!     ┌─────┬────────────┬─────┬─────┬────────┐
//!     │ DIR │ allocatable│TEXT │JSON │ BINARY │
//!     └─────┴────────────┴─────┴─────┴────────┘
//!            └──────────── ANY ─────────────┘
//! ```
//!
//! `DIR` sits outside `ANY`, so a leaf granted `ANY` never looks like a
//! directory and allocation can never collide with the sentinel.
//!
//! # Example
//!
//! ```
//! use stac_auth::{AccessBits, compare};
//!
//! let registered = AccessBits::BINARY | AccessBits::TEXT;
//! let requested = AccessBits::BINARY | AccessBits::JSON;
//!
//! let result = compare(registered, requested);
//! assert_eq!(result.allowed, AccessBits::BINARY);
//! assert_eq!(result.denied, AccessBits::JSON);
//! assert!(!result.is_granted());
//! ```

use crate::error::StorageAccessError;
use bitflags::bitflags;

bitflags! {
    /// Access kinds requested by a caller or registered on a tree leaf.
    ///
    /// Runtime-allocated kinds are plain bits with no associated constant;
    /// every operation here retains them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct AccessBits: u32 {
        /// Raw byte access.
        const BINARY = 1 << 0;
        /// Structured JSON access.
        const JSON   = 1 << 1;
        /// UTF-8 text access.
        const TEXT   = 1 << 2;
        /// Sentinel reported for directory nodes.
        const DIR    = 1 << 31;

        // Allocated kinds are valid bits too.
        const _ = !0;
    }
}

impl AccessBits {
    /// No access at all.
    pub const NOTHING: Self = Self::empty();

    /// Every kind bit; also the allocation ceiling.
    pub const ANY: Self = Self::from_bits_retain(0x7FFF_FFFF);

    /// Lowest bit handed out by [`BitAllocator`].
    pub const FIRST_ALLOCATABLE: Self = Self::from_bits_retain(1 << 3);
}

/// Outcome of comparing a registered mask against a requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessComparison {
    /// Requested bits the registered mask allows.
    pub allowed: AccessBits,
    /// Requested bits the registered mask does not allow.
    pub denied: AccessBits,
}

impl AccessComparison {
    /// Returns `true` when nothing requested was denied.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        self.denied.is_empty()
    }
}

/// Splits `requested` into the subset `allowed` grants and the rest.
///
/// `allowed & requested` and `requested & !allowed`.
#[must_use]
pub fn compare(allowed: AccessBits, requested: AccessBits) -> AccessComparison {
    AccessComparison {
        allowed: allowed.intersection(requested),
        denied: requested.difference(allowed),
    }
}

/// Monotonic allocator for new access kinds.
///
/// Yields `FIRST_ALLOCATABLE`, then doubles on every call until the next
/// bit would reach [`AccessBits::ANY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitAllocator {
    next: u32,
}

impl BitAllocator {
    /// Creates an allocator positioned at the first free bit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: AccessBits::FIRST_ALLOCATABLE.bits(),
        }
    }

    /// Allocates the next free bit.
    ///
    /// # Errors
    ///
    /// Returns [`StorageAccessError::AllocatorExhausted`] once the ceiling
    /// is reached. The allocator stays exhausted afterwards.
    pub fn allocate(&mut self) -> Result<AccessBits, StorageAccessError> {
        if self.next >= AccessBits::ANY.bits() {
            return Err(StorageAccessError::AllocatorExhausted {
                ceiling: AccessBits::ANY.bits(),
            });
        }
        let bit = self.next;
        self.next <<= 1;
        Ok(AccessBits::from_bits_retain(bit))
    }
}

impl Default for BitAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_kinds_are_distinct_bits() {
        assert_eq!(AccessBits::BINARY.bits(), 1);
        assert_eq!(AccessBits::JSON.bits(), 2);
        assert_eq!(AccessBits::TEXT.bits(), 4);
        assert_eq!(AccessBits::NOTHING.bits(), 0);
    }

    #[test]
    fn dir_is_outside_any() {
        assert!(!AccessBits::ANY.contains(AccessBits::DIR));
        assert!(AccessBits::ANY.contains(AccessBits::BINARY | AccessBits::JSON | AccessBits::TEXT));
    }

    #[test]
    fn compare_splits_requested() {
        let result = compare(AccessBits::BINARY, AccessBits::BINARY | AccessBits::JSON);
        assert_eq!(result.allowed, AccessBits::BINARY);
        assert_eq!(result.denied, AccessBits::JSON);
        assert!(!result.is_granted());
    }

    #[test]
    fn compare_full_cover_is_granted() {
        let result = compare(AccessBits::ANY, AccessBits::TEXT);
        assert_eq!(result.allowed, AccessBits::TEXT);
        assert!(result.is_granted());
    }

    #[test]
    fn compare_nothing_requested_is_granted() {
        let result = compare(AccessBits::NOTHING, AccessBits::NOTHING);
        assert!(result.is_granted());
    }

    #[test]
    fn compare_retains_runtime_bits() {
        let custom = AccessBits::from_bits_retain(1 << 5);
        let result = compare(AccessBits::BINARY, AccessBits::BINARY | custom);
        assert_eq!(result.denied, custom);
        assert_eq!(result.denied.bits(), 32);
    }

    #[test]
    fn compare_matches_bit_arithmetic() {
        for allowed in [0u32, 1, 3, 5, 7, 0x7FFF_FFFF, 0x8000_0000] {
            for requested in [0u32, 1, 2, 6, 8, 0x8000_0001] {
                let result = compare(
                    AccessBits::from_bits_retain(allowed),
                    AccessBits::from_bits_retain(requested),
                );
                assert_eq!(result.allowed.bits(), allowed & requested);
                assert_eq!(result.denied.bits(), requested & !allowed);
                assert_eq!(result.is_granted(), allowed & requested == requested);
            }
        }
    }

    #[test]
    fn allocator_doubles_from_first_free_bit() {
        let mut alloc = BitAllocator::new();
        assert_eq!(alloc.allocate().unwrap().bits(), 8);
        assert_eq!(alloc.allocate().unwrap().bits(), 16);
        assert_eq!(alloc.allocate().unwrap().bits(), 32);
        assert_eq!(alloc.allocate().unwrap().bits(), 64);
    }

    #[test]
    fn allocator_exhausts_at_ceiling() {
        let mut alloc = BitAllocator::new();
        let mut last = 0;
        for _ in 0..28 {
            let bit = alloc.allocate().expect("bit available").bits();
            assert!(bit > last, "bits must strictly increase");
            assert!(bit.is_power_of_two());
            last = bit;
        }
        assert_eq!(last, 1 << 30);

        let err = alloc.allocate().unwrap_err();
        assert!(matches!(err, StorageAccessError::AllocatorExhausted { .. }));
        // Stays exhausted
        assert!(alloc.allocate().is_err());
    }
}
