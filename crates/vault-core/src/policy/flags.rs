//! Policy flag bitset

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// Categories and modifiers enabled by a password policy.
///
/// Bit values are part of the persisted policy string and must not change.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyFlags(u16);

impl PolicyFlags {
    pub const USE_LOWERCASE: Self = Self(0x0001);
    pub const USE_UPPERCASE: Self = Self(0x0002);
    pub const USE_DIGITS: Self = Self(0x0004);
    pub const USE_SYMBOLS: Self = Self(0x0008);
    pub const USE_HEX_DIGITS: Self = Self(0x0010);
    pub const USE_EASY_VISION: Self = Self(0x0020);
    pub const MAKE_PRONOUNCEABLE: Self = Self(0x0040);

    /// Character categories, excluding the modifiers
    pub const CATEGORIES: Self = Self(0x001F);

    /// Modes under which every active minimum collapses to one
    pub const COLLAPSING: Self = Self(0x0070);

    const NAMES: [(Self, &'static str); 7] = [
        (Self::USE_LOWERCASE, "USE_LOWERCASE"),
        (Self::USE_UPPERCASE, "USE_UPPERCASE"),
        (Self::USE_DIGITS, "USE_DIGITS"),
        (Self::USE_SYMBOLS, "USE_SYMBOLS"),
        (Self::USE_HEX_DIGITS, "USE_HEX_DIGITS"),
        (Self::USE_EASY_VISION, "USE_EASY_VISION"),
        (Self::MAKE_PRONOUNCEABLE, "MAKE_PRONOUNCEABLE"),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Wrap raw bits. Unknown bits are preserved.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// All bits of `other` are set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Any bit of `other` is set
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Insert or remove `other` depending on `enabled`
    pub fn set(&mut self, other: Self, enabled: bool) {
        if enabled {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    /// Bits other than `other`
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for PolicyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PolicyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Debug for PolicyFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "PolicyFlags(empty)");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "PolicyFlags({:#06x}: {})", self.0, names.join(" | "))
    }
}
