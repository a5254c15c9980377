//! Candidate character sets for each password category

use crate::policy::PolicyFlags;

pub const STD_LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const STD_UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const STD_DIGITS: &str = "0123456789";
pub const STD_SYMBOLS: &str = "+-=_@#$%^&;:,.<>/~\\[](){}?!|*";
pub const STD_HEX_DIGITS: &str = "0123456789abcdef";

// Easy-vision sets drop glyphs that are easy to confuse (1/l/I, 0/O, 2/Z, 5/S ...)
pub const EASY_VISION_LOWERCASE: &str = "abcdefghijkmnopqrstuvwxyz";
pub const EASY_VISION_UPPERCASE: &str = "ABCDEFGHJKLMNPQRTUVWXY";
pub const EASY_VISION_DIGITS: &str = "346789";
pub const EASY_VISION_SYMBOLS: &str = "+-=_@#$%^&<>/~\\?*";
pub const EASY_VISION_HEX_DIGITS: &str = "0123456789abcdef";

/// Symbols that pronounceable mode may substitute for letters
pub const PRONOUNCEABLE_SYMBOLS: &str = "@&(#!|$+";

/// A password composition category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
    HexDigit,
}

impl Category {
    /// All categories, in weighting-axis order
    pub const ALL: [Category; 5] = [
        Category::Lowercase,
        Category::Uppercase,
        Category::Digit,
        Category::Symbol,
        Category::HexDigit,
    ];

    /// Categories that carry a minimum-count field in a policy
    pub const WITH_MINIMUM: [Category; 4] = [
        Category::Lowercase,
        Category::Uppercase,
        Category::Digit,
        Category::Symbol,
    ];

    /// Policy flag enabling this category
    pub const fn flag(self) -> PolicyFlags {
        match self {
            Category::Lowercase => PolicyFlags::USE_LOWERCASE,
            Category::Uppercase => PolicyFlags::USE_UPPERCASE,
            Category::Digit => PolicyFlags::USE_DIGITS,
            Category::Symbol => PolicyFlags::USE_SYMBOLS,
            Category::HexDigit => PolicyFlags::USE_HEX_DIGITS,
        }
    }

    pub const fn standard_chars(self) -> &'static str {
        match self {
            Category::Lowercase => STD_LOWERCASE,
            Category::Uppercase => STD_UPPERCASE,
            Category::Digit => STD_DIGITS,
            Category::Symbol => STD_SYMBOLS,
            Category::HexDigit => STD_HEX_DIGITS,
        }
    }

    pub const fn easy_vision_chars(self) -> &'static str {
        match self {
            Category::Lowercase => EASY_VISION_LOWERCASE,
            Category::Uppercase => EASY_VISION_UPPERCASE,
            Category::Digit => EASY_VISION_DIGITS,
            Category::Symbol => EASY_VISION_SYMBOLS,
            Category::HexDigit => EASY_VISION_HEX_DIGITS,
        }
    }

    /// Built-in candidate set for the given variant
    pub const fn chars(self, easy_vision: bool) -> &'static str {
        if easy_vision {
            self.easy_vision_chars()
        } else {
            self.standard_chars()
        }
    }

    /// Human-readable name
    pub const fn label(self) -> &'static str {
        match self {
            Category::Lowercase => "Lowercase",
            Category::Uppercase => "Uppercase",
            Category::Digit => "Digits",
            Category::Symbol => "Symbols",
            Category::HexDigit => "Hexadecimal",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easy_vision_sets_are_subsets() {
        for category in Category::ALL {
            let standard = category.standard_chars();
            assert!(category
                .easy_vision_chars()
                .chars()
                .all(|c| standard.contains(c)));
        }
    }

    #[test]
    fn test_easy_vision_drops_ambiguous_glyphs() {
        for ambiguous in ['l', 'I', 'O', '0', '1'] {
            assert!(!EASY_VISION_LOWERCASE.contains(ambiguous));
            assert!(!EASY_VISION_UPPERCASE.contains(ambiguous));
            assert!(!EASY_VISION_DIGITS.contains(ambiguous));
        }
    }

    #[test]
    fn test_set_sizes() {
        assert_eq!(STD_LOWERCASE.len(), 26);
        assert_eq!(STD_UPPERCASE.len(), 26);
        assert_eq!(STD_DIGITS.len(), 10);
        assert_eq!(STD_HEX_DIGITS.len(), 16);
        assert_eq!(EASY_VISION_DIGITS.len(), 6);
    }
}
