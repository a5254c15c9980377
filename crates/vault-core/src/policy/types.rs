//! Password policy value type and validation

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::PolicyFlags;
use crate::crypto::{RandomSource, SecretString};
use crate::error::Result;
use crate::generator::{CharacterPool, Category};

/// Upper bound for the length and every minimum, unless configured otherwise
pub const DEFAULT_FIELD_MAX: u16 = 1024;

/// Configured maxima for policy fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyLimits {
    pub max_length: u16,
    pub max_digit_min: u16,
    pub max_lower_min: u16,
    pub max_symbol_min: u16,
    pub max_upper_min: u16,
}

impl Default for PolicyLimits {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_FIELD_MAX,
            max_digit_min: DEFAULT_FIELD_MAX,
            max_lower_min: DEFAULT_FIELD_MAX,
            max_symbol_min: DEFAULT_FIELD_MAX,
            max_upper_min: DEFAULT_FIELD_MAX,
        }
    }
}

impl PolicyLimits {
    /// Configured maximum for a category's minimum count
    pub fn max_minimum(&self, category: Category) -> u16 {
        match category {
            Category::Lowercase => self.max_lower_min,
            Category::Uppercase => self.max_upper_min,
            Category::Digit => self.max_digit_min,
            Category::Symbol => self.max_symbol_min,
            Category::HexDigit => 0,
        }
    }
}

/// Reasons a policy cannot be used for generation or persistence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("policy has no flags set")]
    NoFlags,

    #[error("hexadecimal passwords cannot be combined with other options")]
    HexWithOtherFlags,

    #[error("no character category is enabled")]
    NoCategory,

    #[error("password length must be at least 1")]
    ZeroLength,

    #[error("password length {length} exceeds the maximum of {max}")]
    LengthTooLarge { length: u16, max: u16 },

    #[error("minimum {category} count {value} exceeds the maximum of {max}")]
    MinimumTooLarge {
        category: Category,
        value: u16,
        max: u16,
    },

    #[error("minimum counts add up to {total}, more than the password length {length}")]
    MinimumsExceedLength { total: u32, length: u16 },
}

/// A password generation policy.
///
/// `flags == 0` is the "use the default policy" sentinel, see
/// [`PasswordPolicy::is_default_sentinel`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordPolicy {
    pub flags: PolicyFlags,
    pub length: u16,
    pub digit_min: u16,
    pub lower_min: u16,
    pub symbol_min: u16,
    pub upper_min: u16,
    /// Custom symbol set overriding the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<String>,
}

impl PasswordPolicy {
    /// Start a policy of `length` characters with nothing enabled
    pub fn new(length: u16) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    /// The empty policy returned for malformed input
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this is the "use default policy" marker
    pub fn is_default_sentinel(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn with_lowercase(mut self, minimum: u16) -> Self {
        self.flags.insert(PolicyFlags::USE_LOWERCASE);
        self.lower_min = minimum;
        self
    }

    pub fn with_uppercase(mut self, minimum: u16) -> Self {
        self.flags.insert(PolicyFlags::USE_UPPERCASE);
        self.upper_min = minimum;
        self
    }

    pub fn with_digits(mut self, minimum: u16) -> Self {
        self.flags.insert(PolicyFlags::USE_DIGITS);
        self.digit_min = minimum;
        self
    }

    pub fn with_symbols(mut self, minimum: u16) -> Self {
        self.flags.insert(PolicyFlags::USE_SYMBOLS);
        self.symbol_min = minimum;
        self
    }

    pub fn with_hex_digits(mut self) -> Self {
        self.flags.insert(PolicyFlags::USE_HEX_DIGITS);
        self
    }

    pub fn with_easy_vision(mut self) -> Self {
        self.flags.insert(PolicyFlags::USE_EASY_VISION);
        self
    }

    pub fn pronounceable(mut self) -> Self {
        self.flags.insert(PolicyFlags::MAKE_PRONOUNCEABLE);
        self
    }

    /// Override the symbol set. An empty string clears the override.
    pub fn with_custom_symbols(mut self, symbols: impl Into<String>) -> Self {
        let symbols = symbols.into();
        self.symbols = (!symbols.is_empty()).then_some(symbols);
        self
    }

    pub fn uses(&self, category: Category) -> bool {
        self.flags.contains(category.flag())
    }

    /// Minimum count stored for a category
    pub fn minimum(&self, category: Category) -> u16 {
        match category {
            Category::Lowercase => self.lower_min,
            Category::Uppercase => self.upper_min,
            Category::Digit => self.digit_min,
            Category::Symbol => self.symbol_min,
            Category::HexDigit => 0,
        }
    }

    pub fn set_minimum(&mut self, category: Category, value: u16) {
        match category {
            Category::Lowercase => self.lower_min = value,
            Category::Uppercase => self.upper_min = value,
            Category::Digit => self.digit_min = value,
            Category::Symbol => self.symbol_min = value,
            Category::HexDigit => {}
        }
    }

    /// Hex, easy-vision and pronounceable modes ignore per-category counts
    pub fn minimums_collapse(&self) -> bool {
        self.flags.intersects(PolicyFlags::COLLAPSING)
    }

    /// Sum of all four minimum fields, enabled or not. In the collapsing
    /// modes each active category counts as one instead.
    pub fn effective_minimum_total(&self) -> u32 {
        if self.minimums_collapse() {
            return Category::WITH_MINIMUM
                .iter()
                .filter(|c| self.uses(**c))
                .map(|_| 1)
                .sum();
        }
        Category::WITH_MINIMUM
            .iter()
            .map(|c| u32::from(self.minimum(*c)))
            .sum()
    }

    /// Copy with disabled categories' minimums cleared, and active minimums
    /// set to one in the collapsing modes.
    pub fn normalized(&self) -> Self {
        let mut policy = self.clone();
        let collapse = self.minimums_collapse();
        for category in Category::WITH_MINIMUM {
            let value = if !self.uses(category) {
                0
            } else if collapse {
                1
            } else {
                self.minimum(category)
            };
            policy.set_minimum(category, value);
        }
        policy
    }

    /// Rules shared by decoding and full validation
    pub(crate) fn check_persisted(&self, limits: &PolicyLimits) -> std::result::Result<(), PolicyViolation> {
        if self.flags.is_empty() {
            return Err(PolicyViolation::NoFlags);
        }
        if self.flags.contains(PolicyFlags::USE_HEX_DIGITS)
            && !self.flags.without(PolicyFlags::USE_HEX_DIGITS).is_empty()
        {
            return Err(PolicyViolation::HexWithOtherFlags);
        }
        if self.length > limits.max_length {
            return Err(PolicyViolation::LengthTooLarge {
                length: self.length,
                max: limits.max_length,
            });
        }
        for category in Category::WITH_MINIMUM {
            let value = self.minimum(category);
            let max = limits.max_minimum(category);
            if value > max {
                return Err(PolicyViolation::MinimumTooLarge {
                    category,
                    value,
                    max,
                });
            }
        }
        let total = self.effective_minimum_total();
        if total > u32::from(self.length) {
            return Err(PolicyViolation::MinimumsExceedLength {
                total,
                length: self.length,
            });
        }
        Ok(())
    }

    /// Check every invariant required before generation or encoding
    pub fn validate(&self, limits: &PolicyLimits) -> std::result::Result<(), PolicyViolation> {
        self.check_persisted(limits)?;
        if !self.flags.intersects(PolicyFlags::CATEGORIES) {
            return Err(PolicyViolation::NoCategory);
        }
        if self.length == 0 {
            return Err(PolicyViolation::ZeroLength);
        }
        Ok(())
    }

    /// Fill in what the sentinel and unset fields leave to the defaults:
    /// the whole policy when `flags == 0`, otherwise the symbol set.
    pub fn resolve(&self, default: &PasswordPolicy) -> PasswordPolicy {
        if self.is_default_sentinel() {
            return default.clone();
        }
        let mut policy = self.clone();
        if policy.symbols.is_none() {
            policy.symbols = default.symbols.clone();
        }
        policy
    }

    /// Normalize, validate and generate one password
    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        limits: &PolicyLimits,
        rng: &mut R,
    ) -> Result<SecretString> {
        let policy = self.normalized();
        policy.validate(limits)?;
        debug!(flags = ?policy.flags, length = policy.length, "Generating password");
        Ok(CharacterPool::new(&policy).make_password(rng))
    }

    /// Generate with this policy, falling back to `default` for the sentinel
    pub fn make_random_password<R: RandomSource + ?Sized>(
        &self,
        default: &PasswordPolicy,
        limits: &PolicyLimits,
        rng: &mut R,
    ) -> Result<SecretString> {
        self.resolve(default).generate(limits, rng)
    }
}

/// Equal when flags and length match and, for every category enabled in
/// both, the minimum matches. Other minimums and the symbol set are ignored.
impl PartialEq for PasswordPolicy {
    fn eq(&self, other: &Self) -> bool {
        if self.flags != other.flags || self.length != other.length {
            return false;
        }
        Category::WITH_MINIMUM
            .iter()
            .filter(|c| self.uses(**c) && other.uses(**c))
            .all(|c| self.minimum(*c) == other.minimum(*c))
    }
}

impl Eq for PasswordPolicy {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VaultError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn limits() -> PolicyLimits {
        PolicyLimits::default()
    }

    #[test]
    fn test_valid_policy() {
        let policy = PasswordPolicy::new(12)
            .with_lowercase(3)
            .with_uppercase(2)
            .with_digits(2);
        assert_eq!(policy.validate(&limits()), Ok(()));
    }

    #[test]
    fn test_empty_flags_rejected() {
        assert_eq!(
            PasswordPolicy::new(12).validate(&limits()),
            Err(PolicyViolation::NoFlags)
        );
    }

    #[test]
    fn test_hex_with_any_other_flag_rejected() {
        let others = [
            PolicyFlags::USE_LOWERCASE,
            PolicyFlags::USE_UPPERCASE,
            PolicyFlags::USE_DIGITS,
            PolicyFlags::USE_SYMBOLS,
            PolicyFlags::USE_EASY_VISION,
            PolicyFlags::MAKE_PRONOUNCEABLE,
        ];
        for other in others {
            let mut policy = PasswordPolicy::new(16).with_hex_digits();
            policy.flags.insert(other);
            assert_eq!(
                policy.validate(&limits()),
                Err(PolicyViolation::HexWithOtherFlags),
                "{:?}",
                other
            );
        }
        assert_eq!(
            PasswordPolicy::new(16).with_hex_digits().validate(&limits()),
            Ok(())
        );
    }

    #[test]
    fn test_minimums_exceeding_length_rejected() {
        let policy = PasswordPolicy::new(6).with_lowercase(4).with_digits(3);
        assert_eq!(
            policy.validate(&limits()),
            Err(PolicyViolation::MinimumsExceedLength { total: 7, length: 6 })
        );
    }

    #[test]
    fn test_minimums_collapse_in_easy_vision() {
        let policy = PasswordPolicy::new(6)
            .with_lowercase(4)
            .with_digits(3)
            .with_easy_vision();
        assert_eq!(policy.effective_minimum_total(), 2);
        assert_eq!(policy.validate(&limits()), Ok(()));

        let normalized = policy.normalized();
        assert_eq!(normalized.lower_min, 1);
        assert_eq!(normalized.digit_min, 1);
    }

    #[test]
    fn test_collapsed_categories_must_fit() {
        let policy = PasswordPolicy::new(2)
            .with_lowercase(0)
            .with_uppercase(0)
            .with_digits(0)
            .pronounceable();
        assert!(matches!(
            policy.validate(&limits()),
            Err(PolicyViolation::MinimumsExceedLength { total: 3, .. })
        ));
    }

    #[test]
    fn test_limits_enforced() {
        let tight = PolicyLimits {
            max_length: 64,
            max_symbol_min: 4,
            ..PolicyLimits::default()
        };

        let too_long = PasswordPolicy::new(65).with_lowercase(1);
        assert_eq!(
            too_long.validate(&tight),
            Err(PolicyViolation::LengthTooLarge { length: 65, max: 64 })
        );

        let too_many_symbols = PasswordPolicy::new(20).with_symbols(5);
        assert_eq!(
            too_many_symbols.validate(&tight),
            Err(PolicyViolation::MinimumTooLarge {
                category: Category::Symbol,
                value: 5,
                max: 4
            })
        );
    }

    #[test]
    fn test_modifier_only_policy_rejected() {
        let policy = PasswordPolicy::new(8).with_easy_vision();
        assert_eq!(policy.validate(&limits()), Err(PolicyViolation::NoCategory));
    }

    #[test]
    fn test_zero_length_rejected() {
        let policy = PasswordPolicy::new(0).with_lowercase(0);
        assert_eq!(policy.validate(&limits()), Err(PolicyViolation::ZeroLength));
    }

    #[test]
    fn test_normalized_clears_disabled_minimums() {
        let mut policy = PasswordPolicy::new(10).with_lowercase(2);
        policy.digit_min = 5;
        policy.upper_min = 1;

        let normalized = policy.normalized();
        assert_eq!(normalized.lower_min, 2);
        assert_eq!(normalized.digit_min, 0);
        assert_eq!(normalized.upper_min, 0);
    }

    #[test]
    fn test_disabled_minimums_count_toward_length() {
        let mut policy = PasswordPolicy::new(10).with_lowercase(0);
        policy.digit_min = 15;
        assert_eq!(
            policy.validate(&limits()),
            Err(PolicyViolation::MinimumsExceedLength { total: 15, length: 10 })
        );

        // clearing the unused minimum makes it usable
        assert_eq!(policy.normalized().validate(&limits()), Ok(()));
    }

    #[test]
    fn test_equality_ignores_unselected_minimums() {
        let mut a = PasswordPolicy::new(10).with_lowercase(2);
        let mut b = PasswordPolicy::new(10).with_lowercase(2);
        a.digit_min = 3;
        b.digit_min = 7;
        assert_eq!(a, b);

        b.lower_min = 1;
        assert_ne!(a, b);
    }

    #[test]
    fn test_resolve_sentinel_uses_default() {
        let default = PasswordPolicy::new(20)
            .with_lowercase(1)
            .with_custom_symbols("!?");

        assert_eq!(PasswordPolicy::empty().resolve(&default), default);

        let own = PasswordPolicy::new(8).with_symbols(1);
        let resolved = own.resolve(&default);
        assert_eq!(resolved.length, 8);
        assert_eq!(resolved.symbols.as_deref(), Some("!?"));
    }

    #[test]
    fn test_generate_rejects_invalid_policy() {
        let mut rng = StdRng::seed_from_u64(3);
        let policy = PasswordPolicy::new(4).with_lowercase(5);

        let result = policy.generate(&limits(), &mut rng);
        assert!(matches!(
            result,
            Err(VaultError::InvalidPolicy(PolicyViolation::MinimumsExceedLength { .. }))
        ));
    }

    #[test]
    fn test_make_random_password_with_sentinel() {
        let mut rng = StdRng::seed_from_u64(4);
        let default = PasswordPolicy::new(14).with_lowercase(1).with_digits(1);

        let password = PasswordPolicy::empty()
            .make_random_password(&default, &limits(), &mut rng)
            .unwrap();
        assert_eq!(password.char_count(), 14);
    }
}
