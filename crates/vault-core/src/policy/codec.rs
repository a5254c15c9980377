//! Fixed-width hexadecimal policy encoding
//!
//! Layout (19 characters, no delimiters):
//!
//! | field      | width |
//! |------------|-------|
//! | flags      | 4     |
//! | length     | 3     |
//! | digit_min  | 3     |
//! | lower_min  | 3     |
//! | symbol_min | 3     |
//! | upper_min  | 3     |
//!
//! Encoding writes uppercase hex digits; decoding accepts either case.
//!
//! Malformed strings decode to the empty policy. This is relied upon by
//! existing persisted data, so [`decode`] never fails; use [`try_decode`]
//! to learn why a string was rejected.

use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use super::{PasswordPolicy, PolicyFlags, PolicyLimits, PolicyViolation};

/// Length of an encoded policy
pub const ENCODED_LEN: usize = 19;

/// Field names and widths, in order
const FIELDS: [(&str, usize); 6] = [
    ("flags", 4),
    ("length", 3),
    ("digit_min", 3),
    ("lower_min", 3),
    ("symbol_min", 3),
    ("upper_min", 3),
];

/// Why a policy string was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecodeError {
    #[error("expected 19 ASCII characters, got {0} bytes")]
    WrongLength(usize),

    #[error("field {field} is not hexadecimal: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error(transparent)]
    Invalid(#[from] PolicyViolation),
}

/// Encode a validated policy. The default-policy sentinel encodes to "".
pub fn encode(policy: &PasswordPolicy) -> String {
    if policy.is_default_sentinel() {
        return String::new();
    }
    let encoded = format!(
        "{:04X}{:03X}{:03X}{:03X}{:03X}{:03X}",
        policy.flags.bits(),
        policy.length,
        policy.digit_min,
        policy.lower_min,
        policy.symbol_min,
        policy.upper_min
    );
    debug_assert_eq!(encoded.len(), ENCODED_LEN);
    encoded
}

/// Decode with the default limits; malformed input yields the empty policy
pub fn decode(encoded: &str) -> PasswordPolicy {
    decode_with_limits(encoded, &PolicyLimits::default())
}

/// Decode with configured limits; malformed input yields the empty policy
pub fn decode_with_limits(encoded: &str, limits: &PolicyLimits) -> PasswordPolicy {
    try_decode_with_limits(encoded, limits).unwrap_or_else(|e| {
        debug!("Rejected policy string: {}", e);
        PasswordPolicy::empty()
    })
}

/// Decode with the default limits, reporting why a string was rejected
pub fn try_decode(encoded: &str) -> Result<PasswordPolicy, PolicyDecodeError> {
    try_decode_with_limits(encoded, &PolicyLimits::default())
}

/// Decode with configured limits, reporting why a string was rejected
pub fn try_decode_with_limits(
    encoded: &str,
    limits: &PolicyLimits,
) -> Result<PasswordPolicy, PolicyDecodeError> {
    if encoded.len() != ENCODED_LEN {
        return Err(PolicyDecodeError::WrongLength(encoded.len()));
    }

    let mut values = [0u16; FIELDS.len()];
    let mut offset = 0;
    for (slot, (field, width)) in values.iter_mut().zip(FIELDS) {
        let raw = encoded.get(offset..offset + width).unwrap_or_default();
        *slot = parse_hex_field(raw).ok_or_else(|| PolicyDecodeError::InvalidField {
            field,
            value: raw.to_string(),
        })?;
        offset += width;
    }

    let [flags, length, digit_min, lower_min, symbol_min, upper_min] = values;
    let policy = PasswordPolicy {
        flags: PolicyFlags::from_bits(flags),
        length,
        digit_min,
        lower_min,
        symbol_min,
        upper_min,
        symbols: None,
    };
    policy.check_persisted(limits)?;
    Ok(policy)
}

/// Parse a field made only of hex digits (no sign, no whitespace)
fn parse_hex_field(raw: &str) -> Option<u16> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(raw, 16).ok()
}

impl std::fmt::Display for PasswordPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for PasswordPolicy {
    type Err = PolicyDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        try_decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EXAMPLE: &str = "000700C002003000002";

    #[test]
    fn test_decode_reference_example() {
        let policy = decode(EXAMPLE);

        assert_eq!(policy.flags, PolicyFlags::from_bits(0x0007));
        assert_eq!(policy.length, 12);
        assert_eq!(policy.digit_min, 2);
        assert_eq!(policy.lower_min, 3);
        assert_eq!(policy.symbol_min, 0);
        assert_eq!(policy.upper_min, 2);
    }

    #[test]
    fn test_reencode_reference_example() {
        assert_eq!(encode(&decode(EXAMPLE)), EXAMPLE);
    }

    #[test]
    fn test_encode_sentinel_is_empty() {
        assert_eq!(encode(&PasswordPolicy::empty()), "");
    }

    #[test]
    fn test_wrong_length_yields_empty_policy() {
        for input in ["", "0007", "000700C0020030000020", "000700C00200300000"] {
            assert_eq!(decode(input).flags, PolicyFlags::empty(), "{:?}", input);
        }
        assert_eq!(
            try_decode("0007"),
            Err(PolicyDecodeError::WrongLength(4))
        );
    }

    #[test]
    fn test_non_hex_yields_empty_policy() {
        let bad = ["000700C00200300000g", "0007+0C002003000002", "0007 0C002003000002"];
        for input in bad {
            assert_eq!(decode(input), PasswordPolicy::empty(), "{:?}", input);
        }
        assert!(matches!(
            try_decode("0007+0C002003000002"),
            Err(PolicyDecodeError::InvalidField { field: "length", .. })
        ));
    }

    #[test]
    fn test_non_ascii_does_not_panic() {
        // 19 bytes, fewer characters
        let input = "00070€C0020030000";
        assert_eq!(input.len(), ENCODED_LEN);
        assert_eq!(decode(input), PasswordPolicy::empty());
    }

    #[test]
    fn test_wrong_length_counts_bytes() {
        // 19 characters, 20 bytes
        let input = "000700C00200300000é";
        assert_eq!(input.chars().count(), ENCODED_LEN);
        assert_eq!(try_decode(input), Err(PolicyDecodeError::WrongLength(20)));
        assert_eq!(
            PolicyDecodeError::WrongLength(20).to_string(),
            "expected 19 ASCII characters, got 20 bytes"
        );
    }

    #[test]
    fn test_semantic_violations_yield_empty_policy() {
        let cases = [
            // flags == 0
            ("000000C002003000002", PolicyViolation::NoFlags),
            // hex with lowercase
            ("0011010000000000000", PolicyViolation::HexWithOtherFlags),
            // minimums sum 8 > length 6
            ("0007006002003000003", PolicyViolation::MinimumsExceedLength { total: 8, length: 6 }),
            // length 0x401 > 1024
            ("0001401000001000000", PolicyViolation::LengthTooLarge { length: 0x401, max: 1024 }),
            // digit minimum 15 > length 10, digits not selected
            ("000100A00F000000000", PolicyViolation::MinimumsExceedLength { total: 15, length: 10 }),
        ];
        for (input, violation) in cases {
            assert_eq!(decode(input), PasswordPolicy::empty(), "{}", input);
            assert_eq!(try_decode(input), Err(PolicyDecodeError::Invalid(violation)));
        }
    }

    #[test]
    fn test_minimum_above_configured_max() {
        let limits = PolicyLimits {
            max_upper_min: 2,
            ..PolicyLimits::default()
        };
        assert_eq!(decode_with_limits("000700C002003000003", &limits), PasswordPolicy::empty());
        assert_eq!(decode_with_limits("000700C002003000002", &limits).length, 12);
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let policy = decode("0008040000000010000");
        assert_eq!(policy.length, 0x40);
        assert_eq!(policy.symbol_min, 0x10);

        assert_eq!(decode("000F0FF000000000000").length, 0xFF);
    }

    #[test]
    fn test_from_str_and_display() {
        let policy: PasswordPolicy = EXAMPLE.parse().unwrap();
        assert_eq!(policy.to_string(), EXAMPLE);

        let lowercase: PasswordPolicy = "000700c002003000002".parse().unwrap();
        assert_eq!(lowercase, policy);
    }

    fn valid_policy() -> impl Strategy<Value = PasswordPolicy> {
        (0u16..0x80, 1u16..=1024, 0u16..=1024, 0u16..=1024, 0u16..=1024, 0u16..=1024)
            .prop_map(|(flags, length, digit, lower, symbol, upper)| {
                let mut flags = PolicyFlags::from_bits(flags);
                if flags.contains(PolicyFlags::USE_HEX_DIGITS) {
                    flags = PolicyFlags::USE_HEX_DIGITS;
                }
                PasswordPolicy {
                    flags,
                    length,
                    digit_min: digit % (length / 4 + 1),
                    lower_min: lower % (length / 4 + 1),
                    symbol_min: symbol % (length / 4 + 1),
                    upper_min: upper % (length / 4 + 1),
                    symbols: None,
                }
                .normalized()
            })
            .prop_filter("must validate", |p| {
                p.validate(&PolicyLimits::default()).is_ok()
            })
    }

    proptest! {
        #[test]
        fn prop_roundtrip(policy in valid_policy()) {
            let encoded = encode(&policy);
            prop_assert_eq!(encoded.len(), ENCODED_LEN);
            prop_assert_eq!(decode(&encoded), policy);
        }
    }
}
