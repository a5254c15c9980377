//! Named policy list, as stored in a database header
//!
//! Layout: a 2-hex-digit entry count, then for every entry
//! `name_len`(2 hex) `name` `policy`(19) `symbols_len`(2 hex) `symbols`.
//! Lengths count characters. At most 255 entries fit the count field.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::{codec, PasswordPolicy};

/// Largest count, name length or symbol-set length the 2-digit fields hold
const MAX_FIELD: usize = 0xFF;

/// Policies saved under user-chosen names, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedPolicies {
    entries: BTreeMap<String, PasswordPolicy>,
}

impl NamedPolicies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a policy, returning the one it replaced
    pub fn insert(&mut self, name: impl Into<String>, policy: PasswordPolicy) -> Option<PasswordPolicy> {
        self.entries.insert(name.into(), policy)
    }

    pub fn get(&self, name: &str) -> Option<&PasswordPolicy> {
        self.entries.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<PasswordPolicy> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PasswordPolicy)> {
        self.entries.iter().map(|(name, policy)| (name.as_str(), policy))
    }

    /// Serialize the list. Entries whose name or symbol set is too long for
    /// a 2-digit length field are skipped, as is everything past 255 entries.
    pub fn encode(&self) -> String {
        let writable: Vec<(&String, &PasswordPolicy)> = self
            .entries
            .iter()
            .filter(|(name, policy)| {
                let fits = name.chars().count() <= MAX_FIELD
                    && policy.symbols.as_deref().map_or(0, |s| s.chars().count()) <= MAX_FIELD;
                if !fits {
                    warn!("Skipping named policy {:?}: field too long", name);
                }
                fits
            })
            .take(MAX_FIELD)
            .collect();

        let mut out = format!("{:02X}", writable.len());
        for (name, policy) in writable {
            out.push_str(&format!("{:02X}", name.chars().count()));
            out.push_str(name);
            out.push_str(&codec::encode(policy));
            match policy.symbols.as_deref() {
                Some(symbols) => {
                    out.push_str(&format!("{:02X}", symbols.chars().count()));
                    out.push_str(symbols);
                }
                None => out.push_str("00"),
            }
        }
        out
    }

    /// Parse a list. Reading stops at the first malformed or duplicate
    /// entry; everything read up to that point is kept.
    pub fn decode(encoded: &str) -> Self {
        let mut policies = Self::new();
        let mut cursor = Cursor::new(encoded);

        let Some(count) = cursor.hex_len() else {
            if !encoded.is_empty() {
                warn!("Named policy list has no valid entry count");
            }
            return policies;
        };

        for _ in 0..count {
            let Some(entry) = cursor.entry() else {
                warn!("Named policy list truncated after {} entries", policies.len());
                break;
            };
            let (name, policy) = entry;
            if policies.entries.contains_key(&name) {
                warn!("Duplicate named policy {:?}, stopping", name);
                break;
            }
            policies.entries.insert(name, policy);
        }

        debug!("Decoded {} named policies", policies.len());
        policies
    }
}

/// Character-counting reader over an encoded list
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    /// Take the next `n` characters
    fn take(&mut self, n: usize) -> Option<&'a str> {
        let end = match self.rest.char_indices().nth(n) {
            Some((index, _)) => index,
            None if self.rest.chars().count() == n => self.rest.len(),
            None => return None,
        };
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(head)
    }

    fn hex_len(&mut self) -> Option<usize> {
        let raw = self.take(2)?;
        if !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        usize::from_str_radix(raw, 16).ok()
    }

    fn entry(&mut self) -> Option<(String, PasswordPolicy)> {
        let name_len = self.hex_len()?;
        let name = self.take(name_len)?.to_string();
        let mut policy = codec::decode(self.take(codec::ENCODED_LEN)?);
        let symbols_len = self.hex_len()?;
        let symbols = self.take(symbols_len)?;
        policy.symbols = (!symbols.is_empty()).then(|| symbols.to_string());
        Some((name, policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NamedPolicies {
        let mut policies = NamedPolicies::new();
        policies.insert(
            "Banking",
            PasswordPolicy::new(16)
                .with_lowercase(2)
                .with_uppercase(2)
                .with_digits(2)
                .with_symbols(1)
                .with_custom_symbols("!#$"),
        );
        policies.insert("PIN", PasswordPolicy::new(6).with_digits(6));
        policies
    }

    #[test]
    fn test_encode_layout() {
        let mut policies = NamedPolicies::new();
        policies.insert("PIN", PasswordPolicy::new(6).with_digits(6));

        assert_eq!(policies.encode(), "0103PIN000400600600000000000");
    }

    #[test]
    fn test_roundtrip_keeps_symbols() {
        let policies = sample();
        let decoded = NamedPolicies::decode(&policies.encode());

        assert_eq!(decoded, policies);
        assert_eq!(
            decoded.get("Banking").unwrap().symbols.as_deref(),
            Some("!#$")
        );
        assert_eq!(decoded.get("PIN").unwrap().symbols, None);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(NamedPolicies::new().encode(), "00");
        assert!(NamedPolicies::decode("00").is_empty());
        assert!(NamedPolicies::decode("").is_empty());
    }

    #[test]
    fn test_truncated_input_keeps_complete_entries() {
        let encoded = sample().encode();
        let truncated = &encoded[..encoded.len() - 5];

        let decoded = NamedPolicies::decode(truncated);
        assert_eq!(decoded.len(), 1);
        assert!(decoded.get("Banking").is_some());
    }

    #[test]
    fn test_duplicate_name_stops_decoding() {
        let entry = "03PIN000400600600000000000";
        let encoded = format!("03{entry}{entry}{entry}");

        assert_eq!(NamedPolicies::decode(&encoded).len(), 1);
    }

    #[test]
    fn test_non_ascii_names_count_characters() {
        let mut policies = NamedPolicies::new();
        policies.insert("Mañana €", PasswordPolicy::new(8).with_lowercase(1));

        let encoded = policies.encode();
        assert!(encoded.starts_with("0108Mañana €"));
        assert_eq!(NamedPolicies::decode(&encoded), policies);
    }

    #[test]
    fn test_overlong_name_skipped() {
        let mut policies = sample();
        policies.insert("x".repeat(300), PasswordPolicy::new(8).with_lowercase(1));

        let decoded = NamedPolicies::decode(&policies.encode());
        assert_eq!(decoded.len(), 2);
    }
}
