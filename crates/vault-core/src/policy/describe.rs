//! Human-readable policy summary

use serde::Serialize;

use super::{PasswordPolicy, PolicyFlags};
use crate::generator::charset::{EASY_VISION_SYMBOLS, PRONOUNCEABLE_SYMBOLS, STD_SYMBOLS};
use crate::generator::Category;

/// One label/value line of a policy summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyRow {
    pub label: &'static str,
    pub value: String,
}

impl PolicyRow {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

fn yes_no(enabled: bool) -> &'static str {
    if enabled {
        "Yes"
    } else {
        "No"
    }
}

impl PasswordPolicy {
    /// Summarize the policy as rows: length, each category, then the modes
    pub fn describe(&self) -> Vec<PolicyRow> {
        let easy_vision = self.flags.contains(PolicyFlags::USE_EASY_VISION);
        let pronounceable = self.flags.contains(PolicyFlags::MAKE_PRONOUNCEABLE);
        let counts_ignored = easy_vision || pronounceable;

        let mut rows = vec![PolicyRow::new("Length", self.length.to_string())];

        for category in [Category::Lowercase, Category::Uppercase, Category::Digit] {
            let value = match (self.uses(category), counts_ignored) {
                (false, _) => "No".to_string(),
                (true, true) => "Yes".to_string(),
                (true, false) => format!("Yes (at least {})", self.minimum(category)),
            };
            rows.push(PolicyRow::new(category.label(), value));
        }

        let symbols = if !self.uses(Category::Symbol) {
            "No".to_string()
        } else if easy_vision {
            format!("Yes (easy vision: {})", EASY_VISION_SYMBOLS)
        } else if pronounceable {
            format!("Yes (pronounceable: {})", PRONOUNCEABLE_SYMBOLS)
        } else {
            match self.symbols.as_deref() {
                Some(custom) => format!("Yes (at least {}, specific: {})", self.symbol_min, custom),
                None => format!("Yes (at least {}, default: {})", self.symbol_min, STD_SYMBOLS),
            }
        };
        rows.push(PolicyRow::new(Category::Symbol.label(), symbols));

        rows.push(PolicyRow::new("Easy vision", yes_no(easy_vision)));
        rows.push(PolicyRow::new("Pronounceable", yes_no(pronounceable)));
        rows.push(PolicyRow::new(
            "Hexadecimal",
            yes_no(self.uses(Category::HexDigit)),
        ));
        rows
    }
}
