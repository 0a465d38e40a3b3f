//! Rule-based category suggestions.
//!
//! Rules are case-insensitive regular expressions checked in order against
//! a normalized description; the first match wins. User rules from the
//! config come before the built-in merchant list.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Transaction;

/// Category given to records no rule recognises.
pub const FALLBACK_CATEGORY: &str = "Other";

const DEFAULT_RULES: &[(&str, &str)] = &[
    (r"\bSALARY\b|\bPAYROLL\b", "Income"),
    (
        r"\bCARREFOUR\b|\bLULU\b|\bSPINNEYS\b|\bWAITROSE\b|\bUNION\s*COOP\b|\bCHOITHRAMS\b|\bAL\s*MADINA\b|\bGROCER",
        "Groceries",
    ),
    (
        r"\bTALABAT\b|\bDELIVEROO\b|\bNOON\s*FOOD\b|\bZOMATO\b|\bUBER\s*EATS\b",
        "Food Delivery",
    ),
    (
        r"\bCAREEM\b|\bUBER\b|\bBOLT\b|\bRTA\b|\bMETRO\b|\bTRAM\b|\bPARKING\b|\bSALIK\b",
        "Transport",
    ),
    (
        r"\bAMAZON\b|\bNOON\b|\bSHEIN\b|\bALIEXPRESS\b|\bNAMSHI\b|\bMAX\b|\bCENTREPOINT\b",
        "Shopping",
    ),
    (r"\bENOC\b|\bADNOC\b|\bEMARAT\b", "Fuel"),
    (r"\bDEWA\b|\bSEWA\b|\bADDC\b|\bFEWA\b|\bELECTRICITY\b|\bWATER\s*BILL\b", "Utilities"),
    (r"\bETISALAT\b|\bDU\b|\bVIRGIN\s*MOBILE\b", "Telecom"),
    (
        r"\bNETFLIX\b|\bSPOTIFY\b|\bANGHAMI\b|\bYOUTUBE\s*PREMIUM\b|\bOSN\b|\bDISNEY\b",
        "Subscriptions",
    ),
    (
        r"\bICLOUD\b|\bGOOGLE\s*ONE\b|\bMICROSOFT\s*365\b|\bOFFICE\s*365\b",
        "Subscriptions",
    ),
    (
        r"\bGOOGLE\b|\bDROPBOX\b|\bMICROSOFT\b|\bAWS\b|\bGITHUB\b|\bAPPLE\b|\bAPP\s*STORE\b|\bITUNES\b",
        "Digital Services",
    ),
];

const COMPANY_SUFFIXES: &[&str] = &["LLC", "LTD", "FZCO", "FZE", "PJSC", "CO", "COMPANY"];

/// One user-supplied rule, as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub pattern: String,
    pub category: String,
}

impl CategoryRule {
    pub fn new(pattern: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            category: category.into(),
        }
    }
}

#[derive(Error, Debug)]
#[error("Invalid category rule '{pattern}': {source}")]
pub struct RuleError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

struct CompiledRule {
    regex: Regex,
    category: String,
}

pub struct Categorizer {
    rules: Vec<CompiledRule>,
}

impl Default for Categorizer {
    /// The built-in merchant rules only.
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .filter_map(|(pattern, category)| match compile(pattern) {
                Ok(regex) => Some(CompiledRule {
                    regex,
                    category: category.to_string(),
                }),
                Err(e) => {
                    log::warn!("Skipping built-in category rule: {}", e);
                    None
                }
            })
            .collect();
        Self { rules }
    }
}

impl Categorizer {
    /// `custom` rules, checked before the built-in ones.
    pub fn with_rules(custom: &[CategoryRule]) -> Result<Self, RuleError> {
        let mut rules = custom
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    regex: compile(&rule.pattern).map_err(|source| RuleError {
                        pattern: rule.pattern.clone(),
                        source,
                    })?,
                    category: rule.category.trim().to_string(),
                })
            })
            .collect::<Result<Vec<_>, RuleError>>()?;

        rules.extend(Self::default().rules);
        Ok(Self { rules })
    }

    /// The category of the first rule matching `description`, if any.
    pub fn categorize(&self, description: &str) -> Option<&str> {
        let text = normalize_merchant(description);
        if text.is_empty() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.regex.is_match(&text))
            .map(|rule| rule.category.as_str())
    }

    /// Like [`Categorizer::categorize`], falling back to [`FALLBACK_CATEGORY`].
    pub fn categorize_or_fallback(&self, description: &str) -> String {
        self.categorize(description)
            .unwrap_or(FALLBACK_CATEGORY)
            .to_string()
    }

    /// Fill in the category of every record that has none. Returns how many
    /// were filled.
    pub fn fill_blank(&self, transactions: &mut [Transaction]) -> usize {
        let mut filled = 0;
        for tx in transactions.iter_mut().filter(|tx| tx.category.trim().is_empty()) {
            tx.category = self.categorize_or_fallback(&tx.description);
            filled += 1;
        }
        filled
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Reduce a merchant string to upper-case words: punctuation becomes
/// spaces and company suffixes ("LLC", "FZE", ...) are dropped.
pub fn normalize_merchant(raw: &str) -> String {
    raw.to_uppercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty() && !COMPANY_SUFFIXES.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}
