//! Card Type Schema
//!
//! File types for issuer rules (as written in TOML) and the runtime rule
//! they compile into.

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;

use super::registry::DEFAULT_MAX_LENGTH;

/// Root structure of a card type rule file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CardRulesFile {
    #[serde(default)]
    pub card_types: Vec<CardTypeDef>,
}

/// One issuer rule exactly as it appears in TOML
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CardTypeDef {
    pub key: String,
    pub name: String,
    pub pattern: String,
    pub gaps: Vec<usize>,
    pub lengths: Vec<usize>,
    pub code: SecurityCode,
}

/// Name and exact digit count of the security code
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SecurityCode {
    pub name: String,
    pub size: usize,
}

/// Runtime issuer rule with its prefix pattern compiled
#[derive(Debug, Clone)]
pub struct CardTypeRule {
    pub key: String,
    pub name: String,
    pub pattern: Regex,
    pub gaps: Vec<usize>,
    pub lengths: Vec<usize>,
    pub code: SecurityCode,
}

impl PartialEq for CardTypeRule {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.name == other.name
            && self.pattern.as_str() == other.pattern.as_str()
            && self.gaps == other.gaps
            && self.lengths == other.lengths
            && self.code == other.code
    }
}

impl TryFrom<CardTypeDef> for CardTypeRule {
    type Error = anyhow::Error;

    fn try_from(def: CardTypeDef) -> Result<Self> {
        if def.lengths.is_empty() {
            bail!("card type '{}' declares no valid lengths", def.key);
        }
        if def.lengths.contains(&0) {
            bail!("card type '{}' declares a zero length", def.key);
        }
        if def.gaps.windows(2).any(|w| w[0] >= w[1]) {
            bail!("card type '{}' has gaps that are not strictly ascending", def.key);
        }
        if def.code.size == 0 {
            bail!("card type '{}' has an empty security code", def.key);
        }

        // Patterns only ever match on leading digits
        let source = format!("^(?:{})", def.pattern);
        let pattern = Regex::new(&source)
            .with_context(|| format!("invalid pattern for card type '{}'", def.key))?;

        Ok(Self {
            key: def.key,
            name: def.name,
            pattern,
            gaps: def.gaps,
            lengths: def.lengths,
            code: def.code,
        })
    }
}

impl CardTypeRule {
    /// Whether the leading digits identify this issuer
    pub fn matches(&self, digits: &str) -> bool {
        self.pattern.is_match(digits)
    }

    /// Primary length, used as the entry-time cap on the number field
    pub fn max_length(&self) -> usize {
        self.lengths.first().copied().unwrap_or(DEFAULT_MAX_LENGTH)
    }

    pub fn accepts_length(&self, len: usize) -> bool {
        self.lengths.contains(&len)
    }
}

/// Parse a rule file and compile every rule in it
pub fn parse_rules(content: &str) -> Result<Vec<CardTypeRule>> {
    let file: CardRulesFile = toml::from_str(content).context("failed to parse card type TOML")?;
    file.card_types
        .into_iter()
        .map(CardTypeRule::try_from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(pattern: &str) -> CardTypeDef {
        CardTypeDef {
            key: "test".to_string(),
            name: "Test".to_string(),
            pattern: pattern.to_string(),
            gaps: vec![4, 8, 12],
            lengths: vec![16],
            code: SecurityCode {
                name: "CVV".to_string(),
                size: 3,
            },
        }
    }

    #[test]
    fn test_unanchored_pattern_is_anchored() {
        let rule = CardTypeRule::try_from(def("62")).unwrap();
        assert!(rule.matches("6200"));
        assert!(!rule.matches("1620"));
    }

    #[test]
    fn test_alternation_is_anchored_on_every_branch() {
        let rule = CardTypeRule::try_from(def("^62|81")).unwrap();
        assert!(rule.matches("6200"));
        assert!(rule.matches("8100"));
        assert!(!rule.matches("9981000000000000"));
    }

    #[test]
    fn test_max_length_without_lengths() {
        let mut rule = CardTypeRule::try_from(def("4")).unwrap();
        assert_eq!(rule.max_length(), 16);
        rule.lengths.clear();
        assert_eq!(rule.max_length(), DEFAULT_MAX_LENGTH);
    }

    #[test]
    fn test_rejects_bad_definitions() {
        let mut empty_lengths = def("^4");
        empty_lengths.lengths.clear();
        assert!(CardTypeRule::try_from(empty_lengths).is_err());

        let mut unordered = def("^4");
        unordered.gaps = vec![8, 4];
        assert!(CardTypeRule::try_from(unordered).is_err());

        assert!(CardTypeRule::try_from(def("^(4")).is_err());
    }

    #[test]
    fn test_parse_rules_file() {
        let content = r#"
[[card_types]]
key = "unionpay"
name = "UnionPay"
pattern = "^62"
gaps = [4, 8, 12]
lengths = [16, 17, 18, 19]
code = { name = "CVN", size = 3 }
"#;
        let rules = parse_rules(content).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "UnionPay");
        assert_eq!(rules[0].max_length(), 16);
        assert!(rules[0].accepts_length(19));
        assert_eq!(rules[0].code.name, "CVN");
    }
}
