//! Card Type Registry
//!
//! Ordered in-memory table of issuer rules. Detection walks the table in
//! order and the first matching rule wins.

use super::schema::{parse_rules, CardTypeRule, SecurityCode};
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;

/// Separator positions used when no issuer is detected
pub const DEFAULT_GAPS: [usize; 3] = [4, 8, 12];
/// Security code length expected when no issuer is detected
pub const DEFAULT_CODE_SIZE: usize = 3;
/// Number field cap when no issuer is detected
pub const DEFAULT_MAX_LENGTH: usize = 19;

/// Ordered issuer rule table
#[derive(Debug, Clone, Default)]
pub struct CardTypeRegistry {
    rules: Vec<CardTypeRule>,
}

impl CardTypeRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Registry holding the embedded issuer table
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.add_embedded_rules();
        registry
    }

    /// Add a rule. A rule with a known key replaces the old one in place.
    pub fn add_rule(&mut self, rule: CardTypeRule) {
        match self.rules.iter_mut().find(|r| r.key == rule.key) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    /// Get a rule by key
    pub fn get(&self, key: &str) -> Option<&CardTypeRule> {
        self.rules.iter().find(|r| r.key == key)
    }

    /// All rules in detection order
    pub fn rules(&self) -> &[CardTypeRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Detect the issuer from leading digits. Non-digits are ignored.
    pub fn detect(&self, number: &str) -> Option<&CardTypeRule> {
        let digits: String = number.chars().filter(char::is_ascii_digit).collect();
        self.rules.iter().find(|rule| rule.matches(&digits))
    }

    /// Load every `*.toml` rule file in a directory, in file name order.
    ///
    /// A missing directory is not an error. Files that fail to parse are
    /// logged and skipped. Returns the number of rules added.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.exists() {
            return Ok(0);
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read card type directory: {}", dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut added = 0;
        for path in paths {
            match self.load_file(&path) {
                Ok(count) => added += count,
                Err(e) => log::warn!("Skipping card type file {}: {:#}", path.display(), e),
            }
        }

        Ok(added)
    }

    /// Load a single rule file
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read card type file: {}", path.display()))?;
        let rules = parse_rules(&content)
            .with_context(|| format!("Failed to load card types from {}", path.display()))?;

        let count = rules.len();
        for rule in rules {
            log::debug!("Loaded card type '{}' from {}", rule.key, path.display());
            self.add_rule(rule);
        }
        Ok(count)
    }

    fn add_embedded_rules(&mut self) {
        let embedded_toml = include_str!("../../resources/card_types.toml");

        match parse_rules(embedded_toml) {
            Ok(rules) => {
                for rule in rules {
                    self.add_rule(rule);
                }
            }
            Err(e) => {
                log::warn!(
                    "Failed to parse embedded card types: {:#}. Using minimal fallback.",
                    e
                );
                self.add_minimal_rules();
            }
        }
    }

    /// Fallback used only if the embedded table cannot be parsed
    fn add_minimal_rules(&mut self) {
        if let Ok(pattern) = Regex::new("^4") {
            self.add_rule(CardTypeRule {
                key: "visa".to_string(),
                name: "Visa".to_string(),
                pattern,
                gaps: DEFAULT_GAPS.to_vec(),
                lengths: vec![16, 18, 19],
                code: SecurityCode {
                    name: "CVV".to_string(),
                    size: 3,
                },
            });
        }
    }
}
