//! YAML rule-store adapter.
//!
//! Persists the buy/sell condition trees as a YAML document. Load parses then
//! validates into the closed rule AST; save renders the same structure back,
//! so load -> save -> load is lossless.

use std::fs;
use std::path::PathBuf;

use serde_yaml::Value;

use crate::domain::error::SweeptraderError;
use crate::domain::rule::SignalRules;
use crate::domain::rule_parser::{parse_rules, rules_to_value};
use crate::ports::rules_port::RulesPort;

pub struct YamlRulesAdapter {
    path: PathBuf,
}

impl YamlRulesAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl RulesPort for YamlRulesAdapter {
    fn load(&self) -> Result<SignalRules, SweeptraderError> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| SweeptraderError::RuleInvalid {
                reason: format!("failed to read {}: {}", self.path.display(), e),
            })?;

        let doc: Value =
            serde_yaml::from_str(&content).map_err(|e| SweeptraderError::RuleInvalid {
                reason: format!("invalid YAML in {}: {}", self.path.display(), e),
            })?;

        parse_rules(&doc)
    }

    fn save(&self, rules: &SignalRules) -> Result<(), SweeptraderError> {
        let text =
            serde_yaml::to_string(&rules_to_value(rules)).map_err(|e| {
                SweeptraderError::RuleInvalid {
                    reason: format!("failed to render rules: {}", e),
                }
            })?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
