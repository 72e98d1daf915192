use serde::{Deserialize, Serialize};

/// Context window assumed for models no rule matches
pub const DEFAULT_CONTEXT_LIMIT: u64 = 200_000;

/// One `model substring -> context window` rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextLimitRule {
    pub pattern: String,
    pub limit: u64,
}

impl ContextLimitRule {
    pub fn new(pattern: impl Into<String>, limit: u64) -> Self {
        Self {
            pattern: pattern.into(),
            limit,
        }
    }
}

/// Ordered context window table. The first rule whose pattern occurs in the
/// model name wins, so more specific patterns must come first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLimits {
    rules: Vec<ContextLimitRule>,
    default_limit: u64,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self::new(default_rules(), DEFAULT_CONTEXT_LIMIT)
    }
}

impl ContextLimits {
    /// Build a table. A zero default falls back to [`DEFAULT_CONTEXT_LIMIT`] and
    /// zero-limit rules are ignored, so lookups never return 0.
    pub fn new(rules: Vec<ContextLimitRule>, default_limit: u64) -> Self {
        let default_limit = if default_limit == 0 {
            DEFAULT_CONTEXT_LIMIT
        } else {
            default_limit
        };

        Self {
            rules: rules.into_iter().filter(|r| r.limit > 0).collect(),
            default_limit,
        }
    }

    /// Context window for a model name
    pub fn lookup(&self, model: &str) -> u64 {
        self.rules
            .iter()
            .find(|rule| model.contains(rule.pattern.as_str()))
            .map(|rule| rule.limit)
            .unwrap_or(self.default_limit)
    }

    pub fn rules(&self) -> &[ContextLimitRule] {
        &self.rules
    }

    pub fn default_limit(&self) -> u64 {
        self.default_limit
    }
}

/// Built-in table, most specific patterns first
pub fn default_rules() -> Vec<ContextLimitRule> {
    vec![
        ContextLimitRule::new("opus-4-6", 1_000_000),
        ContextLimitRule::new("opus", 200_000),
        ContextLimitRule::new("sonnet", 200_000),
        ContextLimitRule::new("haiku", 200_000),
        ContextLimitRule::new("gpt-4o", 128_000),
        ContextLimitRule::new("gpt-4", 128_000),
        ContextLimitRule::new("gemini", 1_000_000),
    ]
}
