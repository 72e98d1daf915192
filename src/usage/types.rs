use serde::Serialize;

/// Provider reported for every record in the Clawdbot log schema
pub const PROVIDER: &str = "Anthropic";

/// Share of the context window above which a session is close to compaction
const NEAR_COMPACTION_RATIO: f64 = 0.75;

/// Share of the context window above which a session is critical
const CRITICAL_RATIO: f64 = 0.90;

/// One billable model call extracted from a session log line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub provider: String,
    /// Display name of the agent folder the log lives under
    pub agent: String,
    pub model: String,
    /// `input + cacheRead + cacheWrite`
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost: f64,
    /// Raw timestamp string from the log line, empty when absent
    pub timestamp: String,
}

/// Latest context snapshot of a recently active session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    /// Log filename without the extension
    pub id: String,
    pub agent: String,
    pub model: String,
    pub context_tokens: u64,
    pub context_limit: u64,
    pub last_activity: String,
    pub message_count: usize,
    pub session_cost: f64,
}

impl ActiveSession {
    /// Fraction of the model's context window currently in use
    pub fn context_usage(&self) -> f64 {
        self.context_tokens as f64 / self.context_limit.max(1) as f64
    }

    pub fn is_near_compaction(&self) -> bool {
        self.context_usage() > NEAR_COMPACTION_RATIO
    }

    pub fn is_critical(&self) -> bool {
        self.context_usage() > CRITICAL_RATIO
    }
}
