use serde::Serialize;

use crate::usage::{ActiveSession, UsageRecord};

/// Body of `GET /api/usage`
#[derive(Serialize)]
pub struct UsageResponse {
    pub records: Vec<UsageRecord>,
    /// Tells clients the data comes from a Clawdbot install; always true when served
    #[serde(rename = "hasClawdbot")]
    pub has_clawdbot: bool,
}

/// Body of `GET /api/sessions`
#[derive(Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<ActiveSession>,
}

/// Body of `GET /api/health`
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
