use serde::Serialize;
use std::collections::HashMap;

use super::types::UsageRecord;

/// Cost and token share of one agent
#[derive(Debug, Clone, Serialize)]
pub struct AgentCost {
    pub name: String,
    pub cost: f64,
    pub tokens: u64,
    /// Share of the total cost, 0-100
    pub percentage: f64,
}

/// Cost for a single day
#[derive(Debug, Clone, Serialize)]
pub struct DailyCost {
    pub date: String,
    pub cost: f64,
}

/// Month-to-date rollup of the usage ledger
#[derive(Debug, Clone, Serialize)]
pub struct UsageSummary {
    pub total_cost: f64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub record_count: usize,
    pub by_agent: Vec<AgentCost>,
    pub by_day: Vec<DailyCost>,
}

/// Roll usage records up per agent and per day.
///
/// Records without a parseable timestamp count toward the totals and the
/// agent breakdown but not toward any day.
pub fn summarize(records: &[UsageRecord]) -> UsageSummary {
    let mut total_cost = 0.0f64;
    let mut total_input = 0u64;
    let mut total_output = 0u64;
    let mut agent_map: HashMap<&str, (f64, u64)> = HashMap::new();
    let mut daily_map: HashMap<String, f64> = HashMap::new();

    for record in records {
        total_cost += record.cost;
        total_input += record.input_tokens;
        total_output += record.output_tokens;

        let agent = agent_map.entry(record.agent.as_str()).or_insert((0.0, 0));
        agent.0 += record.cost;
        agent.1 += record.input_tokens + record.output_tokens;

        if let Some(date) = extract_date_from_timestamp(&record.timestamp) {
            *daily_map.entry(date).or_insert(0.0) += record.cost;
        }
    }

    let mut by_agent: Vec<AgentCost> = agent_map
        .into_iter()
        .map(|(name, (cost, tokens))| AgentCost {
            name: name.to_string(),
            cost,
            tokens,
            percentage: if total_cost > 0.0 {
                cost / total_cost * 100.0
            } else {
                0.0
            },
        })
        .collect();
    by_agent.sort_by(|a, b| b.cost.total_cmp(&a.cost).then_with(|| a.name.cmp(&b.name)));

    let mut by_day: Vec<DailyCost> = daily_map
        .into_iter()
        .map(|(date, cost)| DailyCost { date, cost })
        .collect();
    by_day.sort_by(|a, b| a.date.cmp(&b.date));

    UsageSummary {
        total_cost,
        total_input_tokens: total_input,
        total_output_tokens: total_output,
        record_count: records.len(),
        by_agent,
        by_day,
    }
}

/// Extract YYYY-MM-DD date from an ISO 8601 timestamp string
fn extract_date_from_timestamp(ts: &str) -> Option<String> {
    // Handles "2026-02-05T18:48:19.274Z" format
    let date = ts.get(..10)?;
    if date.chars().nth(4) == Some('-') && date.chars().nth(7) == Some('-') {
        return Some(date.to_string());
    }
    None
}
