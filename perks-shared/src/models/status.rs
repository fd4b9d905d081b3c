use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Validate;

/// Body of a simulator's `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
}

impl Validate for HealthReport {
    fn validate(&self) -> Result<(), String> {
        if self.service.is_empty() {
            return Err("health report without service name".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    AllHealthy,
    Degraded,
    Unavailable,
}

impl OverallStatus {
    pub fn from_counts(reachable: usize, total: usize) -> Self {
        if total > 0 && reachable == total {
            OverallStatus::AllHealthy
        } else if reachable == 0 {
            OverallStatus::Unavailable
        } else {
            OverallStatus::Degraded
        }
    }
}

/// Outcome of probing one simulator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceStatus {
    pub name: String,
    pub url: String,
    pub reachable: bool,
    pub latency_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub overall: OverallStatus,
    pub healthy: usize,
    pub total: usize,
    pub services: Vec<ServiceStatus>,
    pub timestamp: DateTime<Utc>,
}
