//! Machine-readable run report

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::E2eResult;

/// Outcome of one scenario phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub name: String,
    pub passed: bool,
    pub duration_ms: u64,
    /// Failure description, absent on success
    pub detail: Option<String>,
}

/// Result of one full scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub app_url: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub passed: bool,
    pub steps: Vec<StepOutcome>,
    /// Failure screenshot path, if one was captured
    pub screenshot: Option<PathBuf>,
    pub error: Option<String>,
}

impl ScenarioReport {
    /// Write the report as pretty JSON into the output directory
    pub fn write_to(&self, dir: &Path) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let path = dir.join("scenario-report.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Report written to: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes() {
        let report = ScenarioReport {
            app_url: "https://example.com/".to_string(),
            started_at: Utc::now(),
            duration_ms: 1234,
            passed: false,
            steps: vec![StepOutcome {
                name: "toggle item 1".to_string(),
                passed: false,
                duration_ms: 200,
                detail: Some("verification failed".to_string()),
            }],
            screenshot: Some(PathBuf::from("test-results/screenshot_error.png")),
            error: Some("verification failed".to_string()),
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"passed\":false"));
        assert!(json.contains("toggle item 1"));
        assert!(json.contains("screenshot_error.png"));
    }

    #[test]
    fn test_report_roundtrip() {
        let report = ScenarioReport {
            app_url: "https://example.com/".to_string(),
            started_at: Utc::now(),
            duration_ms: 42,
            passed: true,
            steps: vec![],
            screenshot: None,
            error: None,
        };

        let json = serde_json::to_string(&report).unwrap();
        let back: ScenarioReport = serde_json::from_str(&json).unwrap();
        assert!(back.passed);
        assert!(back.error.is_none());
    }
}
