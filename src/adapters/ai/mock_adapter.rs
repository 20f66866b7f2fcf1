//! Mock AI adapter for testing without API calls.
//!
//! Returns a canned rooftop report (or a scripted failure) and counts calls.

use crate::domain::{ApiCredential, BudgetRange, DomainError, EncodedImage};
use crate::ports::AiPort;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

const CANNED_REPORT: &str = r#"{
  "roof_analysis": {
    "roof_type": "gable",
    "roof_area_sqft": 1850,
    "usable_area_sqft": 1100,
    "orientation": "South-southwest",
    "tilt_angle": 28,
    "shading_assessment": "minimal",
    "obstacles": ["[MOCK] Chimney on north face", "[MOCK] Two roof vents"]
  },
  "solar_potential": {
    "recommended_system_size_kw": 7.6,
    "estimated_panels_count": 19,
    "annual_energy_production_kwh": 10450,
    "capacity_factor": 15.7,
    "optimal_panel_type": "monocrystalline"
  },
  "financial_analysis": {
    "estimated_system_cost": 21280,
    "cost_per_watt": 2.8,
    "annual_savings": 2300,
    "payback_period_years": 9.3,
    "roi_percentage": 10.8,
    "net_present_value": 14200
  },
  "installation_considerations": {
    "structural_assessment": "suitable",
    "electrical_requirements": "[MOCK] 200A panel upgrade may be required",
    "permit_complexity": "moderate",
    "installation_timeline": "4-6 weeks"
  },
  "recommendations": {
    "proceed_with_installation": true,
    "priority_improvements": ["[MOCK] Trim the oak on the west side"],
    "alternative_solutions": [],
    "next_steps": ["[MOCK] Request three installer quotes", "[MOCK] Check local net metering rules"]
  }
}"#;

enum MockReply {
    Text(String),
    TransportFailure(String),
    Malformed(String),
}

/// Mock AI adapter for testing.
///
/// Returns predetermined responses without making API calls.
/// Simulates network latency with configurable delay.
pub struct MockAiAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
    reply: MockReply,
    calls: AtomicUsize,
}

impl MockAiAdapter {
    /// Create a new mock adapter with default delay (100ms) and the canned report.
    pub fn new() -> Self {
        Self {
            delay_ms: 100,
            reply: MockReply::Text(CANNED_REPORT.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::new()
        }
    }

    /// Answer every call with `text`.
    pub fn with_reply(text: impl Into<String>) -> Self {
        Self {
            delay_ms: 0,
            reply: MockReply::Text(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call as if the network were down.
    pub fn failing_transport(message: impl Into<String>) -> Self {
        Self {
            delay_ms: 0,
            reply: MockReply::TransportFailure(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call as if the provider sent an unreadable envelope.
    pub fn malformed(raw: impl Into<String>) -> Self {
        Self {
            delay_ms: 0,
            reply: MockReply::Malformed(raw.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of dispatches seen so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AiPort for MockAiAdapter {
    fn model(&self) -> &str {
        "mock"
    }

    async fn analyze_rooftop(
        &self,
        _credential: &ApiCredential,
        location: &str,
        _budget: &BudgetRange,
        image: &EncodedImage,
    ) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        info!(
            location,
            image_bytes = image.byte_len,
            "[MOCK] Simulating rooftop analysis"
        );

        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::TransportFailure(message) => Err(DomainError::Transport(message.clone())),
            MockReply::Malformed(raw) => Err(DomainError::MalformedResponse {
                reason: "no choices in response".to_string(),
                raw: raw.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SolarReport;

    fn args() -> (ApiCredential, BudgetRange, EncodedImage) {
        (
            ApiCredential::new("k").unwrap(),
            BudgetRange::new(20_000.0, 25_000.0).unwrap(),
            EncodedImage {
                media_type: "image/jpeg",
                base64: String::new(),
                width: 1,
                height: 1,
                byte_len: 0,
            },
        )
    }

    #[tokio::test]
    async fn test_mock_adapter() {
        let adapter = MockAiAdapter::with_delay(10);
        let (key, budget, image) = args();

        let text = adapter
            .analyze_rooftop(&key, "Denver, CO", &budget, &image)
            .await
            .unwrap();

        let report: SolarReport = serde_json::from_str(&text).unwrap();
        assert!(report.roof_analysis.is_some());
        assert!(report.recommendations.is_some());
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_transport() {
        let adapter = MockAiAdapter::failing_transport("connection reset");
        let (key, budget, image) = args();

        let err = adapter
            .analyze_rooftop(&key, "Denver, CO", &budget, &image)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Transport(ref m) if m == "connection reset"));
        assert_eq!(adapter.calls(), 1);
    }
}
