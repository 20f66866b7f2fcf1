//! Analysis service. Orchestrates one rooftop analysis round trip.
//!
//! Coordinates between input validation, the imaging adapter (encoding) and the AI port.

use crate::adapters::imaging::{encode_for_upload, inspect_upload};
use crate::domain::{
    AnalysisRequest, AnalysisResult, ApiCredential, BudgetRange, DomainError,
};
use crate::ports::AiPort;
use crate::usecases::report_parser::parse_report;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// File part of a submission, exactly as received.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Raw form values for one click. Nothing here is validated yet.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub api_key: String,
    pub location: String,
    pub budget_min: String,
    pub budget_max: String,
    pub image: Option<UploadedFile>,
}

/// Service for AI-powered rooftop analysis.
///
/// Orchestrates the flow:
/// 1. Validate credential, location, budget and image (no dispatch on failure)
/// 2. Re-encode the image as base64 JPEG
/// 3. Send one request to the AI port
/// 4. Parse the answer best-effort
pub struct AnalysisService {
    ai: Arc<dyn AiPort>,
}

impl AnalysisService {
    pub fn new(ai: Arc<dyn AiPort>) -> Self {
        Self { ai }
    }

    pub fn model(&self) -> &str {
        self.ai.model()
    }

    /// Validate raw form values into a request and a credential.
    ///
    /// An empty `api_key` field falls back to `fallback_key` (environment-provided).
    pub fn prepare(
        &self,
        form: SubmissionForm,
        fallback_key: Option<&ApiCredential>,
    ) -> Result<(AnalysisRequest, ApiCredential), DomainError> {
        let credential = if form.api_key.trim().is_empty() {
            fallback_key
                .cloned()
                .ok_or(DomainError::MissingInput("API key"))?
        } else {
            ApiCredential::new(&form.api_key)?
        };

        let location = form.location.trim();
        if location.is_empty() {
            return Err(DomainError::MissingInput("property location"));
        }

        let budget = BudgetRange::new(
            parse_amount(&form.budget_min, "budget minimum")?,
            parse_amount(&form.budget_max, "budget maximum")?,
        )?;

        let upload = form
            .image
            .filter(|f| !f.bytes.is_empty())
            .ok_or(DomainError::MissingInput("image"))?;
        let image = inspect_upload(&upload.file_name, upload.bytes)?;

        Ok((
            AnalysisRequest {
                location: location.to_string(),
                budget,
                image,
            },
            credential,
        ))
    }

    /// Encode, dispatch once, parse. Errors are returned to the caller untouched.
    pub async fn analyze(
        &self,
        request: AnalysisRequest,
        credential: &ApiCredential,
    ) -> Result<AnalysisResult, DomainError> {
        let AnalysisRequest {
            location,
            budget,
            image,
        } = request;
        // decode and JPEG encode are CPU-bound
        let encoded = tokio::task::spawn_blocking(move || encode_for_upload(&image))
            .await
            .map_err(|e| DomainError::Image(format!("image encoding task failed: {}", e)))??;

        info!(
            location = %location,
            budget_min = budget.min(),
            budget_max = budget.max(),
            width = encoded.width,
            height = encoded.height,
            "dispatching rooftop analysis"
        );

        let raw_text = self
            .ai
            .analyze_rooftop(credential, &location, &budget, &encoded)
            .await
            .inspect_err(|e| warn!(error = %e, "rooftop analysis failed"))?;

        let report = parse_report(&raw_text);

        Ok(AnalysisResult {
            location,
            budget,
            model: self.ai.model().to_string(),
            raw_text,
            report,
            analyzed_at: Utc::now().timestamp(),
        })
    }

    /// `prepare` then `analyze`.
    pub async fn submit(
        &self,
        form: SubmissionForm,
        fallback_key: Option<&ApiCredential>,
    ) -> Result<AnalysisResult, DomainError> {
        let (request, credential) = self.prepare(form, fallback_key)?;
        self.analyze(request, &credential).await
    }
}

/// Accepts `25000`, `25,000`, `$25,000.50`.
fn parse_amount(raw: &str, field: &'static str) -> Result<f64, DomainError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Err(DomainError::MissingInput(field));
    }
    cleaned
        .parse::<f64>()
        .map_err(|_| DomainError::InvalidInput(format!("{} must be a number", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAiAdapter;
    use crate::adapters::imaging::fixtures;
    use crate::domain::{ErrorKind, ParsedReport};

    fn valid_form() -> SubmissionForm {
        SubmissionForm {
            api_key: "sk-or-test".to_string(),
            location: "  Phoenix, AZ ".to_string(),
            budget_min: "$15,000".to_string(),
            budget_max: "25000".to_string(),
            image: Some(UploadedFile {
                file_name: "roof.png".to_string(),
                bytes: fixtures::png(16, 16, [120, 90, 60, 255]),
            }),
        }
    }

    fn service(mock: &Arc<MockAiAdapter>) -> AnalysisService {
        AnalysisService::new(Arc::clone(mock) as Arc<dyn AiPort>)
    }

    #[tokio::test]
    async fn test_valid_submission_dispatches_once() {
        let mock = Arc::new(MockAiAdapter::with_delay(0));
        let result = service(&mock).submit(valid_form(), None).await.unwrap();

        assert_eq!(mock.calls(), 1);
        assert_eq!(result.location, "Phoenix, AZ");
        assert_eq!(result.budget.min(), 15_000.0);
        assert_eq!(result.budget.max(), 25_000.0);
        assert_eq!(result.model, "mock");
        assert!(matches!(result.report, ParsedReport::Structured(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_submissions_encode_off_runtime() {
        let mock = Arc::new(MockAiAdapter::with_delay(0));
        let svc = Arc::new(service(&mock));

        let large = SubmissionForm {
            image: Some(UploadedFile {
                file_name: "roof.png".to_string(),
                bytes: fixtures::png(640, 480, [40, 80, 120, 128]),
            }),
            ..valid_form()
        };
        let (a, b) = tokio::join!(svc.submit(large, None), svc.submit(valid_form(), None));

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_fields_never_dispatch() {
        let mock = Arc::new(MockAiAdapter::with_delay(0));
        let svc = service(&mock);

        let cases: Vec<(SubmissionForm, &str)> = vec![
            (
                SubmissionForm {
                    api_key: String::new(),
                    ..valid_form()
                },
                "API key",
            ),
            (
                SubmissionForm {
                    location: "   ".to_string(),
                    ..valid_form()
                },
                "property location",
            ),
            (
                SubmissionForm {
                    budget_max: String::new(),
                    ..valid_form()
                },
                "budget maximum",
            ),
            (
                SubmissionForm {
                    image: None,
                    ..valid_form()
                },
                "image",
            ),
            (
                SubmissionForm {
                    image: Some(UploadedFile::default()),
                    ..valid_form()
                },
                "image",
            ),
        ];

        for (form, field) in cases {
            let err = svc.submit(form, None).await.unwrap_err();
            assert!(
                matches!(err, DomainError::MissingInput(f) if f == field),
                "expected missing {field}, got {err:?}"
            );
        }
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_inverted_budget_is_rejected_before_dispatch() {
        let mock = Arc::new(MockAiAdapter::with_delay(0));
        let form = SubmissionForm {
            budget_min: "30000".to_string(),
            budget_max: "20000".to_string(),
            ..valid_form()
        };
        let err = service(&mock).submit(form, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_numeric_budget_and_bad_image() {
        let mock = Arc::new(MockAiAdapter::with_delay(0));
        let svc = service(&mock);

        let form = SubmissionForm {
            budget_min: "lots".to_string(),
            ..valid_form()
        };
        assert!(matches!(
            svc.submit(form, None).await,
            Err(DomainError::InvalidInput(_))
        ));

        let form = SubmissionForm {
            image: Some(UploadedFile {
                file_name: "roof.bmp".to_string(),
                bytes: b"BM not really".to_vec(),
            }),
            ..valid_form()
        };
        assert!(matches!(
            svc.submit(form, None).await,
            Err(DomainError::UnsupportedImage(_))
        ));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_fallback_key_used_when_field_blank() {
        let mock = Arc::new(MockAiAdapter::with_delay(0));
        let fallback = ApiCredential::new("sk-env").unwrap();
        let form = SubmissionForm {
            api_key: " ".to_string(),
            ..valid_form()
        };
        let (_, credential) = service(&mock).prepare(form, Some(&fallback)).unwrap();
        assert_eq!(credential.expose(), "sk-env");

        // a typed key wins over the fallback
        let (_, credential) = service(&mock)
            .prepare(valid_form(), Some(&fallback))
            .unwrap();
        assert_eq!(credential.expose(), "sk-or-test");
    }

    #[tokio::test]
    async fn test_transport_failure_is_returned() {
        let mock = Arc::new(MockAiAdapter::failing_transport("network unreachable"));
        let err = service(&mock).submit(valid_form(), None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_unstructured_answer_is_kept_raw() {
        let answer = "The image is too blurry to assess.";
        let mock = Arc::new(MockAiAdapter::with_reply(answer));
        let result = service(&mock).submit(valid_form(), None).await.unwrap();
        assert_eq!(result.raw_text, answer);
        assert_eq!(result.report, ParsedReport::Raw(answer.to_string()));
    }
}
