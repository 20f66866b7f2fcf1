//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{ApiCredential, BudgetRange, DomainError, EncodedImage};

/// Hosted vision/completion model. One call per user submission.
#[async_trait::async_trait]
pub trait AiPort: Send + Sync {
    /// Model identifier, reported alongside results.
    fn model(&self) -> &str;

    /// Send the rooftop image with its location/budget context and return the generated text.
    ///
    /// Implementations must issue exactly one request and must not retry.
    async fn analyze_rooftop(
        &self,
        credential: &ApiCredential,
        location: &str,
        budget: &BudgetRange,
        image: &EncodedImage,
    ) -> Result<String, DomainError>;
}
