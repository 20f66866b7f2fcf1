//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: the UI collects submissions and invokes the analysis use case.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Serve the UI until shutdown.
    async fn run(&self) -> Result<(), DomainError>;
}
