use async_trait::async_trait;

/// Failure reported by a spend provider. Always treated as transient: the
/// scan loop retries on the next tick, on-demand callers get a retryable error.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct SpendSourceError(pub String);

impl SpendSourceError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Reports cumulative spend-to-date for a campaign. In production this wraps
/// the ads platform API; tests inject fixed or failing implementations.
#[async_trait]
pub trait SpendSource: Send + Sync {
    async fn current_spend(&self, campaign_id: &str) -> Result<f64, SpendSourceError>;
}
