//! Per-call execution context: an optional deadline plus a cancellation token.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::ServiceError;

#[derive(Clone, Debug, Default)]
pub struct OpContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl OpContext {
    /// No deadline, never cancelled unless the token is triggered.
    pub fn background() -> Self { Self::default() }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { deadline: Some(Instant::now() + timeout), cancel: CancellationToken::new() }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn deadline(&self) -> Option<Instant> { self.deadline }

    pub fn cancellation_token(&self) -> &CancellationToken { &self.cancel }

    /// Drive `fut` until it finishes, the deadline passes or the token fires.
    /// The losing future is dropped, which aborts an in-flight query.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        if self.cancel.is_cancelled() {
            return Err(ServiceError::Cancelled("operation cancelled".into()));
        }
        if matches!(self.deadline, Some(d) if d <= Instant::now()) {
            return Err(ServiceError::Cancelled("deadline exceeded".into()));
        }
        let expired = async {
            match self.deadline {
                Some(d) => tokio::time::sleep_until(d).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ServiceError::Cancelled("operation cancelled".into())),
            _ = expired => Err(ServiceError::Cancelled("deadline exceeded".into())),
            res = fut => res,
        }
    }
}
