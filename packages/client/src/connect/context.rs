//! Dial cancellation context
//!
//! A [`DialContext`] carries the caller's cancellation signal and optional
//! deadline. Each stage of a dial (connect, request write, response read)
//! races its own future against the context, so the error that comes back
//! names the stage that was cut short.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{OperationCanceled, TimedOut};

/// Why a stage did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    /// The cancellation token fired.
    Canceled,
    /// The deadline passed.
    DeadlineExceeded,
}

impl Interrupted {
    /// Marker error to attach as the source of a stage error.
    #[must_use]
    pub fn into_error(self) -> crate::error::BoxError {
        match self {
            Interrupted::Canceled => Box::new(OperationCanceled),
            Interrupted::DeadlineExceeded => Box::new(TimedOut),
        }
    }
}

/// Cancellation signal and deadline for one dial attempt.
#[derive(Debug, Clone, Default)]
pub struct DialContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl DialContext {
    /// A context that is never canceled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context canceled through `token`.
    #[must_use]
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Derive a context that also expires after `timeout`.
    ///
    /// The earlier of the existing and the new deadline wins.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that also expires at `deadline`.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) if existing <= deadline => existing,
            _ => deadline,
        };
        Self {
            token: self.token.clone(),
            deadline: Some(deadline),
        }
    }

    /// Derive a child context: canceling it leaves `self` untouched, while
    /// canceling `self` cancels the child.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancel this context.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The cancellation token.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The deadline, if one is set.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the context is already canceled or past its deadline.
    #[must_use]
    pub fn err(&self) -> Option<Interrupted> {
        if self.token.is_cancelled() {
            Some(Interrupted::Canceled)
        } else if self.deadline.is_some_and(|d| d <= Instant::now()) {
            Some(Interrupted::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Run `fut` until it completes or the context ends, whichever comes first.
    ///
    /// The future is dropped on interruption, which releases whatever it owns.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Interrupted> {
        if let Some(reason) = self.err() {
            return Err(reason);
        }

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(Interrupted::Canceled),
            () = deadline => Err(Interrupted::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}

impl From<CancellationToken> for DialContext {
    fn from(token: CancellationToken) -> Self {
        Self::with_cancellation(token)
    }
}
