//! Clearinghouse submission port and simulated adapter

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Result of a clearinghouse submission that reached the payer side
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted,
    /// The clearinghouse refused the claim; retrying the same payload
    /// will fail again
    Rejected { reason: String },
}

/// Failures before an outcome was obtained
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Transport failure: {reason}")]
    Transport { reason: String },
}

impl GatewayError {
    pub fn transport(reason: impl Into<String>) -> Self {
        GatewayError::Transport {
            reason: reason.into(),
        }
    }
}

/// Outbound claim submission seam
#[async_trait]
pub trait ClearinghouseGateway: Send + Sync {
    /// Submits an 837 payload. `Err` means the outcome is unknown and the
    /// submission may be retried; `Ok(Rejected)` is a definitive refusal.
    async fn submit(&self, payload: &str) -> Result<SubmissionOutcome, GatewayError>;
}

/// Scripted behavior for [`SimulatedGateway`]
#[derive(Debug, Clone)]
pub enum GatewayBehavior {
    Accept,
    Reject { reason: String },
    FailTransport,
}

/// In-process gateway used by tests and local development
///
/// Validates the X12 interchange envelope the way a real clearinghouse
/// front door would, then follows its scripted behavior.
pub struct SimulatedGateway {
    behavior: GatewayBehavior,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl SimulatedGateway {
    pub fn new(behavior: GatewayBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn accepting() -> Self {
        Self::new(GatewayBehavior::Accept)
    }

    /// Adds a pause before responding, for timeout tests
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn envelope_error(payload: &str) -> Option<&'static str> {
        if !payload.starts_with("ISA*") {
            return Some("missing ISA interchange header");
        }
        if !payload.contains("~IEA") {
            return Some("missing IEA interchange trailer");
        }
        None
    }
}

#[async_trait]
impl ClearinghouseGateway for SimulatedGateway {
    async fn submit(&self, payload: &str) -> Result<SubmissionOutcome, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        // Envelope validation happens before any simulated transmission,
        // so a malformed payload is rejected even in FailTransport mode.
        if let Some(problem) = Self::envelope_error(payload) {
            return Ok(SubmissionOutcome::Rejected {
                reason: format!("invalid interchange envelope: {problem}"),
            });
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            GatewayBehavior::Accept => Ok(SubmissionOutcome::Accepted),
            GatewayBehavior::Reject { reason } => Ok(SubmissionOutcome::Rejected {
                reason: reason.clone(),
            }),
            GatewayBehavior::FailTransport => {
                Err(GatewayError::transport("simulated connection reset"))
            }
        }
    }
}
