//! Bounded-retry session resolution.
//!
//! Right after a credential operation completes — a sign-in, a sign-up
//! confirmation, a token refresh — the identity provider's session is
//! often not observable *yet*. A single `get_session()` call at that
//! moment returns nothing, and a naive caller concludes "logged out":
//! the classic flaky false negative that leaves a freshly logged-in user
//! staring at the login form.
//!
//! The resolver's contract is to absorb that window: poll the provider
//! up to a bounded number of times, suspending (without blocking the
//! runtime) between attempts, and only then report absence. Absence
//! after exhaustion is NOT an error — "currently logged out" is a valid,
//! frequent answer.
//!
//! # Budgets
//!
//! Different call sites deserve different patience. A routine UI refresh
//! uses a short budget; the moment right after an explicit sign-in uses
//! a long one, because a false "you are not logged in" is most expensive
//! exactly there. See [`RetryBudget::routine`] and
//! [`RetryBudget::sign_in`].
//!
//! # No cancellation
//!
//! A resolution pass in flight cannot be aborted; it runs to completion,
//! bounded by `max_attempts × delay`. Keeping the loop short-lived is
//! the budget's job, not a cancellation primitive's.

use std::time::Duration;

use storyforge_identity::{IdentityClient, Session};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// RetryBudget
// ---------------------------------------------------------------------------

/// How hard to try before accepting that no session exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    /// Maximum number of `get_session` calls. Clamped to at least 1 by
    /// [`validated`](Self::validated) — a zero-attempt resolution would
    /// answer "logged out" without ever asking.
    pub max_attempts: u32,

    /// Suspension between consecutive attempts. No suspension happens
    /// after the final attempt.
    pub delay: Duration,
}

impl RetryBudget {
    /// Budget for routine UI refreshes: 10 attempts, 120 ms apart
    /// (worst case ≈ 1.1 s of polling).
    pub fn routine() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_millis(120),
        }
    }

    /// Budget for the moment right after an explicit sign-in: 25
    /// attempts, 150 ms apart (worst case ≈ 3.6 s). The higher cost of a
    /// false negative here justifies the longer wait.
    pub fn sign_in() -> Self {
        Self {
            max_attempts: 25,
            delay: Duration::from_millis(150),
        }
    }

    /// Clamps out-of-range values so the budget is safe to use.
    ///
    /// Called by [`SessionResolver::new`]. The only rule today:
    /// `max_attempts >= 1`.
    pub fn validated(mut self) -> Self {
        if self.max_attempts == 0 {
            warn!("retry budget with 0 attempts — clamping to 1");
            self.max_attempts = 1;
        }
        self
    }

    /// Worst-case wall-clock duration of a full resolution pass.
    pub fn worst_case(&self) -> Duration {
        // max_attempts - 1 sleeps between max_attempts calls.
        self.delay * self.max_attempts.saturating_sub(1)
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::routine()
    }
}

// ---------------------------------------------------------------------------
// SessionResolver
// ---------------------------------------------------------------------------

/// Polls the identity provider until a session appears or the budget
/// runs out.
#[derive(Debug, Clone, Copy)]
pub struct SessionResolver {
    budget: RetryBudget,
}

impl SessionResolver {
    /// Creates a resolver with the given (validated) budget.
    pub fn new(budget: RetryBudget) -> Self {
        Self {
            budget: budget.validated(),
        }
    }

    /// The budget this resolver runs with.
    pub fn budget(&self) -> RetryBudget {
        self.budget
    }

    /// Resolves the provider's session, retrying within the budget.
    ///
    /// Returns on the first attempt that yields a session. A query that
    /// returns `Err` is logged and counted as "no session this attempt" —
    /// a transient query failure must not be conflated with a definitive
    /// logged-out answer, and it must not abort the loop either.
    ///
    /// Returns `None` once every attempt yielded nothing. That is a
    /// valid result, not an error.
    pub async fn resolve<I: IdentityClient>(&self, client: &I) -> Option<Session> {
        for attempt in 1..=self.budget.max_attempts {
            match client.get_session().await {
                Ok(Some(session)) => {
                    debug!(%session, attempt, "session resolved");
                    return Some(session);
                }
                Ok(None) => {
                    debug!(attempt, "no session yet");
                }
                Err(e) => {
                    // Transient by policy: log and keep polling.
                    warn!(error = %e, attempt, "session query failed");
                }
            }

            if attempt < self.budget.max_attempts {
                tokio::time::sleep(self.budget.delay).await;
            }
        }

        debug!(
            attempts = self.budget.max_attempts,
            "session resolution exhausted — treating as logged out"
        );
        None
    }
}
