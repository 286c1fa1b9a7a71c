//! Refund trigger evaluation
//!
//! Runs on every claim-state change and on the periodic sweep. Triggers are
//! checked in a fixed priority order and the first match wins; the idempotency
//! check comes first so re-evaluation of an already-refunded claim is always
//! a no-op.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::temporal::ElapsedWindow;
use core_kernel::Money;
use domain_claims::{Claim, ClaimStatus};

/// Why a refund fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundReason {
    /// The airline rejected the claim
    ClaimUnsuccessful,
    /// The claim was not filed within the filing deadline
    NotFiledInTime,
    /// The passenger asked for their money back inside the request window
    CustomerRequestWindow,
    /// Post-payment re-evaluation showed the claim was never eligible
    IneligibleAfterPayment,
    /// A duplicate claim for the same flight and passenger exists
    DuplicateClaim,
}

impl RefundReason {
    /// Stable reason code recorded on the claim and sent to the processor
    pub fn as_code(&self) -> &'static str {
        match self {
            RefundReason::ClaimUnsuccessful => "claim_unsuccessful",
            RefundReason::NotFiledInTime => "not_filed_in_time",
            RefundReason::CustomerRequestWindow => "customer_request_window",
            RefundReason::IneligibleAfterPayment => "ineligible_after_payment",
            RefundReason::DuplicateClaim => "duplicate_claim",
        }
    }
}

impl std::fmt::Display for RefundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// The evaluator's verdict for one claim
///
/// The amount is always the full captured payment; no partial-refund policy
/// exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundDecision {
    pub should_refund: bool,
    pub reason: Option<RefundReason>,
    pub amount: Option<Money>,
    pub evaluated_at: DateTime<Utc>,
}

impl RefundDecision {
    fn no_action(now: DateTime<Utc>) -> Self {
        Self {
            should_refund: false,
            reason: None,
            amount: None,
            evaluated_at: now,
        }
    }

    fn refund(reason: RefundReason, amount: Money, now: DateTime<Utc>) -> Self {
        Self {
            should_refund: true,
            reason: Some(reason),
            amount: Some(amount),
            evaluated_at: now,
        }
    }
}

/// Evaluates the refund guarantee for a claim
pub struct RefundTriggerEvaluator {
    /// How long the service has to file before the guarantee fires
    filing_deadline: Duration,
    /// How long after capture a customer request triggers an automatic refund
    request_window: Duration,
}

impl Default for RefundTriggerEvaluator {
    fn default() -> Self {
        Self {
            filing_deadline: Duration::hours(48),
            request_window: Duration::hours(24),
        }
    }
}

impl RefundTriggerEvaluator {
    pub fn new(filing_deadline: Duration, request_window: Duration) -> Self {
        Self {
            filing_deadline,
            request_window,
        }
    }

    /// Evaluates the triggers in priority order; first match wins
    ///
    /// Safe to invoke concurrently with itself for the same claim: it never
    /// mutates, and the lifecycle's refund transition is the idempotency
    /// backstop when two evaluations race.
    pub fn evaluate(&self, claim: &Claim, now: DateTime<Utc>) -> RefundDecision {
        // 1. Already refunded: idempotent no-op
        if claim.status == ClaimStatus::Refunded || claim.refund.is_some() {
            return RefundDecision::no_action(now);
        }

        // Nothing to give back before a payment was captured
        let Some(payment) = claim.payment.as_ref() else {
            return RefundDecision::no_action(now);
        };
        let amount = payment.amount;

        // 2. The airline said no
        if claim.status == ClaimStatus::Rejected {
            return RefundDecision::refund(RefundReason::ClaimUnsuccessful, amount, now);
        }

        // 3. We sat on the claim past the filing deadline
        let filing_window = ElapsedWindow::new(payment.captured_at, self.filing_deadline);
        if filing_window.elapsed_by(now) && !claim.has_reached(ClaimStatus::Filed) {
            return RefundDecision::refund(RefundReason::NotFiledInTime, amount, now);
        }

        // 4. The passenger changed their mind inside the request window
        if let Some(requested_at) = claim.refund_requested_at {
            let request_window = ElapsedWindow::new(payment.captured_at, self.request_window);
            if request_window.contains(requested_at) {
                return RefundDecision::refund(RefundReason::CustomerRequestWindow, amount, now);
            }
        }

        // 5. Re-evaluation showed the pre-payment assessment was wrong
        if claim.reassessment.as_ref().is_some_and(|d| !d.eligible) {
            return RefundDecision::refund(RefundReason::IneligibleAfterPayment, amount, now);
        }

        // 6. The same flight and passenger already have a claim
        if claim.duplicate_of.is_some() {
            return RefundDecision::refund(RefundReason::DuplicateClaim, amount, now);
        }

        RefundDecision::no_action(now)
    }
}
