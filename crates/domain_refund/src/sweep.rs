//! Scheduled refund sweep
//!
//! The 48-hour and 24-hour triggers are time-based: nothing else happens to
//! the claim when they come due, and the governing process may restart
//! between payment and deadline. So the guarantee is enforced by a periodic
//! pass over all open claims, in addition to on-event re-evaluation.

use chrono::{DateTime, Utc};
use tracing::{error, info};

use core_kernel::RefundId;
use domain_claims::{Claim, ClaimLifecycle, ClaimStore, NotificationPort, RefundRecord, TransitionOutcome};

use crate::error::RefundError;
use crate::evaluator::{RefundDecision, RefundTriggerEvaluator};
use crate::ports::PaymentPort;

/// Outcome counts for one sweep pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub evaluated: usize,
    pub refunds_issued: usize,
    pub failures: usize,
}

/// Applies an accepted refund decision to one claim
///
/// Records the refund, takes the side transition, persists the claim, and
/// emits the processor instruction and the notification. The lifecycle's
/// idempotency guard makes a concurrent duplicate application a no-op.
pub async fn apply_refund(
    claim: &mut Claim,
    decision: &RefundDecision,
    lifecycle: &ClaimLifecycle,
    store: &dyn ClaimStore,
    payments: &dyn PaymentPort,
    notifier: &dyn NotificationPort,
    now: DateTime<Utc>,
) -> Result<bool, RefundError> {
    let (Some(reason), Some(amount)) = (decision.reason, decision.amount) else {
        return Ok(false);
    };
    let Some(payment_reference) = claim.payment.as_ref().map(|p| p.reference.clone()) else {
        return Ok(false);
    };

    let record = RefundRecord {
        id: RefundId::new_v7(),
        amount,
        reason_code: reason.as_code().to_string(),
        issued_at: now,
    };

    match lifecycle.refund(claim, record, now) {
        Ok(TransitionOutcome::Applied { .. }) => {}
        // Another evaluation got there first
        Ok(TransitionOutcome::AlreadyApplied) => return Ok(false),
        Err(err) => {
            error!(claim = %claim.id, %err, "refund transition rejected");
            return Ok(false);
        }
    }

    store.save(claim).await?;
    payments
        .issue_refund(&payment_reference, amount, reason)
        .await?;
    notifier
        .refund_issued(claim, amount, reason.as_code())
        .await?;

    info!(claim = %claim.id, %reason, %amount, "refund issued");
    Ok(true)
}

/// One pass of the refund sweep over all open claims
///
/// Claims are independent; a failure on one is logged and counted, never
/// allowed to stop the pass.
pub async fn run_refund_sweep(
    store: &dyn ClaimStore,
    lifecycle: &ClaimLifecycle,
    evaluator: &RefundTriggerEvaluator,
    payments: &dyn PaymentPort,
    notifier: &dyn NotificationPort,
    now: DateTime<Utc>,
) -> Result<SweepReport, RefundError> {
    let mut report = SweepReport::default();

    for mut claim in store.open_claims().await? {
        report.evaluated += 1;
        let decision = evaluator.evaluate(&claim, now);
        if !decision.should_refund {
            continue;
        }

        match apply_refund(
            &mut claim, &decision, lifecycle, store, payments, notifier, now,
        )
        .await
        {
            Ok(true) => report.refunds_issued += 1,
            Ok(false) => {}
            Err(err) => {
                error!(claim = %claim.id, %err, "refund application failed");
                report.failures += 1;
            }
        }
    }

    info!(
        evaluated = report.evaluated,
        refunds_issued = report.refunds_issued,
        failures = report.failures,
        "refund sweep completed"
    );
    Ok(report)
}
