//! Claim orchestration
//!
//! Wires the domain crates together behind one service facade: submission
//! and quoting, the payment-capture signal, document and filing operations,
//! inbound correspondence, refund requests, and the scheduled sweep. Every
//! mutating operation takes the per-claim lock first, so at most one
//! transition is ever in flight for a claim.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use validator::Validate;

use airline_directory::{AirlineDirectory, DocumentKind};
use core_kernel::{ClaimId, Money};
use domain_claims::{
    Claim, ClaimLifecycle, ClaimLockRegistry, ClaimStore, CompensationOverride,
    CorrespondenceKind, FilingMethod, NotificationPort, PaymentInfo, PaymentStatus,
    TransitionOutcome,
};
use domain_eligibility::{EligibilityDecision, EligibilityEngine};
use domain_flight::{
    reconcile, FlightDataProvider, FlightLookupService, LookupCache, ReconciledFlightRecord,
};
use domain_refund::{apply_refund, run_refund_sweep, PaymentPort, RefundTriggerEvaluator, SweepReport};

use crate::config::ServiceConfig;
use crate::dto::ClaimSubmission;
use crate::error::ServiceError;

/// The orchestrating claim service
pub struct ClaimService {
    store: Arc<dyn ClaimStore>,
    notifier: Arc<dyn NotificationPort>,
    payments: Arc<dyn PaymentPort>,
    lookup: FlightLookupService,
    lifecycle: ClaimLifecycle,
    engine: EligibilityEngine,
    evaluator: RefundTriggerEvaluator,
    locks: ClaimLockRegistry,
}

impl ClaimService {
    pub fn new(
        config: &ServiceConfig,
        directory: Arc<AirlineDirectory>,
        store: Arc<dyn ClaimStore>,
        notifier: Arc<dyn NotificationPort>,
        payments: Arc<dyn PaymentPort>,
        primary: Arc<dyn FlightDataProvider>,
        secondary: Arc<dyn FlightDataProvider>,
    ) -> Self {
        let cache = Arc::new(LookupCache::new(config.cache_capacity, config.cache_ttl()));
        Self {
            store,
            notifier,
            payments,
            lookup: FlightLookupService::new(primary, secondary, cache)
                .with_provider_timeout(config.provider_timeout()),
            lifecycle: ClaimLifecycle::new(directory),
            engine: EligibilityEngine::with_standard_policies(),
            evaluator: RefundTriggerEvaluator::new(
                config.filing_deadline(),
                config.refund_request_window(),
            ),
            locks: ClaimLockRegistry::new(),
        }
    }

    /// Resolves flight facts from the provider pair, falling back to the
    /// passenger-reported facts when neither provider returns data
    async fn resolve_flight_record(
        &self,
        submission: &ClaimSubmission,
        now: DateTime<Utc>,
    ) -> Result<ReconciledFlightRecord, ServiceError> {
        match self
            .lookup
            .lookup(&submission.full_flight_number(), submission.flight_date)
            .await
        {
            Ok(record) => Ok(record),
            Err(err) => {
                warn!(
                    flight = %submission.full_flight_number(),
                    error = %err,
                    "provider lookup failed; using passenger-reported facts"
                );
                let fallback = submission.fallback_observation(now);
                Ok(reconcile(std::slice::from_ref(&fallback))?)
            }
        }
    }

    /// Computes a conversion-facing eligibility quote without creating a claim
    pub async fn quote(
        &self,
        submission: &ClaimSubmission,
    ) -> Result<EligibilityDecision, ServiceError> {
        submission.validate()?;
        let now = Utc::now();
        let record = self.resolve_flight_record(submission, now).await?;
        Ok(self
            .engine
            .evaluate(&record, &submission.disruption, &submission.route())?)
    }

    /// Creates a claim from a validated submission
    ///
    /// The compensation estimate is always the engine's output for the
    /// submitted inputs; duplicates of an existing claim are annotated so
    /// the refund evaluator can pick them up after payment.
    #[instrument(skip(self, submission), fields(flight = %submission.full_flight_number()))]
    pub async fn submit(
        &self,
        submission: ClaimSubmission,
        now: DateTime<Utc>,
    ) -> Result<Claim, ServiceError> {
        submission.validate()?;

        let record = self.resolve_flight_record(&submission, now).await?;
        let decision =
            self.engine
                .evaluate(&record, &submission.disruption, &submission.route())?;

        let mut claim = submission.into_claim(Some(record), now);
        claim.compensation_estimate = Some(decision);

        if let Some(&earlier) = self.store.duplicates_of(&claim).await?.first() {
            warn!(claim = %claim.id, duplicate_of = %earlier, "duplicate claim detected");
            claim.duplicate_of = Some(earlier);
        }

        self.store.save(&claim).await?;
        info!(claim = %claim.id, status = ?claim.status, "claim submitted");
        Ok(claim)
    }

    /// Consumes the payment-captured signal and advances the claim to
    /// `validated`
    pub async fn payment_captured(
        &self,
        claim_id: ClaimId,
        reference: impl Into<String>,
        amount: Money,
        captured_at: DateTime<Utc>,
    ) -> Result<Claim, ServiceError> {
        let lock = self.locks.lock_for(claim_id);
        let _guard = lock.lock().await;

        let mut claim = self.store.get(claim_id).await?;
        claim.record_payment(PaymentInfo {
            reference: reference.into(),
            amount,
            status: PaymentStatus::Captured,
            captured_at,
        });

        match self.lifecycle.validate(&mut claim, captured_at) {
            Ok(outcome) => {
                self.store.save(&claim).await?;
                self.notify_transition(&claim, outcome).await;
            }
            Err(err) => {
                // Keep the captured payment even when validation is blocked
                self.store.save(&claim).await?;
                return Err(err.into());
            }
        }

        // Duplicates and pre-payment assessment errors refund immediately
        self.enforce_refund_guarantee(&mut claim, captured_at)
            .await?;
        Ok(claim)
    }

    /// Attaches a supporting document to the claim
    pub async fn attach_document(
        &self,
        claim_id: ClaimId,
        kind: DocumentKind,
        file_name: impl Into<String>,
    ) -> Result<Claim, ServiceError> {
        let lock = self.locks.lock_for(claim_id);
        let _guard = lock.lock().await;

        let mut claim = self.store.get(claim_id).await?;
        claim.attach_document(kind, file_name);
        self.store.save(&claim).await?;
        Ok(claim)
    }

    /// `validated -> documents_prepared`
    pub async fn prepare_documents(
        &self,
        claim_id: ClaimId,
        now: DateTime<Utc>,
    ) -> Result<Claim, ServiceError> {
        self.apply(claim_id, |lifecycle, claim| {
            lifecycle.mark_documents_prepared(claim, now)
        })
        .await
    }

    /// Generates the submission package and advances to `ready_to_file`
    pub async fn generate_package(
        &self,
        claim_id: ClaimId,
        now: DateTime<Utc>,
    ) -> Result<Claim, ServiceError> {
        self.apply(claim_id, |lifecycle, claim| {
            lifecycle.prepare_package(claim, now)
        })
        .await
    }

    /// Records the airline filing and schedules the first follow-up
    pub async fn file_claim(
        &self,
        claim_id: ClaimId,
        airline_reference: impl Into<String>,
        method: FilingMethod,
        now: DateTime<Utc>,
    ) -> Result<Claim, ServiceError> {
        let airline_reference = airline_reference.into();
        let claim = self
            .apply(claim_id, |lifecycle, claim| {
                lifecycle.file(claim, airline_reference.clone(), method, now)
            })
            .await?;

        if let Err(err) = self.notifier.claim_filed(&claim, &airline_reference).await {
            warn!(claim = %claim.id, error = %err, "filed notification failed");
        }
        Ok(claim)
    }

    /// Advances the claim on inbound airline correspondence
    pub async fn record_correspondence(
        &self,
        claim_id: ClaimId,
        kind: CorrespondenceKind,
        now: DateTime<Utc>,
    ) -> Result<Claim, ServiceError> {
        self.apply(claim_id, |lifecycle, claim| {
            lifecycle.record_correspondence(claim, kind, now)
        })
        .await
    }

    /// Records airline approval of the claim
    pub async fn approve(
        &self,
        claim_id: ClaimId,
        now: DateTime<Utc>,
    ) -> Result<Claim, ServiceError> {
        self.apply(claim_id, |lifecycle, claim| lifecycle.approve(claim, now))
            .await
    }

    /// Records airline rejection and enforces the refund guarantee
    pub async fn reject(
        &self,
        claim_id: ClaimId,
        now: DateTime<Utc>,
    ) -> Result<Claim, ServiceError> {
        let lock = self.locks.lock_for(claim_id);
        let _guard = lock.lock().await;

        let mut claim = self.store.get(claim_id).await?;
        let outcome = self.lifecycle.reject(&mut claim, now)?;
        self.store.save(&claim).await?;
        self.notify_transition(&claim, outcome).await;

        self.enforce_refund_guarantee(&mut claim, now).await?;
        Ok(claim)
    }

    /// Closes out an approved or rejected claim
    pub async fn complete(
        &self,
        claim_id: ClaimId,
        now: DateTime<Utc>,
    ) -> Result<Claim, ServiceError> {
        self.apply(claim_id, |lifecycle, claim| lifecycle.complete(claim, now))
            .await
    }

    /// Consumes an explicit customer refund request
    pub async fn request_refund(
        &self,
        claim_id: ClaimId,
        requested_at: DateTime<Utc>,
    ) -> Result<Claim, ServiceError> {
        let lock = self.locks.lock_for(claim_id);
        let _guard = lock.lock().await;

        let mut claim = self.store.get(claim_id).await?;
        claim.refund_requested_at.get_or_insert(requested_at);
        self.store.save(&claim).await?;

        self.enforce_refund_guarantee(&mut claim, requested_at)
            .await?;
        Ok(claim)
    }

    /// Re-runs eligibility post-payment and refunds if the original
    /// assessment was wrong
    pub async fn reassess(
        &self,
        claim_id: ClaimId,
        now: DateTime<Utc>,
    ) -> Result<Claim, ServiceError> {
        let lock = self.locks.lock_for(claim_id);
        let _guard = lock.lock().await;

        let mut claim = self.store.get(claim_id).await?;
        let Some(record) = claim.flight_record.clone() else {
            warn!(claim = %claim.id, "no flight record to reassess against");
            return Ok(claim);
        };

        let decision = self
            .engine
            .evaluate(&record, &claim.disruption, &claim.leg.route)?;
        info!(claim = %claim.id, eligible = decision.eligible, "claim reassessed");
        claim.reassessment = Some(decision);
        self.store.save(&claim).await?;

        self.enforce_refund_guarantee(&mut claim, now).await?;
        Ok(claim)
    }

    /// Records an admin compensation override beside the computed estimate
    pub async fn record_override(
        &self,
        claim_id: ClaimId,
        value: CompensationOverride,
    ) -> Result<Claim, ServiceError> {
        let lock = self.locks.lock_for(claim_id);
        let _guard = lock.lock().await;

        let mut claim = self.store.get(claim_id).await?;
        claim.append_note(
            value.approved_by.clone(),
            format!("compensation override recorded: {}", value.amount),
        );
        claim.record_override(value);
        self.store.save(&claim).await?;
        Ok(claim)
    }

    /// One pass of the scheduled refund sweep over all open claims
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, ServiceError> {
        Ok(run_refund_sweep(
            self.store.as_ref(),
            &self.lifecycle,
            &self.evaluator,
            self.payments.as_ref(),
            self.notifier.as_ref(),
            now,
        )
        .await?)
    }

    /// Claims whose follow-up is due, for the operator worklist
    pub async fn follow_ups_due(&self, as_of: DateTime<Utc>) -> Result<Vec<Claim>, ServiceError> {
        Ok(self.store.follow_ups_due(as_of).await?)
    }

    /// Loads one claim
    pub async fn get_claim(&self, claim_id: ClaimId) -> Result<Claim, ServiceError> {
        Ok(self.store.get(claim_id).await?)
    }

    /// Takes the per-claim lock, applies one lifecycle operation, persists,
    /// and notifies
    async fn apply<F>(&self, claim_id: ClaimId, operation: F) -> Result<Claim, ServiceError>
    where
        F: FnOnce(&ClaimLifecycle, &mut Claim) -> Result<TransitionOutcome, domain_claims::ClaimError>,
    {
        let lock = self.locks.lock_for(claim_id);
        let _guard = lock.lock().await;

        let mut claim = self.store.get(claim_id).await?;
        let outcome = operation(&self.lifecycle, &mut claim)?;
        self.store.save(&claim).await?;
        self.notify_transition(&claim, outcome).await;
        Ok(claim)
    }

    /// Evaluates the refund triggers and applies an accepted decision
    ///
    /// Returns true when a refund was issued by this call. The lifecycle's
    /// idempotency guard keeps a racing duplicate application a no-op.
    async fn enforce_refund_guarantee(
        &self,
        claim: &mut Claim,
        now: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        let decision = self.evaluator.evaluate(claim, now);
        if !decision.should_refund {
            return Ok(false);
        }
        Ok(apply_refund(
            claim,
            &decision,
            &self.lifecycle,
            self.store.as_ref(),
            self.payments.as_ref(),
            self.notifier.as_ref(),
            now,
        )
        .await?)
    }

    /// Delivery failures are logged, never allowed to fail the operation
    async fn notify_transition(&self, claim: &Claim, outcome: TransitionOutcome) {
        if let TransitionOutcome::Applied { from, to } = outcome {
            if let Err(err) = self.notifier.claim_status_changed(claim, from, to).await {
                warn!(claim = %claim.id, error = %err, "status notification failed");
            }
        }
    }
}
