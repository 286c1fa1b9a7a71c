//! End-to-end tests for the claim orchestration service

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal_macros::dec;
use test_utils::{MoneyFixtures, TemporalFixtures};

use airline_directory::{builtin_directory, DocumentKind};
use app_service::{
    CannedFlightProvider, ClaimService, ClaimSubmission, InMemoryClaimStore, NotificationEvent,
    RecordingNotifier, RecordingPaymentPort, ServiceConfig,
};
use core_kernel::Money;
use domain_claims::{ClaimStatus, CorrespondenceKind, FilingMethod, UnmetCondition};
use domain_eligibility::{DisruptionInput, Regulation};
use domain_flight::{FlightDesignator, FlightObservation, SourceAgreement};
use domain_refund::RefundReason;

struct Harness {
    service: ClaimService,
    store: Arc<InMemoryClaimStore>,
    notifier: Arc<RecordingNotifier>,
    payments: Arc<RecordingPaymentPort>,
    primary: Arc<CannedFlightProvider>,
    secondary: Arc<CannedFlightProvider>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryClaimStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let payments = Arc::new(RecordingPaymentPort::new());
    let primary = Arc::new(CannedFlightProvider::new("primary"));
    let secondary = Arc::new(CannedFlightProvider::new("secondary"));

    let service = ClaimService::new(
        &ServiceConfig::default(),
        Arc::new(builtin_directory().clone()),
        store.clone(),
        notifier.clone(),
        payments.clone(),
        primary.clone(),
        secondary.clone(),
    );

    Harness {
        service,
        store,
        notifier,
        payments,
        primary,
        secondary,
    }
}

fn now() -> chrono::DateTime<Utc> {
    TemporalFixtures::now()
}

fn flight_date() -> NaiveDate {
    TemporalFixtures::flight_date()
}

fn observation(delay: i64, confidence: f64, source: &str) -> FlightObservation {
    FlightObservation::new(
        FlightDesignator::new("LH", "1234", flight_date()),
        delay,
        false,
        confidence,
        source,
        now(),
    )
    .with_reason("technical fault")
}

fn seed_providers(harness: &Harness) {
    harness.primary.set("LH1234", observation(200, 0.9, "primary"));
    harness
        .secondary
        .set("LH1234", observation(205, 0.8, "secondary"));
}

fn submission() -> ClaimSubmission {
    ClaimSubmission {
        passenger_name: "Ada Lovelace".to_string(),
        passenger_email: "ada@example.com".to_string(),
        carrier: "LH".to_string(),
        flight_number: "1234".to_string(),
        flight_date: flight_date(),
        origin: "FRA".to_string(),
        destination: "MAD".to_string(),
        origin_country: "DE".to_string(),
        destination_country: "ES".to_string(),
        carrier_country: "DE".to_string(),
        distance_km: 1_600.0,
        booking_reference: Some("ABC123".to_string()),
        disruption: DisruptionInput::Delay,
        reported_delay_minutes: 200,
        reported_cancelled: false,
        disruption_reason: Some("technical fault".to_string()),
    }
}

fn service_fee() -> Money {
    MoneyFixtures::service_fee()
}

async fn paid_claim(harness: &Harness) -> core_kernel::ClaimId {
    let claim = harness.service.submit(submission(), now()).await.unwrap();
    harness
        .service
        .payment_captured(claim.id, "pay_789", service_fee(), now())
        .await
        .unwrap();
    claim.id
}

mod submission_and_quote {
    use super::*;

    #[tokio::test]
    async fn test_quote_uses_reconciled_provider_data() {
        let harness = harness();
        seed_providers(&harness);

        let quote = harness.service.quote(&submission()).await.unwrap();

        assert!(quote.eligible);
        assert_eq!(quote.amount.unwrap().amount(), dec!(400));
        assert_eq!(quote.regulation, Some(Regulation::Eu261));
        // Two agreeing sources corroborate: 0.9 + 0.1 bonus
        assert!((quote.confidence - 1.0).abs() < 1e-9);
        assert!(!quote.low_confidence);
    }

    #[tokio::test]
    async fn test_submit_embeds_record_and_estimate() {
        let harness = harness();
        seed_providers(&harness);

        let claim = harness.service.submit(submission(), now()).await.unwrap();

        assert_eq!(claim.status, ClaimStatus::Submitted);
        let record = claim.flight_record.as_ref().unwrap();
        assert_eq!(record.agreement, SourceAgreement::Corroborated);
        assert_eq!(record.delay_minutes, 200);

        let estimate = claim.compensation_estimate.as_ref().unwrap();
        assert_eq!(estimate.amount.unwrap().amount(), dec!(400));
        assert_eq!(harness.store.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_falls_back_to_passenger_report() {
        let harness = harness();
        // No canned observations: both providers miss

        let claim = harness.service.submit(submission(), now()).await.unwrap();

        let record = claim.flight_record.as_ref().unwrap();
        assert_eq!(record.sources, vec!["passenger_report".to_string()]);
        assert_eq!(record.delay_minutes, 200);

        // Passenger-reported facts still quote, flagged as low confidence
        let estimate = claim.compensation_estimate.as_ref().unwrap();
        assert!(estimate.eligible);
        assert!(estimate.low_confidence);
    }

    #[tokio::test]
    async fn test_invalid_submission_is_rejected_with_field_errors() {
        let harness = harness();
        let mut bad = submission();
        bad.passenger_email = "not-an-email".to_string();

        let err = harness.service.submit(bad, now()).await.unwrap_err();
        assert!(err.to_string().contains("passenger_email"));
    }
}

mod lifecycle_flow {
    use super::*;

    #[tokio::test]
    async fn test_full_forward_chain_to_completed() {
        let harness = harness();
        seed_providers(&harness);
        let claim_id = paid_claim(&harness).await;

        let claim = harness.service.get_claim(claim_id).await.unwrap();
        assert_eq!(claim.status, ClaimStatus::Validated);

        for kind in [
            DocumentKind::BoardingPass,
            DocumentKind::DisruptionProof,
            DocumentKind::BookingConfirmation,
        ] {
            harness
                .service
                .attach_document(claim_id, kind, "doc.pdf")
                .await
                .unwrap();
        }

        let claim = harness
            .service
            .prepare_documents(claim_id, now())
            .await
            .unwrap();
        assert_eq!(claim.status, ClaimStatus::DocumentsPrepared);

        let claim = harness
            .service
            .generate_package(claim_id, now())
            .await
            .unwrap();
        assert_eq!(claim.status, ClaimStatus::ReadyToFile);
        assert!(claim.package.is_some());

        let filed_at = now() + Duration::hours(1);
        let claim = harness
            .service
            .file_claim(claim_id, "LH-REF-42", FilingMethod::WebForm, filed_at)
            .await
            .unwrap();
        assert_eq!(claim.status, ClaimStatus::Filed);
        // Lufthansa's first follow-up interval is 14 days
        assert_eq!(claim.next_follow_up, Some(filed_at + Duration::days(14)));

        let claim = harness
            .service
            .record_correspondence(claim_id, CorrespondenceKind::Acknowledgement, filed_at)
            .await
            .unwrap();
        assert_eq!(claim.status, ClaimStatus::AirlineAcknowledged);
        // The acknowledgement consumed the second schedule entry (21 days)
        assert_eq!(claim.next_follow_up, Some(filed_at + Duration::days(21)));

        let claim = harness
            .service
            .record_correspondence(claim_id, CorrespondenceKind::FinalResponse, filed_at)
            .await
            .unwrap();
        assert_eq!(claim.status, ClaimStatus::AirlineResponded);

        let claim = harness.service.approve(claim_id, filed_at).await.unwrap();
        assert_eq!(claim.status, ClaimStatus::Approved);
        assert_eq!(claim.next_follow_up, None);

        let claim = harness.service.complete(claim_id, filed_at).await.unwrap();
        assert_eq!(claim.status, ClaimStatus::Completed);

        let events = harness.notifier.events();
        assert!(events.iter().any(|e| matches!(
            e,
            NotificationEvent::ClaimFiled { airline_reference, .. }
                if airline_reference == "LH-REF-42"
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            NotificationEvent::StatusChanged { to: ClaimStatus::Completed, .. }
        )));
    }

    #[tokio::test]
    async fn test_missing_documents_block_preparation() {
        let harness = harness();
        seed_providers(&harness);
        let claim_id = paid_claim(&harness).await;

        let err = harness
            .service
            .prepare_documents(claim_id, now())
            .await
            .unwrap_err();

        let violation = err.as_guard().unwrap();
        assert!(violation
            .unmet
            .contains(&UnmetCondition::MissingDocument(DocumentKind::BoardingPass)));

        // The guard failure left the claim untouched
        let claim = harness.service.get_claim(claim_id).await.unwrap();
        assert_eq!(claim.status, ClaimStatus::Validated);
    }
}

mod refund_guarantee {
    use super::*;

    #[tokio::test]
    async fn test_rejection_refunds_exactly_once() {
        let harness = harness();
        seed_providers(&harness);
        let claim_id = paid_claim(&harness).await;

        // Walk the claim to airline_responded
        for kind in [
            DocumentKind::BoardingPass,
            DocumentKind::DisruptionProof,
            DocumentKind::BookingConfirmation,
        ] {
            harness
                .service
                .attach_document(claim_id, kind, "doc.pdf")
                .await
                .unwrap();
        }
        harness.service.prepare_documents(claim_id, now()).await.unwrap();
        harness.service.generate_package(claim_id, now()).await.unwrap();
        harness
            .service
            .file_claim(claim_id, "LH-REF-42", FilingMethod::WebForm, now())
            .await
            .unwrap();
        harness
            .service
            .record_correspondence(claim_id, CorrespondenceKind::FinalResponse, now())
            .await
            .unwrap();

        let claim = harness.service.reject(claim_id, now()).await.unwrap();
        assert_eq!(claim.status, ClaimStatus::Refunded);

        // A later sweep re-evaluates the same claim: idempotent no-op
        let report = harness.service.run_sweep(now()).await.unwrap();
        assert_eq!(report.refunds_issued, 0);

        let instructions = harness.payments.instructions();
        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].reason, RefundReason::ClaimUnsuccessful);
        assert_eq!(instructions[0].amount, service_fee());
        assert_eq!(instructions[0].payment_reference, "pay_789");
    }

    #[tokio::test]
    async fn test_sweep_refunds_claims_not_filed_in_time() {
        let harness = harness();
        seed_providers(&harness);
        let claim_id = paid_claim(&harness).await;

        // Nothing happens for 49 hours
        let report = harness
            .service
            .run_sweep(now() + Duration::hours(49))
            .await
            .unwrap();
        assert_eq!(report.refunds_issued, 1);

        let claim = harness.service.get_claim(claim_id).await.unwrap();
        assert_eq!(claim.status, ClaimStatus::Refunded);
        assert_eq!(
            claim.refund.as_ref().unwrap().reason_code,
            "not_filed_in_time"
        );

        let instructions = harness.payments.instructions();
        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].reason, RefundReason::NotFiledInTime);
    }

    #[tokio::test]
    async fn test_customer_request_inside_window_refunds() {
        let harness = harness();
        seed_providers(&harness);
        let claim_id = paid_claim(&harness).await;

        let claim = harness
            .service
            .request_refund(claim_id, now() + Duration::hours(12))
            .await
            .unwrap();

        assert_eq!(claim.status, ClaimStatus::Refunded);
        let instructions = harness.payments.instructions();
        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].reason, RefundReason::CustomerRequestWindow);
    }

    #[tokio::test]
    async fn test_customer_request_outside_window_does_not_refund() {
        let harness = harness();
        seed_providers(&harness);
        let claim_id = paid_claim(&harness).await;

        let claim = harness
            .service
            .request_refund(claim_id, now() + Duration::hours(30))
            .await
            .unwrap();

        assert_eq!(claim.status, ClaimStatus::Validated);
        assert!(harness.payments.instructions().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_claim_refunds_after_payment() {
        let harness = harness();
        seed_providers(&harness);

        let first = harness.service.submit(submission(), now()).await.unwrap();
        let second = harness.service.submit(submission(), now()).await.unwrap();
        assert_eq!(second.duplicate_of, Some(first.id));

        let claim = harness
            .service
            .payment_captured(second.id, "pay_790", service_fee(), now())
            .await
            .unwrap();

        assert_eq!(claim.status, ClaimStatus::Refunded);
        let instructions = harness.payments.instructions();
        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].reason, RefundReason::DuplicateClaim);
        assert_eq!(instructions[0].payment_reference, "pay_790");
    }

    #[tokio::test]
    async fn test_reassessment_error_refunds_after_payment() {
        let harness = harness();
        // Providers report a short delay the pre-payment check missed
        harness.primary.set("LH1234", observation(90, 0.9, "primary"));
        harness
            .secondary
            .set("LH1234", observation(95, 0.8, "secondary"));

        let claim_id = paid_claim(&harness).await;

        let claim = harness.service.reassess(claim_id, now()).await.unwrap();

        assert_eq!(claim.status, ClaimStatus::Refunded);
        assert!(!claim.reassessment.as_ref().unwrap().eligible);
        let instructions = harness.payments.instructions();
        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].reason, RefundReason::IneligibleAfterPayment);
    }

    #[tokio::test]
    async fn test_concurrent_refund_requests_issue_one_instruction() {
        let harness = Arc::new(harness());
        seed_providers(&harness);
        let claim_id = paid_claim(&harness).await;

        let mut handles = Vec::new();
        for _ in 0..4 {
            let harness = harness.clone();
            handles.push(tokio::spawn(async move {
                harness
                    .service
                    .request_refund(claim_id, now() + Duration::hours(1))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(harness.payments.instructions().len(), 1);
    }
}
