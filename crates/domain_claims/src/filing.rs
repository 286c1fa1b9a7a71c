//! Submission package generation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use airline_directory::{AirlineProfile, DocumentKind, SubmissionChannel};

use crate::claim::Claim;
use crate::lifecycle::UnmetCondition;

/// How the claim was (or will be) delivered to the airline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingMethod {
    Email,
    WebForm,
    Postal,
}

impl From<&SubmissionChannel> for FilingMethod {
    fn from(channel: &SubmissionChannel) -> Self {
        match channel {
            SubmissionChannel::Email { .. } => FilingMethod::Email,
            SubmissionChannel::WebForm { .. } => FilingMethod::WebForm,
            SubmissionChannel::Postal { .. } => FilingMethod::Postal,
        }
    }
}

/// The addressed, ready-to-send claim package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPackage {
    pub channel: SubmissionChannel,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<DocumentKind>,
    pub generated_at: DateTime<Utc>,
}

/// Builds the submission package for a claim against its airline profile
///
/// Returns every validation miss at once so the caller can remediate in a
/// single pass rather than discovering problems one by one.
pub fn build_submission_package(
    claim: &Claim,
    profile: &AirlineProfile,
    now: DateTime<Utc>,
) -> Result<SubmissionPackage, Vec<UnmetCondition>> {
    let mut unmet = Vec::new();

    for field in &profile.required_fields {
        if !claim.field_present(field) {
            unmet.push(UnmetCondition::MissingField(field.clone()));
        }
    }

    for kind in profile.document_checklist() {
        if !claim.has_document(kind) {
            unmet.push(UnmetCondition::MissingDocument(kind));
        }
    }

    let recipient = profile.channel.recipient().trim().to_string();
    if recipient.is_empty() {
        unmet.push(UnmetCondition::InvalidSubmissionChannel(
            profile.code.clone(),
        ));
    }

    if !unmet.is_empty() {
        return Err(unmet);
    }

    let flight = &claim.leg.flight;
    let subject = format!(
        "Compensation claim {} - flight {} on {}",
        claim.claim_number,
        flight.full_number(),
        flight.date
    );

    let estimate = claim
        .compensation_estimate
        .as_ref()
        .and_then(|d| d.amount)
        .map(|amount| format!("Claimed compensation: {amount}.\n"))
        .unwrap_or_default();

    let body = format!(
        "Dear {} customer relations,\n\n\
         On behalf of {}, we submit a compensation claim for flight {} \
         from {} to {} on {}.\n{}\
         Supporting documents are attached.\n",
        profile.name,
        claim.passenger.name,
        flight.full_number(),
        claim.leg.origin,
        claim.leg.destination,
        flight.date,
        estimate,
    );

    Ok(SubmissionPackage {
        channel: profile.channel.clone(),
        recipient,
        subject,
        body,
        attachments: claim.documents.iter().map(|d| d.kind).collect(),
        generated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use airline_directory::FollowUpSchedule;
    use domain_eligibility::{DisruptionInput, Route};
    use domain_flight::FlightDesignator;

    use crate::claim::{FlightLeg, Passenger};

    fn profile() -> AirlineProfile {
        AirlineProfile {
            code: "LH".to_string(),
            name: "Lufthansa".to_string(),
            aliases: vec![],
            channel: SubmissionChannel::Email {
                address: "claims@lufthansa.example".to_string(),
            },
            required_documents: vec![DocumentKind::BookingConfirmation],
            required_fields: vec!["booking_reference".to_string()],
            expected_response_days: 28,
            follow_up: FollowUpSchedule::new(vec![14]),
        }
    }

    fn claim() -> Claim {
        let flight =
            FlightDesignator::new("LH", "1234", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        Claim::submitted(
            Passenger {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
            },
            FlightLeg {
                flight,
                origin: "FRA".to_string(),
                destination: "MAD".to_string(),
                route: Route::new("DE", "ES", "DE", 1_600.0),
            },
            DisruptionInput::Delay,
            Utc::now(),
        )
    }

    #[test]
    fn test_all_misses_reported_at_once() {
        let unmet = build_submission_package(&claim(), &profile(), Utc::now()).unwrap_err();

        assert!(unmet.contains(&UnmetCondition::MissingField(
            "booking_reference".to_string()
        )));
        assert!(unmet.contains(&UnmetCondition::MissingDocument(DocumentKind::BoardingPass)));
        assert!(unmet.contains(&UnmetCondition::MissingDocument(
            DocumentKind::BookingConfirmation
        )));
    }

    #[test]
    fn test_complete_claim_generates_addressed_package() {
        let mut claim = claim();
        claim.booking_reference = Some("ABC123".to_string());
        claim.attach_document(DocumentKind::BoardingPass, "bp.pdf");
        claim.attach_document(DocumentKind::DisruptionProof, "delay.pdf");
        claim.attach_document(DocumentKind::BookingConfirmation, "booking.pdf");

        let package = build_submission_package(&claim, &profile(), Utc::now()).unwrap();

        assert_eq!(package.recipient, "claims@lufthansa.example");
        assert!(package.subject.contains("LH1234"));
        assert!(package.body.contains("Ada Lovelace"));
        assert_eq!(package.attachments.len(), 3);
        assert_eq!(FilingMethod::from(&package.channel), FilingMethod::Email);
    }
}
