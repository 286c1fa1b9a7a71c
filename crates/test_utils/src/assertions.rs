//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_claims::{Claim, ClaimError, ClaimStatus, UnmetCondition};
use domain_eligibility::EligibilityDecision;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than
/// the tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a decision is eligible for exactly the given amount
pub fn assert_eligible_for(decision: &EligibilityDecision, expected: Money) {
    assert!(
        decision.eligible,
        "Expected an eligible decision, got: {}",
        decision.reason
    );
    assert_eq!(
        decision.amount,
        Some(expected),
        "Compensation amount mismatch: {}",
        decision.reason
    );
}

/// Asserts that a decision is ineligible
pub fn assert_ineligible(decision: &EligibilityDecision) {
    assert!(
        !decision.eligible,
        "Expected an ineligible decision, got {:?} with reason: {}",
        decision.amount, decision.reason
    );
    assert_eq!(decision.amount, None);
}

/// Asserts the claim is in the expected status
pub fn assert_status(claim: &Claim, expected: ClaimStatus) {
    assert_eq!(
        claim.status, expected,
        "Claim {} is in {:?}, expected {:?}",
        claim.id, claim.status, expected
    );
}

/// Asserts the error is a guard violation containing the given condition
pub fn assert_guard_blocked_by(err: &ClaimError, condition: &UnmetCondition) {
    let violation = err
        .as_guard()
        .unwrap_or_else(|| panic!("Expected a guard violation, got: {err}"));
    assert!(
        violation.unmet.contains(condition),
        "Guard violation does not contain {condition:?}: {:?}",
        violation.unmet
    );
}
