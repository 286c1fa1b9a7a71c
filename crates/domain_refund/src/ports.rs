//! Payment processor port

use async_trait::async_trait;

use core_kernel::{DomainPort, Money, PortError};

use crate::evaluator::RefundReason;

/// Outbound signal to the external payment processor
#[async_trait]
pub trait PaymentPort: DomainPort {
    /// Instructs the processor to refund the captured payment in full
    async fn issue_refund(
        &self,
        payment_reference: &str,
        amount: Money,
        reason: RefundReason,
    ) -> Result<(), PortError>;
}
