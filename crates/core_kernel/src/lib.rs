//! Core Kernel - Foundational types and utilities for the flight claims system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Temporal types for flight schedules and elapsed-time windows
//! - Common identifiers and value objects

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, Rate, MoneyError};
pub use temporal::{Timezone, ElapsedWindow, delay_minutes, TemporalError};
pub use identifiers::{
    ClaimId, PaymentId, RefundId, DocumentId, EligibilityCheckId, NoteId,
};
pub use ports::{PortError, DomainPort};
