//! Billing
//!
//! Bill composition for a single room in a single period.

pub mod composer;
pub mod model;

pub use composer::{compose_bill, DUE_IN_DAYS};
pub use model::{format_money, Bill, PeriodKey};
