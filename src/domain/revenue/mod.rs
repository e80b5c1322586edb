//! Revenue aggregate
//!
//! Folding bills across rooms into monthly revenue, comparing periods,
//! and the history repository the monthly snapshots are upserted into.

pub mod aggregator;
pub mod model;
pub mod repository;

pub use aggregator::{
    breakdown_by_building, current_revenue, revenue_breakdown, revenue_change,
};
pub use model::{RevenueBreakdown, RevenueChange, RevenueRecord};
pub use repository::RevenueRepository;
