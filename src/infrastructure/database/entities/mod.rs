//! Database entities module

pub mod building;
pub mod revenue_history;
pub mod room;
pub mod tenant;
pub mod tenant_lease;

pub use building::Entity as Building;
pub use revenue_history::Entity as RevenueHistory;
pub use room::Entity as Room;
pub use tenant::Entity as Tenant;
pub use tenant_lease::Entity as TenantLease;
