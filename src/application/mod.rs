//! Application layer - use cases over the domain and its repositories

pub mod services;

pub use services::{
    BillingService, MeterReadings, RevenueReport, RevenueService, RoomBill, RoomService,
    TariffService,
};
