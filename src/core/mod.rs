//! Core trip budgeting and currency logic

pub mod budget;
pub mod cache;
pub mod config;
pub mod currency;
pub mod exchange;
pub mod log;
pub mod money;
pub mod trip;

// Re-export main types for cleaner imports
pub use budget::{BudgetBreakdown, BudgetCategory};
pub use currency::ExchangeRateTable;
pub use exchange::{ExchangeRateService, RateSource};
pub use money::{MonetaryAmount, MoneyError};
pub use trip::{StatusFilter, Trip, TripStatus};
