pub mod budget;
pub mod convert;
pub mod currencies;
pub mod itinerary;
pub mod rates;
pub mod setup;
pub mod trips;
pub mod ui;
