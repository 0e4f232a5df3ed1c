use super::ui;
use crate::core::currency::format_amount;
use crate::core::exchange::ExchangeRateService;
use crate::core::money::MonetaryAmount;
use crate::core::trip::{StatusFilter, Trip};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{Cell, CellAlignment};
use tracing::debug;

pub async fn run(
    trips: &[Trip],
    filter: StatusFilter,
    today: NaiveDate,
    service: &ExchangeRateService,
    display_currency: &str,
) -> Result<()> {
    let selected = select_trips(trips, filter, today);
    if selected.is_empty() {
        println!("No trips to display.");
        return Ok(());
    }

    println!("{}", render_trips(&selected, today));

    let pb = ui::new_spinner("Converting trip totals...");
    let grand_total = total_in_currency(&selected, service, display_currency).await;
    pb.finish_and_clear();

    let grand_total = grand_total?;
    ui::print_separator();
    println!(
        "{} {}",
        ui::style_text(
            &format!("Total across trips ({}):", grand_total.currency),
            ui::StyleType::TotalLabel
        ),
        ui::style_text(&grand_total.to_string(), ui::StyleType::TotalValue)
    );
    Ok(())
}

pub fn select_trips(trips: &[Trip], filter: StatusFilter, today: NaiveDate) -> Vec<&Trip> {
    trips
        .iter()
        .filter(|trip| filter.matches(trip.status(today)))
        .collect()
}

/// Sums the budget totals of `trips`, each converted to `currency`.
pub async fn total_in_currency(
    trips: &[&Trip],
    service: &ExchangeRateService,
    currency: &str,
) -> Result<MonetaryAmount> {
    let mut total = MonetaryAmount::zero(currency);
    for trip in trips {
        let amount = service
            .convert(trip.budget().total(), &trip.currency, currency)
            .await?;
        debug!(trip = %trip.title, %amount, "Converted trip total");
        total = total.checked_add(&MonetaryAmount::new(amount, currency)?)?;
    }
    Ok(total)
}

pub fn render_trips(trips: &[&Trip], today: NaiveDate) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Trip"),
        ui::header_cell("Dates"),
        ui::header_cell("Days"),
        ui::header_cell("Status"),
        ui::header_cell("Stops"),
        ui::header_cell("Currency"),
        ui::header_cell("Total"),
        ui::header_cell("Limit"),
        ui::header_cell("Budget"),
    ]);

    for trip in trips {
        let budget = trip.budget();
        let title = if trip.is_public {
            format!("{} (shared)", trip.title)
        } else {
            trip.title.clone()
        };
        let budget_cell = if budget.limit.is_some() {
            ui::budget_status_cell(budget.is_over_budget())
        } else {
            Cell::new("")
        };

        table.add_row(vec![
            Cell::new(title),
            Cell::new(format!("{} to {}", trip.start_date, trip.end_date)),
            Cell::new(trip.duration_days()).set_alignment(CellAlignment::Right),
            Cell::new(trip.status(today)),
            Cell::new(trip.stops.len()).set_alignment(CellAlignment::Right),
            Cell::new(&trip.currency),
            ui::money_cell(budget.total(), &trip.currency),
            ui::format_optional_cell(budget.limit, |limit| format_amount(limit, &trip.currency)),
            budget_cell,
        ]);
    }

    format!("{}\n\n{table}", ui::style_text("Trips", ui::StyleType::Title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::budget::BudgetBreakdown;
    use crate::core::cache::Cache;
    use crate::core::currency::ExchangeRateTable;
    use crate::core::exchange::{RATES_CACHE_KEY, RateSource};
    use crate::core::trip::TripStatus;
    use crate::store::memory::MemoryCache;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    struct OfflineSource;

    #[async_trait]
    impl RateSource for OfflineSource {
        async fn fetch_rates(&self) -> Result<ExchangeRateTable> {
            Err(anyhow::anyhow!("offline"))
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trip(title: &str, start: NaiveDate, end: NaiveDate, currency: &str, total: Decimal) -> Trip {
        let mut trip = Trip::new(title, start, end, currency);
        trip.set_budget(BudgetBreakdown::new(total, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
        trip
    }

    fn sample_trips() -> Vec<Trip> {
        let mut europe = trip("Europe", date(2026, 7, 1), date(2026, 7, 14), "EUR", dec!(920));
        europe.is_public = true;
        europe.set_budget(europe.budget().with_limit(Some(dec!(500))));
        vec![
            europe,
            trip("Tokyo", date(2026, 11, 20), date(2026, 11, 23), "JPY", dec!(14950)),
            trip("Boston", date(2025, 3, 1), date(2025, 3, 2), "USD", dec!(250)),
        ]
    }

    #[test]
    fn test_select_trips_by_status() {
        let trips = sample_trips();
        let today = date(2026, 7, 5);

        assert_eq!(select_trips(&trips, StatusFilter::All, today).len(), 3);

        let upcoming = select_trips(&trips, StatusFilter::Only(TripStatus::Upcoming), today);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].title, "Tokyo");

        let ongoing = select_trips(&trips, StatusFilter::Only(TripStatus::Ongoing), today);
        assert_eq!(ongoing[0].title, "Europe");

        let past = select_trips(&trips, StatusFilter::Only(TripStatus::Past), today);
        assert_eq!(past[0].title, "Boston");
    }

    #[test]
    fn test_render_trips() {
        let trips = sample_trips();
        let today = date(2026, 7, 5);
        let output = render_trips(&select_trips(&trips, StatusFilter::All, today), today);

        assert!(output.contains("Europe (shared)"));
        assert!(output.contains("2026-07-01 to 2026-07-14"));
        assert!(output.contains("€920.00"));
        assert!(output.contains("¥14,950.00"));
        assert!(output.contains("Over budget"));
        assert!(output.contains("Ongoing"));
        assert!(output.contains("Past"));
    }

    #[tokio::test]
    async fn test_total_in_currency() {
        let cache = Arc::new(MemoryCache::<String, ExchangeRateTable>::new());
        cache
            .put(RATES_CACHE_KEY.to_string(), ExchangeRateTable::fallback(), None)
            .await;
        let service = ExchangeRateService::new(Arc::new(OfflineSource), cache);

        let trips = sample_trips();
        let all = select_trips(&trips, StatusFilter::All, date(2026, 7, 5));
        let total = total_in_currency(&all, &service, "usd").await.unwrap();

        assert_eq!(total.currency, "USD");
        assert_eq!(total.amount, dec!(1350.00));
    }

    #[tokio::test]
    async fn test_total_of_no_trips_is_zero() {
        let cache = Arc::new(MemoryCache::<String, ExchangeRateTable>::new());
        let service = ExchangeRateService::new(Arc::new(OfflineSource), cache);

        let total = total_in_currency(&[], &service, "EUR").await.unwrap();
        assert_eq!(total, MonetaryAmount::zero("EUR"));
    }
}
