use super::ui;
use crate::core::budget::{BudgetBreakdown, BudgetCategory, convert_budget};
use crate::core::currency::{format_amount, normalize_code};
use crate::core::exchange::ExchangeRateService;
use crate::core::trip::Trip;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

/// Shows the budget of `trip`. With `from`, the manually entered figures are
/// read as `from` amounts and converted into the trip currency first.
pub async fn run(trip: &Trip, service: &ExchangeRateService, from: Option<&str>) -> Result<()> {
    let budget = budget_in_trip_currency(trip, service, from).await?;
    if let Some(from) = from {
        println!(
            "{}",
            ui::style_text(
                &format!(
                    "Entries converted from {} to {}",
                    normalize_code(from),
                    trip.currency
                ),
                ui::StyleType::Subtle
            )
        );
    }
    println!("{}", render_budget(trip, &budget));
    Ok(())
}

pub async fn budget_in_trip_currency(
    trip: &Trip,
    service: &ExchangeRateService,
    from: Option<&str>,
) -> Result<BudgetBreakdown> {
    let budget = trip.budget();
    match from {
        Some(from) => Ok(convert_budget(&budget, service, from, &trip.currency).await?),
        None => Ok(budget),
    }
}

pub fn render_budget(trip: &Trip, budget: &BudgetBreakdown) -> String {
    let currency = trip.currency.as_str();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell("Amount"),
        ui::header_cell("Share"),
    ]);
    for category in BudgetCategory::ALL {
        table.add_row(vec![
            Cell::new(category),
            ui::money_cell(budget.category(category), currency),
            ui::format_optional_cell(budget.share(category), |share| format!("{share}%")),
        ]);
    }
    table.add_row(vec![
        Cell::new(ui::style_text("Total", ui::StyleType::TotalLabel)),
        Cell::new(ui::style_text(
            &format_amount(budget.total(), currency),
            ui::StyleType::TotalValue,
        ))
        .set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);

    let mut summary = ui::new_styled_table();
    summary.set_header(vec![
        ui::header_cell("Limit"),
        ui::header_cell("Remaining"),
        ui::header_cell("Status"),
    ]);
    match budget.limit {
        Some(limit) => summary.add_row(vec![
            ui::money_cell(limit, currency),
            ui::format_optional_cell(budget.remaining(), |left| format_amount(left, currency)),
            ui::budget_status_cell(budget.is_over_budget()),
        ]),
        None => summary.add_row(vec![
            ui::format_optional_cell(budget.limit, |limit| format_amount(limit, currency)),
            ui::format_optional_cell(budget.remaining(), |left| format_amount(left, currency)),
            Cell::new("No limit set"),
        ]),
    };

    format!(
        "{} ({})\n\n{table}\n{summary}",
        ui::style_text(&trip.title, ui::StyleType::Title),
        currency
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::Cache;
    use crate::core::currency::ExchangeRateTable;
    use crate::core::exchange::{RATES_CACHE_KEY, RateSource};
    use crate::core::trip::Activity;
    use crate::store::memory::MemoryCache;
    use async_trait::async_trait;
    use chrono::NaiveDate;
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

    fn trip_with_budget(limit: Option<rust_decimal::Decimal>) -> Trip {
        let mut trip = Trip::new("Lisbon", date(2026, 5, 1), date(2026, 5, 4), "EUR");
        trip.stops = serde_yaml::from_str(
            r#"
- city_name: "Lisbon"
  country: "Portugal"
  start_date: 2026-05-01
  end_date: 2026-05-04
"#,
        )
        .unwrap();
        trip.add_activity(0, Activity::new("Tram 28", dec!(3))).unwrap();
        trip.set_budget(
            BudgetBreakdown::new(dec!(200), dec!(300), dec!(100), dec!(50)).with_limit(limit),
        );
        trip
    }

    #[test]
    fn test_render_budget_within_limit() {
        let trip = trip_with_budget(Some(dec!(1000)));
        let output = render_budget(&trip, &trip.budget());

        assert!(output.contains("Lisbon"));
        assert!(output.contains("Transport"));
        assert!(output.contains("€200.00"));
        assert!(output.contains("€3.00"));
        assert!(output.contains("€653.00"));
        assert!(output.contains("€347.00"));
        assert!(output.contains("Within budget"));
    }

    #[test]
    fn test_render_budget_over_limit() {
        let trip = trip_with_budget(Some(dec!(600)));
        let output = render_budget(&trip, &trip.budget());

        assert!(output.contains("Over budget"));
        assert!(output.contains("€-53.00"));
    }

    #[test]
    fn test_render_budget_without_limit() {
        let trip = trip_with_budget(None);
        let output = render_budget(&trip, &trip.budget());

        assert!(output.contains("No limit set"));
        assert!(output.contains("N/A"));
    }

    #[tokio::test]
    async fn test_budget_converted_from_other_currency() {
        let cache = Arc::new(MemoryCache::<String, ExchangeRateTable>::new());
        cache
            .put(
                RATES_CACHE_KEY.to_string(),
                ExchangeRateTable::new([("EUR", dec!(0.5))]),
                None,
            )
            .await;
        let service = ExchangeRateService::new(Arc::new(OfflineSource), cache);
        let trip = trip_with_budget(Some(dec!(1000)));

        let budget = budget_in_trip_currency(&trip, &service, Some("USD"))
            .await
            .unwrap();
        assert_eq!(budget.transport, dec!(100.00));
        assert_eq!(budget.lodging, dec!(150.00));
        assert_eq!(budget.activities, dec!(3));
        assert_eq!(budget.limit, Some(dec!(500.00)));
        assert_eq!(budget.total(), dec!(328.00));

        let unchanged = budget_in_trip_currency(&trip, &service, None).await.unwrap();
        assert_eq!(unchanged.total(), dec!(653));
    }
}
