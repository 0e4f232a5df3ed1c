use super::ui;
use crate::core::currency::{ExchangeRateTable, currency_name, symbol_for};
use crate::core::exchange::{ExchangeRateService, RatesOrigin};
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

pub async fn run(service: &ExchangeRateService, refresh: bool) -> Result<()> {
    if refresh {
        service.invalidate().await;
    }

    let pb = ui::new_spinner("Fetching exchange rates...");
    let (rates, origin) = service.get_rates_with_origin().await;
    pb.finish_and_clear();

    println!("{}", render_rates(&rates, origin));
    Ok(())
}

pub fn render_rates(rates: &ExchangeRateTable, origin: RatesOrigin) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Symbol"),
        ui::header_cell("Per 1 USD"),
    ]);

    for (code, rate) in rates.iter() {
        table.add_row(vec![
            Cell::new(code),
            Cell::new(currency_name(code).unwrap_or("")),
            Cell::new(symbol_for(code)),
            Cell::new(rate.to_string()).set_alignment(CellAlignment::Right),
        ]);
    }

    let source_style = match origin {
        RatesOrigin::Fallback => ui::StyleType::Error,
        RatesOrigin::Cache | RatesOrigin::Live => ui::StyleType::Subtle,
    };
    format!(
        "{}\n\n{table}\n\nSource: {}",
        ui::style_text("Exchange Rates", ui::StyleType::Title),
        ui::style_text(&format!("{origin} rates"), source_style)
    )
}
