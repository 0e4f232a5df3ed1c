use super::ui;
use crate::core::currency::{currency_name, format_amount};
use crate::core::trip::{Trip, TripStop};
use comfy_table::{Cell, CellAlignment, Table};

pub fn run(trip: &Trip) {
    println!("{}", render_itinerary(trip));
}

pub fn render_itinerary(trip: &Trip) -> String {
    let mut lines = vec![ui::style_text(&trip.title, ui::StyleType::Title)];
    lines.push(format!(
        "{} to {} ({} days), budgeted in {}",
        trip.start_date,
        trip.end_date,
        trip.duration_days(),
        trip.currency
    ));
    if trip.is_public {
        lines.push(ui::style_text("Shared publicly", ui::StyleType::Subtle));
    }
    if let Some(description) = &trip.description {
        lines.push(description.clone());
    }

    let stops = trip.ordered_stops();
    if stops.is_empty() {
        lines.push(String::new());
        lines.push("No stops planned yet.".to_string());
    }
    for (position, stop) in stops.into_iter().enumerate() {
        lines.push(String::new());
        lines.push(ui::style_text(
            &format!(
                "{}. {}, {} ({} to {}, {} days)",
                position + 1,
                stop.city_name,
                stop.country,
                stop.start_date,
                stop.end_date,
                stop.duration_days()
            ),
            ui::StyleType::TotalLabel,
        ));
        if let Some(notes) = &stop.notes {
            lines.push(ui::style_text(notes, ui::StyleType::Subtle));
        }
        if stop.activities.is_empty() {
            lines.push("No activities.".to_string());
        } else {
            lines.push(activity_table(stop, &trip.currency).to_string());
            lines.push(format!(
                "Activities subtotal: {}",
                format_amount(stop.activity_cost(), &trip.currency)
            ));
        }
    }

    if let Some(code) = trip.suggested_currency() {
        lines.push(String::new());
        lines.push(ui::style_text(
            &format!(
                "Tip: local currency here is {} ({})",
                code,
                currency_name(code).unwrap_or(code)
            ),
            ui::StyleType::Subtle,
        ));
    }
    lines.join("\n")
}

fn activity_table(stop: &TripStop, currency: &str) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Activity"),
        ui::header_cell("Category"),
        ui::header_cell("Scheduled"),
        ui::header_cell("Duration"),
        ui::header_cell("Cost"),
    ]);
    for activity in &stop.activities {
        table.add_row(vec![
            Cell::new(&activity.name),
            Cell::new(activity.category),
            ui::format_optional_cell(activity.scheduled_time, |time| {
                time.format("%Y-%m-%d %H:%M").to_string()
            })
            .set_alignment(CellAlignment::Left),
            ui::format_optional_cell(activity.duration_minutes, |minutes| {
                format!("{}h {:02}m", minutes / 60, minutes % 60)
            }),
            ui::money_cell(activity.cost, currency),
        ]);
    }
    table
}
