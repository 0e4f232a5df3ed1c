use super::ui;
use crate::core::currency::{CURRENCIES, symbol_for};
use comfy_table::Cell;

pub fn run() {
    println!("{}", render_currencies());
}

pub fn render_currencies() -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Symbol"),
    ]);
    for (code, name) in CURRENCIES {
        table.add_row(vec![Cell::new(code), Cell::new(name), Cell::new(symbol_for(code))]);
    }
    table.to_string()
}
