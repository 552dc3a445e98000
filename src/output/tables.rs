use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color as TableColor, ContentArrangement, Table};

pub fn create_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|label| Cell::new(*label).fg(TableColor::Cyan))
                .collect::<Vec<_>>(),
        );
    table
}

pub fn conclusion_cell(conclusion: Option<&str>) -> Cell {
    match conclusion {
        Some("success") => Cell::new("success").fg(TableColor::Green),
        Some("failure") => Cell::new("failure").fg(TableColor::Red),
        Some(other) => Cell::new(other).fg(TableColor::Yellow),
        None => Cell::new("-").fg(TableColor::DarkGrey),
    }
}

pub fn category_cell(category: &str) -> Cell {
    if category == "unknown" {
        Cell::new(category).fg(TableColor::DarkGrey)
    } else {
        Cell::new(category).fg(TableColor::Yellow)
    }
}
