use super::{load_snapshot, ui};
use crate::core::Aggregator;
use crate::core::snapshot::GdpYear;
use anyhow::Result;
use comfy_table::Cell;

/// Column order: configured labels first, then any other country present in
/// the series, alphabetically.
fn columns(series: &[GdpYear], labels: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = labels
        .iter()
        .filter(|label| series.iter().any(|year| year.growth.contains_key(*label)))
        .cloned()
        .collect();
    for year in series {
        for label in year.growth.keys() {
            if !columns.contains(label) {
                columns.push(label.clone());
            }
        }
    }
    let configured = columns.iter().take_while(|c| labels.contains(*c)).count();
    columns[configured..].sort();
    columns
}

/// GDP growth as a year-by-country table. Missing values show as "N/A".
pub fn display_growth(series: &[GdpYear], labels: &[String]) -> String {
    let columns = columns(series, labels);

    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Year")];
    header.extend(columns.iter().map(|c| ui::header_cell(c)));
    table.set_header(header);

    for year in series {
        let mut row = vec![Cell::new(&year.year)];
        row.extend(columns.iter().map(|c| {
            ui::format_optional_cell(year.growth.get(c).copied().flatten(), |v| {
                format!("{v:.1}")
            })
        }));
        table.add_row(row);
    }
    table.to_string()
}

pub async fn run(aggregator: Aggregator, labels: &[String]) -> Result<()> {
    let snapshot = load_snapshot(aggregator, true).await?;
    println!(
        "{}\n",
        ui::style_text("Crescimento do PIB Global (%)", ui::StyleType::Title)
    );
    println!("{}", display_growth(&snapshot.gdp_growth, labels));
    Ok(())
}
