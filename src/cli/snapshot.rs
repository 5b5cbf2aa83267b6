use super::{gdp, load_snapshot, ui};
use crate::core::{Aggregator, MarketSnapshot};
use anyhow::Result;
use comfy_table::Cell;

impl MarketSnapshot {
    /// Indicator cards as a table, one row per card.
    pub fn display_indicators(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Indicator"),
            ui::header_cell("Value"),
            ui::header_cell("Change"),
            ui::header_cell("Source"),
        ]);

        table.add_row(vec![
            Cell::new("Ibovespa (Pontos)"),
            ui::value_cell(self.ibovespa.points_display()),
            ui::change_cell(self.ibovespa.variation),
            Cell::new("B3 / HG Brasil"),
        ]);
        table.add_row(vec![
            Cell::new("Dólar Comercial"),
            ui::value_cell(format!("R$ {}", self.dollar.buy)),
            ui::change_cell(self.dollar.variation),
            Cell::new("PTAX / Câmbio"),
        ]);
        table.add_row(vec![
            Cell::new("Euro Comercial"),
            ui::value_cell(format!("R$ {}", self.euro.buy)),
            ui::change_cell(self.euro.variation),
            Cell::new("Câmbio em tempo real"),
        ]);
        table.add_row(vec![
            Cell::new("Taxa Selic (Meta)"),
            ui::value_cell(format!("{}%", self.policy_rate.value)),
            ui::tag_cell("Ao Ano"),
            Cell::new("Banco Central (SGS)"),
        ]);
        table.add_row(vec![
            Cell::new("Inflação IPCA"),
            ui::value_cell(format!("{}%", self.inflation.value)),
            ui::tag_cell("12 Meses"),
            Cell::new("IBGE Agregados"),
        ]);
        table.add_row(vec![
            Cell::new("Reservas Internacionais"),
            ui::value_cell(format!("US$ {} bi", self.reserves.billions)),
            ui::tag_cell("Diária"),
            Cell::new("Banco Central (SGS)"),
        ]);
        // Static card, no provider behind it.
        table.add_row(vec![
            Cell::new("Risco Brasil (EMBI+)"),
            ui::value_cell("142"),
            ui::tag_cell("-2 pts"),
            Cell::new("JPM Estimativa D-1"),
        ]);

        table.to_string()
    }

    pub fn display_commodities(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Commodity"), ui::header_cell("Value")]);
        for point in &self.commodities {
            table.add_row(vec![
                Cell::new(&point.label),
                ui::value_cell(point.value.to_string()),
            ]);
        }
        table.to_string()
    }
}

pub fn render(snapshot: &MarketSnapshot, labels: &[String]) -> String {
    let mut output = format!(
        "{}\n\n",
        ui::style_text("Dados Econômicos", ui::StyleType::Title)
    );
    output.push_str(&snapshot.display_indicators());

    output.push_str(&format!(
        "\n\n{}\n\n",
        ui::style_text("Tendências de Commodities", ui::StyleType::Title)
    ));
    output.push_str(&snapshot.display_commodities());

    output.push_str(&format!(
        "\n\n{}\n\n",
        ui::style_text("Crescimento do PIB Global (%)", ui::StyleType::Title)
    ));
    output.push_str(&gdp::display_growth(&snapshot.gdp_growth, labels));

    output.push_str(&format!(
        "\n\n{}",
        ui::style_text(
            &format!("As of {}", snapshot.as_of.format("%Y-%m-%d %H:%M UTC")),
            ui::StyleType::Subtle
        )
    ));
    output
}

pub async fn run(aggregator: Aggregator, labels: &[String], json: bool) -> Result<()> {
    let snapshot = load_snapshot(aggregator, !json).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", render(&snapshot, labels));
    }
    Ok(())
}
