//! Rendering of projection tables: CSV export, JSON reports and currency text

use crate::error::Result;
use crate::params::ScenarioMultiplier;
use crate::projection::{
    revenue_column, ProjectionConfig, ProjectionSummary, ProjectionTable, YearRecord, SUMMARY_COLUMNS,
    YEAR_COLUMN,
};
use csv::Writer;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Column headers for a table, per-stream revenue columns first
pub fn csv_headers(table: &ProjectionTable) -> Vec<String> {
    let mut headers = vec![YEAR_COLUMN.to_string()];
    headers.extend(table.stream_names().iter().map(|name| revenue_column(name)));
    headers.extend(SUMMARY_COLUMNS.map(String::from));
    headers
}

fn csv_row(table: &ProjectionTable, record: &YearRecord) -> Vec<String> {
    let mut row = vec![record.year.to_string()];
    row.extend(
        table
            .stream_names()
            .iter()
            .map(|name| format!("{:.2}", record.revenue(name).unwrap_or(0.0))),
    );
    row.extend(
        [
            record.staffing_costs,
            record.other_costs,
            record.total_revenue,
            record.total_costs,
            record.margin,
            record.total_subsidy,
            record.avg_subsidy_per_partner,
        ]
        .map(|value| format!("{:.2}", value)),
    );
    row
}

/// Write the table as CSV to any writer
pub fn write_csv<W: Write>(table: &ProjectionTable, writer: W) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer.write_record(csv_headers(table))?;
    for record in table.records() {
        csv_writer.write_record(csv_row(table, record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the table as CSV to a file
pub fn write_csv_path<P: AsRef<Path>>(table: &ProjectionTable, path: P) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(table, file)
}

/// JSON document for API consumers
#[derive(Debug, Serialize)]
pub struct ProjectionReport<'a> {
    pub scenario: ScenarioMultiplier,
    pub config: &'a ProjectionConfig,
    pub records: &'a [YearRecord],
    pub summary: ProjectionSummary,
}

impl<'a> ProjectionReport<'a> {
    pub fn new(table: &'a ProjectionTable, config: &'a ProjectionConfig) -> Self {
        Self {
            scenario: table.scenario(),
            config,
            records: table.records(),
            summary: table.summary(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Format an amount as whole dollars with thousands separators, e.g. `$1,234,567`
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Sentence describing the break-even year
pub fn break_even_text(table: &ProjectionTable) -> String {
    match table.break_even_year() {
        Some(year) => format!("Projected break-even year: {}", year),
        None => "No break-even within the projection horizon".to_string(),
    }
}

/// Key metrics of the final year, or `None` for an empty table
pub fn key_metrics_text(table: &ProjectionTable) -> Option<String> {
    let last = table.final_year()?;
    Some(format!(
        "Key Metrics for {}\n  Total Revenue:           {}\n  Total Costs:             {}\n  Total Subsidy:           {}\n  Avg Subsidy per Partner: {}",
        last.year,
        format_currency(last.total_revenue),
        format_currency(last.total_costs),
        format_currency(last.total_subsidy),
        format_currency(last.avg_subsidy_per_partner),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ProjectionParams;
    use crate::projection::ProjectionEngine;

    fn reference_table() -> ProjectionTable {
        ProjectionEngine::default().project(&ProjectionParams::reference()).unwrap()
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1000.0), "$1,000");
        assert_eq!(format_currency(1_234_567.89), "$1,234,568");
        assert_eq!(format_currency(-50_000.0), "-$50,000");
        assert_eq!(format_currency(-0.2), "$0");
    }

    #[test]
    fn test_csv_headers_follow_product_order() {
        let headers = csv_headers(&reference_table());

        assert_eq!(headers.len(), 1 + 3 + 7);
        assert_eq!(headers[0], "Year");
        assert_eq!(headers[1], "B2B Research Revenue");
        assert_eq!(headers[2], "Events Revenue");
        assert_eq!(headers[3], "B2C Products Revenue");
        assert_eq!(headers[10], "Avg Subsidy per Partner");
    }

    #[test]
    fn test_csv_headers_unique() {
        let headers = csv_headers(&reference_table());
        let unique: std::collections::HashSet<_> = headers.iter().collect();
        assert_eq!(unique.len(), headers.len());
    }

    #[test]
    fn test_write_csv() {
        let mut buffer = Vec::new();
        write_csv(&reference_table(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("2025,200000.00,150000.00,100000.00,400000.00,100000.00,450000.00,500000.00,-50000.00,0.00,0.00"));
        assert!(lines[6].starts_with("2030,"));
    }

    #[test]
    fn test_break_even_text() {
        assert_eq!(break_even_text(&reference_table()), "Projected break-even year: 2026");

        let mut params = ProjectionParams::reference();
        params.staffing.num_employees = 50;
        let table = ProjectionEngine::default().project(&params).unwrap();
        assert_eq!(break_even_text(&table), "No break-even within the projection horizon");
    }

    #[test]
    fn test_key_metrics_text() {
        let text = key_metrics_text(&reference_table()).unwrap();
        assert!(text.starts_with("Key Metrics for 2030"));

        let empty = ProjectionEngine::new(ProjectionConfig {
            horizon: 0,
            ..Default::default()
        })
        .project(&ProjectionParams::reference())
        .unwrap();
        assert!(key_metrics_text(&empty).is_none());
    }

    #[test]
    fn test_json_report() {
        let table = reference_table();
        let config = ProjectionConfig::default();
        let json = ProjectionReport::new(&table, &config).to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["scenario"], "Most Likely");
        assert_eq!(value["records"].as_array().unwrap().len(), 6);
        assert_eq!(value["records"][0]["revenues"]["Events"], 150000.0);
        assert_eq!(value["summary"]["break_even_year"], 2026);
    }
}
