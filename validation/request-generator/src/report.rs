//! Run summary reporting.

use std::str::FromStr;

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};

use crate::format::g8;
use crate::stats::RunSummary;

/// How the run summary is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Table,
    Json,
    None,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            "none" => Ok(ReportFormat::None),
            other => Err(format!("unknown report format '{other}' (expected table, json or none)")),
        }
    }
}

/// Formats run summaries for output.
pub struct RunReport;

impl RunReport {
    /// Render in the requested format; `None` for [`ReportFormat::None`].
    pub fn render(summary: &RunSummary, format: ReportFormat) -> anyhow::Result<Option<String>> {
        Ok(match format {
            ReportFormat::Table => Some(Self::format_table(summary)),
            ReportFormat::Json => Some(Self::format_json(summary)?),
            ReportFormat::None => None,
        })
    }

    /// Format the summary as a console table.
    pub fn format_table(summary: &RunSummary) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec!["WMS Request Generation"]);

        table.add_row(vec![
            "Requests:",
            &format!("{} / {}", summary.accepted, summary.requested),
        ]);
        table.add_row(vec!["Candidates:", &summary.attempts.to_string()]);
        table.add_row(vec![
            "Acceptance Rate:",
            &format!("{:.1}%", summary.acceptance_rate),
        ]);

        table.add_row(vec!["", ""]);
        table.add_row(vec!["Rejected", "region / filter / transform"]);
        table.add_row(vec![
            "",
            &format!(
                "{} / {} / {}",
                summary.rejected_outside_region,
                summary.rejected_by_filter,
                summary.rejected_by_transform
            ),
        ]);

        table.add_row(vec!["", ""]);
        table.add_row(vec!["Pixels", "p50 / p90 / max"]);
        table.add_row(vec![
            "",
            &format!(
                "{} / {} / {}",
                summary.pixels_p50, summary.pixels_p90, summary.pixels_max
            ),
        ]);
        if let (Some(min), Some(max)) = (summary.resolution_min, summary.resolution_max) {
            table.add_row(vec!["Resolution:", &format!("{} .. {}", g8(min), g8(max))]);
        }

        table.add_row(vec!["", ""]);
        for (i, output) in summary.outputs.iter().enumerate() {
            let label = if i == 0 { "Output:" } else { "" };
            table.add_row(vec![label, output.as_str()]);
        }

        table.to_string()
    }

    /// Format the summary as JSON.
    pub fn format_json(summary: &RunSummary) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(summary)?)
    }
}
