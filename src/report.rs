//! Plain-text readouts for the command line.

use std::fmt::Write;

use crate::aggregate::grand_total;
use crate::range::DateWindow;
use crate::types::{CategoryTotal, Series};
use crate::utils::{NumberFormatOptions, format_total};

/// Category totals as an aligned two-column table with a trailing total.
pub fn format_totals_table(
    totals: &[CategoryTotal],
    window: Option<&DateWindow>,
    options: &NumberFormatOptions,
) -> String {
    let rows: Vec<(&str, String)> = totals
        .iter()
        .map(|t| (t.key.as_str(), format_total(t.value, options)))
        .collect();
    let total = format_total(grand_total(totals), options);

    let key_width = rows
        .iter()
        .map(|(k, _)| k.len())
        .chain(std::iter::once("total".len()))
        .max()
        .unwrap_or(0);
    let value_width = rows
        .iter()
        .map(|(_, v)| v.len())
        .chain(std::iter::once(total.len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    if let Some(window) = window {
        let _ = writeln!(out, "{} to {}", window.start, window.end);
    }
    for (key, value) in &rows {
        let _ = writeln!(out, "{key:<key_width$}  {value:>value_width$}");
    }
    let _ = writeln!(out, "{}", "-".repeat(key_width + 2 + value_width));
    let _ = write!(out, "{:<key_width$}  {total:>value_width$}", "total");
    out
}

/// One line per series: type, point count and peak day.
pub fn format_series_summary(series: &[Series], options: &NumberFormatOptions) -> String {
    let mut out = String::new();
    for line in series {
        let peak = line
            .points
            .iter()
            .max_by(|a, b| a.total.total_cmp(&b.total));
        match peak {
            Some(peak) if peak.total > 0.0 => {
                let _ = writeln!(
                    out,
                    "{}: {} points, peak {} on {}",
                    line.kind,
                    line.points.len(),
                    format_total(peak.total, options),
                    peak.day
                );
            }
            _ => {
                let _ = writeln!(out, "{}: no activity", line.kind);
            }
        }
    }
    out.truncate(out.trim_end().len());
    out
}
