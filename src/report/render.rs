//! Text and CSV rendering of finished reports.

use std::io::{self, Write};

use super::aggregator::Report;
use super::metric::Metric;

const INDENT: &str = "  ";

fn write_summary<M: Metric, W: Write>(
    out: &mut W,
    summary: &std::collections::BTreeMap<String, M>,
    depth: usize,
) -> io::Result<()> {
    let pad = INDENT.repeat(depth);
    writeln!(out, "{}Summary:", pad)?;
    for (category, metric) in summary {
        writeln!(out, "{}{}{}: {}", pad, INDENT, category, metric.summary())?;
        for line in metric.details() {
            writeln!(out, "{}{}{}{}", pad, INDENT, INDENT, line)?;
        }
    }
    Ok(())
}

/// Indented text: datacenter line, `Summary:` block, optional `Racks:` block.
pub fn render_text<M: Metric, W: Write>(report: &Report<M>, out: &mut W) -> io::Result<()> {
    if report.is_empty() {
        writeln!(out, "No matching records.")?;
        return Ok(());
    }

    let mut first = true;
    for (name, dc) in report.datacenters() {
        if !first {
            writeln!(out)?;
        }
        first = false;

        match dc.id() {
            Some(id) => writeln!(out, "{} ({})", name, id)?,
            None => writeln!(out, "{}", name)?,
        }
        write_summary(out, dc.summary(), 1)?;

        if dc.racks().is_empty() {
            continue;
        }
        writeln!(out, "{}Racks:", INDENT)?;
        for (rack_name, rack) in dc.racks() {
            match (rack.rack().id, rack.rack().role.as_deref()) {
                (Some(id), Some(role)) => writeln!(out, "{0}{0}{1} [{2}] ({3})", INDENT, rack_name, role, id)?,
                (Some(id), None) => writeln!(out, "{0}{0}{1} ({2})", INDENT, rack_name, id)?,
                _ => writeln!(out, "{0}{0}{1}", INDENT, rack_name)?,
            }
            write_summary(out, rack.summary(), 3)?;

            if !rack.failed_devices().is_empty() {
                writeln!(out, "{}Failed Devices:", INDENT.repeat(3))?;
                for (serial, entry) in rack.failed_devices() {
                    let mut line = format!("{}{}", INDENT.repeat(4), serial);
                    if let Some(platform) = &entry.platform {
                        line.push_str(&format!(" [{}]", platform));
                    }
                    if !entry.components.is_empty() {
                        line.push_str(&format!(" components: {}", entry.components.join(", ")));
                    }
                    writeln!(out, "{}", line)?;
                }
            }
        }
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn write_csv_row<W: Write>(out: &mut W, fields: &[String]) -> io::Result<()> {
    let row: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    writeln!(out, "{}", row.join(","))
}

/// CSV rows in text traversal order. Datacenter-level rows carry an empty rack column.
pub fn render_csv<M: Metric, W: Write>(report: &Report<M>, out: &mut W) -> io::Result<()> {
    let mut header: Vec<String> = ["datacenter", "datacenter_id", "rack", "category"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(M::CSV_COLUMNS.iter().map(|s| s.to_string()));
    write_csv_row(out, &header)?;

    for (name, dc) in report.datacenters() {
        let dc_id = dc.id().map(|id| id.to_string()).unwrap_or_default();
        for (category, metric) in dc.summary() {
            let mut row = vec![name.clone(), dc_id.clone(), String::new(), category.clone()];
            row.extend(metric.csv_fields());
            write_csv_row(out, &row)?;
        }
        for (rack_name, rack) in dc.racks() {
            for (category, metric) in rack.summary() {
                let mut row = vec![name.clone(), dc_id.clone(), rack_name.clone(), category.clone()];
                row.extend(metric.csv_fields());
                write_csv_row(out, &row)?;
            }
        }
    }
    Ok(())
}
