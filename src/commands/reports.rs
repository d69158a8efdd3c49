//! Report commands: build the aggregated report and print it.

use std::io::{self, Write};

use anyhow::Result;
use uuid::Uuid;

use crate::api::ConchApi;
use crate::app::cli::ReportScope;
use crate::app::output::print_json;
use crate::report::failure::{failure_report, FailureOptions};
use crate::report::health_summary::health_summary;
use crate::report::mbo::{load_batch_file, mbo_hardware_failure};
use crate::report::render::{render_csv, render_text};
use crate::report::{AggregateOptions, Metric, Report};

/// How a finished report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    /// `--json` wins over `--csv`.
    pub fn pick(json: bool, csv: bool) -> Self {
        if json {
            ReportFormat::Json
        } else if csv {
            ReportFormat::Csv
        } else {
            ReportFormat::Text
        }
    }
}

impl From<&ReportScope> for AggregateOptions {
    fn from(scope: &ReportScope) -> Self {
        AggregateOptions {
            breakout: scope.breakout,
            datacenter: scope.datacenter,
            ..Default::default()
        }
    }
}

pub fn write_report<M: Metric, W: Write>(report: &Report<M>, format: ReportFormat, out: &mut W) -> Result<()> {
    match format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        ReportFormat::Csv => render_csv(report, out)?,
        ReportFormat::Text => render_text(report, out)?,
    }
    Ok(())
}

fn print_report<M: Metric>(report: &Report<M>, format: ReportFormat) -> Result<()> {
    if format == ReportFormat::Json {
        return print_json(report);
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(report, format, &mut out)?;
    out.flush()?;
    Ok(())
}

pub async fn health(api: &dyn ConchApi, workspace: Uuid, scope: &ReportScope, json: bool) -> Result<()> {
    let report = health_summary(api, workspace, scope.into()).await?;
    print_report(&report, ReportFormat::pick(json, false))
}

pub async fn failure(
    api: &dyn ConchApi,
    workspace: Uuid,
    scope: &ReportScope,
    options: FailureOptions,
    json: bool,
) -> Result<()> {
    let options = FailureOptions {
        aggregate: scope.into(),
        ..options
    };
    let report = failure_report(api, workspace, &options).await?;
    print_report(&report, ReportFormat::pick(json, false))
}

pub async fn mbo(api: &dyn ConchApi, file: &std::path::Path, scope: &ReportScope, csv: bool, json: bool) -> Result<()> {
    let batch = load_batch_file(file).await?;
    let report = mbo_hardware_failure(api, &batch, scope.into()).await?;
    print_report(&report, ReportFormat::pick(json, csv))
}
