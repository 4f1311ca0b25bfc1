//! Summary command - totals across all purchases.

use std::path::Path;

use clap::Args;
use console::style;
use serde::Serialize;

use tempo_core::models::purchase::{Purchase, PurchaseSummary};
use tempo_core::receipt::rules::format_brl;
use tempo_core::storage::Storage;

use super::{ReportFormat, Session};

/// Arguments for the summary command.
#[derive(Args)]
pub struct SummaryArgs {
    /// Number of recent purchases to list
    #[arg(long, default_value = "5")]
    recent: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReportFormat,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryReport {
    #[serde(flatten)]
    summary: PurchaseSummary,
    recent: Vec<Purchase>,
}

pub async fn run(
    args: SummaryArgs,
    config_path: Option<&str>,
    data_path: Option<&Path>,
) -> anyhow::Result<()> {
    let mut session = Session::open(config_path, data_path)?;
    let user = session.user()?;

    // Storage returns newest first
    let purchases = session.storage.purchases_by_user(user.id)?;

    let report = SummaryReport {
        summary: PurchaseSummary::from_purchases(&purchases),
        recent: purchases.into_iter().take(args.recent).collect(),
    };

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => print_report(&report),
    }

    Ok(())
}

fn print_report(report: &SummaryReport) {
    let summary = &report.summary;

    println!("{}", style("Summary").bold().underlined());
    println!("  Purchases:   {}", summary.count);
    println!("  Total spent: {}", format_brl(summary.total_spent));
    println!(
        "  Total time:  {}",
        style(format!("{}h {}m", summary.total_time.hours, summary.total_time.minutes)).cyan()
    );

    if report.recent.is_empty() {
        return;
    }

    println!();
    println!("{}", style("Recent purchases").bold());
    for purchase in &report.recent {
        println!(
            "  #{:<4} {}  {:>12}  {:>8}  {}",
            purchase.id,
            purchase.created_at.format("%d/%m/%Y"),
            format_brl(purchase.value),
            purchase.work_time().to_string(),
            purchase.description.as_deref().unwrap_or(purchase.kind.label()),
        );
    }
}
