//! Convert command - express a value as work time.

use std::path::Path;

use clap::Args;
use console::style;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use tempo_core::models::profile::RateProfile;
use tempo_core::models::purchase::{NewPurchase, PurchaseKind};
use tempo_core::receipt::rules::format_brl;
use tempo_core::storage::Storage;
use tempo_core::worktime::WorkTime;

use super::{parse_amount, ReportFormat, Session};

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Value in BRL (e.g. 45,90)
    #[arg(value_parser = parse_amount)]
    value: Decimal,

    /// Monthly salary (overrides the stored profile)
    #[arg(long, value_parser = parse_amount)]
    salary: Option<Decimal>,

    /// Weekly work hours (overrides the stored profile)
    #[arg(long, value_parser = parse_amount)]
    hours: Option<Decimal>,

    /// Record the purchase in the history
    #[arg(long)]
    save: bool,

    /// Description for the saved purchase
    #[arg(short, long)]
    description: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReportFormat,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversionReport {
    value: Decimal,
    work_time: WorkTime,
    computable: bool,
    hourly_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    purchase_id: Option<u64>,
}

pub async fn run(
    args: ConvertArgs,
    config_path: Option<&str>,
    data_path: Option<&Path>,
) -> anyhow::Result<()> {
    // Explicit salary and hours need no stored profile
    let mut session = match (args.salary, args.hours) {
        (Some(_), Some(_)) if !args.save => None,
        _ => Some(Session::open(config_path, data_path)?),
    };

    let stored = match session.as_mut() {
        Some(session) => session.user()?.rate_profile(),
        None => RateProfile::default(),
    };

    let profile = RateProfile {
        monthly_salary: args.salary.or(stored.monthly_salary),
        weekly_hours: args.hours.or(stored.weekly_hours),
    };

    let conversion = profile.convert(args.value);

    let mut purchase_id = None;
    if args.save {
        if let Some(session) = session.as_mut() {
            if !conversion.computable {
                warn!("Saving purchase without work time: profile not configured");
            }

            let user = session.user()?;
            let purchase = session.storage.create_purchase(NewPurchase::from_work_time(
                user.id,
                args.value,
                &conversion.duration,
                PurchaseKind::Manual,
                args.description.clone(),
            ))?;
            purchase_id = Some(purchase.id);
        }
    }

    let report = ConversionReport {
        value: args.value,
        work_time: conversion.duration,
        computable: conversion.computable,
        hourly_rate: profile.hourly_rate().round_dp(2),
        purchase_id,
    };

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => print_report(&report),
    }

    Ok(())
}

fn print_report(report: &ConversionReport) {
    if report.computable {
        println!(
            "{} costs {} of work",
            style(format_brl(report.value)).bold(),
            style(report.work_time.to_string()).cyan().bold()
        );
        println!(
            "{} Hourly rate: {}",
            style("ℹ").blue(),
            format_brl(report.hourly_rate)
        );
    } else {
        print_profile_hint();
    }

    if let Some(id) = report.purchase_id {
        println!("{} Saved as purchase #{}", style("✓").green(), id);
    }
}

/// Shown instead of a zero duration when salary or hours are missing.
pub fn print_profile_hint() {
    println!(
        "{} Profile not configured. Run 'tempovale profile set --salary <S> --hours <H>' or pass --salary and --hours.",
        style("⚠").yellow()
    );
}
