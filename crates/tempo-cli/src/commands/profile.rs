//! Profile command - salary and weekly hours of the local user.

use std::path::Path;

use clap::{Args, Subcommand};
use console::style;
use rust_decimal::Decimal;
use serde::Serialize;

use tempo_core::error::StorageError;
use tempo_core::models::profile::{ProfileUpdate, User};
use tempo_core::receipt::rules::format_brl;
use tempo_core::storage::Storage;

use super::{parse_amount, ReportFormat, Session};

/// Arguments for the profile command.
#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    command: ProfileCommand,
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Show the stored profile and derived rates
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Update salary, weekly hours or email
    Set(SetArgs),
}

#[derive(Args)]
struct SetArgs {
    /// Monthly salary in BRL
    #[arg(long, value_parser = parse_amount)]
    salary: Option<Decimal>,

    /// Weekly work hours
    #[arg(long, value_parser = parse_amount)]
    hours: Option<Decimal>,

    /// Contact email
    #[arg(long)]
    email: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileReport {
    #[serde(flatten)]
    user: User,
    configured: bool,
    hourly_rate: Decimal,
    daily_rate: Decimal,
}

impl ProfileReport {
    fn new(user: User) -> Self {
        let rates = user.rate_profile();
        Self {
            configured: rates.is_configured(),
            hourly_rate: rates.hourly_rate().round_dp(2),
            daily_rate: rates.daily_rate().round_dp(2),
            user,
        }
    }
}

pub async fn run(
    args: ProfileArgs,
    config_path: Option<&str>,
    data_path: Option<&Path>,
) -> anyhow::Result<()> {
    let mut session = Session::open(config_path, data_path)?;

    match args.command {
        ProfileCommand::Show { format } => show(&mut session, format),
        ProfileCommand::Set(set_args) => set(&mut session, set_args),
    }
}

fn show(session: &mut Session, format: ReportFormat) -> anyhow::Result<()> {
    let report = ProfileReport::new(session.user()?);

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => print_report(&report),
    }

    Ok(())
}

fn set(session: &mut Session, args: SetArgs) -> anyhow::Result<()> {
    let update = ProfileUpdate {
        email: args.email,
        monthly_salary: args.salary,
        weekly_hours: args.hours,
    };

    if update.is_empty() {
        anyhow::bail!("Nothing to update. Pass --salary, --hours or --email.");
    }

    let uid = session.user()?.uid;
    let user = session
        .storage
        .update_user(&uid, update)?
        .ok_or(StorageError::UserNotFound(uid))?;

    println!("{} Profile updated", style("✓").green());
    print_report(&ProfileReport::new(user));

    Ok(())
}

fn print_report(report: &ProfileReport) {
    let user = &report.user;
    let missing = || style("not set").yellow().to_string();

    println!("  User:           {} <{}>", user.uid, user.email);
    println!(
        "  Monthly salary: {}",
        user.monthly_salary.map(format_brl).unwrap_or_else(missing)
    );
    println!(
        "  Weekly hours:   {}",
        user.weekly_hours
            .map(|h| format!("{}h", h.normalize()))
            .unwrap_or_else(missing)
    );

    if report.configured {
        println!("  Hourly rate:    {}", format_brl(report.hourly_rate));
        println!("  Daily rate:     {}", format_brl(report.daily_rate));
    } else {
        println!();
        super::convert::print_profile_hint();
    }
}
