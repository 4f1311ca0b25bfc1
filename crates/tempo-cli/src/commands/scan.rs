//! Scan command - find the total on a receipt and convert it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use tempo_core::models::config::OcrConfig;
use tempo_core::models::purchase::{NewPurchase, PurchaseKind};
use tempo_core::ocr::OcrImage;
use tempo_core::receipt::rules::format_brl;
use tempo_core::receipt::{ExtractionResult, ReceiptTotalExtractor};
use tempo_core::storage::Storage;
use tempo_core::worktime::WorkTimeConversion;

use super::convert::print_profile_hint;
use super::{ReportFormat, Session};
use crate::ocr_space::OcrSpaceClient;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Receipt image (png, jpg, jpeg, gif, bmp, webp) or a .txt file with OCR text
    #[arg(required = true)]
    input: PathBuf,

    /// Record the purchase in the history
    #[arg(long)]
    save: bool,

    /// Description for the saved purchase
    #[arg(short, long, default_value = "Receipt")]
    description: String,

    /// Show the recognized text
    #[arg(long)]
    show_text: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReportFormat,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanReport<'a> {
    extraction: &'a ExtractionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversion: Option<WorkTimeConversion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purchase_id: Option<u64>,
}

pub async fn run(
    args: ScanArgs,
    config_path: Option<&str>,
    data_path: Option<&Path>,
) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let mut session = Session::open(config_path, data_path)?;

    let text = read_receipt_text(&args.input, &session.config.ocr).await?;
    let extraction = ReceiptTotalExtractor::new().build_result(&text);

    let mut conversion = None;
    let mut purchase_id = None;

    if extraction.success {
        let user = session.user()?;
        let converted = user.rate_profile().convert(extraction.total_value);

        if args.save {
            if !converted.computable {
                warn!("Saving purchase without work time: profile not configured");
            }

            let purchase = session.storage.create_purchase(NewPurchase::from_work_time(
                user.id,
                extraction.total_value,
                &converted.duration,
                PurchaseKind::Ocr,
                Some(args.description.clone()),
            ))?;
            purchase_id = Some(purchase.id);
        }

        conversion = Some(converted);
    } else if args.save {
        anyhow::bail!(
            "No total found on the receipt. Enter it manually with 'tempovale convert <VALUE> --save'."
        );
    }

    let report = ScanReport {
        extraction: &extraction,
        conversion,
        purchase_id,
    };

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => print_report(&report, args.show_text),
    }

    Ok(())
}

/// Text files are taken as OCR output; images go through the OCR service.
async fn read_receipt_text(input: &Path, config: &OcrConfig) -> anyhow::Result<String> {
    let is_text = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));

    if is_text {
        info!("Reading OCR text from {}", input.display());
        return Ok(fs::read_to_string(input)?);
    }

    let image = OcrImage::from_path(input)?;
    let client = OcrSpaceClient::new(config)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Running OCR...");

    let result = client.recognize(&image).await;
    pb.finish_and_clear();

    result
}

fn print_report(report: &ScanReport<'_>, show_text: bool) {
    let extraction = report.extraction;

    if show_text {
        println!("{}", style("Recognized text:").bold());
        for line in extraction.raw_text.lines() {
            println!("  {}", line);
        }
        println!();
    }

    if !extraction.success {
        println!(
            "{} No total found on the receipt. Enter the value manually with 'tempovale convert <VALUE>'.",
            style("✗").red()
        );
        return;
    }

    let how = extraction
        .matched
        .as_ref()
        .map(|m| m.rule.to_string())
        .unwrap_or_default();
    println!(
        "{} Total: {} ({})",
        style("✓").green(),
        style(format_brl(extraction.total_value)).bold(),
        style(how).dim()
    );

    match &report.conversion {
        Some(conversion) if conversion.computable => println!(
            "{} Work time: {}",
            style("ℹ").blue(),
            style(conversion.duration.to_string()).cyan().bold()
        ),
        _ => print_profile_hint(),
    }

    if let Some(id) = report.purchase_id {
        println!("{} Saved as purchase #{}", style("✓").green(), id);
    }
}
