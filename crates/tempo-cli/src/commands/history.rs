//! History command - list, export and delete purchases.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use tempo_core::models::purchase::{HistoryQuery, Purchase, SortKey};
use tempo_core::receipt::rules::format_brl;
use tempo_core::storage::Storage;

use super::Session;

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    command: HistoryCommand,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List recorded purchases
    List(ListArgs),

    /// Delete a purchase
    Delete {
        /// Purchase id
        id: u64,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Only purchases whose description contains this text
    #[arg(short, long)]
    search: Option<String>,

    /// Sort order (date, value, time)
    #[arg(long, default_value = "date")]
    sort: SortKey,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ListFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ListFormat {
    /// Plain text table
    Text,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

pub async fn run(
    args: HistoryArgs,
    config_path: Option<&str>,
    data_path: Option<&Path>,
) -> anyhow::Result<()> {
    let mut session = Session::open(config_path, data_path)?;

    match args.command {
        HistoryCommand::List(list_args) => list(&mut session, list_args),
        HistoryCommand::Delete { id } => delete(&mut session, id),
    }
}

fn list(session: &mut Session, args: ListArgs) -> anyhow::Result<()> {
    let user = session.user()?;
    let purchases = session.storage.purchases_by_user(user.id)?;

    let mut query = HistoryQuery::new().with_sort(args.sort);
    if let Some(search) = args.search {
        query = query.with_search(search);
    }
    let purchases = query.apply(&purchases);

    let content = match args.format {
        ListFormat::Json => serde_json::to_string_pretty(&purchases)?,
        ListFormat::Csv => format_history_csv(&purchases)?,
        ListFormat::Text => format_history_text(&purchases),
    };

    match args.output {
        Some(path) => {
            fs::write(&path, content)?;
            println!(
                "{} Wrote {} purchases to {}",
                style("✓").green(),
                purchases.len(),
                path.display()
            );
        }
        None => print!("{}", content),
    }

    Ok(())
}

fn delete(session: &mut Session, id: u64) -> anyhow::Result<()> {
    let user = session.user()?;

    if !session.storage.delete_purchase(id, user.id)? {
        anyhow::bail!("Purchase #{} not found", id);
    }

    println!("{} Deleted purchase #{}", style("✓").green(), id);
    Ok(())
}

fn format_history_csv(purchases: &[Purchase]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["date", "description", "value", "work_time", "type"])?;

    for purchase in purchases {
        wtr.write_record([
            &purchase.created_at.format("%Y-%m-%d %H:%M").to_string(),
            purchase.description.as_deref().unwrap_or(""),
            &purchase.value.to_string(),
            &purchase.work_time().to_string(),
            purchase.kind.label(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_history_text(purchases: &[Purchase]) -> String {
    if purchases.is_empty() {
        return "No purchases recorded.\n".to_string();
    }

    let mut output = String::new();

    output.push_str(&format!(
        "{:>5}  {:<16}  {:>14}  {:>10}  {:<8}  {}\n",
        "ID", "Date", "Value", "Work time", "Type", "Description"
    ));

    for purchase in purchases {
        output.push_str(&format!(
            "{:>5}  {:<16}  {:>14}  {:>10}  {:<8}  {}\n",
            purchase.id,
            purchase.created_at.format("%d/%m/%Y %H:%M"),
            format_brl(purchase.value),
            purchase.work_time().to_string(),
            purchase.kind.label(),
            purchase.description.as_deref().unwrap_or("-"),
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use tempo_core::models::purchase::PurchaseKind;

    fn sample() -> Purchase {
        Purchase {
            id: 7,
            user_id: 1,
            value: Decimal::new(4590, 2),
            time_hours: 2,
            time_minutes: 16,
            image_url: None,
            description: Some("Mercado, centro".to_string()),
            kind: PurchaseKind::Ocr,
            created_at: Utc.with_ymd_and_hms(2024, 5, 10, 18, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_csv_quotes_descriptions() {
        let csv = format_history_csv(&[sample()]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("date,description,value,work_time,type"));
        assert_eq!(
            lines.next(),
            Some("2024-05-10 18:30,\"Mercado, centro\",45.90,2h 16m,Receipt")
        );
    }

    #[test]
    fn test_text_table() {
        let text = format_history_text(&[sample()]);
        assert!(text.contains("R$ 45,90"));
        assert!(text.contains("2h 16m"));
        assert_eq!(format_history_text(&[]), "No purchases recorded.\n");
    }
}
