//! WASM bindings for TempoVale.
//!
//! Exposes work-time conversion and receipt total extraction to browsers and
//! Node.js. Amounts cross the boundary as `f64`; non-finite numbers count as
//! missing values.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use tempo_core::receipt::rules::format_brl;
use tempo_core::receipt::ReceiptTotalExtractor;
use tempo_core::worktime::{self, WorkTime};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_decimal(value: f64) -> Option<Decimal> {
    if value.is_finite() {
        Decimal::from_f64(value)
    } else {
        None
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Work time needed to pay `value` with the given salary and weekly hours.
///
/// Returns `{ hours, minutes, totalMinutes }`, all zero when the profile is
/// incomplete.
#[wasm_bindgen]
pub fn calculate_work_time(
    value: f64,
    monthly_salary: Option<f64>,
    weekly_hours: Option<f64>,
) -> Result<JsValue, JsValue> {
    let duration = work_time(value, monthly_salary, weekly_hours);

    serde_wasm_bindgen::to_value(&duration).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn work_time(value: f64, monthly_salary: Option<f64>, weekly_hours: Option<f64>) -> WorkTime {
    worktime::convert(
        to_decimal(value).unwrap_or(Decimal::ZERO),
        monthly_salary.and_then(to_decimal),
        weekly_hours.and_then(to_decimal),
    )
}

/// Format hours and minutes as "2h 15m".
#[wasm_bindgen]
pub fn format_work_time(hours: u32, minutes: u32) -> String {
    let hours = u64::from(hours);
    worktime::format_work_time(&WorkTime {
        hours,
        minutes,
        total_minutes: hours * 60 + u64::from(minutes),
    })
}

/// Hourly rate for a salary and weekly hours, 0 if either is missing.
#[wasm_bindgen]
pub fn hourly_rate(monthly_salary: Option<f64>, weekly_hours: Option<f64>) -> f64 {
    to_f64(worktime::hourly_rate(
        monthly_salary.and_then(to_decimal),
        weekly_hours.and_then(to_decimal),
    ))
}

/// Daily rate (a seventh of the weekly hours), 0 if either input is missing.
#[wasm_bindgen]
pub fn daily_rate(monthly_salary: Option<f64>, weekly_hours: Option<f64>) -> f64 {
    to_f64(worktime::daily_rate(
        monthly_salary.and_then(to_decimal),
        weekly_hours.and_then(to_decimal),
    ))
}

/// Total amount found in OCR text, 0 if none.
#[wasm_bindgen]
pub fn extract_total(text: &str) -> f64 {
    to_f64(tempo_core::receipt::extract_total(text))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptAnalysis {
    raw_text: String,
    total_value: f64,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_text: Option<String>,
}

fn analyze(text: &str) -> ReceiptAnalysis {
    let result = ReceiptTotalExtractor::new().build_result(text);

    ReceiptAnalysis {
        total_value: to_f64(result.total_value),
        success: result.success,
        rule: result.matched.as_ref().map(|m| m.rule.to_string()),
        matched_text: result.matched.map(|m| m.found.source),
        raw_text: result.raw_text,
    }
}

/// Full extraction result: `{ rawText, totalValue, success, rule?, matchedText? }`.
#[wasm_bindgen]
pub fn analyze_receipt_text(text: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&analyze(text)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Format an amount in BRL ("R$ 1.234,56").
#[wasm_bindgen]
pub fn format_currency(amount: f64) -> String {
    format_brl(to_decimal(amount).unwrap_or(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_work_time() {
        let duration = work_time(100.0, Some(3500.0), Some(40.0));
        assert_eq!(duration.hours, 4);
        assert_eq!(duration.minutes, 57);
        assert_eq!(duration.total_minutes, 297);

        assert_eq!(work_time(100.0, None, Some(40.0)), WorkTime::ZERO);
        assert_eq!(work_time(f64::NAN, Some(3500.0), Some(40.0)), WorkTime::ZERO);
    }

    #[wasm_bindgen_test]
    fn test_rates() {
        assert!((hourly_rate(Some(3500.0), Some(40.0)) - 20.2079).abs() < 0.001);
        assert_eq!(hourly_rate(Some(3500.0), Some(f64::INFINITY)), 0.0);
        assert_eq!(daily_rate(None, Some(40.0)), 0.0);
    }

    #[wasm_bindgen_test]
    fn test_extract_total() {
        assert!((extract_total("TOTAL R$ 45,90") - 45.9).abs() < 0.001);
        assert_eq!(extract_total(""), 0.0);

        let analysis = analyze("Subtotal R$10,00 \n Total Geral R$ 55,00");
        assert!(analysis.success);
        assert!((analysis.total_value - 55.0).abs() < 0.001);
    }

    #[wasm_bindgen_test]
    fn test_formatting() {
        assert_eq!(format_work_time(2, 15), "2h 15m");
        assert_eq!(format_work_time(0, 0), "0m");
        assert_eq!(format_currency(1234.56), "R$ 1.234,56");
    }
}
