//! Amount parsing and formatting for Brazilian receipts.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use super::patterns::CURRENCY_AMOUNT;
use super::{ExtractionMatch, FieldExtractor};

/// Fallback scanner over every currency-marked amount (`R$ 12,00`).
pub struct CurrencyAmountExtractor;

impl CurrencyAmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurrencyAmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CurrencyAmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    /// The largest positive amount in the text.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text)
            .into_iter()
            .max_by(|a, b| a.value.cmp(&b.value))
    }

    /// All positive amounts, in text order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in CURRENCY_AMOUNT.captures_iter(text) {
            let Some(value) = parse_receipt_amount(&caps[1]).filter(|v| *v > Decimal::ZERO) else {
                continue;
            };

            if let Some(full_match) = caps.get(0) {
                results.push(
                    ExtractionMatch::new(value, 0.5, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Parse a receipt amount token ("45,90", "45.90", "45").
///
/// The first comma becomes the decimal point. A dangling separator ("45,")
/// is dropped.
///
/// Returns `None` for tokens `Decimal` cannot hold (29 or more integer
/// digits). A label followed by such a token counts as a miss, and the
/// largest-amount fallback skips it as well.
pub fn parse_receipt_amount(token: &str) -> Option<Decimal> {
    let normalized = token.trim().replacen(',', ".", 1);
    let normalized = normalized.strip_suffix('.').unwrap_or(&normalized);

    if normalized.is_empty() {
        return None;
    }

    Decimal::from_str(normalized).ok()
}

/// Format amount in Brazilian style (R$ 1.234,56).
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };

    let s = format!("{:.2}", rounded.abs());
    let Some((integer_part, decimal_part)) = s.split_once('.') else {
        return format!("{}R$ {}", sign, s);
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{}R$ {},{}", sign, formatted, decimal_part)
}
