//! Receipt total extraction from OCR text.

mod extractor;
pub mod rules;

pub use extractor::ReceiptTotalExtractor;
pub use rules::TotalRuleKind;

use rust_decimal::Decimal;
use serde::Serialize;

use rules::ExtractionMatch;

/// A located total and the rule that found it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalMatch {
    pub rule: TotalRuleKind,
    #[serde(flatten)]
    pub found: ExtractionMatch<Decimal>,
}

/// Result of analysing receipt text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Text as returned by OCR.
    pub raw_text: String,
    /// Extracted total, zero when nothing was found.
    pub total_value: Decimal,
    /// `total_value > 0`. A failure means the user should enter the value manually.
    pub success: bool,
    /// How the total was located.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<TotalMatch>,
}

/// Extract the most likely total with the standard rules.
pub fn extract_total(text: &str) -> Decimal {
    ReceiptTotalExtractor::new().extract_total(text)
}

/// Analyse receipt text with the standard rules.
pub fn build_result(raw_text: &str) -> ExtractionResult {
    ReceiptTotalExtractor::new().build_result(raw_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_extract_total_examples() {
        assert_eq!(extract_total("Total: R$ 45,90"), Decimal::from_str("45.90").unwrap());
        assert_eq!(
            extract_total("Subtotal R$10,00 \n Total Geral R$ 55,00"),
            Decimal::from_str("55.00").unwrap()
        );
        assert_eq!(
            extract_total("item A R$12,00 item B R$99,50"),
            Decimal::from_str("99.50").unwrap()
        );
        assert_eq!(extract_total("no numbers here"), Decimal::ZERO);
    }

    #[test]
    fn test_build_result_failure() {
        let result = build_result("no numbers here");
        assert!(!result.success);
        assert_eq!(result.total_value, Decimal::ZERO);
    }

    #[test]
    fn test_result_json_shape() {
        let json = serde_json::to_value(build_result("Total: R$ 45,90")).unwrap();

        assert_eq!(json["rawText"], "Total: R$ 45,90");
        assert_eq!(json["success"], true);
        assert_eq!(json["matched"]["rule"], "total");
        assert_eq!(json["matched"]["source"], "Total: R$ 45,90");

        let json = serde_json::to_value(build_result("nothing")).unwrap();
        assert!(json.get("matched").is_none());
    }
}
