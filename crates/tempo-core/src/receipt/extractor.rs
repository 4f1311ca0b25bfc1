//! Receipt total extractor: ordered labeled rules, then a largest-amount fallback.

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::rules::{CurrencyAmountExtractor, FieldExtractor, TotalRule, TotalRuleKind};
use super::{ExtractionResult, TotalMatch};

/// Locates the total on OCR text of a Brazilian retail receipt.
#[derive(Debug, Clone)]
pub struct ReceiptTotalExtractor {
    /// Labeled rules, highest priority first.
    rules: Vec<TotalRule>,
    /// Whether to scan for the largest amount when no rule matches.
    fallback: bool,
}

impl ReceiptTotalExtractor {
    /// Create an extractor with the standard rule set and fallback enabled.
    pub fn new() -> Self {
        Self {
            rules: TotalRule::standard(),
            fallback: true,
        }
    }

    /// Replace the labeled rules.
    pub fn with_rules(mut self, rules: Vec<TotalRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Enable or disable the largest-amount fallback.
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Find the total and the rule that produced it.
    ///
    /// The first rule in priority order whose first occurrence parses to a
    /// positive amount wins, regardless of where other labels sit in the text.
    pub fn find_total(&self, text: &str) -> Option<TotalMatch> {
        if text.trim().is_empty() {
            return None;
        }

        for rule in &self.rules {
            if let Some(found) = rule.extract(text) {
                debug!("Rule '{}' matched '{}' -> {}", rule.kind(), found.source, found.value);
                return Some(TotalMatch {
                    rule: rule.kind(),
                    found,
                });
            }
        }

        if !self.fallback {
            return None;
        }

        let found = CurrencyAmountExtractor::new().extract(text)?;
        debug!("No labeled total, using largest amount {}", found.value);
        Some(TotalMatch {
            rule: TotalRuleKind::LargestAmount,
            found,
        })
    }

    /// The most likely total, or zero when nothing plausible is found.
    pub fn extract_total(&self, text: &str) -> Decimal {
        self.find_total(text)
            .map(|m| m.found.value)
            .unwrap_or(Decimal::ZERO)
    }

    /// Wrap the extraction with the raw text and a success flag.
    pub fn build_result(&self, raw_text: &str) -> ExtractionResult {
        info!("Extracting receipt total from {} characters of text", raw_text.len());

        let matched = self.find_total(raw_text);
        let total_value = matched
            .as_ref()
            .map(|m| m.found.value)
            .unwrap_or(Decimal::ZERO);

        ExtractionResult {
            raw_text: raw_text.to_string(),
            total_value,
            success: total_value > Decimal::ZERO,
            matched,
        }
    }
}

impl Default for ReceiptTotalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_labeled_total() {
        let extractor = ReceiptTotalExtractor::new();
        assert_eq!(extractor.extract_total("Total: R$ 45,90"), d("45.90"));
    }

    #[test]
    fn test_total_beats_subtotal_regardless_of_position() {
        let extractor = ReceiptTotalExtractor::new();
        let text = "Subtotal R$10,00 \n Total Geral R$ 55,00";

        let found = extractor.find_total(text).unwrap();
        assert_eq!(found.found.value, d("55.00"));
        assert_eq!(found.rule, TotalRuleKind::Total);
    }

    #[test]
    fn test_total_geral_alone() {
        let extractor = ReceiptTotalExtractor::new();
        assert_eq!(extractor.extract_total("TOTAL GERAL R$ 55,00"), d("55.00"));
    }

    #[test]
    fn test_glued_total_geral_label() {
        let extractor = ReceiptTotalExtractor::new();

        let found = extractor.find_total("TOTALGERAL 55,00").unwrap();
        assert_eq!(found.found.value, d("55.00"));
        assert_eq!(found.rule, TotalRuleKind::TotalGeral);
    }

    #[test]
    fn test_label_glued_to_previous_word() {
        let extractor = ReceiptTotalExtractor::new();

        let found = extractor.find_total("CUPOMTOTAL 45,90").unwrap();
        assert_eq!(found.found.value, d("45.90"));
        assert_eq!(found.rule, TotalRuleKind::Total);

        assert_eq!(extractor.extract_total("2TOTAL: 45,90"), d("45.90"));
    }

    #[test]
    fn test_subtotal_alone() {
        let extractor = ReceiptTotalExtractor::new();

        let found = extractor.find_total("Subtotal R$ 10,00").unwrap();
        assert_eq!(found.found.value, d("10.00"));
        assert_eq!(found.rule, TotalRuleKind::Subtotal);
    }

    #[test]
    fn test_item_count_line_is_skipped() {
        let extractor = ReceiptTotalExtractor::new();
        let text = "QTD. TOTAL DE ITENS 3\nVALOR TOTAL R$ 87,35\nDINHEIRO R$ 100,00";

        let found = extractor.find_total(text).unwrap();
        assert_eq!(found.found.value, d("87.35"));
        assert_eq!(found.rule, TotalRuleKind::Total);
    }

    #[test]
    fn test_valor_total_after_empty_total() {
        let extractor = ReceiptTotalExtractor::new();
        let text = "TOTAL: 0,00\nVALOR TOTAL R$ 5,00";

        let found = extractor.find_total(text).unwrap();
        assert_eq!(found.found.value, d("5.00"));
        assert_eq!(found.rule, TotalRuleKind::ValorTotal);
    }

    #[test]
    fn test_subtotal_when_no_total() {
        let extractor = ReceiptTotalExtractor::new();
        let text = "SUBTOTAL: 40,00\nDESCONTO R$ 5,00";

        let found = extractor.find_total(text).unwrap();
        assert_eq!(found.found.value, d("40.00"));
        assert_eq!(found.rule, TotalRuleKind::Subtotal);
    }

    #[test]
    fn test_trailing_total() {
        let extractor = ReceiptTotalExtractor::new();
        let found = extractor.find_total("pago R$ 30,00 total").unwrap();

        assert_eq!(found.found.value, d("30.00"));
        assert_eq!(found.rule, TotalRuleKind::TrailingTotal);
    }

    #[test]
    fn test_zero_total_falls_through() {
        let extractor = ReceiptTotalExtractor::new();
        let text = "TOTAL: 0,00\nSUBTOTAL R$ 19,90";

        let found = extractor.find_total(text).unwrap();
        assert_eq!(found.found.value, d("19.90"));
        assert_eq!(found.rule, TotalRuleKind::Subtotal);
    }

    #[test]
    fn test_fallback_picks_largest() {
        let extractor = ReceiptTotalExtractor::new();
        let text = "item A R$12,00 item B R$99,50";

        let found = extractor.find_total(text).unwrap();
        assert_eq!(found.found.value, d("99.50"));
        assert_eq!(found.rule, TotalRuleKind::LargestAmount);
    }

    #[test]
    fn test_fallback_disabled() {
        let extractor = ReceiptTotalExtractor::new().with_fallback(false);
        assert_eq!(extractor.extract_total("item A R$12,00 item B R$99,50"), Decimal::ZERO);
    }

    #[test]
    fn test_custom_rules() {
        let extractor = ReceiptTotalExtractor::new().with_rules(vec![TotalRule::new(
            TotalRuleKind::Subtotal,
            &crate::receipt::rules::SUBTOTAL_LABEL,
        )]);

        // The "total" rule is gone, so the subtotal wins.
        let text = "Subtotal R$10,00 \n Total Geral R$ 55,00";
        assert_eq!(extractor.extract_total(text), d("10.00"));
    }

    #[test]
    fn test_nothing_found() {
        let extractor = ReceiptTotalExtractor::new();
        assert_eq!(extractor.extract_total("no numbers here"), Decimal::ZERO);
        assert_eq!(extractor.extract_total(""), Decimal::ZERO);
        assert_eq!(extractor.extract_total("   \n\t "), Decimal::ZERO);
        assert_eq!(extractor.extract_total("R$ 0,00"), Decimal::ZERO);
    }

    #[test]
    fn test_build_result() {
        let extractor = ReceiptTotalExtractor::new();

        let failed = extractor.build_result("no numbers here");
        assert!(!failed.success);
        assert_eq!(failed.total_value, Decimal::ZERO);
        assert_eq!(failed.raw_text, "no numbers here");
        assert!(failed.matched.is_none());

        let ok = extractor.build_result("Total: R$ 45,90");
        assert!(ok.success);
        assert_eq!(ok.total_value, d("45.90"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = ReceiptTotalExtractor::new();
        let text = "MERCADO\nARROZ R$ 22,90\nFEIJAO R$ 8,49\nTOTAL R$ 31,39";

        assert_eq!(extractor.extract_total(text), extractor.extract_total(text));
        assert_eq!(extractor.extract_total(text), d("31.39"));
    }
}
