//! Rule-based total extractors for Brazilian receipts.

pub mod amounts;
pub mod patterns;

pub use amounts::{format_brl, parse_receipt_amount, CurrencyAmountExtractor};
pub use patterns::*;

use std::fmt;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Which rule located a receipt total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalRuleKind {
    /// "Total" (optionally "Total Geral").
    Total,
    /// "Valor Total".
    ValorTotal,
    /// "Subtotal".
    Subtotal,
    /// "Total Geral".
    TotalGeral,
    /// "R$ <amount> Total".
    TrailingTotal,
    /// No label matched; largest currency amount.
    LargestAmount,
}

impl fmt::Display for TotalRuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Total => "total",
            Self::ValorTotal => "valor total",
            Self::Subtotal => "subtotal",
            Self::TotalGeral => "total geral",
            Self::TrailingTotal => "<amount> total",
            Self::LargestAmount => "largest amount",
        };
        f.write_str(name)
    }
}

/// A labeled pattern that locates a total.
#[derive(Debug, Clone, Copy)]
pub struct TotalRule {
    kind: TotalRuleKind,
    pattern: &'static Regex,
    /// Matches directly preceded by this prefix (ASCII case-insensitive) are skipped.
    not_after: Option<&'static str>,
}

impl TotalRule {
    pub fn new(kind: TotalRuleKind, pattern: &'static Regex) -> Self {
        Self {
            kind,
            pattern,
            not_after: None,
        }
    }

    /// Skip matches that directly follow `prefix`, e.g. `sub` before `total`.
    pub fn not_after(mut self, prefix: &'static str) -> Self {
        self.not_after = Some(prefix);
        self
    }

    pub fn kind(&self) -> TotalRuleKind {
        self.kind
    }

    /// Labeled rules in priority order.
    pub fn standard() -> Vec<TotalRule> {
        vec![
            TotalRule::new(TotalRuleKind::Total, &TOTAL_LABEL).not_after("sub"),
            TotalRule::new(TotalRuleKind::ValorTotal, &VALOR_TOTAL_LABEL),
            TotalRule::new(TotalRuleKind::Subtotal, &SUBTOTAL_LABEL),
            TotalRule::new(TotalRuleKind::TotalGeral, &TOTAL_GERAL_LABEL).not_after("sub"),
            TotalRule::new(TotalRuleKind::TrailingTotal, &TRAILING_TOTAL),
        ]
    }

    fn is_excluded(&self, text: &str, start: usize) -> bool {
        let Some(prefix) = self.not_after else {
            return false;
        };

        start
            .checked_sub(prefix.len())
            .and_then(|from| text.as_bytes().get(from..start))
            .is_some_and(|before| before.eq_ignore_ascii_case(prefix.as_bytes()))
    }

    /// Occurrences of the pattern that survive the prefix filter.
    fn candidates<'t>(&'t self, text: &'t str) -> impl Iterator<Item = regex::Captures<'t>> + 't {
        self.pattern
            .captures_iter(text)
            .filter(move |caps| caps.get(0).is_some_and(|m| !self.is_excluded(text, m.start())))
    }

    fn to_match(&self, caps: &regex::Captures<'_>) -> Option<ExtractionMatch<Decimal>> {
        let value = parse_receipt_amount(caps.get(1)?.as_str())?;
        if value <= Decimal::ZERO {
            return None;
        }

        let full_match = caps.get(0)?;
        Some(
            ExtractionMatch::new(value, 0.95, full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    }
}

impl FieldExtractor for TotalRule {
    type Output = ExtractionMatch<Decimal>;

    /// Only the first occurrence is considered; a zero or unparsable amount
    /// there is a miss even if later occurrences would parse.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = self.candidates(text).next()?;
        self.to_match(&caps)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.candidates(text)
            .filter_map(|caps| self.to_match(&caps))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_standard_rule_order() {
        let kinds: Vec<TotalRuleKind> = TotalRule::standard().iter().map(|r| r.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TotalRuleKind::Total,
                TotalRuleKind::ValorTotal,
                TotalRuleKind::Subtotal,
                TotalRuleKind::TotalGeral,
                TotalRuleKind::TrailingTotal,
            ]
        );
    }

    #[test]
    fn test_rule_uses_first_occurrence_only() {
        let rule = TotalRule::new(TotalRuleKind::Total, &TOTAL_LABEL);

        assert!(rule.extract("Total: 0,00\nTotal: 12,00").is_none());
        assert_eq!(rule.extract_all("Total: 0,00\nTotal: 12,00").len(), 1);
    }

    #[test]
    fn test_total_rule_skips_subtotal() {
        let rule = TotalRule::new(TotalRuleKind::Total, &TOTAL_LABEL).not_after("sub");

        assert!(rule.extract("SubTotal R$ 10,00").is_none());
        let found = rule.extract("Subtotal R$10,00 \n Total Geral R$ 55,00").unwrap();
        assert_eq!(found.value, Decimal::from_str("55.00").unwrap());

        // Only "sub" is excluded, other glued prefixes are kept
        let glued = rule.extract("CUPOMTOTAL 45,90").unwrap();
        assert_eq!(glued.value, Decimal::from_str("45.90").unwrap());
        assert_eq!(glued.position, Some((5, 16)));
    }

    #[test]
    fn test_rule_match_metadata() {
        let rule = TotalRule::new(TotalRuleKind::Subtotal, &SUBTOTAL_LABEL);
        let found = rule.extract("SUBTOTAL: R$ 40,00").unwrap();

        assert_eq!(found.value, Decimal::from_str("40.00").unwrap());
        assert_eq!(found.source, "SUBTOTAL: R$ 40,00");
        assert_eq!(found.position, Some((0, 18)));
        assert!(found.confidence > 0.9);
    }
}
