//! Regex patterns for Brazilian receipt totals.
//!
//! Every pattern captures the numeric token in group 1. Tokens are digits with
//! at most one `,` or `.` separator; thousands separators are not recognized.
//!
//! Labels are not anchored: OCR often glues a label to the preceding word
//! ("CUPOMTOTAL 45,90"). `TotalRule` filters out `total` preceded by `sub`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "TOTAL R$ 45,90", "Total: 45.90", "TOTAL GERAL R$ 55,00"
    pub static ref TOTAL_LABEL: Regex = Regex::new(
        r"(?i)total(?:\s+geral)?[:\s]*r?\$?\s*(\d+[,.]?\d*)"
    ).unwrap();

    // "VALOR TOTAL R$ 45,90", "ValorTotal 45,90"
    pub static ref VALOR_TOTAL_LABEL: Regex = Regex::new(
        r"(?i)valor\s*total[:\s]*r?\$?\s*(\d+[,.]?\d*)"
    ).unwrap();

    // "SUBTOTAL R$ 40,00"
    pub static ref SUBTOTAL_LABEL: Regex = Regex::new(
        r"(?i)subtotal[:\s]*r?\$?\s*(\d+[,.]?\d*)"
    ).unwrap();

    // "TOTALGERAL 55,00"
    pub static ref TOTAL_GERAL_LABEL: Regex = Regex::new(
        r"(?i)total\s*geral[:\s]*r?\$?\s*(\d+[,.]?\d*)"
    ).unwrap();

    // "R$ 45,90 TOTAL"
    pub static ref TRAILING_TOTAL: Regex = Regex::new(
        r"(?i)r?\$\s*(\d+[,.]?\d*)\s*total"
    ).unwrap();

    // Any currency-marked amount: "R$12,00", "$ 3.50"
    pub static ref CURRENCY_AMOUNT: Regex = Regex::new(
        r"(?i)r?\$\s*(\d+[,.]?\d*)"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_label_matches_glued_labels() {
        assert!(TOTAL_LABEL.is_match("Total: R$ 45,90"));
        assert!(TOTAL_LABEL.is_match("TOTAL GERAL R$ 55,00"));
        assert_eq!(&TOTAL_LABEL.captures("CUPOMTOTAL 45,90").unwrap()[1], "45,90");
        assert_eq!(&TOTAL_GERAL_LABEL.captures("TOTALGERAL 55,00").unwrap()[1], "55,00");
    }

    #[test]
    fn test_currency_amount_requires_dollar_sign() {
        assert!(CURRENCY_AMOUNT.is_match("R$12,00"));
        assert!(CURRENCY_AMOUNT.is_match("r$ 7"));
        assert!(!CURRENCY_AMOUNT.is_match("12,00"));
    }

    #[test]
    fn test_trailing_total() {
        let caps = TRAILING_TOTAL.captures("R$ 30,00 total").unwrap();
        assert_eq!(&caps[1], "30,00");
    }
}
