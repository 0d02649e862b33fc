//! Plain-text receipt

use crate::config::Settings;
use crate::models::PaymentReceipt;

pub fn format_receipt(receipt: &PaymentReceipt, settings: &Settings) -> String {
    let rule = "-".repeat(44);
    let mut output = format!(
        "{}\nReceipt {}    {}\n{}\n",
        receipt.institution_name,
        receipt.receipt_number,
        receipt.issued_on.format(&settings.date_format),
        rule
    );
    output.push_str(&format!("Received from: {}\n\n", receipt.member_name));

    for line in &receipt.lines {
        output.push_str(&format!(
            "  {} {}  {:<18} {:>12}\n",
            line.month.short_name(),
            line.month.year,
            line.payment_type,
            settings.format_money(line.amount)
        ));
    }

    output.push_str(&format!(
        "{}\n  {:<27} {:>12}\n",
        rule,
        "Total",
        settings.format_money(receipt.total)
    ));
    if let Some(attachment) = &receipt.attachment {
        output.push_str(&format!("  Attachment: {}\n", attachment));
    }
    if !receipt.treasurer_name.is_empty() {
        output.push_str(&format!("\nTreasurer: {}", receipt.treasurer_name));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DuesMonth, Money, ReceiptLine};
    use chrono::NaiveDate;

    #[test]
    fn test_receipt_text() {
        let settings = Settings {
            currency_symbol: "Q".into(),
            ..Settings::default()
        };
        let receipt = PaymentReceipt {
            receipt_number: "TRE-000007".into(),
            issued_on: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            institution_name: "Lodge Harmony No. 7".into(),
            treasurer_name: "J. Boaz".into(),
            member_name: "Hiram Abif".into(),
            lines: vec![ReceiptLine::new(
                DuesMonth::new(2025, 7),
                Money::from_units(50),
                "regular",
            )],
            total: Money::from_units(50),
            attachment: None,
        };

        let output = format_receipt(&receipt, &settings);
        assert!(output.contains("Receipt TRE-000007"));
        assert!(output.contains("Jul 2025"));
        assert!(output.contains("Q50.00"));
        assert!(output.ends_with("Treasurer: J. Boaz"));
    }
}
