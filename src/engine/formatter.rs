//! # engine::formatter
//!
//! Renders the watched / other summaries into the notification text:
//!
//! ```text
//! 2H WhaleTrades Summary:
//! $BTC: -1,500.00
//! $ETH: 60.00
//!
//! Others:
//! $SOL: 12,345.68
//! ```

use chrono::Duration;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Summary;

pub const OTHERS_HEADING: &str = "Others:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFormatter {
    heading: String,
}

impl SummaryFormatter {
    /// Heading reads `"<window> <account> Summary:"`.
    pub fn new(account: &str, lookback: Duration) -> Self {
        Self {
            heading: format!("{} {account} Summary:", window_label(lookback)),
        }
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn format(&self, watched: &[Summary], other: &[Summary]) -> String {
        format!(
            "{}\n{}\n\n{OTHERS_HEADING}\n{}",
            self.heading,
            render_lines(watched),
            render_lines(other),
        )
    }
}

fn render_lines(summaries: &[Summary]) -> String {
    summaries
        .iter()
        .map(|s| format!("{}: {}", s.symbol, format_amount(s.net_amount)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `"2H"` for whole hours, `"90M"` otherwise.
pub fn window_label(lookback: Duration) -> String {
    let minutes = lookback.num_minutes();
    if minutes > 0 && minutes % 60 == 0 {
        format!("{}H", minutes / 60)
    } else {
        format!("{minutes}M")
    }
}

/// Two decimal places, half away from zero, `,` between thousands.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }

    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
