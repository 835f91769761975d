//! # models::trade
//!
//! [`TradeRecord`] is the structured form of one trade post. Records are only
//! produced by the parser and never mutated afterwards.

use rust_decimal::Decimal;

/// Position side announced by the post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Resolves the captured position token. Anything carrying `SHORTED`
    /// is short; every other token that reached extraction is long.
    pub fn from_position_token(token: &str) -> Self {
        if token.contains("SHORTED") {
            Direction::Short
        } else {
            Direction::Long
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long  => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRecord {
    /// Non-negative notional in USD.
    pub amount:    Decimal,
    /// Canonical symbol, e.g. `"$BTC"`.
    pub symbol:    String,
    pub direction: Direction,
}

impl TradeRecord {
    /// Signed contribution to net exposure: shorts subtract, longs add.
    #[inline]
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Long  => self.amount,
            Direction::Short => -self.amount,
        }
    }
}
