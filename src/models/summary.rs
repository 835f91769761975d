//! # models::summary
//!
//! Aggregation inputs and outputs: the configured [`Watchlist`] and the
//! per-symbol [`Summary`] rows.

use std::collections::HashSet;

use rust_decimal::Decimal;

/// Net exposure of one symbol inside a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub symbol:     String,
    pub net_amount: Decimal,
}

/// Symbols whose exposure is reported in the watched section.
///
/// Built from the configured order but only used for membership, so
/// duplicates collapse. An empty watchlist is valid and classifies every
/// symbol as "other".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    symbols: HashSet<String>,
}

impl Watchlist {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let watchlist = Watchlist::new(["$BTC", "$ETH", "$BTC"]);
        assert_eq!(watchlist.len(), 2);
        assert!(watchlist.contains("$BTC"));
        assert!(!watchlist.contains("$SOL"));
    }

    #[test]
    fn test_membership_is_case_sensitive() {
        let watchlist = Watchlist::new(["$BTC"]);
        assert!(!watchlist.contains("$btc"));
    }
}
