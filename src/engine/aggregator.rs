//! # engine::aggregator
//!
//! Folds trade records into per-symbol net exposure, split into the watched
//! group and everything else.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::AggregateError;
use crate::models::{Summary, TradeRecord, Watchlist};

/// Result of one aggregation call. A symbol lands in exactly one group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub watched: Vec<Summary>,
    pub other:   Vec<Summary>,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.watched.is_empty() && self.other.is_empty()
    }
}

/// Sums signed contributions per symbol. Shorts subtract, longs add.
///
/// Groups are keyed by symbol, so entries come out sorted by symbol. A net
/// total that leaves the decimal range fails the whole aggregation.
pub fn aggregate(
    records: &[TradeRecord],
    watchlist: &Watchlist,
) -> Result<Aggregation, AggregateError> {
    let mut watched: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut other: BTreeMap<&str, Decimal> = BTreeMap::new();

    for record in records {
        let group = if watchlist.contains(&record.symbol) {
            &mut watched
        } else {
            &mut other
        };
        let total = group.entry(record.symbol.as_str()).or_default();
        *total = total
            .checked_add(record.signed_amount())
            .ok_or_else(|| AggregateError::Overflow { symbol: record.symbol.clone() })?;
    }

    Ok(Aggregation {
        watched: into_summaries(watched),
        other:   into_summaries(other),
    })
}

fn into_summaries(totals: BTreeMap<&str, Decimal>) -> Vec<Summary> {
    totals
        .into_iter()
        .map(|(symbol, net_amount)| Summary {
            symbol: symbol.to_string(),
            net_amount,
        })
        .collect()
}
