//! # engine
//!
//! The trade-event core: pure, synchronous transformations over one batch.
//!
//! ```text
//! RawPost[] ─▶ parser ─▶ TradeRecord[] ─▶ aggregator ─▶ watched / other ─▶ formatter ─▶ String
//!                 │
//!            normalizer
//! ```

pub mod aggregator;
pub mod formatter;
pub mod normalizer;
pub mod parser;

pub use aggregator::{aggregate, Aggregation};
pub use formatter::SummaryFormatter;
pub use normalizer::SymbolNormalizer;
pub use parser::{ExtractionRule, ParseReport, PostParser};
