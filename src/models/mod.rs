//! Domain models shared by the parser, aggregator and formatter.

pub mod post;
pub mod summary;
pub mod trade;

pub use post::RawPost;
pub use summary::{Summary, Watchlist};
pub use trade::{Direction, TradeRecord};
