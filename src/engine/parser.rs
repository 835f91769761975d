//! # engine::parser
//!
//! **Post Parser** — turns free-text posts into [`TradeRecord`]s.
//!
//! ## Per-post pipeline
//! ```text
//! created_at ─▶ timestamp ──(unreadable)──▶ Err(ParseError)  batch stops
//!                  │
//!             after cutoff? ──(no)──▶ stale, skipped
//!                  │
//!           rule applies? ──(no)──▶ unrecognized, skipped
//!                  │
//!            rule.extract ──(Err)──▶ PostFailure, skipped
//!                  │
//!             TradeRecord
//! ```
//!
//! Posts are third-party free text, so shape problems are expected and are
//! reported as diagnostics. A timestamp that cannot be read means the feed
//! itself is broken and fails the whole batch.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::engine::normalizer::SymbolNormalizer;
use crate::error::{FailureReason, ParseError, PostFailure};
use crate::models::{Direction, RawPost, TradeRecord};

/// Largest notional a single post may carry. Anything above is treated as a
/// garbled numeral rather than a trade.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_808_348_672, 232_830_643, 0, false, 0); // 10^18

/// Legacy v1.1 timeline layout, e.g. `Mon Jan 02 15:04:05 -0700 2006`.
const LEGACY_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

// ─── Extraction Rules ─────────────────────────────────────────────────────────

/// One recognisable post shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    /// `$<amount> <$sym|#tag> <#?LONGED|#?SHORTED>`, the default rule.
    Position,
    /// `$<amount> #LIQUIDATED <$sym>`, recorded as a short. Opt-in.
    Liquidation,
}

impl ExtractionRule {
    /// Category detection: does this rule claim the post at all?
    pub fn applies_to(&self, text: &str) -> bool {
        match self {
            ExtractionRule::Position => text.contains("SHORTED") || text.contains("LONGED"),
            ExtractionRule::Liquidation => text.contains("LIQUIDATED"),
        }
    }

    /// Field extraction for a post this rule claimed. Scans whitespace
    /// separated tokens for the first window shaped like the rule.
    pub fn extract(
        &self,
        text: &str,
        normalizer: &SymbolNormalizer,
    ) -> Result<TradeRecord, FailureReason> {
        let tokens: Vec<&str> = text.split_whitespace().collect();

        let (amount, symbol, direction) = match self {
            ExtractionRule::Position => tokens
                .windows(3)
                .find_map(|w| {
                    let amount = amount_token(w[0])?;
                    let symbol = symbol_token(w[1], &['$', '#'])?;
                    let position = position_token(w[2])?;
                    Some((amount, symbol, Direction::from_position_token(position)))
                })
                .ok_or(FailureReason::PatternMismatch)?,
            ExtractionRule::Liquidation => tokens
                .windows(3)
                .find_map(|w| {
                    let amount = amount_token(w[0])?;
                    if w[1] != "#LIQUIDATED" {
                        return None;
                    }
                    let symbol = symbol_token(w[2], &['$'])?;
                    Some((amount, symbol, Direction::Short))
                })
                .ok_or(FailureReason::PatternMismatch)?,
        };

        Ok(TradeRecord {
            amount:    parse_amount(amount)?,
            symbol:    normalizer.normalize(symbol),
            direction,
        })
    }
}

// ─── Token Shapes ─────────────────────────────────────────────────────────────

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `$` followed by digits, `,` and `.` at the end of the token. Returns the
/// `$`-prefixed numeral; whether it is actually a number is decided later.
fn amount_token(token: &str) -> Option<&str> {
    let start = token.rfind('$')?;
    let numeral = &token[start + 1..];
    let well_formed = !numeral.is_empty()
        && numeral.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.');
    well_formed.then_some(&token[start..])
}

/// A whole token made of one of `prefixes` followed by word characters.
fn symbol_token<'a>(token: &'a str, prefixes: &[char]) -> Option<&'a str> {
    let rest = token.strip_prefix(|c: char| prefixes.contains(&c))?;
    (!rest.is_empty() && rest.chars().all(is_word_char)).then_some(token)
}

/// `LONGED` / `SHORTED`, optionally `#`-prefixed. Trailing punctuation after
/// the word is ignored.
fn position_token(token: &str) -> Option<&str> {
    let word_start = usize::from(token.starts_with('#'));
    let word_len = token[word_start..]
        .find(|c: char| !is_word_char(c))
        .unwrap_or(token.len() - word_start);
    let captured = &token[..word_start + word_len];

    matches!(&captured[word_start..], "LONGED" | "SHORTED").then_some(captured)
}

/// Strips `$` and thousands separators, then parses as a decimal no larger
/// than [`MAX_AMOUNT`].
fn parse_amount(token: &str) -> Result<Decimal, FailureReason> {
    let cleaned: String = token.chars().filter(|&c| c != '$' && c != ',').collect();
    match Decimal::from_str(&cleaned) {
        Ok(amount) if amount <= MAX_AMOUNT => Ok(amount),
        _ => Err(FailureReason::InvalidAmount(cleaned)),
    }
}

/// Reads a feed timestamp in either supported layout.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, LEGACY_TIMESTAMP_FORMAT))
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

// ─── Parser ───────────────────────────────────────────────────────────────────

/// Outcome of parsing one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Successfully parsed records, in input order.
    pub records:      Vec<TradeRecord>,
    /// In-scope posts that could not be parsed.
    pub failures:     Vec<PostFailure>,
    /// Text of in-window posts that no rule claimed.
    pub unrecognized: Vec<String>,
    /// Posts created at or before the cutoff.
    pub stale:        usize,
}

#[derive(Debug, Clone)]
pub struct PostParser {
    normalizer: SymbolNormalizer,
    rules:      Vec<ExtractionRule>,
}

impl Default for PostParser {
    fn default() -> Self {
        Self::new(SymbolNormalizer::default())
    }
}

impl PostParser {
    /// Parser with only the [`ExtractionRule::Position`] rule.
    pub fn new(normalizer: SymbolNormalizer) -> Self {
        Self {
            normalizer,
            rules: vec![ExtractionRule::Position],
        }
    }

    /// Also extract `#LIQUIDATED` posts.
    pub fn with_liquidations(mut self) -> Self {
        if !self.rules.contains(&ExtractionRule::Liquidation) {
            self.rules.push(ExtractionRule::Liquidation);
        }
        self
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    /// Parses every post created strictly after `cutoff`.
    ///
    /// Every timestamp in the batch is validated, in or out of the window;
    /// the first unreadable one fails the whole call.
    pub fn parse_posts(
        &self,
        posts: &[RawPost],
        cutoff: DateTime<Utc>,
    ) -> Result<ParseReport, ParseError> {
        let mut report = ParseReport::default();

        for post in posts {
            let created_at = parse_timestamp(&post.created_at).ok_or_else(|| {
                ParseError::MalformedTimestamp {
                    created_at: post.created_at.clone(),
                    text:       post.text.clone(),
                }
            })?;

            if created_at <= cutoff {
                report.stale += 1;
                continue;
            }

            let Some(rule) = self.rules.iter().find(|r| r.applies_to(&post.text)) else {
                report.unrecognized.push(post.text.clone());
                continue;
            };

            match rule.extract(&post.text, &self.normalizer) {
                Ok(record) => report.records.push(record),
                Err(reason) => report.failures.push(PostFailure {
                    text: post.text.clone(),
                    reason,
                }),
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn cutoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    fn after(text: &str) -> RawPost {
        RawPost::new(text, "2024-03-01T10:30:00.000Z")
    }

    fn parse(posts: &[RawPost]) -> ParseReport {
        PostParser::default().parse_posts(posts, cutoff()).unwrap()
    }

    #[test]
    fn test_long_post_with_separators() {
        let report = parse(&[after("$1,200.50 $BTC LONGED")]);
        assert_eq!(
            report.records,
            vec![TradeRecord {
                amount:    dec!(1200.50),
                symbol:    "$BTC".to_string(),
                direction: Direction::Long,
            }]
        );
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_short_post_with_override() {
        let report = parse(&[after("$500 #bitcoin SHORTED")]);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].symbol, "$BTC");
        assert_eq!(report.records[0].direction, Direction::Short);
        assert_eq!(report.records[0].amount, dec!(500));
    }

    #[test]
    fn test_realistic_post_with_surrounding_text() {
        let report = parse(&[after(
            "🚨 $2,345,678 #bitcoin #SHORTED @64,210.5 [10:31:02] (Bybit)",
        )]);
        assert_eq!(report.records[0].amount, dec!(2345678));
        assert_eq!(report.records[0].symbol, "$BTC");
        assert_eq!(report.records[0].direction, Direction::Short);
    }

    #[test]
    fn test_lowercase_symbol_is_uppercased() {
        let report = parse(&[after("$75 $eth LONGED!")]);
        assert_eq!(report.records[0].symbol, "$ETH");
        assert_eq!(report.records[0].direction, Direction::Long);
    }

    #[test]
    fn test_post_at_cutoff_is_excluded() {
        let posts = [
            RawPost::new("$100 $BTC LONGED", "2024-03-01T10:00:00Z"),
            RawPost::new("$100 $BTC LONGED", "2024-03-01T09:00:00Z"),
        ];
        let report = parse(&posts);
        assert!(report.records.is_empty());
        assert_eq!(report.stale, 2);
    }

    #[test]
    fn test_stale_posts_skip_even_if_unparseable() {
        let report = parse(&[RawPost::new("$abc $BTC LONGED", "2024-03-01T08:00:00Z")]);
        assert!(report.failures.is_empty());
        assert_eq!(report.stale, 1);
    }

    #[test]
    fn test_unrelated_post_is_unrecognized_not_failed() {
        let report = parse(&[after("just vibing, no trade here")]);
        assert!(report.records.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(report.unrecognized, vec!["just vibing, no trade here".to_string()]);
    }

    #[test]
    fn test_pattern_mismatch_is_per_post() {
        let report = parse(&[
            after("someone LONGED something big"),
            after("$100 $ETH LONGED"),
        ]);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].reason, FailureReason::PatternMismatch);
        assert_eq!(report.failures[0].text, "someone LONGED something big");
    }

    #[test]
    fn test_non_numeric_amount_is_per_post() {
        let report = parse(&[after("$1.2.3 $ETH SHORTED"), after("$,, $ETH SHORTED")]);
        assert!(report.records.is_empty());
        assert_eq!(
            report.failures.iter().map(|f| f.reason.clone()).collect::<Vec<_>>(),
            vec![
                FailureReason::InvalidAmount("1.2.3".to_string()),
                FailureReason::InvalidAmount(String::new()),
            ]
        );
    }

    #[test]
    fn test_amount_above_cap_is_per_post() {
        let report = parse(&[
            after("$79,228,162,514,264,337,593,543,950,335 $BTC LONGED"),
            after("$1,000,000,000,000,000,001 $BTC LONGED"),
            after("$1,000,000,000,000,000,000 $BTC LONGED"),
        ]);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].amount, MAX_AMOUNT);
        assert_eq!(
            report.failures.iter().map(|f| f.reason.clone()).collect::<Vec<_>>(),
            vec![
                FailureReason::InvalidAmount("79228162514264337593543950335".to_string()),
                FailureReason::InvalidAmount("1000000000000000001".to_string()),
            ]
        );
    }

    #[test]
    fn test_max_amount_is_one_quintillion() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_000_000_u64));
    }

    #[test]
    fn test_question_mark_is_not_part_of_numeral() {
        let report = parse(&[after("$1?000 $ETH LONGED")]);
        assert_eq!(report.failures[0].reason, FailureReason::PatternMismatch);
    }

    #[test]
    fn test_unknown_position_word_does_not_match() {
        let report = parse(&[after("$100 $ETH HODLED, never LONGED")]);
        assert_eq!(report.failures[0].reason, FailureReason::PatternMismatch);
    }

    #[test]
    fn test_malformed_timestamp_fails_batch() {
        let posts = [
            after("$100 $ETH LONGED"),
            RawPost::new("$40 $ETH SHORTED", "yesterday-ish"),
        ];
        let err = PostParser::default().parse_posts(&posts, cutoff()).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedTimestamp {
                created_at: "yesterday-ish".to_string(),
                text:       "$40 $ETH SHORTED".to_string(),
            }
        );
    }

    #[test]
    fn test_legacy_timestamp_layout() {
        let parsed = parse_timestamp("Fri Mar 01 10:30:00 +0000 2024").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap());

        let report = parse(&[RawPost::new("$10 $SOL LONGED", "Fri Mar 01 11:30:00 +0200 2024")]);
        assert!(report.records.is_empty());
        assert_eq!(report.stale, 1);
    }

    #[test]
    fn test_records_keep_input_order() {
        let report = parse(&[
            after("$1 $AAA LONGED"),
            after("noise"),
            after("$2 $BBB SHORTED"),
            after("$3 $CCC LONGED"),
        ]);
        let symbols: Vec<_> = report.records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["$AAA", "$BBB", "$CCC"]);
    }

    #[test]
    fn test_liquidation_ignored_by_default() {
        let report = parse(&[after("$250,000 #LIQUIDATED $ETH on Binance")]);
        assert!(report.records.is_empty());
        assert_eq!(report.unrecognized.len(), 1);
    }

    #[test]
    fn test_liquidation_rule_records_short() {
        let parser = PostParser::default().with_liquidations();
        let report = parser
            .parse_posts(&[after("$250,000 #LIQUIDATED $eth on Binance")], cutoff())
            .unwrap();
        assert_eq!(
            report.records,
            vec![TradeRecord {
                amount:    dec!(250000),
                symbol:    "$ETH".to_string(),
                direction: Direction::Short,
            }]
        );
    }

    #[test]
    fn test_liquidation_rule_rejects_hashtag_symbol() {
        let rule = ExtractionRule::Liquidation;
        assert_eq!(
            rule.extract("$5 #LIQUIDATED #bitcoin", &SymbolNormalizer::default()),
            Err(FailureReason::PatternMismatch)
        );
    }

    #[test]
    fn test_with_liquidations_is_idempotent() {
        let parser = PostParser::default().with_liquidations().with_liquidations();
        assert_eq!(
            parser.rules(),
            &[ExtractionRule::Position, ExtractionRule::Liquidation]
        );
    }
}
