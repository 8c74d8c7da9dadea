//! Ranking and query engine for a browser command palette.
//!
//! Raw input is classified into a [`Mode`] by [`Query::parse`], turned into
//! rows by [`dispatch`], and rows are acted on by [`activate`]. History
//! search ranks candidates with a fuzzy subsequence score plus recency and
//! frequency boosts ([`rank`]). Browser storage and window control are
//! reached only through the [`Browser`] trait.

pub mod activate;
pub mod browser;
pub mod calculator;
pub mod commands;
pub mod dispatch;
pub mod error;
pub mod fuzzy;
pub mod model;
pub mod palette;
pub mod query;
pub mod rank;
pub mod session;
pub mod theme;

#[cfg(test)]
mod mock;

pub use activate::{activate, Outcome};
pub use browser::{Browser, ClosedSession, Confirm, Host};
pub use dispatch::dispatch;
pub use error::{FlashbackError, Result};
pub use fuzzy::fuzzy_score;
pub use model::{Action, Candidate, CandidateKind, ScoredCandidate, TabRef};
pub use palette::Palette;
pub use query::{Mode, Query};
pub use rank::{rank, MAX_RESULTS};
pub use session::{Key, KeyOutcome, Session, Ticket};
pub use theme::{JsonThemeStore, ThemeStore};
