//! Legacy ASP wire protocol.
//!
//! # Data Flow
//! ```text
//! Verification engine / legacy translation
//!     → response.rs (build status line, header/data sections, trailer)
//!     → serialized body, always sent with HTTP 200
//!
//! Upstream body
//!     → response.rs (decode, trailer checked against content)
//!
//! VerifyPlayer.aspx raw query (not percent-encoded by game servers)
//!     → query.rs (literal, order-anchored parse)
//! ```
//!
//! # Wire Format
//! ```text
//! O                         | E\t<code>
//! H\t<field>\t<field>...
//! D\t<value>\t<value>...
//! $\t<N>\t$
//! ```

pub mod query;
pub mod response;

pub use query::VerifyQuery;
pub use response::{ParseError, Response, Section, Status};

/// Source of `asof` timestamps (unix seconds).
pub type Clock = fn() -> i64;

/// Current unix time in seconds.
pub fn timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
