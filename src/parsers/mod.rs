//! Parsers for sentinel-delimited `git log` output
//!
//! # Stream shape
//!
//! Each commit is emitted as a block:
//!
//! ```text
//! __START_GIT__COMMIT_LOG_MSG__
//! <commit id>
//! <tree id>
//! <author name <email>>
//! <author date, RFC 2822>
//! <committer name <email>>
//! <committer date, RFC 2822>
//! <parent ids, space separated>
//! <decoration, e.g. " (HEAD -> main, tag: v1.0)">
//! <subject>
//! <body lines...>
//! __END_GIT_COMMIT_LOG_MSG__
//! <numstat lines...>
//! ```
//!
//! # Error Handling Strategy
//!
//! - **Block structure**: a missing or repeated end sentinel, fewer than eight header lines,
//!   or a header field of the wrong shape aborts the run with
//!   [`ExtractError::MalformedBlock`] naming the block's start line. Guessing at offsets would
//!   silently corrupt every later record.
//!
//! - **Diffstat and trailer lines**: lines of an unknown shape are skipped and never counted.
//!
//! [`ExtractError::MalformedBlock`]: crate::error::ExtractError::MalformedBlock

pub mod block;
pub mod chain;
pub mod dates;
pub mod diffstat;
pub mod scanner;

pub use block::{BlockIdentity, ParsedBlock, parse_block, parse_identity};
pub use chain::extract_chain;
pub use diffstat::parse_diffstat;
pub use scanner::{Blocks, END_SENTINEL, RawBlock, START_SENTINEL, next_block};
