//! # sqlx-template-bind
//!
//! Reconciles a dashboard-style SQL query template with the rendered query
//! produced by an external macro-expansion layer, recovering a parameterized
//! statement: prepared SQL with positional `?` marks plus the ordered bind
//! values that were expanded into the rendered text.
//!
//! Naive macro expansion yields a single SQL string that may embed
//! attacker-influenced text. This crate reverses that expansion by aligning
//! template and rendered query character by character, so the statement can
//! be executed with bind parameters instead of string concatenation — and any
//! divergence between the two strings is rejected outright.
//!
//! ## Features
//!
//! - **Alignment, not parsing**: literal template text acts as anchors that
//!   must match the rendered query verbatim; no SQL grammar involved
//! - **Dashboard variable forms**: `$var`, `${var:format}`, and either form
//!   wrapped in single or double quotes
//! - **Composite literals**: a quoted literal mixing a variable with
//!   hardcoded text (e.g. `'${__from:date:YYYY-MM-DD} 00:00:00'`) is
//!   recovered as one opaque value
//! - **Multi-valued variables**: comma-joined expansions split quote-aware
//!   into one bind value each
//! - **Hard failure**: any mismatch yields a single error kind, never a
//!   partial result
//! - **SQLx bridge**: execute the recovered statement on any MySQL
//!   `Executor` with the parameters bound positionally
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sqlx = { version = "0.8", features = ["mysql", "runtime-tokio"] }
//! sqlx-template-bind = "0.1"
//! ```
//!
//! ## Examples
//!
//! ### Recovering bind parameters
//!
//! ```rust
//! use sqlx_template_bind::build_parameterized_query;
//!
//! let query = build_parameterized_query(
//!     "SELECT * FROM logins WHERE user='$user' AND server IN ($servers)",
//!     "SELECT * FROM logins WHERE user='ahmed' AND server IN ('eu-1','eu-2')",
//! )?;
//!
//! assert_eq!(
//!     query.prepared_sql(),
//!     "SELECT * FROM logins WHERE user=? AND server IN (?,?)",
//! );
//! assert_eq!(
//!     query.parameters().collect::<Vec<_>>(),
//!     ["ahmed", "eu-1", "eu-2"],
//! );
//! assert_eq!(query.variable_names(), ["'$user'", "$servers"]);
//! # Ok::<(), sqlx_template_bind::Error>(())
//! ```
//!
//! ### Rejecting a tampered rendering
//!
//! ```rust
//! use sqlx_template_bind::{build_parameterized_query, Error};
//!
//! let result = build_parameterized_query(
//!     "SELECT * FROM t WHERE id=$id AND active=1",
//!     "SELECT * FROM t WHERE id='0'SELECT * FROM t WHERE id=''",
//! );
//!
//! assert!(matches!(result, Err(Error::Mismatch)));
//! ```
//!
//! ### Executing the recovered statement
//!
//! ```rust,no_run
//! use sqlx::MySqlPool;
//! use sqlx_template_bind::build_parameterized_query;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = MySqlPool::connect("mysql://localhost/grafana").await?;
//!
//! let query = build_parameterized_query(
//!     "SELECT * FROM metrics WHERE host='$host'",
//!     "SELECT * FROM metrics WHERE host='web-1'",
//! )?;
//!
//! let rows = query.fetch_all(&pool).await?;
//! println!("Fetched {} rows", rows.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## How It Works
//!
//! Reconciliation runs in four passes over the two input strings:
//!
//! 1. **Normalize**: every quoted literal containing a variable is collapsed
//!    into one atomic quoted variable span, so composite literals align as a
//!    single value region
//! 2. **Locate**: variable occurrences (bare, braced, quoted) are found in
//!    left-to-right order with their byte offsets
//! 3. **Align**: template and rendered text are walked in lockstep; the
//!    literal anchor before each occurrence must match verbatim, and the
//!    first occurrence of the following anchor bounds the variable's value
//!    region, which is split quote-aware on commas and unquoted
//! 4. **Assemble**: prepared SQL, value groups, and the original variable
//!    tokens are packaged into a [`ParameterizedQuery`]
//!
//! Both inputs are consumed within a single synchronous call; there is no
//! shared state, so concurrent calls need no coordination, and identical
//! inputs always produce identical results or identical failures.
//!
//! ## Limitations
//!
//! - Escaped quotes inside literals (e.g. a doubled `''` standing for a
//!   literal quote) are not handled: the scanner reads the second quote as
//!   reopening a literal. Inherited from the upstream expansion conventions
//!   and pinned by tests.
//! - When several quoted literals could each be read as variable-bearing,
//!   first-match order wins; this must agree with the upstream expansion
//!   layer's own resolution order.
//! - The execution helpers currently target MySQL.
//!
//! ## License
//!
//! Licensed under either of Apache License, Version 2.0 or MIT license at
//! your option.

pub mod builder;
pub mod error;
pub mod locate;
pub mod names;
pub mod normalize;
pub mod query;
pub mod split;

pub use builder::build_parameterized_query;
pub use error::{Error, Result};
pub use query::{ParameterizedQuery, ValueGroup, PLACEHOLDER};

/// Convenience re-exports for common use cases
pub mod prelude {
    pub use crate::builder::build_parameterized_query;
    pub use crate::error::{Error, Result};
    pub use crate::query::{ParameterizedQuery, ValueGroup};
}
