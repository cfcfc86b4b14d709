//! Formula matching - rule-based attribute extraction from listing titles.
//!
//! Each attribute is decided by an independent single-pass classifier over
//! the cleaned title: the first matching rule wins, and age and food
//! category fall back to fixed defaults when nothing matches.

mod formula;
mod types;

pub use formula::FormulaMatcher;
pub use types::*;
