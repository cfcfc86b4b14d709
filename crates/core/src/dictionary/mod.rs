//! Brand dictionary - the grouped list of known pet food brands.
//!
//! The dictionary drives query construction (Track A), brand discovery
//! (Track C) and brand canonicalization. It is loaded once per run, extended
//! in memory with discovered brands, and written back at the end.

mod store;
mod types;

pub use store::DictionaryStore;
pub use types::*;
