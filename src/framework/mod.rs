//! Control flow shared by the transactions.

mod state;

pub use state::*;
