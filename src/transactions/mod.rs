//! Pre-made transactions.

#[cfg(feature = "transactions")]
mod download_and_extract_archive;
#[cfg(feature = "transactions")]
mod extract_archive;
#[cfg(feature = "transactions")]
mod install_artifacts;
mod latest_run_page;

#[cfg(feature = "transactions")]
pub use download_and_extract_archive::*;
#[cfg(feature = "transactions")]
pub use extract_archive::*;
#[cfg(feature = "transactions")]
pub use install_artifacts::*;
pub use latest_run_page::*;
