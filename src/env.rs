//! Defines the environment variables to use.
//!
//! Credentials are not cached here: they are resolved once per operation, see
//! [`crate::api::credential::Credential::from_env`].

use crate::static_lazy_lock;

/// Parses an environment variable from [`String`] to something else, wrapping any error in [`anyhow::Error`].
#[macro_export]
macro_rules! parse_env {
    ($key:expr => |$var:ident| $expr:expr) => {
        std::env::var($key)
            .map_err(|e| anyhow::anyhow!(e))
            .and_then(|$var| $expr)
    };
    ($key:expr => |$var:ident| $expr:expr; anyhow) => {
        parse_env!($key => |$var| $expr.map_err(|e| anyhow::anyhow!(e)))
    };
}

pub use parse_env;

/// The default root of the GitHub REST API.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// The default number of attempts to download and unpack an artifact archive.
pub const DEFAULT_MAX_DOWNLOAD_ATTEMPTS: u8 = 3;

static_lazy_lock! {
    /// The root of the GitHub REST API, without a trailing slash.
    pub GITHUB_API_URL: String = std::env::var("GITHUB_API_URL")
        .ok()
        .map(|s| s.trim_end_matches('/').to_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_owned());
}

static_lazy_lock! {
    /// The maximum number of attempts to download and unpack an artifact archive.
    pub MAX_DOWNLOAD_ATTEMPTS: u8 = parse_env!("MAX_DOWNLOAD_ATTEMPTS" => |s| s.parse::<u8>(); anyhow)
        .ok()
        .filter(|attempts| *attempts > 0)
        .unwrap_or(DEFAULT_MAX_DOWNLOAD_ATTEMPTS);
}
