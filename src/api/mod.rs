//! Plumbing for the GitHub REST API: credentials, quota governance, requests and contents.

pub mod client;
pub mod contents;
pub mod credential;
pub mod rate_limit;
pub mod repository;
pub mod transport;

pub use client::GitHubClient;
pub use credential::Credential;
pub use repository::RepositoryRef;
pub use transport::{ReqwestTransport, Transport};
