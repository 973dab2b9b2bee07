//! Resolves the `authorization` header value from the environment.

use std::fmt::{self, Debug};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::header::HeaderValue;
use tracing::warn;

/// A resolved `authorization` header value.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// A token, sent as `Bearer <token>`.
    Bearer(String),
    /// A username and password (or token), sent as `Basic <base64(username:password)>`.
    Basic {
        /// The username.
        username: String,
        /// The password.
        password: String,
    },
}

impl Credential {
    /// Resolves a credential from a variable lookup.
    ///
    /// The first match wins:
    /// 1. `GH_TOKEN`, then `GITHUB_TOKEN`, as a bearer token;
    /// 2. `GH_USERNAME` (or `GITHUB_ACTOR`) together with `GH_PASSWORD`, as basic auth.
    ///
    /// Empty values count as unset. When nothing matches, a warning is logged and [`None`] is
    /// returned: requests then go out unauthenticated, with a much lower rate limit.
    pub fn resolve<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(token) = var("GH_TOKEN").or_else(|| var("GITHUB_TOKEN")) {
            return Some(Self::Bearer(token));
        }

        let username = var("GH_USERNAME").or_else(|| var("GITHUB_ACTOR"));
        if let (Some(username), Some(password)) = (username, var("GH_PASSWORD")) {
            return Some(Self::Basic { username, password });
        }

        warn!(
            "no GitHub token found from environment, trying public API requests without (set GH_TOKEN or GITHUB_TOKEN)"
        );
        None
    }

    /// Resolves a credential from the process environment.
    ///
    /// See: [`Self::resolve`]
    pub fn from_env() -> Option<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// The `authorization` header value.
    pub fn header_value(&self) -> String {
        match self {
            Self::Bearer(token) => format!("Bearer {token}"),
            Self::Basic { username, password } => {
                format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
            }
        }
    }

    /// The `authorization` header value, marked as sensitive.
    ///
    /// Returns [`None`] if the credential contains characters a header cannot carry.
    pub fn to_header(&self) -> Option<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.header_value()).ok()?;
        value.set_sensitive(true);
        Some(value)
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(***)"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn resolve(vars: &[(&str, &str)]) -> Option<Credential> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Credential::resolve(|key| vars.get(key).cloned())
    }

    #[test]
    fn token_wins_over_username_and_password() {
        let credential = resolve(&[
            ("GH_TOKEN", "t0k3n"),
            ("GH_USERNAME", "octocat"),
            ("GH_PASSWORD", "hunter2"),
        ])
        .unwrap();

        assert_eq!(credential.header_value(), "Bearer t0k3n");
    }

    #[test]
    fn gh_token_wins_over_github_token() {
        let credential = resolve(&[("GITHUB_TOKEN", "inherited"), ("GH_TOKEN", "override")]);
        assert_eq!(credential, Some(Credential::Bearer("override".to_owned())));
    }

    #[test]
    fn empty_gh_token_falls_back_to_github_token() {
        let credential = resolve(&[("GH_TOKEN", ""), ("GITHUB_TOKEN", "inherited")]);
        assert_eq!(credential, Some(Credential::Bearer("inherited".to_owned())));
    }

    #[test]
    fn basic_auth_is_base64_encoded() {
        let credential = resolve(&[("GH_USERNAME", "octocat"), ("GH_PASSWORD", "hunter2")]).unwrap();
        // base64("octocat:hunter2")
        assert_eq!(credential.header_value(), "Basic b2N0b2NhdDpodW50ZXIy");
    }

    #[test]
    fn github_actor_stands_in_for_username() {
        let credential = resolve(&[("GITHUB_ACTOR", "octocat"), ("GH_PASSWORD", "hunter2")]);
        assert_eq!(
            credential,
            Some(Credential::Basic {
                username: "octocat".to_owned(),
                password: "hunter2".to_owned(),
            })
        );
    }

    #[test]
    fn username_without_password_is_unauthenticated() {
        assert_eq!(resolve(&[("GH_USERNAME", "octocat")]), None);
    }

    #[test]
    fn nothing_set_is_unauthenticated() {
        assert_eq!(resolve(&[]), None);
    }

    #[test]
    fn debug_hides_secrets() {
        let bearer = format!("{:?}", Credential::Bearer("t0k3n".to_owned()));
        let basic = format!(
            "{:?}",
            Credential::Basic {
                username: "octocat".to_owned(),
                password: "hunter2".to_owned(),
            }
        );

        assert!(!bearer.contains("t0k3n"));
        assert!(basic.contains("octocat"));
        assert!(!basic.contains("hunter2"));
    }

    #[test]
    fn header_is_sensitive() {
        let header = Credential::Bearer("t0k3n".to_owned()).to_header().unwrap();
        assert!(header.is_sensitive());
        assert_eq!(header, "Bearer t0k3n");
    }
}
