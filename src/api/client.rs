//! Authenticated, rate-governed requests to the GitHub REST API.

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use super::{
    credential::Credential,
    rate_limit::{check_status, observe},
    transport::{Request, Response, Transport},
};
use crate::{Result, env::GITHUB_API_URL};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A GitHub REST API client holding the credential of one operation.
#[derive(Debug)]
pub struct GitHubClient<T> {
    transport: T,
    authorization: Option<HeaderValue>,
    api_url: String,
}

impl<T> GitHubClient<T>
where
    T: Transport,
{
    /// Creates a client against the API at `GITHUB_API_URL`.
    pub fn new(transport: T, credential: Option<Credential>) -> Self {
        Self::with_api_url(transport, credential, GITHUB_API_URL.as_str())
    }

    /// Creates a client against the API at `api_url`.
    ///
    /// A credential that cannot be sent as a header is reported and left out, so requests go
    /// unauthenticated.
    pub fn with_api_url(transport: T, credential: Option<Credential>, api_url: &str) -> Self {
        let authorization = credential.and_then(|credential| {
            let value = credential.to_header();
            if value.is_none() {
                error!(
                    "credential {credential:?} is not a valid header value, requests will be unauthenticated"
                );
            }
            value
        });

        Self {
            transport,
            authorization,
            api_url: api_url.trim_end_matches('/').to_owned(),
        }
    }

    /// The root of the API, without a trailing slash.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The headers of an API request: JSON media type, user agent, API version and credential.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );

        if let Some(value) = &self.authorization {
            headers.insert(header::AUTHORIZATION, value.clone());
        }
        headers
    }

    /// Sends an authenticated `GET`, then checks its status and the quota left.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response is unauthorized, or the quota is
    /// used up.
    pub async fn get<K, V>(&self, url: &str, params: &[(K, V)]) -> Result<Response>
    where
        K: ToString,
        V: ToString,
    {
        let request = Request::get(url).headers(self.headers()).params(params);
        debug!("requesting {request}…");

        let response = self.transport.request(request).await?;
        check_status(&response)?;
        observe(&response).await?;

        Ok(response)
    }

    /// Sends an authenticated `GET` and parses the JSON body.
    ///
    /// See: [`Self::get`]
    ///
    /// # Errors
    ///
    /// Returns an error if [`Self::get`] fails or the body is not the expected JSON.
    pub async fn get_json<D, K, V>(&self, url: &str, params: &[(K, V)]) -> Result<D>
    where
        D: DeserializeOwned,
        K: ToString,
        V: ToString,
    {
        let response = self.get(url, params).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }
}

/// No query parameters.
pub const NO_PARAMS: &[(&str, &str)] = &[];

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        Error, OperationalError,
        testing::{API_URL, FakeTransport, json_response, response},
    };

    #[tokio::test]
    async fn sends_github_headers_and_credential() {
        let url = format!("{API_URL}/rate_limit");
        let client = GitHubClient::with_api_url(
            FakeTransport::new().route(&url, json_response(json!({}))),
            Some(Credential::Bearer("t0k3n".to_owned())),
            API_URL,
        );

        let _: Value = client.get_json(&url, &[("per_page", 100)]).await.unwrap();

        let requests = client.transport().requests();
        let headers = &requests[0].headers;
        assert_eq!(headers[header::ACCEPT], "application/vnd.github+json");
        assert_eq!(headers[header::AUTHORIZATION], "Bearer t0k3n");
        assert!(headers.contains_key(header::USER_AGENT));
        assert_eq!(
            requests[0].params,
            vec![("per_page".to_owned(), "100".to_owned())]
        );
    }

    #[tokio::test]
    async fn unauthenticated_requests_carry_no_authorization() {
        let url = format!("{API_URL}/rate_limit");
        let client = FakeTransport::new().route(&url, json_response(json!({}))).client();

        client.get(&url, NO_PARAMS).await.unwrap();

        assert!(
            !client.transport().requests()[0]
                .headers
                .contains_key(header::AUTHORIZATION)
        );
    }

    #[tokio::test]
    async fn unsendable_credential_is_left_out() {
        let url = format!("{API_URL}/rate_limit");
        let client = GitHubClient::with_api_url(
            FakeTransport::new().route(&url, json_response(json!({}))),
            Some(Credential::Bearer("t0k3n\nInjected: yes".to_owned())),
            API_URL,
        );

        client.get(&url, NO_PARAMS).await.unwrap();

        let requests = client.transport().requests();
        assert!(!requests[0].headers.contains_key(header::AUTHORIZATION));
        assert!(!requests[0].headers.contains_key("injected"));
    }

    #[tokio::test]
    async fn unauthorized_stops_before_the_body_is_read() {
        let url = format!("{API_URL}/repos/acme/widget/commits");
        let client = FakeTransport::new()
            .route(&url, response(StatusCode::UNAUTHORIZED, "not json").build())
            .client();

        let result: Result<Vec<Value>> = client.get_json(&url, NO_PARAMS).await;
        assert!(matches!(
            result,
            Err(Error::Operational(OperationalError::Unauthorized))
        ));
    }

    #[tokio::test]
    async fn exhausted_quota_stops_before_the_body_is_read() {
        let url = format!("{API_URL}/repos/acme/widget/commits");
        let client = FakeTransport::new()
            .route(
                &url,
                response(StatusCode::FORBIDDEN, "not json")
                    .header("x-ratelimit-remaining", 0)
                    .header("x-ratelimit-limit", 60)
                    .build(),
            )
            .client();

        let result: Result<Vec<Value>> = client.get_json(&url, NO_PARAMS).await;
        assert!(matches!(
            result,
            Err(Error::Operational(OperationalError::QuotaExhausted { .. }))
        ));
    }

    #[tokio::test]
    async fn invalid_json_is_reported() {
        let url = format!("{API_URL}/repos/acme/widget/commits");
        let client = FakeTransport::new()
            .route(&url, response(StatusCode::OK, "<html>").build())
            .client();

        let result: Result<Vec<Value>> = client.get_json(&url, NO_PARAMS).await;
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
