//! The HTTP capability every request goes through.

use std::{fmt::Display, future::Future};

use reqwest::{Method, StatusCode, header::HeaderMap};
use tokio_util::bytes::Bytes;

/// A request to send through a [`Transport`].
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method.
    pub method: Method,
    /// The URL, without query parameters.
    pub url: String,
    /// The request headers.
    pub headers: HeaderMap,
    /// The query parameters.
    pub params: Vec<(String, String)>,
}

impl Request {
    /// Creates a plain `GET` request without headers.
    pub fn get<U>(url: U) -> Self
    where
        U: Into<String>,
    {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
            params: Vec::new(),
        }
    }

    /// Sets the headers.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Appends query parameters.
    pub fn params<K, V>(mut self, params: &[(K, V)]) -> Self
    where
        K: ToString,
        V: ToString,
    {
        self.params.extend(
            params
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        self
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            write!(f, "{}{key}={value}", if i == 0 { '?' } else { '&' })?;
        }
        Ok(())
    }
}

/// A fully read response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The status code.
    pub status: StatusCode,
    /// The response headers, looked up case-insensitively.
    pub headers: HeaderMap,
    /// The response body.
    pub body: Bytes,
}

/// Sends requests and reads their responses.
pub trait Transport {
    /// Sends a request and reads the whole response.
    fn request(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, reqwest::Error>> + Send;
}

/// A [`Transport`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a [`ReqwestTransport`] with a default client.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for ReqwestTransport {
    fn request(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, reqwest::Error>> + Send {
        let builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .query(&request.params);

        async move {
            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;

            Ok(Response {
                status,
                headers,
                body,
            })
        }
    }
}
