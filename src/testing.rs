//! An in-memory [`Transport`] and response builders for tests.

use std::{
    collections::{HashMap, VecDeque},
    future::Future,
};

use parking_lot::Mutex;
use reqwest::{
    StatusCode,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;
use tokio_util::bytes::Bytes;

use crate::api::{
    client::GitHubClient,
    transport::{Request, Response, Transport},
};

pub(crate) const API_URL: &str = "https://api.github.test";

pub(crate) struct ResponseBuilder {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ResponseBuilder {
    pub(crate) fn header<V: ToString>(mut self, name: &str, value: V) -> Self {
        self.headers.insert(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(&value.to_string()).unwrap(),
        );
        self
    }

    pub(crate) fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

pub(crate) fn response<B: Into<Bytes>>(status: StatusCode, body: B) -> ResponseBuilder {
    ResponseBuilder {
        status,
        headers: HeaderMap::new(),
        body: body.into(),
    }
}

pub(crate) fn json_response(value: Value) -> Response {
    response(StatusCode::OK, value.to_string())
        .header("content-type", "application/json")
        .build()
}

/// Serves queued responses by URL. The last response queued for a URL keeps being served;
/// unknown URLs get a 404.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    routes: Mutex<HashMap<String, VecDeque<Response>>>,
    requests: Mutex<Vec<Request>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(self, url: &str, response: Response) -> Self {
        self.routes
            .lock()
            .entry(url.to_owned())
            .or_default()
            .push_back(response);
        self
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub(crate) fn requests_to(&self, url: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.url == url).count()
    }

    pub(crate) fn client(self) -> GitHubClient<Self> {
        GitHubClient::with_api_url(self, None, API_URL)
    }
}

impl Transport for FakeTransport {
    fn request(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, reqwest::Error>> + Send {
        let served = {
            let mut routes = self.routes.lock();
            match routes.get_mut(&request.url) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        }
        .unwrap_or_else(|| response(StatusCode::NOT_FOUND, "").build());
        self.requests.lock().push(request);

        async move { Ok(served) }
    }
}

/// Builds an uncompressed zip archive in memory.
pub(crate) fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use std::io::Write as _;

    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (name, contents) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
