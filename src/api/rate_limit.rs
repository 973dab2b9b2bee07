//! Governs requests against the GitHub API quota.
//!
//! [`check_status`] and then [`observe`] run right after every API call, before the body is
//! looked at.

use std::time::Duration;

use reqwest::{StatusCode, header::HeaderMap};
use tracing::{error, info, warn};

use super::transport::Response;
use crate::OperationalError;

/// Throttling only kicks in below this many remaining requests.
const THROTTLE_BELOW: i64 = 100;

/// Computed delays at or above this are not applied.
const MAX_THROTTLE_DELAY: f64 = 10.0;

/// The quota counters and payload descriptor of a single response.
///
/// Missing or unparsable counters are `-1` (`reset` is [`i64::MAX`]), meaning unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    /// `X-RateLimit-Remaining`.
    pub remaining: i64,
    /// `X-RateLimit-Limit`.
    pub limit: i64,
    /// `X-RateLimit-Reset`, in seconds since the Unix epoch.
    pub reset: i64,
    /// The response status.
    pub status: StatusCode,
    /// `content-type`, empty if absent.
    pub content_type: String,
    /// `content-length`, `-1` if absent.
    pub content_length: i64,
}

impl RateLimitSnapshot {
    /// Extracts a snapshot from a response.
    pub fn from_response(response: &Response) -> Self {
        let headers = &response.headers;
        Self {
            remaining: header_i64(headers, "x-ratelimit-remaining").unwrap_or(-1),
            limit: header_i64(headers, "x-ratelimit-limit").unwrap_or(-1),
            reset: header_i64(headers, "x-ratelimit-reset").unwrap_or(i64::MAX),
            status: response.status,
            content_type: header_str(headers, "content-type")
                .unwrap_or_default()
                .to_owned(),
            content_length: header_i64(headers, "content-length").unwrap_or(-1),
        }
    }

    /// Seconds until the quota resets, never negative.
    pub fn seconds_to_reset(&self, now: i64) -> i64 {
        self.reset.saturating_sub(now).max(0)
    }

    /// Whether less than half of the quota is left. Unknown counters are never low.
    pub fn is_low(&self) -> bool {
        self.remaining >= 0 && self.limit > 0 && (self.remaining as f64) < self.limit as f64 * 0.5
    }

    /// Whether the quota is used up.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// The self-paced delay before the next request, if any.
    ///
    /// While `0 < remaining < 100` and the reset is in the future, requests are spread over the
    /// time left: `seconds_to_reset / remaining + 1` seconds. Delays outside `(0, 10)` are not
    /// applied.
    pub fn throttle_delay(&self, now: i64) -> Option<Duration> {
        let when = self.seconds_to_reset(now);
        if !(0 < self.remaining && self.remaining < THROTTLE_BELOW && when > 0) {
            return None;
        }

        let delay = when as f64 / self.remaining as f64 + 1.0;
        (delay > 0.0 && delay < MAX_THROTTLE_DELAY).then(|| Duration::from_secs_f64(delay))
    }

    /// Describes the payload, e.g. ` with application/json 42 byte(s)`.
    pub fn payload(&self) -> String {
        let mut s = String::new();
        if !self.content_type.is_empty() {
            s.push_str(&format!(" with {}", self.content_type));
        }
        if self.content_length >= 0 {
            s.push_str(&format!(" {} byte(s)", self.content_length));
        }
        s
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)?.to_str().ok()
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    header_str(headers, name)?.trim().parse().ok()
}

/// Rejects unauthorized responses, which carry no useful quota information.
///
/// # Errors
///
/// Returns [`OperationalError::Unauthorized`] on HTTP 401.
pub fn check_status(response: &Response) -> Result<(), OperationalError> {
    if response.status == StatusCode::UNAUTHORIZED {
        error!("unauthorized, check that GH_TOKEN or GITHUB_TOKEN holds a valid GitHub API token");
        return Err(OperationalError::Unauthorized);
    }
    Ok(())
}

/// Inspects the quota left after a response, throttling the caller when it runs low.
///
/// # Errors
///
/// Returns [`OperationalError::QuotaExhausted`] if no requests are left.
pub async fn observe(response: &Response) -> Result<(), OperationalError> {
    observe_at(response, chrono::Utc::now().timestamp()).await
}

pub(crate) async fn observe_at(response: &Response, now: i64) -> Result<(), OperationalError> {
    let snapshot = RateLimitSnapshot::from_response(response);
    let when = snapshot.seconds_to_reset(now);

    if snapshot.is_low() {
        info!(
            "HTTP/{} X-RateLimit {}/{} resets in {when}s [{}]{}",
            snapshot.status.as_u16(),
            snapshot.remaining,
            snapshot.limit,
            snapshot.reset,
            snapshot.payload()
        );
    }

    if let Some(delay) = snapshot.throttle_delay(now) {
        warn!("X-RateLimit client throttle delay {:.1}s", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }

    if snapshot.is_exhausted() {
        error!("X-RateLimit no API requests remaining");
        return Err(OperationalError::QuotaExhausted {
            seconds_to_reset: when,
        });
    }

    Ok(())
}
