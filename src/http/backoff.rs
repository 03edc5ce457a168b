//! Backoff policy
//!
//! Computes the wait between retry attempts: capped exponential growth scaled
//! by full jitter, with a server-supplied `Retry-After` taking precedence for
//! rate-limited responses.

use rand::Rng;
use reqwest::header::HeaderMap;
use std::time::Duration;

/// Base delay for the first attempt, doubled per attempt thereafter
const BASE_DELAY: Duration = Duration::from_millis(500);

/// Capped exponential delay before jitter: `min(0.5 * 2^attempt, max)`
pub fn backoff_cap(attempt: u32, max: Duration) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    std::cmp::min(BASE_DELAY.saturating_mul(factor), max)
}

/// Backoff with full jitter: a uniform factor in `[0, 1)` applied to the cap,
/// so concurrently-failing workers spread their retries instead of herding.
pub fn backoff_with_jitter(attempt: u32, max: Duration) -> Duration {
    let cap = backoff_cap(attempt, max);
    cap.mul_f64(rand::thread_rng().gen::<f64>())
}

/// Server-directed wait for rate-limited responses.
///
/// Returns the literal `Retry-After` seconds only when the status is exactly
/// 429 and the header parses as an integer; anything else falls back to the
/// computed backoff.
pub fn retry_after(status: u16, headers: &HeaderMap) -> Option<Duration> {
    if status != 429 {
        return None;
    }
    headers
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
