use std::thread;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use harvester_core::{FetchFailure, FetchResult};

use crate::decode::{decode_bytes, decode_html, detect_encoding, REPLACEMENT_CHARACTER};
use crate::extract::extract_visible_text;
use crate::{AttemptError, FailureKind};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Attempts per URL; values below one are treated as one.
    pub retries: u32,
    /// Constant pause between attempts for the same URL.
    pub delay: Duration,
    /// `None` leaves the request unbounded.
    pub request_timeout: Option<Duration>,
    /// Statuses that end the fetch at once without retrying.
    pub permanent_statuses: Vec<u16>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_millis(100),
            request_timeout: None,
            permanent_statuses: vec![404, 500],
        }
    }
}

/// Anything that can turn a URL into page text for the harvest loop.
pub trait PageSource {
    fn fetch(&self, url: &str) -> FetchResult;
}

impl<F> PageSource for F
where
    F: Fn(&str) -> FetchResult,
{
    fn fetch(&self, url: &str) -> FetchResult {
        self(url)
    }
}

enum Attempt {
    Text(String),
    Permanent(u16),
}

/// Blocking HTTP fetcher with retry and encoding fallback.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    settings: FetchSettings,
    client: reqwest::blocking::Client,
}

impl PageFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, AttemptError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| AttemptError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn attempt(&self, url: &str) -> Result<Attempt, AttemptError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| AttemptError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self.client.get(parsed).send().map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        if self.settings.permanent_statuses.contains(&status) {
            return Ok(Attempt::Permanent(status));
        }

        let bytes = response
            .bytes()
            .map_err(|err| AttemptError::new(FailureKind::Body, err.to_string()))?;
        Ok(Attempt::Text(page_text(&bytes)))
    }
}

impl PageSource for PageFetcher {
    fn fetch(&self, url: &str) -> FetchResult {
        let attempts = self.settings.retries.max(1);
        for attempt in 1..=attempts {
            engine_info!("Fetching {} (attempt {}/{})", url, attempt, attempts);
            match self.attempt(url) {
                Ok(Attempt::Text(text)) => return FetchResult::Success(text),
                Ok(Attempt::Permanent(status)) => {
                    engine_warn!("Error for URL: {} (status code: {})", url, status);
                    return FetchResult::Failure(FetchFailure::PermanentStatus(status));
                }
                Err(err) => {
                    engine_warn!("Attempt {} for {} encountered an error: {}", attempt, url, err);
                }
            }
            if attempt < attempts {
                thread::sleep(self.settings.delay);
            }
        }

        engine_warn!("Giving up on {} after {} attempts", url, attempts);
        FetchResult::Failure(FetchFailure::RetriesExhausted { attempts })
    }
}

/// Turn a response body into text: visible HTML text under the detected
/// encoding, or the raw decoded body when that yields U+FFFD.
pub fn page_text(bytes: &[u8]) -> String {
    match detect_encoding(bytes) {
        Some(encoding) => {
            engine_info!("Detected encoding: {}", encoding.name());
            let text = extract_visible_text(&decode_html(bytes, encoding));
            if !text.contains(REPLACEMENT_CHARACTER) {
                return text;
            }
            engine_warn!(
                "Detected encoding {} resulted in replacement characters",
                encoding.name()
            );
        }
        None => engine_info!("Detected encoding: none"),
    }

    let decoded = decode_bytes(bytes, None);
    engine_info!(
        "Decoded raw body as {}{}",
        decoded.encoding_label,
        if decoded.lossy { " (lossy)" } else { "" }
    );
    decoded.text
}

fn map_reqwest_error(err: reqwest::Error) -> AttemptError {
    if err.is_timeout() {
        return AttemptError::new(FailureKind::Timeout, err.to_string());
    }
    AttemptError::new(FailureKind::Network, err.to_string())
}
