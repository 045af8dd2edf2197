//! Blocking HTTP transport.
//!
//! The [`Transport`] trait is the crate's only network seam — both the search
//! request and every image download go through it, so everything above it can
//! be tested against a recording mock without touching the network.
//!
//! The production implementation is [`UreqTransport`]: a blocking `ureq`
//! agent with a 10-second global timeout and a fixed desktop-browser
//! User-Agent. Image hosts routinely refuse requests with a default library
//! agent string.

use std::time::Duration;
use thiserror::Error;
use ureq::Agent;

/// Browser User-Agent sent on every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Response bodies above this size are treated as a transport failure.
/// Raised well past ureq's 10 MB default so large photos still download.
const BODY_LIMIT: u64 = 64 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Failed(String),
}

/// One-shot GET returning the full response body.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// Production transport backed by a shared `ureq` agent.
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(10)))
            .user_agent(USER_AGENT)
            // Non-2xx responses come back as values so callers see the code
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.new_agent(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| TransportError::Failed(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(TransportError::Status(status));
        }

        response
            .body_mut()
            .with_config()
            .limit(BODY_LIMIT)
            .read_to_vec()
            .map_err(|e| TransportError::Failed(e.to_string()))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted transport that records requested URLs and replays canned
    /// responses in order.
    #[derive(Default)]
    pub struct MockTransport {
        pub responses: Mutex<Vec<Result<Vec<u8>, TransportError>>>,
        pub requests: Mutex<Vec<String>>,
    }

    impl MockTransport {
        /// Responses are handed out first-to-last.
        pub fn with_responses(responses: Vec<Result<Vec<u8>, TransportError>>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requested_urls(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for MockTransport {
        fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(TransportError::Failed("no scripted response".into())))
        }
    }

    #[test]
    fn mock_replays_in_order_and_records_urls() {
        let mock = MockTransport::with_responses(vec![
            Ok(b"first".to_vec()),
            Err(TransportError::Status(404)),
        ]);

        assert_eq!(mock.get("http://a").unwrap(), b"first");
        assert!(matches!(
            mock.get("http://b"),
            Err(TransportError::Status(404))
        ));
        assert_eq!(mock.requested_urls(), vec!["http://a", "http://b"]);
    }
}
