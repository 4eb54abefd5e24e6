//! Timeout selection for outbound partner calls.
//!
//! Hotel content and location lookups are cheap reads and may run on a
//! tighter deadline than search and booking calls.

use std::time::Duration;

use crate::config::TimeoutConfig;
use crate::relay::Partner;

/// Chooses the deadline for each outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    pub connect: Duration,
    pub request: Duration,
    pub content: Duration,
    pub auth: Duration,
}

impl TimeoutPolicy {
    pub fn from_config(config: &TimeoutConfig) -> Self {
        Self {
            connect: Duration::from_secs(config.connect_secs),
            request: Duration::from_secs(config.request_secs),
            content: Duration::from_secs(config.content_secs),
            auth: Duration::from_secs(config.auth_secs),
        }
    }

    /// Deadline for a relayed call to `partner` at `path`.
    pub fn for_call(&self, partner: Partner, path: &str) -> Duration {
        match partner {
            Partner::Hotel if is_content_path(path) => self.content,
            _ => self.request,
        }
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self::from_config(&TimeoutConfig::default())
    }
}

fn is_content_path(path: &str) -> bool {
    let path = path.to_lowercase();
    path.contains("content") || path.contains("location")
}
