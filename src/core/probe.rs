//! Network probes against the daemon, issued through a blocking `curl` call.
//!
//! No retries happen here; the status cache's TTL and debounce windows decide when the
//! next probe may run.

use std::process::Command;
use std::time::Duration;

/// Connect timeout for the catalog listing.
pub const CATALOG_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Connect timeout for the running-model listing. Polled often, so it must fail fast.
pub const STATUS_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Result of one probe. `ok` is false on spawn failure, non-zero exit, timeout, or empty output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub ok: bool,
    pub body: String,
}

impl ProbeOutcome {
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            ok: true,
            body: body.into(),
        }
    }

    pub fn failure() -> Self {
        Self {
            ok: false,
            body: String::new(),
        }
    }
}

/// The two daemon probes the status cache depends on.
pub trait Probe {
    /// `GET {host}/api/tags`.
    fn catalog(&mut self) -> ProbeOutcome;
    /// `GET {host}/api/ps`.
    fn running(&mut self) -> ProbeOutcome;
}

/// Production probe: shells out to `curl` with a short connect timeout.
#[derive(Clone, Debug)]
pub struct CurlProbe {
    host: String,
    curl: String,
}

impl CurlProbe {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            curl: "curl".to_string(),
        }
    }

    fn get(&self, path: &str, connect_timeout: Duration) -> ProbeOutcome {
        let url = format!("{}{}", self.host, path);
        let connect = connect_timeout.as_secs().max(1);
        let output = Command::new(&self.curl)
            .args([
                "-s",
                "--connect-timeout",
                &connect.to_string(),
                "--max-time",
                &(connect * 2).to_string(),
                &url,
            ])
            .output();

        match output {
            Ok(o) if o.status.success() && !o.stdout.is_empty() => {
                log::debug!("GET {} ok ({} bytes)", url, o.stdout.len());
                ProbeOutcome::success(String::from_utf8_lossy(&o.stdout))
            }
            Ok(o) => {
                log::debug!(
                    "GET {} failed: {} ({} bytes)",
                    url,
                    o.status,
                    o.stdout.len()
                );
                ProbeOutcome::failure()
            }
            Err(e) => {
                log::warn!("Could not run {}: {}", self.curl, e);
                ProbeOutcome::failure()
            }
        }
    }
}

impl Probe for CurlProbe {
    fn catalog(&mut self) -> ProbeOutcome {
        self.get("/api/tags", CATALOG_CONNECT_TIMEOUT)
    }

    fn running(&mut self) -> ProbeOutcome {
        self.get("/api/ps", STATUS_CONNECT_TIMEOUT)
    }
}
