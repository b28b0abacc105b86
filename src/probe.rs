use crate::{config::Probe, record::StatusOutcome};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub timeout: Duration,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self::from_config(&Probe::default())
    }
}

impl ProbeSettings {
    pub fn from_config(cfg: &Probe) -> Self {
        Self {
            timeout: Duration::try_from_secs_f64(cfg.timeout_seconds)
                .unwrap_or(Duration::from_secs(5)),
            follow_redirects: cfg.follow_redirects,
            max_redirects: cfg.max_redirects,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Single best-effort status check for one URL. Never fails: every problem
/// is folded into the returned outcome.
pub trait StatusProbe {
    fn probe(&self, url: &str) -> StatusOutcome;
}

pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(settings: &ProbeSettings) -> Result<Self> {
        let policy = if settings.follow_redirects {
            Policy::limited(settings.max_redirects)
        } else {
            Policy::none()
        };

        let client = Client::builder()
            .connect_timeout(settings.timeout)
            .timeout(settings.timeout)
            .redirect(policy)
            .user_agent(settings.user_agent.as_str())
            .build()
            .with_context(|| "building HTTP client")?;
        Ok(Self { client })
    }
}

impl StatusProbe for HttpProber {
    fn probe(&self, url: &str) -> StatusOutcome {
        let parsed = match reqwest::Url::parse(url) {
            Ok(u) => u,
            Err(err) => return StatusOutcome::Failed(format!("invalid URL {url:?}: {err}")),
        };

        match self.client.head(parsed).send() {
            Ok(response) => {
                let status = response.status();
                debug!("HEAD {url} -> {status} (final {})", response.url());
                StatusOutcome::Code(status.as_u16())
            }
            Err(err) => {
                debug!("HEAD {url} failed: {err:?}");
                map_reqwest_error(&err)
            }
        }
    }
}

// Connect failures are checked first, so a connect timeout counts as a
// connection error rather than a timeout.
fn map_reqwest_error(err: &reqwest::Error) -> StatusOutcome {
    if err.is_connect() {
        return StatusOutcome::ConnectionError;
    }
    if err.is_timeout() {
        return StatusOutcome::Timeout;
    }
    StatusOutcome::RequestError(error_chain(err))
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

impl<T: StatusProbe + ?Sized> StatusProbe for &T {
    fn probe(&self, url: &str) -> StatusOutcome {
        (**self).probe(url)
    }
}
