//! HTTP fetch collaborator with proxy and identity-rotation support.

use crate::error::{Result, ScrapeError};
use crate::tor;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// User agent presented to the crawled sites.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; WOW64; rv:51.0) Gecko/20100101 Firefox/51.0";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Wait after an identity rotation so the new circuit takes effect.
const DEFAULT_COOLDOWN_SECS: u64 = 10;

/// Blocking-style page fetcher. Non-success responses trigger one identity
/// rotation signal plus a cooldown, then report failure upward; the caller
/// decides whether to re-invoke.
pub struct PageClient {
    client: Client,
    control_addr: Option<String>,
    cooldown: Duration,
}

impl PageClient {
    pub fn builder() -> PageClientBuilder {
        PageClientBuilder::default()
    }

    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        debug!("GET {url} -> {status}");

        if status != 200 {
            warn!("request to {url} returned {status}, rotating identity");
            if let Some(addr) = &self.control_addr {
                if let Err(e) = tor::renew_identity(addr).await {
                    warn!("identity rotation failed: {e}");
                }
            }
            tokio::time::sleep(self.cooldown).await;
            return Err(ScrapeError::BadStatus {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.text().await?)
    }
}

pub struct PageClientBuilder {
    user_agent: String,
    proxy: Option<String>,
    timeout: Duration,
    cooldown: Duration,
    control_addr: Option<String>,
}

impl Default for PageClientBuilder {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cooldown: Duration::from_secs(DEFAULT_COOLDOWN_SECS),
            control_addr: None,
        }
    }
}

impl PageClientBuilder {
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Route all requests through the given proxy (e.g. a local
    /// anonymizing proxy on `http://127.0.0.1:8123`).
    pub fn proxy(mut self, proxy_url: &str) -> Self {
        self.proxy = Some(proxy_url.to_string());
        self
    }

    /// Control-channel address used to request a new identity after a
    /// failed request (e.g. `127.0.0.1:9051`).
    pub fn control_addr(mut self, addr: &str) -> Self {
        self.control_addr = Some(addr.to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn build(self) -> Result<PageClient> {
        let mut builder = Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(5));

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(PageClient {
            client: builder.build()?,
            control_addr: self.control_addr,
            cooldown: self.cooldown,
        })
    }
}
