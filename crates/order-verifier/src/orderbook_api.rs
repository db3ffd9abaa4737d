//! Client for the parts of the CoW Protocol orderbook API the verifier reads.
//!
//! <https://api.cow.fi/docs>

use {
    crate::{dto, network::Network},
    anyhow::{Context, Result, ensure},
    app_data::AppDataHash,
    model::order::OrderUid,
    reqwest::{Client, StatusCode},
    std::time::Duration,
    url::Url,
};

const USER_AGENT: &str = "cowprotocol-order-verifier/0.1.0";

/// Where orders and their app data documents are read from.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait OrderSource: Send + Sync {
    /// Fetches the order with the given UID.
    async fn order(&self, uid: OrderUid) -> Result<dto::Order>;

    /// Fetches the app data document with the given hash. `None` if the
    /// orderbook does not know it.
    async fn full_app_data(&self, hash: AppDataHash) -> Result<Option<String>>;
}

pub struct OrderBookApi {
    client: Client,
    base: Url,
    network: Network,
}

impl OrderBookApi {
    pub fn new(client: Client, base: Url, network: Network) -> Self {
        // `Url::join` replaces the last path segment unless the path is a
        // directory.
        let mut base = base;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            client,
            base,
            network,
        }
    }

    /// Creates the HTTP client shared by all requests.
    pub fn client(timeout: Duration) -> Result<Client> {
        Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build http client")
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self
            .base
            .join(&format!("{}/api/v1/{path}", self.network.api_name()))?)
    }

    pub fn order_url(&self, uid: &OrderUid) -> Result<Url> {
        self.endpoint(&format!("orders/{uid}"))
    }

    pub fn app_data_url(&self, hash: &AppDataHash) -> Result<Url> {
        self.endpoint(&format!("app_data/{hash}"))
    }
}

#[async_trait::async_trait]
impl OrderSource for OrderBookApi {
    async fn order(&self, uid: OrderUid) -> Result<dto::Order> {
        let url = self.order_url(&uid)?;
        tracing::debug!(%url, "fetching order");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        let text = response.text().await?;
        ensure!(status.is_success(), "HTTP {status} error from {url}: {text}");

        serde_json::from_str(&text).with_context(|| format!("invalid order response: {text}"))
    }

    async fn full_app_data(&self, hash: AppDataHash) -> Result<Option<String>> {
        let url = self.app_data_url(&hash)?;
        tracing::debug!(%url, "fetching app data");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let text = response.text().await?;
        ensure!(status.is_success(), "HTTP {status} error from {url}: {text}");

        let app_data: dto::AppData = serde_json::from_str(&text)
            .with_context(|| format!("invalid app data response: {text}"))?;
        Ok(Some(app_data.full_app_data))
    }
}
