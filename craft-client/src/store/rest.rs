//! PostgREST catalog store
//!
//! Talks to the `/rest/v1/{table}` endpoint of a PostgREST (Supabase)
//! backend. Error payloads come back as `{code, message}` pairs with the
//! PostgreSQL SQLSTATE as the code.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use shared::models::{CraftItemRow, CraftItemWrite, ItemId};

use super::{CatalogStore, Projection};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Error body returned by the store
#[derive(serde::Deserialize)]
struct StoreErrorResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// REST catalog store
#[derive(Debug, Clone)]
pub struct RestCatalogStore {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RestCatalogStore {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        if config.table.trim().is_empty() {
            return Err(ClientError::Config("table name is empty".into()));
        }
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                config.store_url.trim_end_matches('/'),
                config.table
            ),
            api_key: config.api_key.clone(),
        })
    }

    /// Table endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let mut req = self.client.request(method, &self.endpoint);
        if let Some(key) = &self.api_key {
            req = req
                .header("apikey", key)
                .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", key));
        }
        req
    }

    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await?;
        let (code, message) = match serde_json::from_str::<StoreErrorResponse>(&text) {
            Ok(body) => (
                body.code.unwrap_or_else(|| status.as_u16().to_string()),
                body.message.unwrap_or_else(|| text.clone()),
            ),
            // Gateway pages and proxies answer with plain text
            Err(_) => (status.as_u16().to_string(), text),
        };
        tracing::debug!(status = %status, code = %code, "Store request failed");
        Err(ClientError::Store {
            code,
            message,
            status: Some(status.as_u16()),
        })
    }
}

#[async_trait]
impl CatalogStore for RestCatalogStore {
    async fn select_items(&self, projection: Projection) -> ClientResult<Vec<CraftItemRow>> {
        let response = self
            .request(Method::GET)
            .query(&[("select", projection.columns()), ("order", "id.desc")])
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn insert_item(&self, item: &CraftItemWrite) -> ClientResult<CraftItemRow> {
        let response = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&[item])
            .send()
            .await?;
        let response = Self::check(response).await?;
        let rows: Vec<CraftItemRow> = response.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ClientError::InvalidResponse("insert returned no rows".into()))
    }

    async fn update_item(&self, id: ItemId, item: &CraftItemWrite) -> ClientResult<()> {
        let response = self
            .request(Method::PATCH)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(item)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_item(&self, id: ItemId) -> ClientResult<()> {
        let response = self
            .request(Method::DELETE)
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
