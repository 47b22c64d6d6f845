use crate::config::GrocyConfig;
use crate::domain::model::{Product, QuantityUnit, ShoppingListEntry};
use crate::domain::ports::InventoryService;
use crate::utils::error::{AppError, InventoryError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Header names are case-insensitive; Grocy documents it as `GROCY-API-KEY`.
pub const API_KEY_HEADER: &str = "grocy-api-key";

/// `InventoryService` backed by the Grocy REST API.
#[derive(Debug, Clone)]
pub struct GrocyClient {
    client: Client,
    base_url: String,
}

impl GrocyClient {
    pub fn new(config: &GrocyConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key).map_err(|e| {
            AppError::InvalidConfigValueError {
                field: "grocy.api_key".to_string(),
                value: "<redacted>".to_string(),
                reason: e.to_string(),
            }
        })?;
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: api_base_url(&config.url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> std::result::Result<T, InventoryError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = check_status(self.client.get(&url).send().await?).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| InventoryError::Decode(e.to_string()))
    }
}

/// Grocy serves its API under `/api`; accept the base URL with or without it.
pub fn api_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.ends_with("/api") {
        trimmed.to_string()
    } else {
        format!("{}/api", trimmed)
    }
}

async fn check_status(response: Response) -> std::result::Result<Response, InventoryError> {
    let status = response.status();
    tracing::debug!("Grocy response status: {}", status);

    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(InventoryError::NotFound);
    }
    let body = response.text().await.unwrap_or_default();
    Err(InventoryError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl InventoryService for GrocyClient {
    async fn shopping_list(&self) -> std::result::Result<Vec<ShoppingListEntry>, InventoryError> {
        self.get_json("/stock/shopping_list").await
    }

    async fn product(&self, id: i64) -> std::result::Result<Product, InventoryError> {
        self.get_json(&format!("/objects/products/{}", id)).await
    }

    async fn quantity_unit(&self, id: i64) -> std::result::Result<QuantityUnit, InventoryError> {
        self.get_json(&format!("/objects/quantity_units/{}", id)).await
    }

    async fn delete_shopping_list_entry(&self, id: i64) -> std::result::Result<(), InventoryError> {
        let url = format!("{}/stock/shopping_list/{}", self.base_url, id);
        tracing::debug!("DELETE {}", url);

        check_status(self.client.delete(&url).send().await?).await?;
        Ok(())
    }
}
