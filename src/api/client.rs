use reqwest::{header, Client, StatusCode};

use super::error::ApiError;
use super::types::*;
use crate::config::Config;
use crate::grid::Activity;

/// HTTP client for the planner backend: the persistence gateway
/// (load/save the active grid) and the history browser (list/fetch
/// snapshots). Stateless apart from the base URL; every call is a plain
/// request/response with no retries.
pub struct PlannerClient {
    client: Client,
    base_url: String,
}

impl PlannerClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        Self::check_status(response).await?.json::<T>().await.map_err(ApiError::from)
    }

    async fn post<T: serde::de::DeserializeOwned, B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        Self::check_status(response).await?.json::<T>().await.map_err(ApiError::from)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    /// Fetch the active planner; `None` when nothing has been saved yet.
    pub async fn fetch_active(&self) -> Result<Option<ActivePlanner>, ApiError> {
        self.get("/evening").await
    }

    /// Replace the active planner's full activity set. The server deactivates
    /// the old planner, creates a new active one, and appends an immutable
    /// history snapshot of the result.
    pub async fn save(&self, activities: &[Activity]) -> Result<SaveResponse, ApiError> {
        self.post("/evening", &SaveRequest { activities }).await
    }

    /// List history snapshots, newest first (server caps at 50).
    pub async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        self.get("/evening/history").await
    }

    /// Fetch one snapshot by id. `ApiError::NotFound` for unknown ids.
    pub async fn history_item(&self, id: i64) -> Result<HistorySnapshot, ApiError> {
        self.get(&format!("/evening/history/{}", id)).await
    }
}
