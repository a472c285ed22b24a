use super::fetch_json;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeStats {
    #[serde(rename = "valor_total")]
    pub total_value: f64,
    #[serde(rename = "total_documentos")]
    pub total_documents: u64,
    #[serde(rename = "documentos_analisados")]
    pub analyzed_documents: u64,
}

#[derive(Clone)]
pub struct HomeStatsClient {
    http: reqwest::Client,
    url: String,
}

impl HomeStatsClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub async fn try_fetch(&self) -> Result<HomeStats> {
        fetch_json(self.http.get(&self.url)).await
    }

    /// Live totals, or zeros when the endpoint is unavailable.
    pub async fn fetch(&self) -> HomeStats {
        self.try_fetch().await.unwrap_or_else(|e| {
            tracing::warn!("Error fetching home stats: {}", e);
            HomeStats::default()
        })
    }
}
