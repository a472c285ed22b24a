//! Dashboard KPIs and series.

use super::fetch_json;
use crate::error::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Period bounds are kept as the backend sends them; only displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    #[serde(rename = "inicio")]
    pub start: String,
    #[serde(rename = "fim")]
    pub end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Period {
    #[serde(rename = "inicio")]
    pub start: String,
    #[serde(rename = "fim")]
    pub end: String,
    #[serde(rename = "anterior")]
    pub previous: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    #[serde(rename = "total_documentos")]
    pub total_documents: u64,
    #[serde(rename = "total_documentos_delta_pct")]
    pub total_documents_delta_pct: f64,
    #[serde(rename = "valor_total")]
    pub total_value: f64,
    #[serde(rename = "valor_total_delta_pct")]
    pub total_value_delta_pct: f64,
    #[serde(rename = "taxa_erro_pct")]
    pub error_rate_pct: f64,
    #[serde(rename = "processamento_automatico_pct")]
    pub automatic_processing_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCount {
    #[serde(rename = "mes")]
    pub month: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierShare {
    #[serde(rename = "fornecedor")]
    pub supplier: String,
    #[serde(rename = "valor")]
    pub value: f64,
    #[serde(rename = "percentual")]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyValue {
    #[serde(rename = "mes")]
    pub month: String,
    #[serde(rename = "valor")]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxSummary {
    #[serde(rename = "disponivel")]
    pub available: bool,
    #[serde(rename = "mensagem")]
    pub message: String,
    pub icms: Option<f64>,
    pub ipi: Option<f64>,
    pub pis: Option<f64>,
    pub cofins: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(rename = "periodo", default)]
    pub period: Period,
    pub kpis: Kpis,
    #[serde(rename = "documentos_por_mes", default)]
    pub documents_per_month: Vec<MonthlyCount>,
    #[serde(rename = "distribuicao_fornecedor", default)]
    pub supplier_distribution: Vec<SupplierShare>,
    #[serde(rename = "evolucao_valor_total", default)]
    pub total_value_evolution: Vec<MonthlyValue>,
    #[serde(rename = "resumo_impostos", default)]
    pub taxes: TaxSummary,
}

/// Fixed payload shown whenever the dashboard endpoint is unavailable.
pub fn mock_dashboard() -> DashboardData {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    let months = ["2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06"];
    let counts = [65, 78, 90, 81, 95, 102];
    let values = [125000.0, 145000.0, 180000.0, 165000.0, 195000.0, 210000.0];
    let suppliers = [
        ("Fornecedor A", 735000.0, 35.0),
        ("Fornecedor B", 525000.0, 25.0),
        ("Fornecedor C", 420000.0, 20.0),
        ("Fornecedor D", 315000.0, 15.0),
        ("Outros", 105000.0, 5.0),
    ];

    DashboardData {
        period: Period {
            start: today.clone(),
            end: today.clone(),
            previous: DateRange {
                start: today.clone(),
                end: today,
            },
        },
        kpis: Kpis {
            total_documents: 1247,
            total_documents_delta_pct: 12.0,
            total_value: 2_100_000.0,
            total_value_delta_pct: 8.0,
            error_rate_pct: 2.3,
            automatic_processing_pct: 97.7,
        },
        documents_per_month: months
            .iter()
            .zip(counts)
            .map(|(m, total)| MonthlyCount {
                month: m.to_string(),
                total,
            })
            .collect(),
        supplier_distribution: suppliers
            .iter()
            .map(|(supplier, value, percentage)| SupplierShare {
                supplier: supplier.to_string(),
                value: *value,
                percentage: *percentage,
            })
            .collect(),
        total_value_evolution: months
            .iter()
            .zip(values)
            .map(|(m, value)| MonthlyValue {
                month: m.to_string(),
                value,
            })
            .collect(),
        taxes: TaxSummary {
            available: true,
            message: String::new(),
            icms: Some(45000.0),
            ipi: Some(12000.0),
            pis: Some(8000.0),
            cofins: Some(15000.0),
        },
    }
}

#[derive(Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    url: String,
}

impl DashboardClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub async fn try_fetch(&self) -> Result<DashboardData> {
        fetch_json(self.http.get(&self.url)).await
    }

    /// Live data, or the mock payload on any failure.
    pub async fn fetch(&self) -> DashboardData {
        match self.try_fetch().await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Error fetching dashboard data, using mock: {}", e);
                mock_dashboard()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{serve_once, UNREACHABLE_URL};

    #[tokio::test]
    async fn server_error_yields_mock_kpis() {
        let (base, server) = serve_once(500, "{\"error\":\"boom\"}").await;
        let client = DashboardClient::new(reqwest::Client::new(), format!("{}/dashboard", base));

        let data = client.fetch().await;
        server.await.unwrap();

        assert_eq!(data.kpis.total_documents, 1247);
        assert_eq!(data.kpis.error_rate_pct, 2.3);
        assert_eq!(data.documents_per_month.len(), 6);
        assert_eq!(data.supplier_distribution.len(), 5);
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_mock() {
        let client = DashboardClient::new(reqwest::Client::new(), UNREACHABLE_URL);
        assert!(client.try_fetch().await.is_err());
        assert_eq!(client.fetch().await.kpis.total_value, 2_100_000.0);
    }

    #[tokio::test]
    async fn live_payload_is_decoded() {
        let body = serde_json::json!({
            "periodo": {
                "inicio": "2024-06-01T00:00:00Z",
                "fim": "2024-06-30T00:00:00Z",
                "anterior": {"inicio": "2024-05-01T00:00:00Z", "fim": "2024-05-31T00:00:00Z"}
            },
            "kpis": {
                "total_documentos": 10,
                "total_documentos_delta_pct": -5.0,
                "valor_total": 1234.5,
                "valor_total_delta_pct": 1.5,
                "taxa_erro_pct": 0.0,
                "processamento_automatico_pct": 100.0
            },
            "documentos_por_mes": [{"mes": "2024-06", "total": 10}],
            "distribuicao_fornecedor": [],
            "evolucao_valor_total": [{"mes": "2024-06", "valor": 1234.5}],
            "resumo_impostos": {
                "disponivel": false,
                "mensagem": "Sem dados",
                "icms": null, "ipi": null, "pis": null, "cofins": null
            }
        })
        .to_string();
        let (base, _server) = serve_once(200, &body).await;
        let client = DashboardClient::new(reqwest::Client::new(), base);

        let data = client.try_fetch().await.unwrap();
        assert_eq!(data.kpis.total_documents, 10);
        assert_eq!(data.total_value_evolution[0].value, 1234.5);
        assert!(!data.taxes.available);
        assert_eq!(data.taxes.icms, None);
    }

    #[tokio::test]
    async fn date_only_period_keeps_live_kpis() {
        let body = r#"{
            "periodo": {"inicio": "2024-06-01", "fim": "2024-06-30"},
            "kpis": {
                "total_documentos": 42,
                "total_documentos_delta_pct": 3.0,
                "valor_total": 999.0,
                "valor_total_delta_pct": 0.5,
                "taxa_erro_pct": 1.0,
                "processamento_automatico_pct": 99.0
            }
        }"#;
        let (base, _server) = serve_once(200, body).await;
        let data = DashboardClient::new(reqwest::Client::new(), base).fetch().await;

        assert_eq!(data.kpis.total_documents, 42);
        assert_eq!(data.period.start, "2024-06-01");
        assert_eq!(data.period.previous, DateRange::default());
        assert!(data.documents_per_month.is_empty());
        assert!(!data.taxes.available);
    }

    #[tokio::test]
    async fn malformed_body_yields_mock() {
        let (base, _server) = serve_once(200, "not json").await;
        let client = DashboardClient::new(reqwest::Client::new(), base);
        assert_eq!(client.fetch().await.kpis.total_documents, 1247);
    }
}
