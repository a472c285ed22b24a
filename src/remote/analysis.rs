//! Per-document AI analysis.

use super::fetch_json;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finding {
    #[serde(rename = "campo", skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "diferenca", skip_serializing_if = "Option::is_none")]
    pub difference: Option<String>,
}

impl Finding {
    /// First of title, category and field, for use as a heading.
    pub fn heading(&self) -> &str {
        self.title
            .as_deref()
            .or(self.category.as_deref())
            .or(self.field.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiAnalysis {
    #[serde(rename = "resumo")]
    pub summary: Option<String>,
    #[serde(rename = "problemas")]
    pub problems: Vec<Finding>,
    #[serde(rename = "riscos")]
    pub risks: Vec<Finding>,
    #[serde(rename = "agressores")]
    pub aggressors: Vec<Finding>,
    #[serde(rename = "recomendacoes")]
    pub recommendations: Vec<Finding>,
}

fn finding(title: Option<&str>, category: Option<&str>, description: &str) -> Finding {
    Finding {
        title: title.map(str::to_string),
        category: category.map(str::to_string),
        description: Some(description.to_string()),
        ..Default::default()
    }
}

pub fn mock_analysis() -> AiAnalysis {
    let mut divergence = finding(
        Some("Divergência de Valores"),
        None,
        "Foi identificada uma possível inconsistência entre o valor declarado e os itens discriminados.",
    );
    divergence.difference = Some("R$ 0,00".to_string());

    AiAnalysis {
        summary: Some(
            "Análise detalhada da nota fiscal identificou alguns pontos de atenção relacionados à validação de dados e conformidade tributária."
                .to_string(),
        ),
        problems: vec![divergence],
        risks: vec![finding(
            Some("Risco Fiscal Baixo"),
            None,
            "A operação apresenta conformidade com a legislação vigente.",
        )],
        aggressors: vec![finding(
            None,
            Some("Validação"),
            "Todos os campos obrigatórios estão preenchidos corretamente.",
        )],
        recommendations: vec![finding(
            Some("Arquivamento Digital"),
            None,
            "Recomenda-se manter cópia digital da nota fiscal por no mínimo 5 anos.",
        )],
    }
}

#[derive(Serialize)]
struct AnalysisRequest<'a> {
    chave_acesso: &'a str,
}

#[derive(Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    url: String,
}

impl AnalysisClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub async fn try_fetch(&self, document_id: &str) -> Result<AiAnalysis> {
        let request = self.http.post(&self.url).json(&AnalysisRequest {
            chave_acesso: document_id,
        });
        let payload: Value = fetch_json(request).await?;
        match &payload {
            Value::Null => return Err(Error::InvalidInput("analysis is null".to_string())),
            Value::Object(map) if map.is_empty() => {
                return Err(Error::InvalidInput("analysis is empty".to_string()))
            }
            _ => {}
        }
        Ok(serde_json::from_value(payload)?)
    }

    /// Analysis for `document_id`, or the mock analysis when there is no
    /// document or the endpoint has nothing usable.
    pub async fn fetch(&self, document_id: Option<&str>) -> AiAnalysis {
        let Some(id) = document_id else {
            return mock_analysis();
        };
        match self.try_fetch(id).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(document = id, "Error fetching AI analysis, using mock: {}", e);
                mock_analysis()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{serve_once, UNREACHABLE_URL};

    #[tokio::test]
    async fn posts_access_key_and_decodes() {
        let (base, server) = serve_once(
            200,
            r#"{"resumo":"ok","problemas":[{"campo":"ICMS","descricao":"base errada","diferenca":"R$ 1,00"}]}"#,
        )
        .await;
        let analysis = AnalysisClient::new(reqwest::Client::new(), base)
            .fetch(Some("3524"))
            .await;

        assert_eq!(analysis.summary.as_deref(), Some("ok"));
        assert_eq!(analysis.problems[0].heading(), "ICMS");
        assert_eq!(analysis.problems[0].difference.as_deref(), Some("R$ 1,00"));
        assert!(analysis.risks.is_empty());

        let request = server.await.unwrap();
        assert!(request.starts_with("POST"));
        assert!(request.contains(r#"{"chave_acesso":"3524"}"#));
    }

    #[tokio::test]
    async fn empty_object_and_null_use_mock() {
        for body in ["{}", "null"] {
            let (base, _server) = serve_once(200, body).await;
            let analysis = AnalysisClient::new(reqwest::Client::new(), base)
                .fetch(Some("k"))
                .await;
            assert_eq!(analysis, mock_analysis());
        }
    }

    #[tokio::test]
    async fn failures_use_mock() {
        let (base, _server) = serve_once(503, "").await;
        let client = AnalysisClient::new(reqwest::Client::new(), base);
        assert_eq!(client.fetch(Some("k")).await, mock_analysis());

        let client = AnalysisClient::new(reqwest::Client::new(), UNREACHABLE_URL);
        assert_eq!(client.fetch(Some("k")).await, mock_analysis());
        assert_eq!(client.fetch(None).await, mock_analysis());
    }

    #[test]
    fn mock_headings() {
        let mock = mock_analysis();
        assert_eq!(mock.aggressors[0].heading(), "Validação");
        assert_eq!(mock.recommendations[0].heading(), "Arquivamento Digital");
    }
}
