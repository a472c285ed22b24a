//! Fiscal document listing and the mapping from raw webhook records.

use super::fetch_json;
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

const TAG_MAX_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentStatus {
    Success,
    Warning,
    Error,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 3] = [
        DocumentStatus::Success,
        DocumentStatus::Warning,
        DocumentStatus::Error,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DocumentStatus::Success => "Processed",
            DocumentStatus::Warning => "Pending",
            DocumentStatus::Error => "Error",
        }
    }

    /// Derive the status from the most recent fiscal event.
    pub fn from_event(event: &str) -> Self {
        let event = event.to_lowercase();
        if event.contains("cancelamento") || event.contains("denegado") {
            DocumentStatus::Error
        } else if event.contains("pendente") || event.is_empty() {
            DocumentStatus::Warning
        } else {
            DocumentStatus::Success
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub company: String,
    pub cnpj: String,
    pub value: f64,
    pub status: DocumentStatus,
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub items: u32,
    pub icms: f64,
}

/// One record as the documents webhook returns it. Every field is read as
/// a loose JSON value so one oddly typed field cannot discard the others.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDocument {
    chave_acesso: Option<Value>,
    numero: Option<Value>,
    razao_social_emitente: Option<Value>,
    valor_nota_fiscal: Option<Value>,
    cpf_cnpj_emitente: Option<Value>,
    evento_mais_recente: Option<Value>,
    data_emissao: Option<Value>,
    natureza_operacao: Option<Value>,
}

/// Non-empty text form of a JSON scalar.
fn scalar_text(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_amount(value: &Option<Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// `12345678000190` → `12.345.678/0001-90`; anything else is kept verbatim.
pub fn format_cnpj(raw: &str) -> String {
    if raw.len() != 14 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return raw.to_string();
    }
    format!(
        "{}.{}.{}/{}-{}",
        &raw[0..2],
        &raw[2..5],
        &raw[5..8],
        &raw[8..12],
        &raw[12..14]
    )
}

fn parse_issue_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}

fn map_raw(raw: RawDocument, index: usize) -> Document {
    let cnpj = scalar_text(&raw.cpf_cnpj_emitente).unwrap_or_default();
    let event = scalar_text(&raw.evento_mais_recente).unwrap_or_default();

    Document {
        id: scalar_text(&raw.chave_acesso).unwrap_or_else(|| (index + 1).to_string()),
        name: format!(
            "NFe_{}.xml",
            scalar_text(&raw.numero).unwrap_or_else(|| index.to_string())
        ),
        company: scalar_text(&raw.razao_social_emitente).unwrap_or_else(|| "N/A".to_string()),
        cnpj: format_cnpj(&cnpj),
        value: parse_amount(&raw.valor_nota_fiscal),
        status: DocumentStatus::from_event(&event),
        date: scalar_text(&raw.data_emissao)
            .and_then(|d| parse_issue_date(&d))
            .unwrap_or_else(Utc::now),
        tags: scalar_text(&raw.natureza_operacao)
            .map(|s| vec![s.chars().take(TAG_MAX_CHARS).collect()])
            .unwrap_or_default(),
        items: 1,
        icms: 0.0,
    }
}

/// Map the webhook payload. `None` when it carries no usable records.
pub fn map_documents(payload: &Value) -> Option<Vec<Document>> {
    let items = payload.as_array().filter(|items| !items.is_empty())?;
    Some(
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let raw = RawDocument::deserialize(item).unwrap_or_else(|e| {
                    tracing::debug!(index, "unexpected document shape: {}", e);
                    RawDocument::default()
                });
                map_raw(raw, index)
            })
            .collect(),
    )
}

fn mock_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn mock_documents() -> Vec<Document> {
    let rows: [(&str, &str, &str, &str, f64, DocumentStatus, u32, &[&str], u32, f64); 5] = [
        (
            "1",
            "NFe_12345678901234567890.xml",
            "Empresa ABC Ltda",
            "12.345.678/0001-90",
            15750.0,
            DocumentStatus::Success,
            15,
            &["Eletrônicos", "Urgente"],
            12,
            2835.0,
        ),
        (
            "2",
            "NFe_09876543210987654321.xml",
            "Fornecedor XYZ S.A.",
            "98.765.432/0001-10",
            8320.5,
            DocumentStatus::Warning,
            14,
            &["Alimentação"],
            5,
            1497.69,
        ),
        (
            "3",
            "NFe_11111111111111111111.xml",
            "Empresa DEF ME",
            "11.111.111/0001-11",
            2100.0,
            DocumentStatus::Error,
            13,
            &["Serviços"],
            1,
            378.0,
        ),
        (
            "4",
            "NFe_22222222222222222222.xml",
            "Tech Solutions Ltda",
            "22.222.222/0001-22",
            45000.0,
            DocumentStatus::Success,
            12,
            &["TI", "Hardware"],
            25,
            8100.0,
        ),
        (
            "5",
            "NFe_33333333333333333333.xml",
            "Comércio ABC ME",
            "33.333.333/0001-33",
            1250.75,
            DocumentStatus::Success,
            11,
            &["Material de Escritório"],
            8,
            225.14,
        ),
    ];

    rows.iter()
        .map(
            |(id, name, company, cnpj, value, status, day, tags, items, icms)| Document {
                id: id.to_string(),
                name: name.to_string(),
                company: company.to_string(),
                cnpj: cnpj.to_string(),
                value: *value,
                status: *status,
                date: mock_date(2024, 1, *day),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                items: *items,
                icms: *icms,
            },
        )
        .collect()
}

#[derive(Clone)]
pub struct DocumentsClient {
    http: reqwest::Client,
    url: String,
}

impl DocumentsClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub async fn try_fetch(&self) -> Result<Vec<Document>> {
        let payload: Value = fetch_json(self.http.get(&self.url)).await?;
        map_documents(&payload)
            .ok_or_else(|| Error::InvalidInput("documents endpoint returned no records".to_string()))
    }

    /// Live documents, or the mock set on failure or an empty payload.
    pub async fn fetch(&self) -> Vec<Document> {
        match self.try_fetch().await {
            Ok(documents) => documents,
            Err(e) => {
                tracing::warn!("Error fetching documents, using mock: {}", e);
                mock_documents()
            }
        }
    }
}
