//! Fire-and-forget submission of archives to the ingest endpoint.

use super::types::{CandidateFile, FileSource, PipelineEvent, RecordId};
use crate::error::Result;
use reqwest::multipart::{Form, Part};
use std::sync::mpsc::Sender;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub const SEND_ERROR_MESSAGE: &str = "Error sending file";

#[derive(Clone)]
pub struct IngestTransport {
    client: reqwest::Client,
    url: String,
    runtime: Handle,
    sender: Sender<PipelineEvent>,
}

impl IngestTransport {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        runtime: Handle,
        sender: Sender<PipelineEvent>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            runtime,
            sender,
        }
    }

    /// Launch the POST for one record and return immediately.
    ///
    /// The response, or a network failure, is only logged. A failure to
    /// build the request body is reported back as
    /// [`PipelineEvent::TransportFailed`].
    pub fn submit(&self, id: RecordId, file: CandidateFile) -> JoinHandle<()> {
        let client = self.client.clone();
        let url = self.url.clone();
        let sender = self.sender.clone();

        self.runtime.spawn(async move {
            let form = match build_form(&file).await {
                Ok(form) => form,
                Err(e) => {
                    tracing::warn!(record = %id, file = %file.name, "failed to build ingest request: {}", e);
                    let _ = sender.send(PipelineEvent::TransportFailed {
                        id,
                        message: SEND_ERROR_MESSAGE.to_string(),
                    });
                    return;
                }
            };

            match client.post(&url).multipart(form).send().await {
                Ok(response) => {
                    tracing::debug!(record = %id, status = %response.status(), "ingest response ignored");
                }
                Err(e) => {
                    tracing::debug!(record = %id, "ingest request failed, ignoring: {}", e);
                }
            }
        })
    }
}

async fn build_form(file: &CandidateFile) -> Result<Form> {
    let bytes = match &file.source {
        FileSource::Path(path) => tokio::fs::read(path).await?,
        FileSource::Bytes(bytes) => bytes.to_vec(),
    };
    let part = Part::bytes(bytes)
        .file_name(file.name.clone())
        .mime_str(&file.mime_type)?;
    Ok(Form::new().part("file", part))
}
