//! Ties validation, the session list, timers, transport and notifications
//! together. Owned by the UI thread; background tasks talk back through
//! the event channel drained by [`UploadPipeline::process_events`].

use super::preview::archive_preview;
use super::session::{SessionTracker, TickOutcome};
use super::simulator::ProgressSimulator;
use super::transport::IngestTransport;
use super::types::{
    CandidateFile, PipelineEvent, RecordId, RecordStatus, SessionStats, UploadRecord,
};
use super::validation::{validate_upload_url, Rejection, Validator};
use crate::config::AppConfig;
use crate::notify::{Notice, Notifier};
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use tokio::runtime::Handle;

pub struct UploadPipeline {
    tracker: SessionTracker,
    validator: Validator,
    simulator: ProgressSimulator,
    transport: IngestTransport,
    notifier: Notifier,
    increment: u8,
    runtime: Handle,
    sender: Sender<PipelineEvent>,
    events: Receiver<PipelineEvent>,
    sources: HashMap<RecordId, CandidateFile>,
}

impl UploadPipeline {
    pub fn new(
        config: &AppConfig,
        client: reqwest::Client,
        runtime: Handle,
        notifier: Notifier,
    ) -> Self {
        let (sender, events) = mpsc::channel();
        let simulator = ProgressSimulator::new(
            runtime.clone(),
            config.upload.tick_interval(),
            sender.clone(),
        );
        let transport = IngestTransport::new(
            client,
            config.endpoints.ingest_url.clone(),
            runtime.clone(),
            sender.clone(),
        );

        Self {
            tracker: SessionTracker::new(),
            validator: Validator::new(&config.upload),
            simulator,
            transport,
            notifier,
            increment: config.upload.increment,
            runtime,
            sender,
            events,
            sources: HashMap::new(),
        }
    }

    /// Validate a batch of files and start every accepted one.
    pub fn submit(&mut self, files: Vec<CandidateFile>) -> Vec<RecordId> {
        let outcome = self.validator.validate_batch(files, self.tracker.records());

        for (file, rejection) in outcome.rejected {
            tracing::info!(file = %file.name, "rejected: {}", rejection);
            let notice = match rejection {
                Rejection::Duplicate => Notice::Duplicate { file: file.name },
                other => Notice::Rejected {
                    file: file.name,
                    reason: other.to_string(),
                },
            };
            self.notifier.notify(notice);
        }

        let mut ids = Vec::with_capacity(outcome.accepted.len());
        for accepted in outcome.accepted {
            let record = UploadRecord::new(accepted.sanitized_name, accepted.file.size);
            let id = self.tracker.register(record);
            tracing::info!(record = %id, file = %accepted.file.name, size = accepted.file.size, "upload started");

            self.sources.insert(id, accepted.file.clone());
            self.transport.submit(id, accepted.file);
            self.simulator.start(id);
            ids.push(id);
        }
        ids
    }

    /// Accept a remote archive URL. Only announces it; nothing is fetched.
    pub fn submit_url(&self, raw: &str) -> bool {
        match validate_upload_url(raw) {
            Ok(url) => {
                tracing::info!(%url, "URL upload requested");
                self.notifier
                    .info("Upload via URL", format!("Downloading file from: {}", url));
                true
            }
            Err(e) => {
                self.notifier.error("Invalid URL", e.to_string());
                false
            }
        }
    }

    /// Apply everything the background tasks reported since the last call.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    pub fn handle_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::Tick { id, generation }
                if !self.simulator.is_current(id, generation) =>
            {
                tracing::debug!(record = %id, generation, "stale tick dropped");
            }
            PipelineEvent::Tick { id, .. } => match self.tracker.advance(id, self.increment) {
                TickOutcome::Advanced(progress) => {
                    tracing::debug!(record = %id, progress, "tick");
                }
                TickOutcome::Completed => {
                    self.simulator.cancel(id);
                    if let Some(record) = self.tracker.get(id) {
                        tracing::info!(record = %id, file = %record.name, "upload complete");
                        self.notifier.notify(Notice::Succeeded {
                            file: record.name.clone(),
                        });
                    }
                }
                TickOutcome::Skipped => {}
                TickOutcome::Unknown => {
                    tracing::debug!(record = %id, "tick for untracked record dropped");
                    self.simulator.cancel(id);
                }
            },
            PipelineEvent::Preview { id, result } => match result {
                Ok(listing) => {
                    self.tracker.set_content(id, listing);
                }
                Err(message) => {
                    if let Some(record) = self.tracker.get(id) {
                        self.notifier.error(
                            "Preview unavailable",
                            format!("{}: {}", record.name, message),
                        );
                    }
                }
            },
            PipelineEvent::TransportFailed { id, message } => {
                if self.tracker.mark_error(id, message.clone()) {
                    self.simulator.cancel(id);
                    if let Some(record) = self.tracker.get(id) {
                        self.notifier.notify(Notice::Errored {
                            file: record.name.clone(),
                            message,
                        });
                    }
                }
            }
        }
    }

    pub fn pause(&mut self, id: RecordId) -> bool {
        if self.tracker.pause(id) {
            self.simulator.cancel(id);
            true
        } else {
            false
        }
    }

    pub fn resume(&mut self, id: RecordId) -> bool {
        if self.tracker.resume(id) {
            self.simulator.start(id);
            true
        } else {
            false
        }
    }

    /// Restart a record from zero, resending its file.
    pub fn retry(&mut self, id: RecordId) -> bool {
        if !self.tracker.retry(id) {
            return false;
        }
        self.simulator.cancel(id);
        if let Some(file) = self.sources.get(&id) {
            self.transport.submit(id, file.clone());
        }
        self.simulator.start(id);
        true
    }

    pub fn remove(&mut self, id: RecordId) -> bool {
        self.simulator.cancel(id);
        self.sources.remove(&id);
        if self.tracker.remove(id).is_some() {
            self.notifier.notify(Notice::Removed);
            true
        } else {
            false
        }
    }

    pub fn clear_all(&mut self) {
        self.simulator.cancel_all();
        self.sources.clear();
        let cleared = self.tracker.clear();
        tracing::info!(count = cleared.len(), "upload list cleared");
        self.notifier.notify(Notice::Cleared);
    }

    /// List a finished record's archive entries into its `content`. The
    /// listing arrives as a [`PipelineEvent::Preview`].
    pub fn request_preview(&self, id: RecordId) -> bool {
        let ready = self
            .tracker
            .get(id)
            .map(|r| r.status == RecordStatus::Success && r.content.is_none())
            .unwrap_or(false);
        let file = match self.sources.get(&id) {
            Some(file) if ready => file.clone(),
            _ => return false,
        };

        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let result = archive_preview(&file).await.map_err(|e| {
                tracing::warn!(record = %id, file = %file.name, "preview failed: {}", e);
                e.to_string()
            });
            let _ = sender.send(PipelineEvent::Preview { id, result });
        });
        true
    }

    pub fn records(&self) -> &[UploadRecord] {
        self.tracker.records()
    }

    pub fn get(&self, id: RecordId) -> Option<&UploadRecord> {
        self.tracker.get(id)
    }

    pub fn stats(&self) -> SessionStats {
        self.tracker.stats()
    }

    pub fn aggregate_progress(&self) -> u8 {
        self.tracker.aggregate_progress()
    }

    pub fn active_timers(&self) -> usize {
        self.simulator.active_timers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastBus;
    use crate::test_support::{zip_archive, UNREACHABLE_URL};
    use crate::upload::FileProcessor;
    use std::sync::Arc;
    use std::time::Duration;

    fn pipeline() -> UploadPipeline {
        let mut config = AppConfig::default();
        config.endpoints.ingest_url = UNREACHABLE_URL.to_string();
        let notifier = Notifier::new(ToastBus::new(5, Duration::from_secs(60)));
        UploadPipeline::new(&config, reqwest::Client::new(), Handle::current(), notifier)
    }

    async fn settle(pipeline: &mut UploadPipeline, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        pipeline.process_events();
    }

    #[tokio::test(start_paused = true)]
    async fn finished_archive_gets_its_listing() {
        let mut pipeline = pipeline();
        let bytes = zip_archive(&["NFe_1.xml", "NFe_2.xml"]);
        let file = FileProcessor::candidate_from_bytes("lote.zip", Arc::from(bytes));
        let id = pipeline.submit(vec![file])[0];

        settle(&mut pipeline, 3050).await;
        assert_eq!(pipeline.get(id).unwrap().status, RecordStatus::Success);
        assert!(pipeline.request_preview(id));
        settle(&mut pipeline, 0).await;

        assert_eq!(
            pipeline.get(id).unwrap().content.as_deref(),
            Some("NFe_1.xml\nNFe_2.xml")
        );
        assert!(!pipeline.request_preview(id));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_tick_is_ignored() {
        let mut pipeline = pipeline();
        let id = pipeline.submit(vec![FileProcessor::candidate_from_bytes(
            "a.zip",
            Arc::from(vec![0u8; 4]),
        )])[0];

        pipeline.handle_event(PipelineEvent::Tick { id, generation: u64::MAX });
        assert_eq!(pipeline.get(id).unwrap().progress, 0);
    }
}
