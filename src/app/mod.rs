mod state;
mod ui;

use crate::config::AppConfig;
use crate::error::Error;
use crate::export::{ExportFormat, TranscriptExporter};
use crate::notify::{Notifier, ToastBus};
use crate::remote::analysis::{AiAnalysis, AnalysisClient};
use crate::remote::chat::ChatClient;
use crate::remote::dashboard::DashboardClient;
use crate::remote::documents::DocumentsClient;
use crate::remote::home::HomeStatsClient;
use crate::remote::spawn_poller;
use crate::upload::{CandidateFile, FileProcessor, UploadPipeline};
use eframe::{egui, App};
pub use state::{
    ChatViewState, DocumentsViewState, FilterInputs, RemoteState, Tab, UploadViewState,
};
use std::path::PathBuf;
use std::sync::mpsc::{self as std_mpsc, Sender};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

pub struct NfeApp {
    runtime: Handle,
    notifier: Notifier,
    pipeline: UploadPipeline,
    analysis_client: AnalysisClient,
    analysis_sender: Sender<(String, AiAnalysis)>,
    chat_client: ChatClient,
    exporter: TranscriptExporter,
    pollers: Vec<JoinHandle<()>>,
    tab: Tab,
    upload: UploadViewState,
    remote: RemoteState,
    documents: DocumentsViewState,
    chat: ChatViewState,
}

impl NfeApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        runtime: Handle,
        http: reqwest::Client,
        bus: ToastBus,
    ) -> Self {
        tracing::info!("Initializing NF-e Uploader");
        let notifier = Notifier::new(bus);
        let pipeline = UploadPipeline::new(&config, http.clone(), runtime.clone(), notifier.clone());
        let endpoints = &config.endpoints;
        let interval = config.polling.interval();

        let mut remote = RemoteState::default();
        let mut pollers = Vec::new();

        let dashboard = DashboardClient::new(http.clone(), endpoints.dashboard_url.clone());
        let (receiver, handle) = spawn_poller(&runtime, interval, move || {
            let client = dashboard.clone();
            async move { client.fetch().await }
        });
        remote.dashboard_receiver = Some(receiver);
        pollers.push(handle);

        let home = HomeStatsClient::new(http.clone(), endpoints.home_url.clone());
        let (receiver, handle) = spawn_poller(&runtime, interval, move || {
            let client = home.clone();
            async move { client.fetch().await }
        });
        remote.home_receiver = Some(receiver);
        pollers.push(handle);

        let documents_client = DocumentsClient::new(http.clone(), endpoints.documents_url.clone());
        let (receiver, handle) = spawn_poller(&runtime, interval, move || {
            let client = documents_client.clone();
            async move { client.fetch().await }
        });
        remote.documents_receiver = Some(receiver);
        pollers.push(handle);

        let (analysis_sender, analysis_receiver) = std_mpsc::channel();
        let documents = DocumentsViewState {
            analysis_receiver: Some(analysis_receiver),
            ..Default::default()
        };

        Self {
            notifier,
            pipeline,
            analysis_client: AnalysisClient::new(http.clone(), endpoints.analysis_url.clone()),
            analysis_sender,
            chat_client: ChatClient::new(
                http,
                endpoints.chat_url.clone(),
                endpoints.chat_session_id.clone(),
            ),
            exporter: TranscriptExporter::new(&config.export),
            pollers,
            runtime,
            tab: Tab::default(),
            upload: UploadViewState::default(),
            remote,
            documents,
            chat: ChatViewState::default(),
        }
    }

    pub fn add_files(&mut self, files: Vec<CandidateFile>) {
        if files.is_empty() {
            return;
        }
        let started = self.pipeline.submit(files);
        tracing::debug!(started = started.len(), "files submitted");
    }

    pub fn add_paths(&mut self, paths: Vec<PathBuf>) {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            match FileProcessor::candidate_from_path(&path) {
                Ok(file) => files.push(file),
                Err(e) => {
                    tracing::warn!("Cannot read {}: {}", path.display(), e);
                    self.notifier
                        .error("Cannot read file", format!("{}: {}", path.display(), e));
                }
            }
        }
        self.add_files(files);
    }

    pub fn add_folder(&mut self, folder: PathBuf) {
        if self.upload.is_scanning() {
            return;
        }
        tracing::info!(folder = %folder.display(), "Processing folder");
        self.upload.folder_path = Some(folder.display().to_string());
        let receiver = FileProcessor::new(folder).scan_in_background(&self.runtime);
        self.upload.folder_receiver = Some(receiver);
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let mut files = Vec::new();
        let mut paths = Vec::new();
        for file in dropped {
            if let Some(path) = file.path {
                paths.push(path);
            } else if let Some(bytes) = file.bytes {
                files.push(FileProcessor::candidate_from_bytes(&file.name, bytes));
            }
        }
        self.add_paths(paths);
        self.add_files(files);
    }

    pub fn submit_url(&mut self) {
        if self.pipeline.submit_url(&self.upload.url_input) {
            self.upload.url_input.clear();
        }
    }

    pub fn open_document(&mut self, id: String) {
        self.request_analysis(&id);
        self.documents.note_input.clear();
        self.documents.open_document = Some(id);
    }

    fn request_analysis(&self, id: &str) {
        if self.documents.analyses.contains_key(id) {
            return;
        }
        let client = self.analysis_client.clone();
        let sender = self.analysis_sender.clone();
        let id = id.to_string();
        self.runtime.spawn(async move {
            let analysis = client.fetch(Some(&id)).await;
            let _ = sender.send((id, analysis));
        });
    }

    pub fn send_chat_message(&mut self) {
        if self.chat.conversation.is_awaiting_reply() {
            return;
        }
        let text = match self.chat.conversation.begin_send(&self.chat.input) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("Chat message not sent: {}", e);
                return;
            }
        };
        self.chat.input.clear();

        let (sender, receiver) = std_mpsc::channel();
        self.chat.reply_receiver = Some(receiver);
        let client = self.chat_client.clone();
        self.runtime.spawn(async move {
            let reply = client.send(&text).await;
            let _ = sender.send(reply);
        });
    }

    pub fn clear_chat(&mut self) {
        self.chat.conversation.clear();
        self.chat.reply_receiver = None;
        self.notifier
            .info("Chat cleared", "Conversation history was deleted.");
    }

    pub fn export_chat(&mut self, format: ExportFormat) {
        match self.exporter.export(&self.chat.conversation, format) {
            Ok(path) => {
                self.notifier.success(
                    "Export complete",
                    format!("Conversation saved to {}", path.display()),
                );
                if let Err(e) = open::that(&path) {
                    tracing::warn!("Could not open {}: {}", path.display(), e);
                }
            }
            Err(Error::Export(message)) => self.notifier.error("No messages", message),
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.notifier.error("Export failed", e.to_string());
            }
        }
    }

    fn sync_filters(&mut self) {
        let inputs = &self.documents.inputs;
        let filter = &mut self.documents.browser.filter;
        filter.date_from = FilterInputs::date(&inputs.date_from);
        filter.date_to = FilterInputs::date(&inputs.date_to);
        filter.value_min = FilterInputs::amount(&inputs.value_min);
        filter.value_max = FilterInputs::amount(&inputs.value_max);
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        self.handle_dropped_files(ctx);

        let mut had_updates = self.pipeline.process_events() > 0;

        if let Some(receiver) = &self.upload.folder_receiver {
            match receiver.try_recv() {
                Ok(files) => {
                    self.upload.folder_receiver = None;
                    self.add_files(files);
                    had_updates = true;
                }
                Err(std_mpsc::TryRecvError::Empty) => {}
                Err(std_mpsc::TryRecvError::Disconnected) => {
                    tracing::warn!("Folder scan ended without a result");
                    self.upload.folder_receiver = None;
                }
            }
        }

        if let Some(receiver) = &self.remote.dashboard_receiver {
            while let Ok(data) = receiver.try_recv() {
                self.remote.dashboard = Some(data);
                had_updates = true;
            }
        }
        if let Some(receiver) = &self.remote.home_receiver {
            while let Ok(stats) = receiver.try_recv() {
                self.remote.home = stats;
                had_updates = true;
            }
        }
        if let Some(receiver) = &self.remote.documents_receiver {
            while let Ok(documents) = receiver.try_recv() {
                self.documents.browser.set_documents(documents);
                had_updates = true;
            }
        }
        if let Some(receiver) = &self.documents.analysis_receiver {
            while let Ok((id, analysis)) = receiver.try_recv() {
                self.documents.analyses.insert(id, analysis);
                had_updates = true;
            }
        }
        if let Some(receiver) = &self.chat.reply_receiver {
            if let Ok(reply) = receiver.try_recv() {
                self.chat.conversation.receive(reply);
                self.chat.reply_receiver = None;
                had_updates = true;
            }
        }

        self.sync_filters();

        if had_updates {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(REPAINT_INTERVAL);
        }
    }
}

impl Drop for NfeApp {
    fn drop(&mut self) {
        for poller in &self.pollers {
            poller.abort();
        }
    }
}

impl App for NfeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
