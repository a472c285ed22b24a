use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Uploading,
    Processing,
    Success,
    Error,
    Paused,
}

impl RecordStatus {
    pub fn is_in_flight(self) -> bool {
        matches!(self, RecordStatus::Uploading | RecordStatus::Processing)
    }
}

/// One accepted file moving through the upload pipeline.
#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub id: RecordId,
    /// Sanitized display name.
    pub name: String,
    pub size: u64,
    pub status: RecordStatus,
    pub progress: u8,
    pub message: Option<String>,
    /// Text preview, only filled when a preview was requested.
    pub content: Option<String>,
    pub is_paused: bool,
}

impl UploadRecord {
    pub fn new(name: String, size: u64) -> Self {
        Self {
            id: RecordId::new(),
            name,
            size,
            status: RecordStatus::Uploading,
            progress: 0,
            message: None,
            content: None,
            is_paused: false,
        }
    }
}

/// Where the bytes of a candidate file live.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// A file the user dropped or picked, before validation.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Original, unsanitized name.
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub source: FileSource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total: usize,
    pub succeeded: usize,
    pub errored: usize,
    pub in_flight: usize,
}

/// Messages from background tasks back to the pipeline owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// One progress step from the timer started as `generation`.
    Tick { id: RecordId, generation: u64 },
    /// The ingest request could not be built locally.
    TransportFailed { id: RecordId, message: String },
    /// Archive listing for a finished record, or why it could not be read.
    Preview {
        id: RecordId,
        result: Result<String, String>,
    },
}
