mod file_processor;
pub mod pipeline;
pub mod preview;
pub mod session;
pub mod simulator;
pub mod transport;
mod types;
pub mod validation;

pub use file_processor::FileProcessor;
pub use pipeline::UploadPipeline;
pub use types::{
    CandidateFile, FileSource, PipelineEvent, RecordId, RecordStatus, SessionStats, UploadRecord,
};
pub use validation::{sanitize_filename, Rejection, Validator};
