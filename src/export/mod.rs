//! Conversation transcript export.

pub mod csv;
pub mod pdf;

use crate::chat::Conversation;
use crate::config::ExportConfig;
use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const NO_MESSAGES: &str = "There are no messages to export.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

pub fn file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "conversation_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

pub struct TranscriptExporter {
    directory: PathBuf,
}

impl TranscriptExporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self::with_directory(&config.directory)
    }

    pub fn with_directory(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Write the transcript and return the created file's path.
    pub fn export(&self, conversation: &Conversation, format: ExportFormat) -> Result<PathBuf> {
        if !conversation.has_exchange() {
            return Err(Error::Export(NO_MESSAGES.to_string()));
        }

        fs::create_dir_all(&self.directory)?;
        let now = Local::now();
        let path = self.directory.join(file_name(format, now.date_naive()));
        let mut writer = BufWriter::new(File::create(&path)?);

        match format {
            ExportFormat::Csv => csv::write_transcript(&mut writer, conversation.messages())?,
            ExportFormat::Pdf => {
                writer.write_all(&pdf::render_transcript(conversation.messages(), now))?
            }
        }
        writer.flush()?;

        tracing::info!(path = %path.display(), "Exported conversation");
        Ok(path)
    }
}
