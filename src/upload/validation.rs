//! Acceptance rules for candidate files and filename sanitization.

use super::types::{CandidateFile, UploadRecord};
use crate::config::UploadConfig;
use crate::error::{Error, Result};
use reqwest::Url;
use std::fmt;

const MAX_URL_LEN: usize = 2048;

/// Replace everything outside `[A-Za-z0-9._-]` with `_` and cap the length.
pub fn sanitize_filename(name: &str, max_len: usize) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(max_len)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    EmptyName,
    NameTooLong { max: usize },
    EmptyFile,
    UnsupportedType { mime_type: String },
    Duplicate,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::EmptyName => write!(f, "File name is empty"),
            Rejection::NameTooLong { max } => {
                write!(f, "File name exceeds {} characters", max)
            }
            Rejection::EmptyFile => write!(f, "File is empty"),
            Rejection::UnsupportedType { .. } => write!(f, "Only ZIP files are allowed"),
            Rejection::Duplicate => write!(f, "File has already been added"),
        }
    }
}

/// A candidate that passed validation, paired with its sanitized name.
#[derive(Debug, Clone)]
pub struct Accepted {
    pub file: CandidateFile,
    pub sanitized_name: String,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub accepted: Vec<Accepted>,
    pub rejected: Vec<(CandidateFile, Rejection)>,
}

#[derive(Debug, Clone)]
pub struct Validator {
    allowed_mime_types: Vec<String>,
    max_name_len: usize,
}

impl Validator {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            allowed_mime_types: config.allowed_mime_types.clone(),
            max_name_len: config.max_filename_len,
        }
    }

    /// Check one candidate against the shape rules and the `(name, size)`
    /// pairs already taken.
    pub fn check<'a, I>(
        &self,
        file: &CandidateFile,
        taken: I,
    ) -> std::result::Result<String, Rejection>
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        if file.name.is_empty() {
            return Err(Rejection::EmptyName);
        }
        if file.name.chars().count() > self.max_name_len {
            return Err(Rejection::NameTooLong {
                max: self.max_name_len,
            });
        }
        if file.size == 0 {
            return Err(Rejection::EmptyFile);
        }
        if !self.allowed_mime_types.iter().any(|m| m == &file.mime_type) {
            return Err(Rejection::UnsupportedType {
                mime_type: file.mime_type.clone(),
            });
        }

        let sanitized = sanitize_filename(&file.name, self.max_name_len);
        if taken
            .into_iter()
            .any(|(name, size)| name == sanitized && size == file.size)
        {
            return Err(Rejection::Duplicate);
        }
        Ok(sanitized)
    }

    /// Validate a whole drop. Files accepted earlier in the batch count as
    /// taken for the ones after them.
    pub fn validate_batch(
        &self,
        files: Vec<CandidateFile>,
        existing: &[UploadRecord],
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for file in files {
            let taken = existing
                .iter()
                .map(|r| (r.name.as_str(), r.size))
                .chain(
                    outcome
                        .accepted
                        .iter()
                        .map(|a| (a.sanitized_name.as_str(), a.file.size)),
                );
            match self.check(&file, taken) {
                Ok(sanitized_name) => outcome.accepted.push(Accepted {
                    file,
                    sanitized_name,
                }),
                Err(rejection) => outcome.rejected.push((file, rejection)),
            }
        }
        outcome
    }
}

/// Validate a remote archive URL submitted for upload.
pub fn validate_upload_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() || raw.len() > MAX_URL_LEN {
        return Err(Error::InvalidInput("Invalid URL".to_string()));
    }
    let url = Url::parse(raw).map_err(|_| Error::InvalidInput("Invalid URL".to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(Error::InvalidInput("Invalid URL".to_string())),
    }
}
