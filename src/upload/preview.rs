//! Entry listings for uploaded archives.
//!
//! Only the central directory is read, so nothing is decompressed.

use super::types::{CandidateFile, FileSource};
use crate::error::{Error, Result};

const EOCD_SIGNATURE: &[u8] = b"PK\x05\x06";
const CENTRAL_SIGNATURE: &[u8] = b"PK\x01\x02";
const EOCD_LEN: usize = 22;
const CENTRAL_HEADER_LEN: usize = 46;

/// Entries listed before the rest are summarized.
pub const MAX_LISTED_ENTRIES: usize = 50;

/// Read the file behind a candidate and render its entry listing.
pub async fn archive_preview(file: &CandidateFile) -> Result<String> {
    let names = match &file.source {
        FileSource::Path(path) => list_zip_entries(&tokio::fs::read(path).await?)?,
        FileSource::Bytes(bytes) => list_zip_entries(bytes)?,
    };
    Ok(render_listing(&names))
}

/// Names of the files stored in a ZIP archive, in directory order.
/// Directory entries are left out.
pub fn list_zip_entries(bytes: &[u8]) -> Result<Vec<String>> {
    let eocd = find_eocd(bytes).ok_or_else(|| invalid("not a ZIP archive"))?;
    let count = read_u16(bytes, eocd + 10)? as usize;
    let mut offset = read_u32(bytes, eocd + 16)? as usize;

    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        if bytes.get(offset..offset + 4) != Some(CENTRAL_SIGNATURE) {
            return Err(invalid("corrupt central directory"));
        }
        let name_len = read_u16(bytes, offset + 28)? as usize;
        let extra_len = read_u16(bytes, offset + 30)? as usize;
        let comment_len = read_u16(bytes, offset + 32)? as usize;

        let start = offset + CENTRAL_HEADER_LEN;
        let name = bytes
            .get(start..start + name_len)
            .ok_or_else(|| invalid("truncated archive"))?;
        let name = String::from_utf8_lossy(name).into_owned();
        if !name.ends_with('/') {
            names.push(name);
        }
        offset = start + name_len + extra_len + comment_len;
    }
    Ok(names)
}

pub fn render_listing(names: &[String]) -> String {
    if names.is_empty() {
        return "(empty archive)".to_string();
    }
    let mut text = names[..names.len().min(MAX_LISTED_ENTRIES)].join("\n");
    if names.len() > MAX_LISTED_ENTRIES {
        text.push_str(&format!("\n... and {} more", names.len() - MAX_LISTED_ENTRIES));
    }
    text
}

// The end record sits at the tail, followed by a comment of up to 64 KiB.
fn find_eocd(bytes: &[u8]) -> Option<usize> {
    let last = bytes.len().checked_sub(EOCD_LEN)?;
    let first = last.saturating_sub(u16::MAX as usize);
    (first..=last)
        .rev()
        .find(|&i| &bytes[i..i + 4] == EOCD_SIGNATURE)
}

fn read_u16(bytes: &[u8], at: usize) -> Result<u16> {
    bytes
        .get(at..at + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or_else(|| invalid("truncated archive"))
}

fn read_u32(bytes: &[u8], at: usize) -> Result<u32> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| invalid("truncated archive"))
}

fn invalid(reason: &str) -> Error {
    Error::InvalidInput(reason.to_string())
}
