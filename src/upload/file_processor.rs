use crate::error::Result;
use crate::upload::types::{CandidateFile, FileSource};
use ignore::Walk;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Turns picked paths, dropped bytes and whole folders into candidates.
#[derive(Clone)]
pub struct FileProcessor {
    folder_path: PathBuf,
}

impl FileProcessor {
    pub fn new(folder_path: impl Into<PathBuf>) -> Self {
        Self {
            folder_path: folder_path.into(),
        }
    }

    /// Walk the folder on the runtime's blocking pool. The receiver yields
    /// the candidates once, when the walk is done.
    pub fn scan_in_background(self, runtime: &Handle) -> Receiver<Vec<CandidateFile>> {
        let (sender, receiver) = mpsc::channel();
        runtime.spawn_blocking(move || {
            let candidates = self.collect_candidates();
            tracing::info!(
                folder = %self.folder_path.display(),
                files = candidates.len(),
                "Folder scanned"
            );
            let _ = sender.send(candidates);
        });
        receiver
    }

    /// Every regular file under the folder, honoring `.gitignore`.
    /// Type filtering is left to the validator so rejections get reported.
    pub fn collect_candidates(&self) -> Vec<CandidateFile> {
        let mut candidates = Vec::new();
        for path in self.walk() {
            match Self::candidate_from_path(&path) {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                }
            }
        }
        candidates
    }

    fn walk(&self) -> impl Iterator<Item = PathBuf> + '_ {
        Walk::new(&self.folder_path)
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Error walking directory: {}", e);
                    None
                }
            })
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file() && !Self::is_ignored_file(path))
    }

    pub fn candidate_from_path(path: &Path) -> Result<CandidateFile> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(CandidateFile {
            mime_type: Self::mime_type_for(path),
            name,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    pub fn candidate_from_bytes(name: &str, bytes: Arc<[u8]>) -> CandidateFile {
        CandidateFile {
            name: name.to_string(),
            size: bytes.len() as u64,
            mime_type: Self::mime_type_for(Path::new(name)),
            source: FileSource::Bytes(bytes),
        }
    }

    fn mime_type_for(path: &Path) -> String {
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string()
    }

    fn is_ignored_file(path: &Path) -> bool {
        let ignored_files = [".DS_Store", "Thumbs.db", "desktop.ini"];
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| ignored_files.contains(&n))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn collects_files_with_guessed_mime_types() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notas.zip"), b"PK\x03\x04").unwrap();
        fs::write(dir.path().join("readme.txt"), b"hello").unwrap();
        fs::write(dir.path().join(".DS_Store"), b"junk").unwrap();

        let mut candidates = FileProcessor::new(dir.path()).collect_candidates();
        assert_eq!(candidates.len(), 2);
        candidates.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(candidates[0].name, "notas.zip");
        assert_eq!(candidates[0].mime_type, "application/zip");
        assert_eq!(candidates[0].size, 4);
        assert_eq!(candidates[1].mime_type, "text/plain");
    }

    #[test]
    fn background_scan_delivers_candidates() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("2024")).unwrap();
        fs::write(dir.path().join("2024").join("junho.zip"), b"PK").unwrap();
        fs::write(dir.path().join("julho.zip"), b"PK\x03").unwrap();

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let receiver = FileProcessor::new(dir.path()).scan_in_background(runtime.handle());
        let mut candidates = receiver.recv_timeout(Duration::from_secs(10)).unwrap();
        candidates.sort_by(|a, b| a.name.cmp(&b.name));

        let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["julho.zip", "junho.zip"]);
        assert!(receiver.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn dropped_bytes_take_size_from_payload() {
        let candidate =
            FileProcessor::candidate_from_bytes("lote.zip", Arc::from(vec![7u8; 1000]));
        assert_eq!(candidate.size, 1000);
        assert_eq!(candidate.mime_type, "application/zip");
    }
}
