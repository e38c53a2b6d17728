//! Upload policy and the per-file upload state machine.
//!
//! The server's only involvement in an upload is issuing a scoped token and
//! recording metadata once the blob exists; the bytes move directly from
//! the client to object storage. This module holds the policy both sides
//! agree on, and models the client-driven lifecycle of each file so its
//! invariants (monotonic progress, sequential batches, independent
//! failures) are enforced and testable in one place.

use crate::error::CoreError;

/// Maximum accepted upload size: 50 MB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Content types an upload token may be issued for.
///
/// Raster images only. SVG is deliberately absent: even with a forced
/// attachment disposition, scriptable formats stay out of the allowlist.
pub const ALLOWED_CONTENT_TYPES: [&str; 7] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/bmp",
    "image/tiff",
];

/// Whether `content_type` is on the raster-image allowlist.
pub fn is_allowed_content_type(content_type: &str) -> bool {
    ALLOWED_CONTENT_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
}

/// Validate a declared upload before any network call.
pub fn validate_upload(file_name: &str, content_type: &str, size: u64) -> Result<(), CoreError> {
    if file_name.trim().is_empty() {
        return Err(CoreError::Validation("File name is required".into()));
    }
    if !is_allowed_content_type(content_type) {
        return Err(CoreError::Validation(format!(
            "Content type '{content_type}' is not an accepted image format"
        )));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(format!(
            "File exceeds the {MAX_UPLOAD_BYTES} byte upload limit"
        )));
    }
    Ok(())
}

/// Lifecycle of a single file upload, driven by the client.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    /// Declared but not yet started.
    Pending,
    /// Waiting for the server to issue a scoped upload token.
    RequestingToken,
    /// Bytes streaming directly to object storage.
    Transferring { sent: u64, total: u64 },
    /// Blob confirmed in storage; metadata record being written.
    RecordingMetadata,
    /// Done; the blob's public URL.
    Complete { url: String },
    /// Terminal failure; the remaining files in a batch are unaffected.
    Failed { reason: String },
}

impl UploadState {
    /// Whether this state ends the file's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Complete { .. } | UploadState::Failed { .. })
    }
}

/// One file moving through the upload pipeline.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub state: UploadState,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, size: u64) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            size,
            state: UploadState::Pending,
        }
    }

    /// Leave `Pending`. Policy violations fail here, before any network
    /// call, and move the file straight to `Failed`.
    pub fn begin(&mut self) -> Result<(), CoreError> {
        self.expect_state("Pending", matches!(self.state, UploadState::Pending))?;
        if let Err(err) = validate_upload(&self.file_name, &self.content_type, self.size) {
            self.state = UploadState::Failed {
                reason: err.to_string(),
            };
            return Err(err);
        }
        self.state = UploadState::RequestingToken;
        Ok(())
    }

    /// A token arrived; start the transfer at zero bytes.
    pub fn token_issued(&mut self) -> Result<(), CoreError> {
        self.expect_state(
            "RequestingToken",
            matches!(self.state, UploadState::RequestingToken),
        )?;
        self.state = UploadState::Transferring {
            sent: 0,
            total: self.size,
        };
        Ok(())
    }

    /// Record transfer progress. The byte ratio only ever increases; a
    /// regressing or overshooting report is rejected without changing state.
    pub fn progress(&mut self, sent: u64) -> Result<(), CoreError> {
        match self.state {
            UploadState::Transferring { sent: prev, total } => {
                if sent < prev {
                    return Err(CoreError::Validation(format!(
                        "Upload progress went backwards: {sent} < {prev}"
                    )));
                }
                if sent > total {
                    return Err(CoreError::Validation(format!(
                        "Upload progress {sent} exceeds declared size {total}"
                    )));
                }
                self.state = UploadState::Transferring { sent, total };
                Ok(())
            }
            _ => Err(self.wrong_state("Transferring")),
        }
    }

    /// Storage confirmed the blob; move on to metadata recording.
    pub fn transferred(&mut self) -> Result<(), CoreError> {
        self.expect_state(
            "Transferring",
            matches!(self.state, UploadState::Transferring { .. }),
        )?;
        self.state = UploadState::RecordingMetadata;
        Ok(())
    }

    /// Metadata recorded; the upload is complete.
    pub fn complete(&mut self, url: impl Into<String>) -> Result<(), CoreError> {
        self.expect_state(
            "RecordingMetadata",
            matches!(self.state, UploadState::RecordingMetadata),
        )?;
        self.state = UploadState::Complete { url: url.into() };
        Ok(())
    }

    /// Fail from any non-terminal state.
    ///
    /// A failure after a successful transfer orphans the blob (it exists in
    /// storage with no metadata record) -- tolerated, and preferable to
    /// recording metadata for a blob that may not exist.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if !self.state.is_terminal() {
            self.state = UploadState::Failed {
                reason: reason.into(),
            };
        }
    }

    /// Fraction of bytes confirmed sent, in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        match &self.state {
            UploadState::Pending | UploadState::RequestingToken => 0.0,
            UploadState::Transferring { sent, total } => {
                if *total == 0 {
                    0.0
                } else {
                    *sent as f64 / *total as f64
                }
            }
            UploadState::RecordingMetadata | UploadState::Complete { .. } => 1.0,
            UploadState::Failed { .. } => 0.0,
        }
    }

    fn expect_state(&self, expected: &str, ok: bool) -> Result<(), CoreError> {
        if ok {
            Ok(())
        } else {
            Err(self.wrong_state(expected))
        }
    }

    fn wrong_state(&self, expected: &str) -> CoreError {
        CoreError::Validation(format!(
            "Upload '{}' is not in state {expected} (currently {:?})",
            self.file_name, self.state
        ))
    }
}

/// A batch of uploads processed strictly one file at a time.
///
/// Only the current file may advance, so the user sees an ordered per-file
/// and overall progress indicator. One file failing never aborts the rest.
#[derive(Debug, Default)]
pub struct UploadBatch {
    files: Vec<FileUpload>,
    current: usize,
}

impl UploadBatch {
    pub fn new(files: Vec<FileUpload>) -> Self {
        Self { files, current: 0 }
    }

    pub fn files(&self) -> &[FileUpload] {
        &self.files
    }

    /// The file currently allowed to advance, or `None` when every file is
    /// terminal.
    pub fn current_mut(&mut self) -> Option<&mut FileUpload> {
        while self.current < self.files.len() && self.files[self.current].state.is_terminal() {
            self.current += 1;
        }
        self.files.get_mut(self.current)
    }

    /// Complete when every file has reached `Complete` or `Failed`.
    pub fn is_complete(&self) -> bool {
        self.files.iter().all(|f| f.state.is_terminal())
    }

    /// Files that finished successfully.
    pub fn completed(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.state, UploadState::Complete { .. }))
            .count()
    }

    /// Files that failed.
    pub fn failed(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.state, UploadState::Failed { .. }))
            .count()
    }

    /// Overall progress across the batch, weighting every file equally.
    pub fn ratio(&self) -> f64 {
        if self.files.is_empty() {
            return 1.0;
        }
        let done: f64 = self
            .files
            .iter()
            .map(|f| match f.state {
                UploadState::Failed { .. } => 1.0,
                _ => f.ratio(),
            })
            .sum();
        done / self.files.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn png(name: &str) -> FileUpload {
        FileUpload::new(name, "image/png", 1024)
    }

    #[test]
    fn happy_path_reaches_complete() {
        let mut file = png("x.png");
        file.begin().unwrap();
        file.token_issued().unwrap();
        file.progress(512).unwrap();
        file.progress(1024).unwrap();
        file.transferred().unwrap();
        file.complete("https://blob/x.png").unwrap();
        assert_matches!(file.state, UploadState::Complete { ref url } if url == "https://blob/x.png");
    }

    #[test]
    fn non_image_fails_before_any_token_request() {
        let mut file = FileUpload::new("notes.txt", "text/plain", 10);
        assert!(file.begin().is_err());
        assert_matches!(file.state, UploadState::Failed { .. });
    }

    #[test]
    fn oversized_file_is_rejected() {
        let mut file = FileUpload::new("big.png", "image/png", MAX_UPLOAD_BYTES + 1);
        assert!(file.begin().is_err());
        assert_matches!(file.state, UploadState::Failed { .. });
    }

    #[test]
    fn progress_is_monotonic() {
        let mut file = png("x.png");
        file.begin().unwrap();
        file.token_issued().unwrap();
        file.progress(800).unwrap();
        assert!(file.progress(400).is_err());
        assert_matches!(file.state, UploadState::Transferring { sent: 800, .. });
    }

    #[test]
    fn progress_cannot_exceed_declared_size() {
        let mut file = png("x.png");
        file.begin().unwrap();
        file.token_issued().unwrap();
        assert!(file.progress(2048).is_err());
    }

    #[test]
    fn failure_after_transfer_is_terminal() {
        let mut file = png("x.png");
        file.begin().unwrap();
        file.token_issued().unwrap();
        file.progress(1024).unwrap();
        file.transferred().unwrap();
        file.fail("metadata write failed");
        assert_matches!(file.state, UploadState::Failed { .. });
        // Terminal: a later fail() does not overwrite the reason.
        file.fail("other");
        assert_matches!(file.state, UploadState::Failed { ref reason } if reason == "metadata write failed");
    }

    #[test]
    fn batch_runs_sequentially_and_survives_failures() {
        let mut batch = UploadBatch::new(vec![
            png("a.png"),
            FileUpload::new("b.txt", "text/plain", 10),
            png("c.png"),
        ]);

        // First file completes.
        {
            let file = batch.current_mut().unwrap();
            assert_eq!(file.file_name, "a.png");
            file.begin().unwrap();
            file.token_issued().unwrap();
            file.progress(1024).unwrap();
            file.transferred().unwrap();
            file.complete("https://blob/a.png").unwrap();
        }

        // Second file fails validation; the batch moves on.
        {
            let file = batch.current_mut().unwrap();
            assert_eq!(file.file_name, "b.txt");
            assert!(file.begin().is_err());
        }

        // Third file still gets its turn.
        {
            let file = batch.current_mut().unwrap();
            assert_eq!(file.file_name, "c.png");
            file.begin().unwrap();
            file.token_issued().unwrap();
            file.progress(1024).unwrap();
            file.transferred().unwrap();
            file.complete("https://blob/c.png").unwrap();
        }

        assert!(batch.is_complete());
        assert_eq!(batch.completed(), 2);
        assert_eq!(batch.failed(), 1);
        assert!(batch.current_mut().is_none());
        assert!((batch.ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn batch_ratio_counts_partial_transfers() {
        let mut batch = UploadBatch::new(vec![png("a.png"), png("b.png")]);
        let file = batch.current_mut().unwrap();
        file.begin().unwrap();
        file.token_issued().unwrap();
        file.progress(512).unwrap();
        // Half of one of two files.
        assert!((batch.ratio() - 0.25).abs() < 1e-9);
    }
}
