//! Page-to-PDF rendering.
//!
//! [`ChromiumRenderer`] prints a URL with headless Chromium. Each call runs
//! in its own scratch directory (profile + output file) which is removed when
//! the call returns, whatever the outcome.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

/// Time allowed for Chromium on top of the settle budget before it is killed.
const RENDER_TIMEOUT_SECS: u64 = 60;

/// Maximum stderr captured into an error message.
const MAX_STDERR_CHARS: usize = 2_000;

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Failed to start PDF renderer: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("PDF renderer I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF renderer timed out after {0:?}")]
    Timeout(Duration),

    #[error("PDF renderer exited with code {code}: {stderr}")]
    Failed { code: i32, stderr: String },

    #[error("PDF renderer produced no document")]
    EmptyOutput,
}

/// Renders a web page to PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_url(&self, url: &str) -> Result<Vec<u8>, PdfError>;
}

/// Headless Chromium `--print-to-pdf` renderer.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    binary: String,
    /// Virtual time the page gets to load fonts and lay out before printing.
    settle: Duration,
}

impl ChromiumRenderer {
    pub fn new(binary: impl Into<String>, settle: Duration) -> Self {
        Self {
            binary: binary.into(),
            settle,
        }
    }

    fn command(&self, url: &str, scratch: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--hide-scrollbars")
            .arg("--no-pdf-header-footer")
            .arg(format!("--user-data-dir={}", scratch.join("profile").display()))
            .arg(format!("--virtual-time-budget={}", self.settle.as_millis()))
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            // The child is killed if the render future is dropped or times out.
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl PdfRenderer for ChromiumRenderer {
    async fn render_url(&self, url: &str) -> Result<Vec<u8>, PdfError> {
        let scratch = ScratchDir::create().await?;
        let output = scratch.path().join("document.pdf");

        let child = self
            .command(url, scratch.path(), &output)
            .spawn()
            .map_err(PdfError::Spawn)?;

        let limit = self.settle + Duration::from_secs(RENDER_TIMEOUT_SECS);
        let result = tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| PdfError::Timeout(limit))??;

        if !result.status.success() {
            let stderr: String = String::from_utf8_lossy(&result.stderr)
                .chars()
                .take(MAX_STDERR_CHARS)
                .collect();
            return Err(PdfError::Failed {
                code: result.status.code().unwrap_or(-1),
                stderr,
            });
        }

        let bytes = match tokio::fs::read(&output).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PdfError::EmptyOutput)
            }
            Err(e) => return Err(e.into()),
        };
        if !is_pdf(&bytes) {
            return Err(PdfError::EmptyOutput);
        }

        tracing::debug!(url, bytes = bytes.len(), "Rendered PDF");
        Ok(bytes)
    }
}

/// Whether `bytes` starts with the PDF magic number.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}

/// Per-call scratch directory, removed on drop.
struct ScratchDir(PathBuf);

impl ScratchDir {
    async fn create() -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("wedplan-pdf-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&path).await?;
        Ok(Self(path))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.0) {
            tracing::warn!(path = %self.0.display(), error = %e, "Failed to remove PDF scratch dir");
        }
    }
}
