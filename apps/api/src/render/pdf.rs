//! HTML to PDF conversion.
//!
//! The HTML is supplied by the caller and need not be what the preview
//! produced. Relative references resolve against the asset root so local
//! photo paths (`uploads/<name>`) load.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::AppError;

#[async_trait]
pub trait PdfEngine: Send + Sync {
    async fn convert(&self, html: &str, base_dir: &Path) -> Result<Vec<u8>, AppError>;
}

/// Runs the `weasyprint` CLI: HTML on stdin, PDF on stdout.
pub struct WeasyPrint {
    program: PathBuf,
}

impl WeasyPrint {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl PdfEngine for WeasyPrint {
    async fn convert(&self, html: &str, base_dir: &Path) -> Result<Vec<u8>, AppError> {
        let mut child = Command::new(&self.program)
            .arg("--base-url")
            .arg(base_dir)
            .arg("-")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AppError::RenderFailure(format!(
                    "failed to start {}: {e}",
                    self.program.display()
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AppError::RenderFailure("PDF engine stdin unavailable".to_string()))?;
        let input = html.to_owned();
        let writer = tokio::spawn(async move {
            stdin.write_all(input.as_bytes()).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| AppError::RenderFailure(format!("PDF engine did not finish: {e}")))?;

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("Writing HTML to PDF engine stdin failed: {e}"),
            Err(e) => debug!("PDF engine stdin writer task failed: {e}"),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::RenderFailure(format!(
                "PDF engine exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(AppError::RenderFailure(
                "PDF engine produced no output".to_string(),
            ));
        }

        debug!("PDF engine wrote {} bytes", output.stdout.len());
        Ok(output.stdout)
    }
}

#[derive(Clone)]
pub struct PdfRenderer {
    engine: Arc<dyn PdfEngine>,
    base_dir: PathBuf,
}

impl PdfRenderer {
    pub fn new(engine: Arc<dyn PdfEngine>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            base_dir: base_dir.into(),
        }
    }

    /// Converts `html` to PDF bytes. Empty input is rejected before the engine runs.
    pub async fn render(&self, html: &str) -> Result<Vec<u8>, AppError> {
        if html.trim().is_empty() {
            return Err(AppError::Validation("No HTML provided".to_string()));
        }

        let pdf = self.engine.convert(html, &self.base_dir).await?;
        info!("Rendered PDF ({} bytes)", pdf.len());
        Ok(pdf)
    }
}
