use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{instrument, Level};

use crate::Error;

/// Turns a PDF into plain text that keeps the page layout, table columns included.
#[allow(async_fn_in_trait)]
pub trait PdfText {
    async fn page_text(&self, pdf: &[u8], first_page_only: bool) -> crate::Result<String>;
}

/// Runs poppler's `pdftotext -layout`, piping the document through stdin and stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdftotext {
    bin: PathBuf,
}

impl Pdftotext {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    fn command(&self, first_page_only: bool) -> Command {
        let mut command = Command::new(&self.bin);
        command.arg("-layout");
        if first_page_only {
            command.args(["-l", "1"]);
        }
        command
            .args(["-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

impl Default for Pdftotext {
    fn default() -> Self {
        Self::new("pdftotext")
    }
}

impl PdfText for Pdftotext {
    #[instrument(skip(self, pdf), fields(bytes = pdf.len()), level = Level::TRACE)]
    async fn page_text(&self, pdf: &[u8], first_page_only: bool) -> crate::Result<String> {
        let mut child = self.command(first_page_only).spawn()?;
        // pdftotext reads the whole document before it writes any text
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(pdf).await?;
            stdin.shutdown().await?;
        }
        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::pdf_error(format!(
                "{} exited with {}: {}",
                self.bin.display(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
