//! The export coordinator: state snapshot in, date-stamped artifact out.
//!
//! Compilation is CPU-bound and the paginated document can take a while, so
//! the coordinator yields to the runtime once before running a compiler to
//! completion; a caller showing a "working" indicator gets its paint in.
//! There is no cancellation: a run either finishes or produces nothing.

use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use tokio::task::yield_now;
use tracing::{info, warn};

use crate::application::error::AppError;
use crate::application::progress::has_any_data;
use crate::application::render::layout::compile_layout;
use crate::application::render::text::compile_text;
use crate::application::render::RenderOptions;
use crate::domain::state::InterviewState;
use crate::infra::pdf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Text,
    Pdf,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Text => "md",
            ArtifactKind::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Pdf,
    Both,
}

impl ExportFormat {
    fn kinds(self) -> &'static [ArtifactKind] {
        match self {
            ExportFormat::Text => &[ArtifactKind::Text],
            ExportFormat::Pdf => &[ArtifactKind::Pdf],
            ExportFormat::Both => &[ArtifactKind::Text, ArtifactKind::Pdf],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct ExportCoordinator {
    product_name: String,
}

impl ExportCoordinator {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions::new(&self.product_name, OffsetDateTime::now_utc().date())
    }

    /// Compile one artifact in memory.
    pub async fn compile(&self, state: &InterviewState, kind: ArtifactKind) -> ExportArtifact {
        let options = self.render_options();
        // One yield so the caller's "working" indicator can render before the
        // synchronous compile runs to completion.
        yield_now().await;

        let bytes = match kind {
            ArtifactKind::Text => compile_text(state, &options).into_bytes(),
            ArtifactKind::Pdf => pdf::write_document(&compile_layout(state, &options)),
        };
        ExportArtifact {
            kind,
            file_name: format!("{}.{}", options.artifact_stem(), kind.extension()),
            bytes,
        }
    }

    /// Compile the requested format(s) and write them under `directory`.
    /// Returns the written paths.
    pub async fn export_to_dir(
        &self,
        state: &InterviewState,
        format: ExportFormat,
        directory: &Path,
    ) -> Result<Vec<PathBuf>, AppError> {
        if !has_any_data(state) {
            warn!(
                target: "handoff::export",
                "exporting an empty interview; the document will only carry the title block"
            );
        }
        tokio::fs::create_dir_all(directory)
            .await
            .map_err(|error| AppError::from(crate::infra::error::InfraError::Io(error)))?;

        let mut written = Vec::new();
        for kind in format.kinds() {
            let artifact = self.compile(state, *kind).await;
            let path = directory.join(&artifact.file_name);
            tokio::fs::write(&path, &artifact.bytes)
                .await
                .map_err(|error| AppError::from(crate::infra::error::InfraError::Io(error)))?;
            info!(
                target: "handoff::export",
                path = %path.display(),
                bytes = artifact.bytes.len(),
                "artifact written"
            );
            written.push(path);
        }
        Ok(written)
    }
}
