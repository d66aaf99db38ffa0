//! Image picker state for create/edit dialogs.
//!
//! Picking a file yields a preview immediately; the file itself is only sent
//! when the form is submitted.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use cms_client::{FileUpload, ImageInput};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSelection {
    pending: Option<FileUpload>,
    preview: Option<String>,
    existing: Option<String>,
    clear_existing: bool,
}

impl ImageSelection {
    /// Nothing selected, nothing persisted (create dialog).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Editing an entity whose image is already stored at `url`.
    pub fn from_input(input: &ImageInput) -> Self {
        match input {
            ImageInput::Existing(url) => Self {
                preview: Some(url.clone()),
                existing: Some(url.clone()),
                ..Self::default()
            },
            ImageInput::Upload(file) => {
                let mut selection = Self::default();
                selection.select(file.clone());
                selection
            }
            ImageInput::None | ImageInput::Clear => Self::default(),
        }
    }

    /// Stage a new file and build its preview.
    pub fn select(&mut self, file: FileUpload) {
        self.preview = Some(data_url(&file));
        self.pending = Some(file);
    }

    /// Read a file from disk and stage it.
    pub async fn select_path(&mut self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        tracing::debug!(%file_name, %content_type, size = bytes.len(), "Selected image");
        self.select(FileUpload::new(file_name, content_type, bytes));
        Ok(())
    }

    /// Drop the staged file and its preview. When editing an entity with a
    /// stored image, also mark that image for removal.
    pub fn remove(&mut self) {
        self.pending = None;
        self.preview = None;
        if self.existing.take().is_some() {
            self.clear_existing = true;
        }
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn pending(&self) -> Option<&FileUpload> {
        self.pending.as_ref()
    }

    /// What the submit should send.
    pub fn to_input(&self) -> ImageInput {
        if let Some(file) = &self.pending {
            ImageInput::Upload(file.clone())
        } else if self.clear_existing {
            ImageInput::Clear
        } else if let Some(url) = &self.existing {
            ImageInput::Existing(url.clone())
        } else {
            ImageInput::None
        }
    }
}

fn data_url(file: &FileUpload) -> String {
    format!(
        "data:{};base64,{}",
        file.content_type,
        STANDARD.encode(&file.bytes)
    )
}
