//! External resource selection boundary.
//!
//! Wraps the OS-level image and document pickers. Cancellation is an
//! ordinary outcome, not an error: a cancelled pick leaves whatever the
//! screen already holds untouched.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::PickError;
use crate::model::{PickedDocument, PickedImage};

/// Outcome of a picker invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick<T> {
    Picked(T),
    Cancelled,
}

impl<T> Pick<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Picked(value) => Some(value),
            Self::Cancelled => None,
        }
    }
}

/// Options applied to image selection. The profile flow uses the default:
/// square crop at full quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageOptions {
    pub square: bool,
    pub quality: f32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            square: true,
            quality: 1.0,
        }
    }
}

/// Boundary over OS-level selection sheets.
#[async_trait]
pub trait ResourcePicker: Send + Sync {
    /// Let the user select an image, or cancel.
    async fn pick_image(&self, options: ImageOptions) -> Result<Pick<PickedImage>, PickError>;

    /// Let the user select a document matching `mime_filter`, or cancel.
    /// A successful pick carries the document's display name.
    async fn pick_document(&self, mime_filter: &str) -> Result<Pick<PickedDocument>, PickError>;
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Filesystem-backed picker used by the terminal front-end: selects the
/// first matching file from a directory, standing in for the OS sheet. An
/// empty or missing directory reads as the user cancelling.
pub struct DirectoryPicker {
    root: PathBuf,
}

impl DirectoryPicker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn first_match(&self, extensions: &[&str]) -> Result<Option<PathBuf>, PickError> {
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PickError::Io(e)),
        };

        let mut candidates = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(PickError::Io)? {
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    extensions
                        .iter()
                        .any(|wanted| ext.eq_ignore_ascii_case(wanted))
                });
            if matches {
                candidates.push(path);
            }
        }
        // Deterministic choice: lexicographically first.
        candidates.sort();
        Ok(candidates.into_iter().next())
    }
}

fn extensions_for_mime(mime_filter: &str) -> Vec<&str> {
    match mime_filter {
        "application/pdf" => vec!["pdf"],
        "image/*" => IMAGE_EXTENSIONS.to_vec(),
        other => other.rsplit('/').next().map(|ext| vec![ext]).unwrap_or_default(),
    }
}

#[async_trait]
impl ResourcePicker for DirectoryPicker {
    async fn pick_image(&self, _options: ImageOptions) -> Result<Pick<PickedImage>, PickError> {
        match self.first_match(IMAGE_EXTENSIONS).await? {
            Some(path) => Ok(Pick::Picked(PickedImage {
                uri: format!("file://{}", path.display()),
            })),
            None => Ok(Pick::Cancelled),
        }
    }

    async fn pick_document(&self, mime_filter: &str) -> Result<Pick<PickedDocument>, PickError> {
        let extensions = extensions_for_mime(mime_filter);
        match self.first_match(&extensions).await? {
            Some(path) => {
                let display_name = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or("document")
                    .to_string();
                Ok(Pick::Picked(PickedDocument {
                    uri: format!("file://{}", path.display()),
                    display_name,
                }))
            }
            None => Ok(Pick::Cancelled),
        }
    }
}
