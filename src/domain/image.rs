//! Boat image ingestion.
//!
//! Uploaded photos are checked against declared metadata (file extension
//! and content type), bounded to [`MAX_IMAGES_PER_BOAT`] per boat, and
//! turned into an [`ImageChangeSet`] that the boat repository applies in a
//! single transaction. Payload bytes are not sniffed; a forged content type
//! with a matching extension is accepted.

use std::collections::HashSet;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{ALLOWED_IMAGE_CONTENT_TYPES, ALLOWED_IMAGE_EXTENSIONS, MAX_IMAGES_PER_BOAT};

/// Rejections of an ingestion call. Both are validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("A boat can have at most {max} images, this request would leave {projected}")]
    CapacityExceeded { projected: usize, max: usize },

    #[error("Invalid file type: {filename}. Only image files are allowed")]
    UnsupportedFileType { filename: String },
}

impl IngestError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::CapacityExceeded { .. } => "IMAGE_LIMIT_EXCEEDED",
            IngestError::UnsupportedFileType { .. } => "UNSUPPORTED_FILE_TYPE",
        }
    }
}

/// A candidate file as received from the client.
#[derive(Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

impl ImageUpload {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Empty form slots are submitted as zero-length files.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Both the extension and the declared content type must be allowed.
    pub fn is_valid(&self) -> bool {
        has_allowed_extension(&self.filename) && is_allowed_content_type(&self.content_type)
    }
}

/// Extension after the last dot, compared case-insensitively.
fn has_allowed_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_allowed_content_type(content_type: &str) -> bool {
    let essence = normalize_content_type(content_type);
    ALLOWED_IMAGE_CONTENT_TYPES.contains(&essence.as_str())
}

/// Lowercased MIME essence, without parameters (`image/PNG; q=1` -> `image/png`).
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Image payload ready to be attached to a boat.
#[derive(Clone, PartialEq, Eq)]
pub struct NewImage {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for NewImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewImage")
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Images to detach and attach in one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageChangeSet {
    pub remove: Vec<Uuid>,
    pub add: Vec<NewImage>,
}

impl ImageChangeSet {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty()
    }

    /// Image count after applying this change-set to `current` images.
    pub fn resulting_count(&self, current: usize) -> usize {
        current.saturating_sub(self.remove.len()) + self.add.len()
    }
}

/// Image count after deleting `delete_ids` and adding every non-empty upload.
///
/// Deletion ids are de-duplicated and ids not attached to the boat are
/// ignored.
pub fn projected_count(existing: &[Uuid], delete_ids: &[Uuid], uploads: &[ImageUpload]) -> usize {
    let attached: HashSet<&Uuid> = existing.iter().collect();
    let removed = delete_ids
        .iter()
        .filter(|id| attached.contains(id))
        .collect::<HashSet<_>>()
        .len();
    let added = uploads.iter().filter(|upload| !upload.is_empty()).count();

    attached.len() - removed + added
}

/// Plan an image update for a boat.
///
/// Creation is the case with no existing images and no deletions. The
/// capacity check runs on the projected state before any file is
/// inspected; the first invalid file rejects the whole batch.
pub fn plan_ingestion(
    existing: &[Uuid],
    delete_ids: &[Uuid],
    uploads: Vec<ImageUpload>,
) -> Result<ImageChangeSet, IngestError> {
    let projected = projected_count(existing, delete_ids, &uploads);
    if projected > MAX_IMAGES_PER_BOAT {
        return Err(IngestError::CapacityExceeded {
            projected,
            max: MAX_IMAGES_PER_BOAT,
        });
    }

    let mut remove: Vec<Uuid> = Vec::new();
    for id in existing {
        if delete_ids.contains(id) && !remove.contains(id) {
            remove.push(*id);
        }
    }

    let mut add = Vec::with_capacity(uploads.len());
    for upload in uploads.into_iter().filter(|upload| !upload.is_empty()) {
        if !upload.is_valid() {
            return Err(IngestError::UnsupportedFileType {
                filename: upload.filename,
            });
        }
        add.push(NewImage {
            content_type: normalize_content_type(&upload.content_type),
            data: upload.data,
        });
    }

    Ok(ImageChangeSet { remove, add })
}

/// Stored boat image
#[derive(Clone, PartialEq, Eq)]
pub struct BoatImage {
    pub id: Uuid,
    pub boat_id: Uuid,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for BoatImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoatImage")
            .field("id", &self.id)
            .field("boat_id", &self.boat_id)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

impl BoatImage {
    /// `data:` URI labelled with the stored content type.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.data))
    }
}
