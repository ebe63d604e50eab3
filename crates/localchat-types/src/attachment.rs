//! Files attached to an inbound user message.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// A file the user attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub mime: String,
    pub data: AttachmentData,
}

/// Where the attachment's content lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentData {
    /// A reference passed to the backend verbatim. The Ollama HTTP API
    /// only accepts base64 image data here, so local files must be read
    /// into `Bytes` first.
    Path(String),
    /// Raw bytes, e.g. a file dropped into the browser window
    Bytes(Vec<u8>),
}

impl Attachment {
    pub fn from_path(name: impl Into<String>, mime: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            data: AttachmentData::Path(path.into()),
        }
    }

    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            data: AttachmentData::Bytes(bytes),
        }
    }

    /// True when the MIME type mentions "image" anywhere (`image/png`,
    /// `image/jpeg`, ...). Matches case-sensitively.
    pub fn is_image(&self) -> bool {
        self.mime.contains("image")
    }

    /// The reference handed to the backend in `Message::images`: a path
    /// verbatim, bytes as standard base64.
    pub fn image_ref(&self) -> String {
        match &self.data {
            AttachmentData::Path(path) => path.clone(),
            AttachmentData::Bytes(bytes) => STANDARD.encode(bytes),
        }
    }
}

/// Extract image references from a set of attachments, preserving order.
/// Non-image attachments are dropped.
pub fn image_refs(attachments: &[Attachment]) -> Vec<String> {
    attachments
        .iter()
        .filter(|a| a.is_image())
        .map(Attachment::image_ref)
        .collect()
}
