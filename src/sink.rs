//! Delivery sinks — where resolved replies go.
//!
//! The agent produces a [`SinkMessage`]; a [`DeliverySink`] owns rendering it
//! on some chat surface. The core places no constraint on rendering — a real
//! chat integration would forward the URL or upload the blob; the bundled
//! [`ConsoleSink`] prints URLs and text and persists blobs to disk.

use std::fs;
use std::path::PathBuf;

use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;

/// One resolved reply, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkMessage {
    ImageUrl(String),
    ImageBlob { content_type: String, bytes: Vec<u8> },
    Text(String),
}

/// A delivery surface for resolved replies.
pub trait DeliverySink {
    fn deliver(&self, message: SinkMessage) -> Result<(), AppError>;
}

/// Console delivery: URLs and text go to stdout; image blobs are written to
/// `image_dir` under a fresh UUID-v4 name (so concurrent invocations never
/// collide) and the path is printed. When and whether persisted blobs are
/// deleted is the sink owner's policy, not the core's.
pub struct ConsoleSink {
    image_dir: PathBuf,
}

impl ConsoleSink {
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self { image_dir: image_dir.into() }
    }

    fn persist_blob(&self, content_type: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
        fs::create_dir_all(&self.image_dir).map_err(|e| {
            AppError::Sink(format!(
                "cannot create image dir {}: {e}",
                self.image_dir.display()
            ))
        })?;

        let name = format!("{}{}", Uuid::new_v4(), extension_for(content_type));
        let path = self.image_dir.join(name);
        fs::write(&path, bytes)
            .map_err(|e| AppError::Sink(format!("cannot write {}: {e}", path.display())))?;

        debug!(path = %path.display(), size = bytes.len(), %content_type, "image blob persisted");
        Ok(path)
    }
}

impl DeliverySink for ConsoleSink {
    fn deliver(&self, message: SinkMessage) -> Result<(), AppError> {
        match message {
            SinkMessage::ImageUrl(url) => {
                println!("{url}");
                Ok(())
            }
            SinkMessage::ImageBlob { content_type, bytes } => {
                let path = self.persist_blob(&content_type, &bytes)?;
                println!("image saved: {}", path.display());
                Ok(())
            }
            SinkMessage::Text(text) => {
                println!("{text}");
                Ok(())
            }
        }
    }
}

/// File extension for the common image content types. Parameters after `;`
/// are stripped before matching; unknown types get no extension.
fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    match essence {
        "image/png" => ".png",
        "image/jpeg" | "image/jpg" => ".jpg",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        "image/bmp" => ".bmp",
        "image/svg+xml" => ".svg",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn blob_is_persisted_byte_for_byte() {
        let dir = tempdir().unwrap();
        let sink = ConsoleSink::new(dir.path());
        let bytes: Vec<u8> = vec![0x89, 0x50, 0x4e, 0x47, 0x00, 0x01, 0xff];

        let path = sink.persist_blob("image/png", &bytes).unwrap();
        assert_eq!(fs::read(&path).unwrap(), bytes);
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
    }

    #[test]
    fn blob_names_are_unique_per_invocation() {
        let dir = tempdir().unwrap();
        let sink = ConsoleSink::new(dir.path());

        let a = sink.persist_blob("image/jpeg", b"aaa").unwrap();
        let b = sink.persist_blob("image/jpeg", b"bbb").unwrap();
        assert_ne!(a, b);
        assert_eq!(fs::read(&a).unwrap(), b"aaa");
        assert_eq!(fs::read(&b).unwrap(), b"bbb");
    }

    #[test]
    fn image_dir_is_created_on_demand() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/images");
        let sink = ConsoleSink::new(&nested);

        sink.persist_blob("image/gif", b"gif").unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn content_type_parameters_stripped() {
        assert_eq!(extension_for("image/png; charset=binary"), ".png");
        assert_eq!(extension_for("image/jpeg"), ".jpg");
        assert_eq!(extension_for("image/x-unknown"), "");
    }

    #[test]
    fn deliver_text_and_url_succeed() {
        let dir = tempdir().unwrap();
        let sink = ConsoleSink::new(dir.path());
        assert!(sink.deliver(SinkMessage::Text("hello".into())).is_ok());
        assert!(sink.deliver(SinkMessage::ImageUrl("http://x".into())).is_ok());
    }
}
