use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of content-hash hex characters prefixed to a file key.
const KEY_HASH_CHARS: usize = 16;

/// Errors from the file store.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file {0} not found")]
    NotFound(String),

    #[error("file is {size} bytes which exceeds the {limit} byte upload limit")]
    TooLarge { size: usize, limit: usize },

    #[error("file is not a recognized image format")]
    WrongType,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Filesystem-backed storage for uploaded images, keyed by
/// `{content_hash_prefix}-{sanitized_original_name}`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    max_bytes: usize,
}

impl FileStore {
    /// Open the store rooted at `root`, creating the directory if missing.
    pub async fn open(root: impl Into<PathBuf>, max_bytes: usize) -> Result<Self, FileError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        Ok(Self { root, max_bytes })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate and persist image bytes, returning the generated key.
    pub async fn save(&self, bytes: &[u8], original_name: &str) -> Result<String, FileError> {
        if bytes.len() > self.max_bytes {
            return Err(FileError::TooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }
        if !is_supported_image(bytes) {
            return Err(FileError::WrongType);
        }

        let digest = Sha256::digest(bytes);
        let mut hash = String::with_capacity(KEY_HASH_CHARS);
        for byte in digest.iter().take(KEY_HASH_CHARS / 2) {
            hash.push_str(&format!("{byte:02x}"));
        }

        let key = format!("{hash}-{}", sanitize_file_name(original_name));
        tokio::fs::write(self.root.join(&key), bytes).await?;

        Ok(key)
    }

    /// Remove a stored file. Missing files report NotFound so callers can
    /// decide whether that matters; keys that could escape the root resolve
    /// to NotFound without touching the filesystem.
    pub async fn delete(&self, key: &str) -> Result<(), FileError> {
        if !is_valid_key(key) {
            return Err(FileError::NotFound(key.to_string()));
        }

        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(FileError::NotFound(key.to_string()))
            }
            Err(err) => Err(FileError::Io(err)),
        }
    }

    /// Absolute path of a stored file.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

/// Accept the image formats browsers commonly upload, by magic number.
fn is_supported_image(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0xFF, 0xD8, 0xFF])
        || bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
        || bytes.starts_with(b"GIF87a")
        || bytes.starts_with(b"GIF89a")
        || (bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP")
}

/// Reduce a client-supplied name to characters safe inside a single path
/// segment. Leading dots are stripped so a key can never be a dotfile or a
/// traversal component.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.chars().take(64).collect()
    }
}

// A key is a single path segment: no separators, no leading dot (which also
// rules out "." and ".." themselves). Saved keys satisfy this by
// construction; this re-checks keys arriving from stored records.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.contains('/') && !key.contains('\\') && !key.starts_with('.')
}
