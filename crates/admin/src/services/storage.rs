//! Staged file storage for uploaded invoices.
//!
//! Uploaded files are persisted under a configured directory before being
//! attached to an outgoing email. Files are namespaced per customer and
//! prefixed with a random UUID so client-supplied names can neither collide
//! nor escape the upload directory.

use std::path::{Path, PathBuf};

use gardu_core::Idpel;
use uuid::Uuid;

/// Fallback name when a client-supplied filename sanitizes to nothing.
const FALLBACK_FILE_NAME: &str = "invoice";

/// A file staged on local disk, ready to be attached to an email.
#[derive(Debug, Clone)]
pub struct StagedFile {
    /// Where the file lives on disk.
    pub path: PathBuf,
    /// Sanitized original filename, used as the attachment name.
    pub file_name: String,
}

/// Local-disk store for staged invoice files.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `root`.
    ///
    /// The directory is created lazily on first stage.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stage an uploaded file under `{root}/{idpel}/{uuid}-{sanitized name}`.
    ///
    /// # Errors
    ///
    /// Returns `std::io::Error` if the directory cannot be created or the
    /// file cannot be written.
    pub async fn stage(
        &self,
        idpel: &Idpel,
        original_name: &str,
        contents: &[u8],
    ) -> Result<StagedFile, std::io::Error> {
        let file_name = sanitize_file_name(original_name);
        let dir = self.root.join(idpel.as_str());
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(format!("{}-{}", Uuid::new_v4(), file_name));
        tokio::fs::write(&path, contents).await?;

        tracing::debug!(path = %path.display(), "Staged uploaded file");

        Ok(StagedFile { path, file_name })
    }

    /// Remove a staged file from disk.
    ///
    /// # Errors
    ///
    /// Returns `std::io::Error` if the file cannot be removed.
    pub async fn remove(&self, staged: &StagedFile) -> Result<(), std::io::Error> {
        tokio::fs::remove_file(&staged.path).await
    }
}

/// Sanitize a client-supplied filename.
///
/// Keeps only the final path component and strips leading dots, so names
/// like `../../etc/passwd` or `.hidden` cannot traverse out of the upload
/// directory or vanish from listings.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let last_component = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim_start_matches('.');

    if last_component.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        last_component.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> FileStore {
        FileStore::new(std::env::temp_dir().join(format!("gardu-store-test-{}", Uuid::new_v4())))
    }

    #[test]
    fn test_sanitize_plain_name() {
        assert_eq!(sanitize_file_name("invoice-2026-07.pdf"), "invoice-2026-07.pdf");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\x\\tagihan.pdf"), "tagihan.pdf");
    }

    #[test]
    fn test_sanitize_strips_leading_dots() {
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name("..."), FALLBACK_FILE_NAME);
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_file_name(""), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name("uploads/"), FALLBACK_FILE_NAME);
    }

    #[tokio::test]
    async fn test_stage_writes_namespaced_file() {
        let store = temp_store();
        let idpel = Idpel::parse("123").unwrap();

        let staged = store.stage(&idpel, "tagihan.pdf", b"%PDF-").await.unwrap();

        assert!(staged.path.starts_with(store.root().join("123")));
        assert_eq!(staged.file_name, "tagihan.pdf");
        assert!(
            staged
                .path
                .file_name()
                .unwrap()
                .to_string_lossy()
                .ends_with("-tagihan.pdf")
        );

        let contents = tokio::fs::read(&staged.path).await.unwrap();
        assert_eq!(contents, b"%PDF-");

        tokio::fs::remove_dir_all(store.root()).await.unwrap();
    }

    #[tokio::test]
    async fn test_stage_same_name_twice_does_not_collide() {
        let store = temp_store();
        let idpel = Idpel::parse("123").unwrap();

        let first = store.stage(&idpel, "tagihan.pdf", b"a").await.unwrap();
        let second = store.stage(&idpel, "tagihan.pdf", b"b").await.unwrap();

        assert_ne!(first.path, second.path);

        tokio::fs::remove_dir_all(store.root()).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_deletes_staged_file() {
        let store = temp_store();
        let idpel = Idpel::parse("123").unwrap();

        let staged = store.stage(&idpel, "tagihan.pdf", b"x").await.unwrap();
        store.remove(&staged).await.unwrap();

        assert!(!staged.path.exists());

        tokio::fs::remove_dir_all(store.root()).await.unwrap();
    }
}
