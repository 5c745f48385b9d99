// src/upload.rs - Files selected for analysis and the client-side extension check

use std::path::{Path, PathBuf};

use crate::infra::errors::{DropSeeError, ValidationError};

/// Extensions the client lets through. The server remains the authority.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["csv", "json", "xlsx", "xls"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Json,
    Xlsx,
    Xls,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileKind::Csv),
            "json" => Some(FileKind::Json),
            "xlsx" => Some(FileKind::Xlsx),
            "xls" => Some(FileKind::Xls),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Json => "json",
            FileKind::Xlsx => "xlsx",
            FileKind::Xls => "xls",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FileKind::Csv => "text/csv",
            FileKind::Json => "application/json",
            FileKind::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            FileKind::Xls => "application/vnd.ms-excel",
        }
    }
}

/// Classify a file name by the text after its last `.`, case-insensitively.
/// A name without a dot has no extension and never matches.
pub fn validate_file_name(name: &str) -> Result<FileKind, ValidationError> {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    FileKind::from_extension(ext).ok_or_else(|| ValidationError::UnsupportedExtension {
        file_name: name.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FileContent {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A validated file waiting to be uploaded. Bytes are read at upload time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    name: String,
    size: u64,
    kind: FileKind,
    content: FileContent,
}

impl UploadedFile {
    /// Validate and stat a file on disk.
    pub fn from_path(path: &Path) -> Result<Self, DropSeeError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let kind = validate_file_name(&name)?;
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(DropSeeError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            )));
        }
        Ok(Self {
            name,
            size: meta.len(),
            kind,
            content: FileContent::Path(path.to_path_buf()),
        })
    }

    /// Validate an in-memory file.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        let name = name.into();
        let kind = validate_file_name(&name)?;
        Ok(Self {
            name,
            size: bytes.len() as u64,
            kind,
            content: FileContent::Bytes(bytes),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn extension(&self) -> &'static str {
        self.kind.extension()
    }

    pub async fn read_bytes(&self) -> Result<Vec<u8>, DropSeeError> {
        match &self.content {
            FileContent::Path(p) => Ok(tokio::fs::read(p).await?),
            FileContent::Bytes(b) => Ok(b.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions_any_case() {
        for name in [
            "sales.csv",
            "SALES.CSV",
            "data.Json",
            "book.xlsx",
            "legacy.XLS",
            "archive.tar.csv",
        ] {
            assert!(validate_file_name(name).is_ok(), "{name} should be accepted");
        }
        assert_eq!(validate_file_name("Report.XLSX").unwrap(), FileKind::Xlsx);
    }

    #[test]
    fn test_rejected_extensions() {
        for name in ["notes.txt", "sales.csv.bak", "csv", "", "image.png", "data."] {
            let err = validate_file_name(name).unwrap_err();
            assert_eq!(
                err,
                ValidationError::UnsupportedExtension {
                    file_name: name.to_string()
                }
            );
        }
    }

    #[test]
    fn test_from_path_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();
        let file = UploadedFile::from_path(&path).unwrap();
        assert_eq!(file.name(), "sales.csv");
        assert_eq!(file.size(), 8);
        assert_eq!(file.kind(), FileKind::Csv);
    }

    #[test]
    fn test_from_path_rejects_before_touching_disk() {
        let err = UploadedFile::from_path(Path::new("/definitely/missing/notes.txt")).unwrap_err();
        assert!(matches!(err, DropSeeError::Validation(_)));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = UploadedFile::from_path(Path::new("/definitely/missing/sales.csv")).unwrap_err();
        assert!(matches!(err, DropSeeError::Io(_)));
    }

    #[tokio::test]
    async fn test_read_bytes_from_memory() {
        let file = UploadedFile::from_bytes("x.json", b"[1,2]".to_vec()).unwrap();
        assert_eq!(file.read_bytes().await.unwrap(), b"[1,2]");
        assert_eq!(file.kind().mime_type(), "application/json");
    }
}
