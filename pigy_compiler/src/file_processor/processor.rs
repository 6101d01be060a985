//! Grammar file opening with compile-time size limits and global logging integration

use crate::config::compile_time::file_processing::MAX_FILE_SIZE;
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Extension expected on grammar files
pub const GRAMMAR_EXTENSION: &str = "pigy";

#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .pigy, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("I/O error opening file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

/// File metadata collected before the grammar is streamed
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    pub extension: Option<String>,
    pub is_pigy_file: bool,
    pub modified: Option<std::time::SystemTime>,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// An opened grammar file, ready to be read one character at a time
#[derive(Debug)]
pub struct GrammarSource {
    pub reader: BufReader<File>,
    pub metadata: FileMetadata,
}

pub struct FileProcessor {
    require_pigy_extension: bool,
    enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self::from_preferences(&FileProcessorPreferences::default())
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_pigy_extension: prefs.require_pigy_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_pigy_extension_required(mut self, required: bool) -> Self {
        self.require_pigy_extension = required;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Validate and open a grammar file
    pub fn open(&self, file_path: &str) -> Result<GrammarSource, FileProcessorError> {
        log_debug!("Opening grammar file", "file" => file_path);

        let path = self.validate_path(file_path)?;
        let metadata = self.get_metadata(&path)?;
        self.validate_file(&metadata, file_path)?;

        let file = File::open(&path).map_err(|e| {
            let error = io_error(&path, &e);
            log_error!(error.error_code(), "Failed to open grammar file",
                "file" => file_path,
                "io_error" => e);
            error
        })?;

        if self.enable_performance_logging {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "Grammar file opened",
                "file" => file_path,
                "size_bytes" => metadata.size,
                "size_human" => metadata.human_readable_size(),
                "max_size_bytes" => MAX_FILE_SIZE
            );
        }

        Ok(GrammarSource {
            reader: BufReader::new(file),
            metadata,
        })
    }

    fn validate_path(&self, file_path: &str) -> Result<PathBuf, FileProcessorError> {
        if file_path.is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        let path = Path::new(file_path);

        if !path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "File not found", "path" => file_path);
            return Err(error);
        }

        if !path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => file_path);
            return Err(error);
        }

        path.canonicalize().map_err(|e| {
            let error = io_error(path, &e);
            log_error!(error.error_code(), "Failed to canonicalize path",
                "path" => file_path,
                "io_error" => e);
            error
        })
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| {
            let error = io_error(path, &e);
            log_error!(error.error_code(), "Failed to read file metadata",
                "path" => path.display(),
                "io_error" => e);
            error
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());
        let is_pigy_file = extension.as_deref() == Some(GRAMMAR_EXTENSION);

        let file_metadata = FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            is_pigy_file,
            modified: metadata.modified().ok(),
        };

        log_debug!("File metadata collected",
            "size_bytes" => file_metadata.size,
            "extension" => file_metadata.extension.as_deref().unwrap_or("none"),
            "is_pigy" => is_pigy_file);

        Ok(file_metadata)
    }

    fn validate_file(
        &self,
        metadata: &FileMetadata,
        file_path: &str,
    ) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds compile-time maximum size limit",
                "file" => file_path,
                "size_bytes" => metadata.size,
                "limit_bytes" => MAX_FILE_SIZE);
            return Err(error);
        }

        if self.require_pigy_extension && !metadata.is_pigy_file {
            let error = FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "File does not have required .pigy extension",
                "file" => file_path,
                "extension" => metadata.extension.as_deref().unwrap_or("none"));
            return Err(error);
        }

        Ok(())
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn io_error(path: &Path, e: &std::io::Error) -> FileProcessorError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
            path: path.display().to_string(),
        },
        std::io::ErrorKind::NotFound => FileProcessorError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => FileProcessorError::IoError {
            message: format!("'{}': {}", path.display(), e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::{Read, Write};
    use tempfile::NamedTempFile;

    fn grammar_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_open_valid_file() {
        let file = grammar_file(".pigy", "%token NUM\n%yacc\n");
        let processor = FileProcessor::new();

        let mut source = processor.open(file.path().to_str().unwrap()).unwrap();
        assert!(source.metadata.is_pigy_file);
        assert_eq!(source.metadata.size, 17);

        let mut content = String::new();
        source.reader.read_to_string(&mut content).unwrap();
        assert!(content.starts_with("%token"));
    }

    #[test]
    fn test_file_not_found() {
        let result = FileProcessor::new().open("definitely/not/here.pigy");
        assert_matches!(result, Err(FileProcessorError::FileNotFound { .. }));
    }

    #[test]
    fn test_empty_path_rejected() {
        let result = FileProcessor::new().open("");
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileProcessor::new().open(dir.path().to_str().unwrap());
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_extension_requirement() {
        let file = grammar_file(".txt", "%yacc\n");
        let path = file.path().to_str().unwrap();

        let lenient = FileProcessor::new().with_pigy_extension_required(false);
        assert!(lenient.open(path).is_ok());

        let strict = FileProcessor::new().with_pigy_extension_required(true);
        assert_matches!(
            strict.open(path),
            Err(FileProcessorError::InvalidExtension { extension: Some(ref ext) }) if ext == "txt"
        );
    }

    #[test]
    fn test_empty_file_is_accepted() {
        let file = grammar_file(".pigy", "");
        let source = FileProcessor::new()
            .open(file.path().to_str().unwrap())
            .unwrap();
        assert_eq!(source.metadata.size, 0);
    }

    #[test]
    fn test_error_codes() {
        let error = FileProcessorError::FileTooLarge {
            size: MAX_FILE_SIZE + 1,
            max_size: MAX_FILE_SIZE,
        };
        assert_eq!(error.error_code().as_str(), "E007");
        assert!(error.requires_halt());
    }

    #[test]
    fn test_human_readable_size() {
        let metadata = FileMetadata {
            path: PathBuf::from("g.pigy"),
            size: 2048,
            extension: Some("pigy".into()),
            is_pigy_file: true,
            modified: None,
        };
        assert_eq!(metadata.human_readable_size(), "2.00 KB");
    }
}
