//! Template file loader bounded by compile-time size limits

use crate::config::compile_time::template_file::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::TemplateFilePreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success, log_warning};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, thiserror::Error)]
pub enum TemplateFileError {
    #[error("Template file not found: {path}")]
    FileNotFound { path: String },

    #[error("Template file too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Template file is empty: {path}")]
    EmptyFile { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in template file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading template file: {message}")]
    IoError { message: String },

    #[error("Invalid template path: {path}")]
    InvalidPath { path: String },
}

impl TemplateFileError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            TemplateFileError::FileNotFound { .. } => codes::template_file::FILE_NOT_FOUND,
            TemplateFileError::FileTooLarge { .. } => codes::template_file::FILE_TOO_LARGE,
            TemplateFileError::EmptyFile { .. } => codes::template_file::EMPTY_FILE,
            TemplateFileError::PermissionDenied { .. } => codes::template_file::PERMISSION_DENIED,
            TemplateFileError::InvalidEncoding { .. } => codes::template_file::INVALID_ENCODING,
            TemplateFileError::IoError { .. } => codes::template_file::IO_ERROR,
            TemplateFileError::InvalidPath { .. } => codes::template_file::INVALID_PATH,
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(error: std::io::Error, path: &Path) -> Self {
        match error.kind() {
            ErrorKind::NotFound => TemplateFileError::FileNotFound {
                path: path.display().to_string(),
            },
            ErrorKind::PermissionDenied => TemplateFileError::PermissionDenied {
                path: path.display().to_string(),
            },
            ErrorKind::InvalidData => TemplateFileError::InvalidEncoding {
                path: path.display().to_string(),
            },
            _ => TemplateFileError::IoError {
                message: format!("'{}': {}", path.display(), error),
            },
        }
    }
}

/// Facts about a loaded template file
#[derive(Debug, Clone)]
pub struct TemplateFileMetadata {
    pub path: PathBuf,
    pub size: u64,
    pub line_count: usize,
    pub modified: Option<std::time::SystemTime>,
}

impl TemplateFileMetadata {
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }

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

/// Template source read from disk
#[derive(Debug, Clone)]
pub struct TemplateSource {
    pub text: String,
    pub metadata: TemplateFileMetadata,
}

pub struct TemplateFileLoader {
    pub allow_empty_file: bool,
    pub log_file_metrics: bool,
}

impl TemplateFileLoader {
    pub fn new() -> Self {
        Self::from_preferences(&TemplateFilePreferences::default())
    }

    pub fn from_preferences(prefs: &TemplateFilePreferences) -> Self {
        Self {
            allow_empty_file: prefs.allow_empty_file,
            log_file_metrics: prefs.log_file_metrics,
        }
    }

    pub fn with_empty_files_allowed(mut self, allowed: bool) -> Self {
        self.allow_empty_file = allowed;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Read and validate a template file
    pub fn load(&self, path: impl AsRef<Path>) -> Result<TemplateSource, TemplateFileError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        log_debug!("Loading template file", "path" => &path_str);

        let result = self.load_inner(path);
        match &result {
            Ok(source) => self.log_loaded(source, &path_str),
            Err(error) => {
                log_error!(error.error_code(), "Failed to load template file",
                    "path" => &path_str,
                    "reason" => error);
            }
        }
        result
    }

    fn load_inner(&self, path: &Path) -> Result<TemplateSource, TemplateFileError> {
        if path.as_os_str().is_empty() {
            return Err(TemplateFileError::InvalidPath {
                path: String::new(),
            });
        }

        let file_metadata =
            fs::metadata(path).map_err(|e| TemplateFileError::from_io(e, path))?;

        if !file_metadata.is_file() {
            return Err(TemplateFileError::InvalidPath {
                path: path.display().to_string(),
            });
        }

        let size = file_metadata.len();
        if size > MAX_FILE_SIZE {
            return Err(TemplateFileError::FileTooLarge {
                size,
                max_size: MAX_FILE_SIZE,
            });
        }

        if size == 0 && !self.allow_empty_file {
            return Err(TemplateFileError::EmptyFile {
                path: path.display().to_string(),
            });
        }

        let text = fs::read_to_string(path).map_err(|e| TemplateFileError::from_io(e, path))?;

        Ok(TemplateSource {
            metadata: TemplateFileMetadata {
                path: path.to_path_buf(),
                size,
                line_count: text.lines().count(),
                modified: file_metadata.modified().ok(),
            },
            text,
        })
    }

    fn log_loaded(&self, source: &TemplateSource, path: &str) {
        if source.metadata.is_large_file() {
            log_warning!("Template file is larger than the large file threshold",
                "path" => path,
                "size" => source.metadata.human_readable_size());
        }

        if self.log_file_metrics {
            log_success!(codes::success::TEMPLATE_FILE_LOADED, "Template file read",
                "path" => path,
                "size_bytes" => source.metadata.size,
                "size_human" => source.metadata.human_readable_size(),
                "lines" => source.metadata.line_count);
        } else {
            log_success!(codes::success::TEMPLATE_FILE_LOADED, "Template file read",
                "path" => path);
        }
    }
}

impl Default for TemplateFileLoader {
    fn default() -> Self {
        Self::new()
    }
}
