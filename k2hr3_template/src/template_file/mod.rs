//! Reading templates from disk

mod processor;

pub use processor::{TemplateFileError, TemplateFileLoader, TemplateFileMetadata, TemplateSource};

use std::path::Path;

/// Load a template file with preferences taken from the environment
pub fn load_template(path: impl AsRef<Path>) -> Result<TemplateSource, TemplateFileError> {
    TemplateFileLoader::new().load(path)
}
