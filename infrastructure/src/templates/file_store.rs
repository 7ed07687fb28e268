//! Templates read from a directory, with built-in fallbacks.

use async_trait::async_trait;
use ragchat_application::{TemplateError, TemplateStore};
use ragchat_domain::TemplateName;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads `<dir>/<name>.template`, falling back to the built-in text when
/// no directory is configured or the file does not exist.
#[derive(Debug, Clone, Default)]
pub struct FileTemplateStore {
    dir: Option<PathBuf>,
}

impl FileTemplateStore {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

#[async_trait]
impl TemplateStore for FileTemplateStore {
    async fn load(&self, name: TemplateName) -> Result<String, TemplateError> {
        if let Some(dir) = &self.dir {
            let path = dir.join(name.file_name());
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    debug!("Loaded template {} from {}", name, path.display());
                    return Ok(text);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("No {} in {}; using built-in", name.file_name(), dir.display());
                }
                Err(e) => {
                    return Err(TemplateError::Io {
                        name: name.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(name.builtin().to_string())
    }
}
