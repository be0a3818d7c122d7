use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::editor::EditorInstall;
use crate::file_dir::FileDir;
use crate::generate::{GenerateProjectRequest, NewTemplateRequest};
use crate::package::MinimalPackage;
use crate::prefs::{Prefs, UserCache, UserCacheKey};
use crate::project::Project;
use crate::template::{SurfaceTemplate, TemplateRecord};

/// Everything the client needs from the installation manager's backend.
///
/// Implementations are called from loader threads.
pub trait Backend: Send + Sync {
    fn default_project_path(&self) -> anyhow::Result<PathBuf>;
    fn editors(&self) -> anyhow::Result<Vec<EditorInstall>>;
    fn surface_templates(&self, editor_version: &str) -> anyhow::Result<Vec<SurfaceTemplate>>;
    fn template_information(&self, template: &SurfaceTemplate) -> anyhow::Result<TemplateRecord>;
    fn template_file_paths(&self, template: &SurfaceTemplate) -> anyhow::Result<FileDir>;
    fn default_editor_packages(&self, editor_version: &str)
    -> anyhow::Result<Vec<MinimalPackage>>;
    fn user_cache(&self) -> anyhow::Result<UserCache>;
    fn set_user_cache_value(&self, key: UserCacheKey, value: &str) -> anyhow::Result<()>;
    fn add_cached_package(&self, package: &MinimalPackage) -> anyhow::Result<()>;
    fn remove_cached_package(&self, package: &MinimalPackage) -> anyhow::Result<()>;
    fn prefs(&self) -> anyhow::Result<Prefs>;
    fn generate_project(&self, request: &GenerateProjectRequest) -> anyhow::Result<PathBuf>;
    fn generate_template(&self, request: &NewTemplateRequest) -> anyhow::Result<PathBuf>;
    fn delete_template(&self, template: &SurfaceTemplate, editor_version: &str)
    -> anyhow::Result<()>;
    fn projects(&self) -> anyhow::Result<Vec<Project>>;
    fn is_valid_path(&self, path: &Path) -> anyhow::Result<bool>;
    fn is_valid_dir(&self, path: &Path) -> anyhow::Result<bool>;
    fn is_valid_file(&self, path: &Path) -> anyhow::Result<bool>;
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to execute backend command '{command}': {message}")]
    Execute { command: String, message: String },
    #[error("backend command '{command}' failed (exit {status}): {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("failed to encode arguments for backend command '{command}': {source}")]
    Encode {
        command: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to decode response of backend command '{command}': {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

const INVALID_INSTALL_PATH_MARKERS: [&str; 2] =
    ["Invalid hub_editors_path", "hub_editors_path not set"];

/// How a failed load is reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    /// The configured editor install directory is missing or unset.
    InvalidInstallPath { message: String },
    Other { message: String },
}

impl LoadFailure {
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        if INVALID_INSTALL_PATH_MARKERS
            .iter()
            .any(|marker| message.contains(marker))
        {
            Self::InvalidInstallPath { message }
        } else {
            Self::Other { message }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInstallPath { message } | Self::Other { message } => message.as_str(),
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidInstallPath { .. } => {
                Some("the editor install path is invalid; fix it in settings")
            }
            Self::Other { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LoadFailure;

    #[test]
    fn classifies_invalid_install_path() {
        let failure = LoadFailure::classify(
            "backend command 'get_editors' failed (exit 1): Invalid hub_editors_path",
        );
        assert!(matches!(failure, LoadFailure::InvalidInstallPath { .. }));
        assert!(failure.hint().is_some());

        let other = LoadFailure::classify("disk full");
        assert_eq!(other.message(), "disk full");
        assert_eq!(other.hint(), None);
    }
}
