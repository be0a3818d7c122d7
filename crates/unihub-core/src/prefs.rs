use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::package::MinimalPackage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserCacheKey {
    LastEditorVersion,
}

impl UserCacheKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LastEditorVersion => "lastEditorVersion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserCache {
    pub last_editor_version: Option<String>,
    pub git_packages: Vec<MinimalPackage>,
    pub local_packages: Vec<MinimalPackage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Prefs {
    pub new_project_path: Option<PathBuf>,
    pub hub_path: Option<PathBuf>,
    pub hub_editors_path: Option<PathBuf>,
    pub hub_appdata_path: Option<PathBuf>,
}

impl Prefs {
    /// Directory user templates are written to.
    pub fn user_templates_dir(&self) -> Option<PathBuf> {
        self.hub_appdata_path
            .as_ref()
            .map(|path| path.join("Templates"))
    }
}
