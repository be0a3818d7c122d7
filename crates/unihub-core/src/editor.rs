use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorInstall {
    pub exe_path: PathBuf,
    pub version: String,
    #[serde(default)]
    pub modules: Vec<EditorModule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorModule {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub selected: bool,
}

impl EditorInstall {
    pub fn visible_module_names(&self) -> Vec<&str> {
        self.modules
            .iter()
            .filter(|module| module.visible)
            .map(|module| module.name.as_str())
            .collect()
    }
}

/// Picks the editor the wizard starts with: the cached last-used version when
/// it is still installed, otherwise the first install.
pub fn preferred_editor<'a>(
    editors: &'a [EditorInstall],
    last_editor_version: Option<&str>,
) -> Option<&'a EditorInstall> {
    last_editor_version
        .and_then(|version| editors.iter().find(|editor| editor.version == version))
        .or_else(|| editors.first())
}
