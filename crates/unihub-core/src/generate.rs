use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::editor::EditorInstall;
use crate::package::MinimalPackage;
use crate::template::SurfaceTemplate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfoForGeneration {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfoForGeneration {
    pub template: Option<SurfaceTemplate>,
    pub editor_version: EditorInstall,
    pub packages: Vec<MinimalPackage>,
    pub selected_files: Vec<PathBuf>,
    pub is_empty: bool,
}

/// Single round trip that materializes a project on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProjectRequest {
    pub project_info: ProjectInfoForGeneration,
    pub template_info: TemplateInfoForGeneration,
}

/// "Save the current selection as a template" payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplateRequest {
    pub template: TemplateInfoForGeneration,
    pub name: String,
    pub display_name: String,
    pub version: String,
    pub description: String,
}

impl GenerateProjectRequest {
    pub fn output_dir(&self) -> PathBuf {
        self.project_info.path.join(&self.project_info.name)
    }
}
