use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lightweight catalog entry as returned by the backend. `name` is the
/// template id (`com.unity.template.3d`, `com.studio.custom-template`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceTemplate {
    pub name: String,
    pub version: String,
    pub path: PathBuf,
    pub editor_version: String,
}

impl SurfaceTemplate {
    pub fn id(&self) -> &str {
        self.name.as_str()
    }
}

/// The template's packed `package.json`, exactly as the backend reads it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateManifest {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub version: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub host: Option<String>,
    pub unity: Option<String>,
    pub description: Option<String>,
    pub dependencies: Option<BTreeMap<String, String>>,
    pub repository: Option<Repository>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Repository {
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub revision: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderPipeline {
    Unknown,
    BuiltIn,
    #[serde(rename = "URP")]
    Urp,
    #[serde(rename = "HDRP")]
    Hdrp,
    Custom,
}

impl RenderPipeline {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::BuiltIn => "Built-in",
            Self::Urp => "URP",
            Self::Hdrp => "HDRP",
            Self::Custom => "Custom",
        }
    }
}

/// Detail payload for a selected template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    #[serde(rename = "tgzPackage")]
    pub manifest: TemplateManifest,
    pub surface_template: SurfaceTemplate,
    #[serde(default)]
    pub pipelines: Vec<RenderPipeline>,
    #[serde(default)]
    pub disk_size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomDependency {
    pub git_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dependencies {
    pub internal: BTreeMap<String, String>,
    pub custom: BTreeMap<String, CustomDependency>,
}

/// Fully decoded template descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub display_name: String,
    pub version: String,
    pub description: String,
    pub dependencies: Dependencies,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateDecodeError {
    #[error("template manifest has no name")]
    MissingName,
    #[error("template '{name}' has an empty dependency name")]
    EmptyDependencyName { name: String },
}

impl Template {
    pub fn from_manifest(manifest: &TemplateManifest) -> Result<Self, TemplateDecodeError> {
        let name = manifest
            .name
            .clone()
            .filter(|value| !value.trim().is_empty())
            .ok_or(TemplateDecodeError::MissingName)?;

        let mut dependencies = Dependencies::default();
        for (package, value) in manifest.dependencies.iter().flatten() {
            if package.trim().is_empty() {
                return Err(TemplateDecodeError::EmptyDependencyName { name });
            }

            if is_version_string(value) {
                dependencies
                    .internal
                    .insert(package.clone(), value.clone());
            } else {
                dependencies.custom.insert(
                    package.clone(),
                    CustomDependency {
                        git_url: is_git_url(value).then(|| value.clone()),
                    },
                );
            }
        }

        Ok(Self {
            display_name: manifest.display_name.clone().unwrap_or_else(|| name.clone()),
            version: manifest.version.clone().unwrap_or_default(),
            description: manifest.description.clone().unwrap_or_default(),
            name,
            dependencies,
        })
    }

    /// Name to manifest value pairs: internal packages keep their version,
    /// custom packages resolve to their git URL when they have one.
    pub fn resolved_dependencies(&self) -> BTreeMap<String, String> {
        let mut resolved = self.dependencies.internal.clone();
        for (name, custom) in &self.dependencies.custom {
            if let Some(url) = &custom.git_url {
                resolved.insert(name.clone(), url.clone());
            }
        }
        resolved
    }
}

pub fn is_version_string(value: &str) -> bool {
    value
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_digit())
        && !value.contains("://")
}

pub fn is_git_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("git@")
        || value.starts_with("git+")
        || value.ends_with(".git")
        || value.contains(".git#")
        || value.starts_with("https://")
        || value.starts_with("ssh://")
}
