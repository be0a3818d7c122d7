use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PackageType {
    Internal,
    Default,
    Git,
    Local,
}

impl PackageType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Internal => "Internal",
            Self::Default => "Default",
            Self::Git => "Git",
            Self::Local => "Local",
        }
    }
}

/// A package as the backend lists it. For git packages `version` holds the
/// repository URL; for local packages it holds the package path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalPackage {
    pub name: String,
    pub version: String,
    #[serde(default = "default_discoverable")]
    pub is_discoverable: bool,
    #[serde(rename = "type")]
    pub package_type: PackageType,
}

fn default_discoverable() -> bool {
    true
}

impl MinimalPackage {
    pub fn git(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: url.into(),
            is_discoverable: true,
            package_type: PackageType::Git,
        }
    }

    pub fn local(path: impl Into<String>) -> Self {
        Self {
            name: path.into(),
            version: String::new(),
            is_discoverable: true,
            package_type: PackageType::Local,
        }
    }

    /// Manifest value the generated project should reference this package by.
    pub fn manifest_value(&self) -> String {
        match self.package_type {
            PackageType::Local => format!("file:{}", self.name),
            PackageType::Internal | PackageType::Default | PackageType::Git => {
                self.version.clone()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedPackage {
    pub name: String,
    pub version: Option<String>,
}

impl SelectedPackage {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}
