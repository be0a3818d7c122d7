use std::str::FromStr;

use anyhow::{Error, bail};
use unihub_core::package::{MinimalPackage, PackageType, SelectedPackage};

use super::state::PackageInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageCategory {
    All,
    InPackage,
    Default,
    Internal,
    Git,
    Local,
}

impl PackageCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::InPackage => "In Package",
            Self::Default => "Default",
            Self::Internal => "Internal",
            Self::Git => "Git",
            Self::Local => "Local",
        }
    }

    fn matches(self, row: &PackageRow) -> bool {
        match self {
            Self::All => true,
            Self::InPackage => row.in_package,
            Self::Default => row.package.package_type == PackageType::Default,
            Self::Internal => row.package.package_type == PackageType::Internal,
            Self::Git => row.package.package_type == PackageType::Git,
            Self::Local => row.package.package_type == PackageType::Local,
        }
    }
}

impl FromStr for PackageCategory {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "all" => Ok(Self::All),
            "inpackage" => Ok(Self::InPackage),
            "default" => Ok(Self::Default),
            "internal" => Ok(Self::Internal),
            "git" => Ok(Self::Git),
            "local" => Ok(Self::Local),
            _ => bail!("unknown package category '{value}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRow {
    pub package: MinimalPackage,
    /// The selected template already depends on this internal package.
    pub in_package: bool,
    pub selected: bool,
}

/// Rows in picker order: editor defaults, then git, then local packages.
pub fn package_rows(defaults: &[MinimalPackage], info: &PackageInfo) -> Vec<PackageRow> {
    let in_template = |package: &MinimalPackage| {
        package.package_type == PackageType::Internal
            && info
                .template_packages
                .iter()
                .any(|template_package| template_package.name == package.name)
    };

    defaults
        .iter()
        .chain(&info.git_packages)
        .chain(&info.local_packages)
        .map(|package| PackageRow {
            package: package.clone(),
            in_package: in_template(package),
            selected: info.is_selected(&package.name),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageView {
    pub category: PackageCategory,
    pub query: String,
    pub only_selected: bool,
}

impl Default for PackageView {
    fn default() -> Self {
        Self {
            category: PackageCategory::All,
            query: String::new(),
            only_selected: false,
        }
    }
}

impl PackageView {
    pub fn rows(&self, defaults: &[MinimalPackage], info: &PackageInfo) -> Vec<PackageRow> {
        let query = self.query.to_lowercase();
        package_rows(defaults, info)
            .into_iter()
            .filter(|row| row.package.name.to_lowercase().contains(&query))
            .filter(|row| self.category.matches(row))
            .filter(|row| !self.only_selected || row.selected)
            .collect()
    }

    /// Current selection plus every visible row not already selected.
    pub fn select_all(&self, defaults: &[MinimalPackage], info: &PackageInfo) -> Vec<SelectedPackage> {
        let mut selected = info.selected_packages.clone();
        for row in self.rows(defaults, info) {
            if !selected.iter().any(|package| package.name == row.package.name) {
                selected.push(SelectedPackage::new(
                    row.package.name,
                    Some(row.package.version),
                ));
            }
        }
        selected
    }

    /// Current selection minus every visible row.
    pub fn deselect_all(
        &self,
        defaults: &[MinimalPackage],
        info: &PackageInfo,
    ) -> Vec<SelectedPackage> {
        let visible = self.rows(defaults, info);
        info.selected_packages
            .iter()
            .filter(|package| !visible.iter().any(|row| row.package.name == package.name))
            .cloned()
            .collect()
    }
}

/// Selection after toggling `package`. Selecting replaces any entry with the
/// same name.
pub fn toggle_package(info: &PackageInfo, package: &MinimalPackage) -> Vec<SelectedPackage> {
    let mut selected: Vec<SelectedPackage> = info
        .selected_packages
        .iter()
        .filter(|existing| existing.name != package.name)
        .cloned()
        .collect();
    if !info.is_selected(&package.name) {
        selected.push(SelectedPackage::new(
            package.name.clone(),
            Some(package.version.clone()),
        ));
    }
    selected
}

/// Turns the selection into what the generated manifest references: internal
/// and default packages by version, git packages by URL, local packages by
/// `file:` path.
pub fn resolve_packages(defaults: &[MinimalPackage], info: &PackageInfo) -> Vec<MinimalPackage> {
    let known = defaults
        .iter()
        .chain(&info.git_packages)
        .chain(&info.local_packages)
        .chain(&info.template_packages);

    let known: Vec<&MinimalPackage> = known.collect();
    info.selected_packages
        .iter()
        .filter_map(|selected| {
            let mut package = known
                .iter()
                .find(|package| package.name == selected.name)
                .map(|package| (*package).clone())?;
            if package.package_type != PackageType::Local
                && let Some(version) = &selected.version
            {
                package.version = version.clone();
            }
            package.version = package.manifest_value();
            Some(package)
        })
        .collect()
}
