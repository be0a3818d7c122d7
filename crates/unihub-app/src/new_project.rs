use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use thiserror::Error;
use unihub_core::editor::{EditorInstall, preferred_editor};
use unihub_core::file_dir::FileDir;
use unihub_core::generate::GenerateProjectRequest;
use unihub_core::package::{MinimalPackage, PackageType};
use unihub_core::prefs::{UserCache, UserCacheKey};
use unihub_core::template::{SurfaceTemplate, Template, TemplateRecord, is_git_url};
use unihub_core::validate;

use crate::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProjectPrepare {
    pub editors: Vec<EditorInstall>,
    pub editor: Option<EditorInstall>,
    pub default_project_path: PathBuf,
    pub user_cache: UserCache,
}

/// A template record plus its manifest decoded into the typed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDetails {
    pub record: TemplateRecord,
    pub template: Template,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackageEntryError {
    #[error("package entry must look like \"com.company.package\": \"https://host/repo.git\"")]
    Malformed,
    #[error("package entry must contain exactly one package")]
    NotSingle,
    #[error("'{value}' is not a git url")]
    NotGitUrl { value: String },
}

/// Parses one dependency line copied out of a `manifest.json`, with or without
/// the trailing comma.
pub fn parse_manifest_entry(line: &str) -> std::result::Result<MinimalPackage, PackageEntryError> {
    let trimmed = line.trim().trim_end_matches(',');
    let wrapped = format!("{{{trimmed}}}");
    let entries: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&wrapped).map_err(|_| PackageEntryError::Malformed)?;

    let mut entries = entries.into_iter();
    let (name, value) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => return Err(PackageEntryError::NotSingle),
    };

    let url = value
        .as_str()
        .ok_or(PackageEntryError::Malformed)?
        .to_string();
    if name.trim().is_empty() {
        return Err(PackageEntryError::Malformed);
    }
    if !is_git_url(&url) {
        return Err(PackageEntryError::NotGitUrl { value: url });
    }

    Ok(MinimalPackage::git(name, url))
}

impl<'a> App<'a> {
    pub fn new_project_prepare(&self) -> Result<NewProjectPrepare> {
        let editors = self.editors()?;
        let user_cache = self
            .backend
            .user_cache()
            .context("failed to load user cache")?;
        let default_project_path = self
            .backend
            .default_project_path()
            .context("failed to resolve default project path")?;

        let editor =
            preferred_editor(&editors, user_cache.last_editor_version.as_deref()).cloned();

        Ok(NewProjectPrepare {
            editors,
            editor,
            default_project_path,
            user_cache,
        })
    }

    pub fn new_project_templates(&self, editor_version: &str) -> Result<Vec<SurfaceTemplate>> {
        self.backend
            .surface_templates(editor_version)
            .with_context(|| format!("failed to load templates for editor {editor_version}"))
    }

    pub fn new_project_template_details(
        &self,
        template: &SurfaceTemplate,
    ) -> Result<TemplateDetails> {
        let record = self
            .backend
            .template_information(template)
            .with_context(|| format!("failed to load template '{}'", template.id()))?;
        let template = Template::from_manifest(&record.manifest)
            .with_context(|| format!("invalid manifest in template '{}'", template.id()))?;
        Ok(TemplateDetails { record, template })
    }

    pub fn new_project_template_files(&self, template: &SurfaceTemplate) -> Result<FileDir> {
        self.backend
            .template_file_paths(template)
            .with_context(|| format!("failed to list files of template '{}'", template.id()))
    }

    pub fn new_project_default_packages(
        &self,
        editor_version: &str,
    ) -> Result<Vec<MinimalPackage>> {
        self.backend
            .default_editor_packages(editor_version)
            .with_context(|| format!("failed to load default packages for editor {editor_version}"))
    }

    pub fn new_project_remember_editor(&self, editor_version: &str) -> Result<()> {
        self.backend
            .set_user_cache_value(UserCacheKey::LastEditorVersion, editor_version)
            .context("failed to persist last used editor version")
    }

    pub fn new_project_cached_packages(&self) -> Result<UserCache> {
        self.backend
            .user_cache()
            .context("failed to load cached packages")
    }

    pub fn new_project_add_git_package(&self, name: &str, url: &str) -> Result<MinimalPackage> {
        let name = name.trim();
        let url = url.trim();
        if name.is_empty() {
            bail!("git package id cannot be empty");
        }
        if !is_git_url(url) {
            bail!("'{url}' is not a git url");
        }

        let package = MinimalPackage::git(name, url);
        self.cache_package(&package)?;
        Ok(package)
    }

    pub fn new_project_add_manifest_package(&self, line: &str) -> Result<MinimalPackage> {
        let package = parse_manifest_entry(line).context("failed to read package entry")?;
        self.cache_package(&package)?;
        Ok(package)
    }

    pub fn new_project_add_local_package(&self, path: &Path) -> Result<MinimalPackage> {
        let valid = self
            .backend
            .is_valid_dir(path)
            .with_context(|| format!("failed to check {}", path.display()))?;
        if !valid {
            bail!("local package path {} is not a directory", path.display());
        }

        let package = MinimalPackage::local(path.to_string_lossy());
        self.cache_package(&package)?;
        Ok(package)
    }

    pub fn new_project_remove_package(&self, package: &MinimalPackage) -> Result<()> {
        if !matches!(package.package_type, PackageType::Git | PackageType::Local) {
            bail!(
                "{} packages cannot be removed",
                package.package_type.label().to_lowercase()
            );
        }

        self.backend
            .remove_cached_package(package)
            .with_context(|| format!("failed to remove cached package '{}'", package.name))
    }

    pub fn new_project_delete_template(
        &self,
        template: &SurfaceTemplate,
        editor_version: &str,
    ) -> Result<()> {
        tracing::info!(template = template.id(), "deleting template");
        self.backend
            .delete_template(template, editor_version)
            .with_context(|| format!("failed to delete template '{}'", template.id()))
    }

    pub fn new_project_generate(&self, request: &GenerateProjectRequest) -> Result<PathBuf> {
        let name = &request.project_info.name;
        let parent = &request.project_info.path;

        if let Some(error) = validate::project_name(name) {
            bail!(error);
        }
        if let Some(error) = validate::project_path(&parent.to_string_lossy()) {
            bail!(error);
        }

        let parent_ok = self
            .backend
            .is_valid_dir(parent)
            .with_context(|| format!("failed to check {}", parent.display()))?;
        if !parent_ok {
            bail!("project path {} is not a directory", parent.display());
        }

        let output_dir = request.output_dir();
        let taken = self
            .backend
            .is_valid_path(&output_dir)
            .with_context(|| format!("failed to check {}", output_dir.display()))?;
        if taken {
            bail!("{} already exists", output_dir.display());
        }

        tracing::info!(
            project = %output_dir.display(),
            packages = request.template_info.packages.len(),
            files = request.template_info.selected_files.len(),
            "generating project"
        );

        self.backend
            .generate_project(request)
            .with_context(|| format!("failed to generate project at {}", output_dir.display()))
    }

    fn cache_package(&self, package: &MinimalPackage) -> Result<()> {
        self.backend
            .add_cached_package(package)
            .with_context(|| format!("failed to cache package '{}'", package.name))
    }
}
