use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::anyhow;
use unihub_core::backend::Backend;
use unihub_core::editor::EditorInstall;
use unihub_core::file_dir::FileDir;
use unihub_core::generate::{GenerateProjectRequest, NewTemplateRequest};
use unihub_core::package::{MinimalPackage, PackageType};
use unihub_core::prefs::{Prefs, UserCache, UserCacheKey};
use unihub_core::project::Project;
use unihub_core::template::{SurfaceTemplate, TemplateManifest, TemplateRecord};

#[allow(dead_code)]
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// In-memory backend. Paths listed in `existing_paths` count as present
/// files and directories; a command named in `failures` returns that error.
#[derive(Default)]
pub struct FakeBackend {
    pub editors: Vec<EditorInstall>,
    pub templates: Vec<SurfaceTemplate>,
    pub records: BTreeMap<String, TemplateRecord>,
    pub default_project_path: PathBuf,
    pub prefs: Prefs,
    pub projects: Vec<Project>,
    pub existing_paths: BTreeSet<PathBuf>,
    pub failures: BTreeMap<&'static str, String>,
    pub user_cache: Mutex<UserCache>,
    pub calls: Mutex<Vec<String>>,
    pub generated: Mutex<Vec<GenerateProjectRequest>>,
    pub saved_templates: Mutex<Vec<NewTemplateRequest>>,
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, command: &'static str) -> anyhow::Result<()> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(command.to_string());
        match self.failures.get(command) {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(()),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.existing_paths.contains(path)
    }
}

impl Backend for FakeBackend {
    fn default_project_path(&self) -> anyhow::Result<PathBuf> {
        self.record("get_default_project_path")?;
        Ok(self.default_project_path.clone())
    }

    fn editors(&self) -> anyhow::Result<Vec<EditorInstall>> {
        self.record("get_editors")?;
        Ok(self.editors.clone())
    }

    fn surface_templates(&self, editor_version: &str) -> anyhow::Result<Vec<SurfaceTemplate>> {
        self.record("get_surface_templates")?;
        Ok(self
            .templates
            .iter()
            .filter(|template| template.editor_version == editor_version)
            .cloned()
            .collect())
    }

    fn template_information(&self, template: &SurfaceTemplate) -> anyhow::Result<TemplateRecord> {
        self.record("get_template_information")?;
        self.records
            .get(template.id())
            .cloned()
            .ok_or_else(|| anyhow!("unknown template {}", template.id()))
    }

    fn template_file_paths(&self, _template: &SurfaceTemplate) -> anyhow::Result<FileDir> {
        self.record("get_template_file_paths")?;
        Ok(FileDir::folder("0", "package", Vec::new()))
    }

    fn default_editor_packages(
        &self,
        _editor_version: &str,
    ) -> anyhow::Result<Vec<MinimalPackage>> {
        self.record("get_default_editor_packages")?;
        Ok(Vec::new())
    }

    fn user_cache(&self) -> anyhow::Result<UserCache> {
        self.record("get_user_cache")?;
        Ok(self.user_cache.lock().expect("cache lock").clone())
    }

    fn set_user_cache_value(&self, key: UserCacheKey, value: &str) -> anyhow::Result<()> {
        self.record("set_user_cache_value")?;
        match key {
            UserCacheKey::LastEditorVersion => {
                self.user_cache
                    .lock()
                    .expect("cache lock")
                    .last_editor_version = Some(value.to_string());
            }
        }
        Ok(())
    }

    fn add_cached_package(&self, package: &MinimalPackage) -> anyhow::Result<()> {
        self.record("add_cached_package")?;
        let mut cache = self.user_cache.lock().expect("cache lock");
        match package.package_type {
            PackageType::Local => cache.local_packages.push(package.clone()),
            _ => cache.git_packages.push(package.clone()),
        }
        Ok(())
    }

    fn remove_cached_package(&self, package: &MinimalPackage) -> anyhow::Result<()> {
        self.record("remove_cached_package")?;
        let mut cache = self.user_cache.lock().expect("cache lock");
        cache.git_packages.retain(|cached| cached != package);
        cache.local_packages.retain(|cached| cached != package);
        Ok(())
    }

    fn prefs(&self) -> anyhow::Result<Prefs> {
        self.record("get_prefs")?;
        Ok(self.prefs.clone())
    }

    fn generate_project(&self, request: &GenerateProjectRequest) -> anyhow::Result<PathBuf> {
        self.record("generate_project")?;
        self.generated
            .lock()
            .expect("generated lock")
            .push(request.clone());
        Ok(request.output_dir())
    }

    fn generate_template(&self, request: &NewTemplateRequest) -> anyhow::Result<PathBuf> {
        self.record("generate_template")?;
        self.saved_templates
            .lock()
            .expect("templates lock")
            .push(request.clone());
        Ok(PathBuf::from(format!("/templates/{}.tgz", request.name)))
    }

    fn delete_template(
        &self,
        _template: &SurfaceTemplate,
        _editor_version: &str,
    ) -> anyhow::Result<()> {
        self.record("delete_template")
    }

    fn projects(&self) -> anyhow::Result<Vec<Project>> {
        self.record("get_projects")?;
        Ok(self.projects.clone())
    }

    fn is_valid_path(&self, path: &Path) -> anyhow::Result<bool> {
        self.record("is_valid_path")?;
        Ok(self.exists(path))
    }

    fn is_valid_dir(&self, path: &Path) -> anyhow::Result<bool> {
        self.record("is_valid_dir")?;
        Ok(self.exists(path))
    }

    fn is_valid_file(&self, path: &Path) -> anyhow::Result<bool> {
        self.record("is_valid_file")?;
        Ok(self.exists(path))
    }
}

pub fn editor(version: &str) -> EditorInstall {
    EditorInstall {
        exe_path: PathBuf::from(format!("/editors/{version}/Unity")),
        version: version.to_string(),
        modules: Vec::new(),
    }
}

pub fn surface_template(name: &str, editor_version: &str) -> SurfaceTemplate {
    SurfaceTemplate {
        name: name.to_string(),
        version: "1.0.0".to_string(),
        path: PathBuf::from(format!("/templates/{name}.tgz")),
        editor_version: editor_version.to_string(),
    }
}

#[allow(dead_code)]
pub fn record(template: &SurfaceTemplate, dependencies: &[(&str, &str)]) -> TemplateRecord {
    TemplateRecord {
        manifest: TemplateManifest {
            name: Some(template.name.clone()),
            dependencies: Some(
                dependencies
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
            ),
            ..TemplateManifest::default()
        },
        surface_template: template.clone(),
        pipelines: Vec::new(),
        disk_size_bytes: 0,
    }
}

#[allow(dead_code)]
pub fn project(name: &str, last_opened_at: i64, is_pinned: bool) -> Project {
    Project {
        name: name.to_string(),
        path: PathBuf::from(format!("/projects/{name}")),
        version: "2022.3.40f1".to_string(),
        is_pinned,
        added_at: None,
        last_opened_at: Some(last_opened_at),
    }
}

#[allow(dead_code)]
pub fn write_valid_config(home: &Path) {
    let config_dir = home.join(".config").join("unihub");
    fs::create_dir_all(&config_dir).expect("create config dir");

    let config = r#"
version = 1

[backend]
program = "unihub-backend"
args = []
"#;

    fs::write(config_dir.join("config.toml"), config).expect("write config");
}
