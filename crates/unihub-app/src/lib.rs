use anyhow::{Context, Result, anyhow, bail};
use unihub_core::backend::Backend;
use unihub_core::config::{UnihubConfig, load_config, resolve_config_path};
use unihub_core::editor::EditorInstall;

mod new_project;
mod new_template;
mod projects;

pub use new_project::{NewProjectPrepare, PackageEntryError, TemplateDetails, parse_manifest_entry};
pub use projects::ProjectPage;

pub struct App<'a> {
    pub backend: &'a dyn Backend,
}

impl<'a> App<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    /// Loads the config the backend is built from, with setup guidance when
    /// it is missing or invalid.
    pub fn ensure_config_ready() -> Result<UnihubConfig> {
        let config_path = resolve_config_path().context("failed to resolve config path")?;

        if !config_path.exists() {
            bail!(
                "missing config at {}\nCreate ~/.config/unihub/config.toml with a [backend] program and see README.md for setup instructions.",
                config_path.display()
            );
        }

        load_config(&config_path).map_err(|error| {
            anyhow!(
                "invalid config at {}: {error}\nFix the config and retry. See README.md for setup instructions.",
                config_path.display()
            )
        })
    }

    pub fn editors(&self) -> Result<Vec<EditorInstall>> {
        self.backend
            .editors()
            .context("failed to list installed editors")
    }
}
