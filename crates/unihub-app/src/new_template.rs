use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use unihub_core::generate::NewTemplateRequest;
use unihub_core::validate::{self, FieldError};

use crate::App;

impl<'a> App<'a> {
    /// Path the backend will write a user template named `name` to.
    pub fn new_template_target(&self, name: &str) -> Result<PathBuf> {
        let prefs = self.backend.prefs().context("failed to load preferences")?;
        let templates_dir = prefs
            .user_templates_dir()
            .context("hub appdata path is not set; fix it in settings")?;
        Ok(templates_dir.join(format!("{name}.tgz")))
    }

    pub fn new_template_exists(&self, name: &str) -> Result<bool> {
        let target = self.new_template_target(name)?;
        self.backend
            .is_valid_file(&target)
            .with_context(|| format!("failed to check {}", target.display()))
    }

    pub fn new_template_save(&self, request: &NewTemplateRequest) -> Result<PathBuf> {
        let checks = [
            validate::template_name(&request.name),
            validate::non_empty("Display name", &request.display_name),
            validate::semantic_version(&request.version),
            validate::non_empty("Description", &request.description),
        ];
        if let Some(error) = checks.into_iter().flatten().next() {
            bail!(error);
        }

        let target = self.new_template_target(&request.name)?;
        let exists = self
            .backend
            .is_valid_file(&target)
            .with_context(|| format!("failed to check {}", target.display()))?;
        if exists {
            return Err(FieldError::TemplateExists {
                name: request.name.clone(),
            })
            .with_context(|| format!("template already exists at {}", target.display()));
        }

        tracing::info!(template = %request.name, target = %target.display(), "saving template");
        self.backend
            .generate_template(request)
            .with_context(|| format!("failed to generate template '{}'", request.name))
    }
}
