use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::Result;
use unihub_app::{App, TemplateDetails};
use unihub_core::backend::Backend;
use unihub_core::file_dir::FileDir;
use unihub_core::generate::{GenerateProjectRequest, NewTemplateRequest};
use unihub_core::package::MinimalPackage;
use unihub_core::template::SurfaceTemplate;

/// Pause after a template delete so the catalog does not flash empty while
/// the backend is still removing files.
pub const FLICKER_GUARD: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadKind {
    Templates,
    TemplateDetails,
    Files,
    Packages,
    Creation,
    TemplateSave,
    TemplateDelete,
}

impl LoadKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Templates => "template catalog",
            Self::TemplateDetails => "template details",
            Self::Files => "template files",
            Self::Packages => "default packages",
            Self::Creation => "project generation",
            Self::TemplateSave => "template save",
            Self::TemplateDelete => "template delete",
        }
    }
}

#[derive(Debug)]
pub enum WizardLoadEvent {
    Templates {
        token: u64,
        result: Result<Vec<SurfaceTemplate>, String>,
    },
    TemplateDetails {
        token: u64,
        result: Result<TemplateDetails, String>,
    },
    Files {
        token: u64,
        result: Result<FileDir, String>,
    },
    Packages {
        token: u64,
        result: Result<Vec<MinimalPackage>, String>,
    },
    Generated {
        token: u64,
        result: Result<PathBuf, String>,
    },
    TemplateSaved {
        token: u64,
        result: Result<PathBuf, String>,
    },
    TemplateDeleted {
        token: u64,
        result: Result<(), String>,
    },
}

impl WizardLoadEvent {
    pub fn token(&self) -> u64 {
        match self {
            Self::Templates { token, .. }
            | Self::TemplateDetails { token, .. }
            | Self::Files { token, .. }
            | Self::Packages { token, .. }
            | Self::Generated { token, .. }
            | Self::TemplateSaved { token, .. }
            | Self::TemplateDeleted { token, .. } => *token,
        }
    }

    pub fn kind(&self) -> LoadKind {
        match self {
            Self::Templates { .. } => LoadKind::Templates,
            Self::TemplateDetails { .. } => LoadKind::TemplateDetails,
            Self::Files { .. } => LoadKind::Files,
            Self::Packages { .. } => LoadKind::Packages,
            Self::Generated { .. } => LoadKind::Creation,
            Self::TemplateSaved { .. } => LoadKind::TemplateSave,
            Self::TemplateDeleted { .. } => LoadKind::TemplateDelete,
        }
    }
}

/// Runs backend calls off the owner thread. Every receiver yields exactly one
/// event carrying the token it was spawned with.
pub trait WizardLoader: Send + Sync {
    fn spawn_templates(&self, editor_version: String, token: u64) -> Receiver<WizardLoadEvent>;

    fn spawn_template_details(
        &self,
        template: SurfaceTemplate,
        token: u64,
    ) -> Receiver<WizardLoadEvent>;

    fn spawn_files(&self, template: SurfaceTemplate, token: u64) -> Receiver<WizardLoadEvent>;

    fn spawn_packages(&self, editor_version: String, token: u64) -> Receiver<WizardLoadEvent>;

    fn spawn_generate(
        &self,
        request: GenerateProjectRequest,
        token: u64,
    ) -> Receiver<WizardLoadEvent>;

    fn spawn_save_template(
        &self,
        request: NewTemplateRequest,
        token: u64,
    ) -> Receiver<WizardLoadEvent>;

    fn spawn_delete_template(
        &self,
        template: SurfaceTemplate,
        editor_version: String,
        token: u64,
    ) -> Receiver<WizardLoadEvent>;
}

pub struct SystemWizardLoader {
    backend: Arc<dyn Backend>,
}

impl SystemWizardLoader {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    fn spawn_call<T, F, W>(&self, call: F, wrap: W) -> Receiver<WizardLoadEvent>
    where
        T: Send + 'static,
        F: FnOnce(&App<'_>) -> Result<T> + Send + 'static,
        W: FnOnce(Result<T, String>) -> WizardLoadEvent + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let backend = Arc::clone(&self.backend);
        std::thread::spawn(move || {
            let app = App::new(backend.as_ref());
            let result = call(&app).map_err(|error| format!("{error:#}"));
            let _ = sender.send(wrap(result));
        });
        receiver
    }
}

impl WizardLoader for SystemWizardLoader {
    fn spawn_templates(&self, editor_version: String, token: u64) -> Receiver<WizardLoadEvent> {
        self.spawn_call(
            move |app| app.new_project_templates(&editor_version),
            move |result| WizardLoadEvent::Templates { token, result },
        )
    }

    fn spawn_template_details(
        &self,
        template: SurfaceTemplate,
        token: u64,
    ) -> Receiver<WizardLoadEvent> {
        self.spawn_call(
            move |app| app.new_project_template_details(&template),
            move |result| WizardLoadEvent::TemplateDetails { token, result },
        )
    }

    fn spawn_files(&self, template: SurfaceTemplate, token: u64) -> Receiver<WizardLoadEvent> {
        self.spawn_call(
            move |app| app.new_project_template_files(&template),
            move |result| WizardLoadEvent::Files { token, result },
        )
    }

    fn spawn_packages(&self, editor_version: String, token: u64) -> Receiver<WizardLoadEvent> {
        self.spawn_call(
            move |app| app.new_project_default_packages(&editor_version),
            move |result| WizardLoadEvent::Packages { token, result },
        )
    }

    fn spawn_generate(
        &self,
        request: GenerateProjectRequest,
        token: u64,
    ) -> Receiver<WizardLoadEvent> {
        self.spawn_call(
            move |app| app.new_project_generate(&request),
            move |result| WizardLoadEvent::Generated { token, result },
        )
    }

    fn spawn_save_template(
        &self,
        request: NewTemplateRequest,
        token: u64,
    ) -> Receiver<WizardLoadEvent> {
        self.spawn_call(
            move |app| app.new_template_save(&request),
            move |result| WizardLoadEvent::TemplateSaved { token, result },
        )
    }

    fn spawn_delete_template(
        &self,
        template: SurfaceTemplate,
        editor_version: String,
        token: u64,
    ) -> Receiver<WizardLoadEvent> {
        self.spawn_call(
            move |app| {
                app.new_project_delete_template(&template, &editor_version)?;
                std::thread::sleep(FLICKER_GUARD);
                Ok(())
            },
            move |result| WizardLoadEvent::TemplateDeleted { token, result },
        )
    }
}
