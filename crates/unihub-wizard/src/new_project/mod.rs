mod basic_info;
mod files;
mod new_template;
mod packages;
mod state;
mod templates;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

use anyhow::{Result, anyhow, bail};
use unihub_app::{App, NewProjectPrepare, TemplateDetails};
use unihub_core::backend::LoadFailure;
use unihub_core::editor::EditorInstall;
use unihub_core::generate::{
    GenerateProjectRequest, NewTemplateRequest, ProjectInfoForGeneration, TemplateInfoForGeneration,
};
use unihub_core::lazy::{LazyValue, LazyVoid};
use unihub_core::package::{MinimalPackage, PackageType};
use unihub_core::prefs::UserCache;
use unihub_core::template::{SurfaceTemplate, Template};

pub use basic_info::{BasicInfoForm, Overview, PROJECT_NAME_KEY, PROJECT_PATH_KEY, overview};
pub use files::{FileRow, FileSelection, PROJECT_DATA_DIR};
pub use new_template::{DESCRIPTION_KEY, DISPLAY_NAME_KEY, NAME_KEY, NewTemplateForm, VERSION_KEY};
pub use packages::{PackageCategory, PackageRow, PackageView, package_rows, resolve_packages};
pub use state::{Tab, WizardAction, WizardState};
pub use templates::{TemplateCategory, TemplateRow, TemplateView, category_of, is_custom};

use crate::loading::{LoadKind, WizardLoadEvent, WizardLoader};
use crate::{FlowSignal, UiExit};

pub trait NewProjectOps {
    fn prepare(&self) -> Result<NewProjectPrepare>;
    fn remember_editor(&self, editor_version: &str) -> Result<()>;
    fn cached_packages(&self) -> Result<UserCache>;
    fn add_git_package(&self, name: &str, url: &str) -> Result<MinimalPackage>;
    fn add_manifest_package(&self, line: &str) -> Result<MinimalPackage>;
    fn add_local_package(&self, path: &Path) -> Result<MinimalPackage>;
    fn remove_package(&self, package: &MinimalPackage) -> Result<()>;
    fn template_exists(&self, name: &str) -> Result<bool>;
}

impl<'a> NewProjectOps for App<'a> {
    fn prepare(&self) -> Result<NewProjectPrepare> {
        self.new_project_prepare()
    }

    fn remember_editor(&self, editor_version: &str) -> Result<()> {
        self.new_project_remember_editor(editor_version)
    }

    fn cached_packages(&self) -> Result<UserCache> {
        self.new_project_cached_packages()
    }

    fn add_git_package(&self, name: &str, url: &str) -> Result<MinimalPackage> {
        self.new_project_add_git_package(name, url)
    }

    fn add_manifest_package(&self, line: &str) -> Result<MinimalPackage> {
        self.new_project_add_manifest_package(line)
    }

    fn add_local_package(&self, path: &Path) -> Result<MinimalPackage> {
        self.new_project_add_local_package(path)
    }

    fn remove_package(&self, package: &MinimalPackage) -> Result<()> {
        self.new_project_remove_package(package)
    }

    fn template_exists(&self, name: &str) -> Result<bool> {
        self.new_template_exists(name)
    }
}

/// Identifies the one load of a kind whose result may still be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Ticket {
    token: u64,
    key: String,
}

#[derive(Debug)]
struct PendingLoad {
    kind: LoadKind,
    token: u64,
    receiver: Receiver<WizardLoadEvent>,
}

pub struct NewProjectFlow {
    state: WizardState,
    editors: Vec<EditorInstall>,
    loader: Arc<dyn WizardLoader>,
    templates: LazyValue<Vec<SurfaceTemplate>>,
    template_details: LazyValue<TemplateDetails>,
    default_packages: LazyValue<Vec<MinimalPackage>>,
    default_packages_version: Option<String>,
    file_tree: LazyVoid,
    creation: LazyValue<PathBuf>,
    template_save: LazyValue<PathBuf>,
    template_delete: LazyVoid,
    load_failure: Option<LoadFailure>,
    basic_info: BasicInfoForm,
    new_template: NewTemplateForm,
    template_view: TemplateView,
    package_view: PackageView,
    pending: Vec<PendingLoad>,
    tickets: BTreeMap<LoadKind, Ticket>,
    next_token: u64,
}

impl NewProjectFlow {
    pub fn new(
        ops: &dyn NewProjectOps,
        loader: Arc<dyn WizardLoader>,
        pinned_paths: Vec<String>,
    ) -> Result<Self> {
        let prepare = ops.prepare()?;
        let project_path = prepare.default_project_path.display().to_string();
        let state = WizardState::new(None, project_path, pinned_paths);
        let basic_info = BasicInfoForm::new(&state.basic_info.name, &state.basic_info.path);
        let new_template = NewTemplateForm::new(
            &state.new_template.name,
            &state.new_template.display_name,
            &state.new_template.version,
            &state.new_template.description,
        );

        let mut flow = Self {
            state,
            editors: prepare.editors,
            loader,
            templates: LazyValue::Idle,
            template_details: LazyValue::Idle,
            default_packages: LazyValue::Idle,
            default_packages_version: None,
            file_tree: LazyVoid::Idle,
            creation: LazyValue::Idle,
            template_save: LazyValue::Idle,
            template_delete: LazyVoid::Idle,
            load_failure: None,
            basic_info,
            new_template,
            template_view: TemplateView::default(),
            package_view: PackageView::default(),
            pending: Vec::new(),
            tickets: BTreeMap::new(),
            next_token: 1,
        };

        flow.state
            .apply(WizardAction::SetGitPackages(prepare.user_cache.git_packages));
        flow.state
            .apply(WizardAction::SetLocalPackages(prepare.user_cache.local_packages));

        if prepare.editor.is_none() {
            flow.fail_page("no editor installs found; install an editor first".to_string());
        }
        flow.set_editor(prepare.editor);
        Ok(flow)
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn tab(&self) -> Tab {
        self.state.tab
    }

    pub fn editors(&self) -> &[EditorInstall] {
        &self.editors
    }

    pub fn templates(&self) -> &LazyValue<Vec<SurfaceTemplate>> {
        &self.templates
    }

    pub fn template_details(&self) -> &LazyValue<TemplateDetails> {
        &self.template_details
    }

    pub fn default_packages(&self) -> &LazyValue<Vec<MinimalPackage>> {
        &self.default_packages
    }

    pub fn file_tree(&self) -> &LazyVoid {
        &self.file_tree
    }

    pub fn creation(&self) -> &LazyValue<PathBuf> {
        &self.creation
    }

    pub fn template_save(&self) -> &LazyValue<PathBuf> {
        &self.template_save
    }

    pub fn template_delete(&self) -> &LazyVoid {
        &self.template_delete
    }

    pub fn load_failure(&self) -> Option<&LoadFailure> {
        self.load_failure.as_ref()
    }

    pub fn basic_info(&self) -> &BasicInfoForm {
        &self.basic_info
    }

    pub fn new_template(&self) -> &NewTemplateForm {
        &self.new_template
    }

    pub fn template_view_mut(&mut self) -> &mut TemplateView {
        &mut self.template_view
    }

    pub fn package_view_mut(&mut self) -> &mut PackageView {
        &mut self.package_view
    }

    /// Whether any backend call is still in flight.
    pub fn is_busy(&self) -> bool {
        !self.tickets.is_empty()
    }

    pub fn overview(&self) -> Overview {
        overview(&self.state)
    }

    pub fn template_rows(&self) -> Vec<TemplateRow> {
        self.templates
            .value()
            .map(|templates| self.template_view.rows(templates))
            .unwrap_or_default()
    }

    pub fn package_rows(&self) -> Vec<PackageRow> {
        self.package_view
            .rows(self.default_package_list(), &self.state.packages)
    }

    pub fn file_rows(&self) -> Vec<FileRow> {
        self.state.files.rows()
    }

    /// Submit pages are gated on their form and the in-flight submission
    /// only; a failed submission stays visible as the page error but can be
    /// retried at once.
    pub fn can_go_next(&self) -> bool {
        match self.state.tab {
            Tab::Info => !self.basic_info.has_error() && !self.creation.is_loading(),
            Tab::NewTemplate => {
                !self.new_template.has_error() && !self.template_save.is_loading()
            }
            Tab::Template | Tab::Package | Tab::Files => {
                !self.state.error.is_error() && !self.state.error.is_loading()
            }
        }
    }

    /// Forward navigation. On the info tab this submits the project, on the
    /// new-template tab it saves the template.
    pub fn next(&mut self, ops: &dyn NewProjectOps) -> FlowSignal {
        if !self.can_go_next() {
            return FlowSignal::Continue;
        }
        match self.state.tab {
            Tab::Info => self.create(),
            Tab::NewTemplate => self.save_template(ops),
            tab => {
                if let Some(next) = tab.next() {
                    self.change_tab(ops, next);
                }
            }
        }
        FlowSignal::Continue
    }

    pub fn back(&mut self, ops: &dyn NewProjectOps) -> FlowSignal {
        match self.state.tab.previous() {
            Some(previous) => {
                self.change_tab(ops, previous);
                FlowSignal::Continue
            }
            None => FlowSignal::Exit(UiExit::Canceled),
        }
    }

    pub fn change_tab(&mut self, ops: &dyn NewProjectOps, tab: Tab) {
        self.switch_tab(tab);
        if tab == Tab::Package {
            self.load_cached_packages(ops);
        }
    }

    pub fn open_new_template(&mut self, ops: &dyn NewProjectOps) {
        if self.state.tab == Tab::Info {
            self.change_tab(ops, Tab::NewTemplate);
        }
    }

    pub fn select_editor(&mut self, ops: &dyn NewProjectOps, version: &str) -> Result<()> {
        let editor = self
            .editors
            .iter()
            .find(|editor| editor.version == version)
            .cloned()
            .ok_or_else(|| anyhow!("editor {version} is not installed"))?;

        self.set_editor(Some(editor));
        if let Err(error) = ops.remember_editor(version) {
            tracing::warn!(error = %format!("{error:#}"), "failed to remember editor version");
        }
        Ok(())
    }

    pub fn select_template(&mut self, template: Option<SurfaceTemplate>) {
        if self.state.initial_template.template == template {
            return;
        }
        self.state
            .apply(WizardAction::SetInitialTemplate(template.clone()));
        self.clear_template_loads();

        if let Some(template) = template {
            self.load_template_details(template);
        }
        if self.state.tab == Tab::Files {
            self.ensure_file_tree();
        }
    }

    /// Skips template selection: no template, straight to packages.
    pub fn start_empty(&mut self, ops: &dyn NewProjectOps) {
        self.select_template(None);
        self.change_tab(ops, Tab::Package);
    }

    pub fn delete_template(&mut self, template: &SurfaceTemplate) -> Result<()> {
        if !is_custom(template) {
            bail!(
                "'{}' ships with the editor; only custom templates can be deleted",
                template.id()
            );
        }
        let Some(editor_version) = self.state.editor_version().map(str::to_string) else {
            bail!("select an editor version first");
        };
        if self.tickets.contains_key(&LoadKind::TemplateDelete) {
            bail!("a template delete is already in progress");
        }

        self.template_delete = LazyVoid::Loading;
        let template = template.clone();
        let key = template.id().to_string();
        self.start_load(LoadKind::TemplateDelete, key, move |loader, token| {
            loader.spawn_delete_template(template, editor_version, token)
        });
        Ok(())
    }

    pub fn toggle_folder(&mut self, id: &str) {
        self.state.apply(WizardAction::ToggleFolder(id.to_string()));
    }

    pub fn toggle_file(&mut self, id: &str) {
        self.state
            .apply(WizardAction::ToggleFileSelection(id.to_string()));
    }

    pub fn select_all_files(&mut self) {
        self.state.apply(WizardAction::SelectAllFiles);
    }

    pub fn deselect_all_files(&mut self) {
        self.state.apply(WizardAction::DeselectAllFiles);
    }

    pub fn toggle_package(&mut self, name: &str) -> Result<()> {
        let row = package_rows(self.default_package_list(), &self.state.packages)
            .into_iter()
            .find(|row| row.package.name == name)
            .ok_or_else(|| anyhow!("unknown package '{name}'"))?;
        let selection = packages::toggle_package(&self.state.packages, &row.package);
        self.state
            .apply(WizardAction::SetSelectedPackages(selection));
        Ok(())
    }

    pub fn select_all_packages(&mut self) {
        let selection = self
            .package_view
            .select_all(self.default_package_list(), &self.state.packages);
        self.state
            .apply(WizardAction::SetSelectedPackages(selection));
    }

    pub fn deselect_all_packages(&mut self) {
        let selection = self
            .package_view
            .deselect_all(self.default_package_list(), &self.state.packages);
        self.state
            .apply(WizardAction::SetSelectedPackages(selection));
    }

    pub fn add_git_package(&mut self, ops: &dyn NewProjectOps, name: &str, url: &str) -> Result<()> {
        let package = ops.add_git_package(name, url)?;
        self.state.apply(WizardAction::AddGitPackage(package));
        Ok(())
    }

    pub fn add_manifest_package(&mut self, ops: &dyn NewProjectOps, line: &str) -> Result<()> {
        let package = ops.add_manifest_package(line)?;
        self.state.apply(WizardAction::AddGitPackage(package));
        Ok(())
    }

    pub fn add_local_package(&mut self, ops: &dyn NewProjectOps, path: &Path) -> Result<()> {
        let package = ops.add_local_package(path)?;
        self.state.apply(WizardAction::AddLocalPackage(package));
        Ok(())
    }

    /// Drops a git or local package from the user cache and from every list.
    pub fn destroy_package(&mut self, ops: &dyn NewProjectOps, name: &str) -> Result<()> {
        let package = self
            .state
            .packages
            .git_packages
            .iter()
            .chain(&self.state.packages.local_packages)
            .find(|package| package.name == name)
            .cloned()
            .ok_or_else(|| anyhow!("'{name}' is not a git or local package"))?;

        ops.remove_package(&package)?;
        self.state
            .apply(WizardAction::DestroyPackage(package.name));
        Ok(())
    }

    pub fn set_project_name(&mut self, value: &str) {
        self.basic_info.set_name(value);
        self.state
            .apply(WizardAction::SetBasicInfoName(value.to_string()));
    }

    pub fn set_project_path(&mut self, value: &str) {
        self.basic_info.set_path(value);
        self.state
            .apply(WizardAction::SetBasicInfoPath(value.to_string()));
    }

    pub fn set_template_name(&mut self, value: &str) {
        self.new_template.set_name(value);
        self.state
            .apply(WizardAction::SetNewTemplateName(value.to_string()));
    }

    pub fn set_template_display_name(&mut self, value: &str) {
        self.new_template.set_display_name(value);
        self.state
            .apply(WizardAction::SetNewTemplateDisplayName(value.to_string()));
    }

    pub fn set_template_version(&mut self, value: &str) {
        self.new_template.set_version(value);
        self.state
            .apply(WizardAction::SetNewTemplateVersion(value.to_string()));
    }

    pub fn set_template_description(&mut self, value: &str) {
        self.new_template.set_description(value);
        self.state
            .apply(WizardAction::SetNewTemplateDescription(value.to_string()));
    }

    /// Submits the project. Ignored off the info tab or while a creation is
    /// already in flight.
    pub fn create(&mut self) {
        if self.state.tab != Tab::Info || !self.can_go_next() {
            return;
        }
        self.clear_page_error();
        let Some(template_info) = self.template_info() else {
            return;
        };

        let request = GenerateProjectRequest {
            project_info: ProjectInfoForGeneration {
                name: self.state.basic_info.name.clone(),
                path: PathBuf::from(&self.state.basic_info.path),
            },
            template_info,
        };
        let key = request.output_dir().display().to_string();
        self.creation = LazyValue::Loading;
        self.start_load(LoadKind::Creation, key, move |loader, token| {
            loader.spawn_generate(request, token)
        });
    }

    pub fn save_template(&mut self, ops: &dyn NewProjectOps) {
        if self.state.tab != Tab::NewTemplate || !self.can_go_next() {
            return;
        }
        self.clear_page_error();

        let name = self.state.new_template.name.clone();
        match ops.template_exists(&name) {
            Ok(true) => {
                self.new_template.reject_name();
                return;
            }
            Ok(false) => {}
            Err(error) => {
                self.fail_page(format!("{error:#}"));
                return;
            }
        }
        let Some(template) = self.template_info() else {
            return;
        };

        let info = &self.state.new_template;
        let request = NewTemplateRequest {
            template,
            name: name.clone(),
            display_name: info.display_name.clone(),
            version: info.version.clone(),
            description: info.description.clone(),
        };
        self.template_save = LazyValue::Loading;
        self.start_load(LoadKind::TemplateSave, name, move |loader, token| {
            loader.spawn_save_template(request, token)
        });
    }

    /// Drains finished loads. Returns `Exit` once the project exists.
    pub fn on_tick(&mut self) -> FlowSignal {
        let mut events = Vec::new();
        let mut disconnected = Vec::new();
        self.pending
            .retain(|pending| match pending.receiver.try_recv() {
                Ok(event) => {
                    events.push(event);
                    false
                }
                Err(TryRecvError::Empty) => true,
                Err(TryRecvError::Disconnected) => {
                    disconnected.push((pending.kind, pending.token));
                    false
                }
            });

        let mut signal = FlowSignal::Continue;
        for event in events {
            if let FlowSignal::Exit(exit) = self.apply_event(event) {
                signal = FlowSignal::Exit(exit);
            }
        }

        for (kind, token) in disconnected {
            let active = self
                .tickets
                .get(&kind)
                .is_some_and(|ticket| ticket.token == token);
            if active {
                self.tickets.remove(&kind);
                self.fail_load(kind, format!("{} worker ended unexpectedly", kind.label()));
            }
        }

        signal
    }

    fn apply_event(&mut self, event: WizardLoadEvent) -> FlowSignal {
        let kind = event.kind();
        let token = event.token();
        let Some(ticket) = self.tickets.get(&kind).cloned() else {
            tracing::debug!(kind = kind.label(), token, "discarding result of an abandoned load");
            return FlowSignal::Continue;
        };
        if ticket.token != token {
            tracing::debug!(kind = kind.label(), token, active = ticket.token, "discarding stale load result");
            return FlowSignal::Continue;
        }
        self.tickets.remove(&kind);
        if !self.key_is_current(kind, &ticket.key) {
            tracing::debug!(kind = kind.label(), key = %ticket.key, "discarding load result for replaced state");
            return FlowSignal::Continue;
        }

        match event {
            WizardLoadEvent::Templates { result, .. } => match result {
                Ok(templates) => self.templates = LazyValue::Success(templates),
                Err(message) => self.fail_load(kind, message),
            },
            WizardLoadEvent::TemplateDetails { result, .. } => match result {
                Ok(details) => {
                    self.state.apply(WizardAction::SetTemplatePackages(
                        template_packages(&details.template),
                    ));
                    self.template_details = LazyValue::Success(details);
                }
                Err(message) => self.fail_load(kind, message),
            },
            WizardLoadEvent::Files { result, .. } => match result {
                Ok(root) => {
                    self.state.apply(WizardAction::SetFilesRoot(root));
                    self.file_tree = LazyVoid::Success(());
                    if self.state.tab == Tab::Files && self.state.error.is_loading() {
                        self.state.apply(WizardAction::SetError(LazyVoid::Idle));
                    }
                }
                Err(message) => self.fail_load(kind, message),
            },
            WizardLoadEvent::Packages { result, .. } => match result {
                Ok(packages) => {
                    self.default_packages = LazyValue::Success(packages);
                    self.default_packages_version = Some(ticket.key);
                }
                Err(message) => self.fail_load(kind, message),
            },
            WizardLoadEvent::Generated { result, .. } => match result {
                Ok(path) => {
                    tracing::info!(project = %path.display(), "project created");
                    self.creation = LazyValue::Success(path.clone());
                    return FlowSignal::Exit(UiExit::Completed(path));
                }
                Err(message) => self.fail_load(kind, message),
            },
            WizardLoadEvent::TemplateSaved { result, .. } => match result {
                Ok(path) => {
                    tracing::info!(template = %path.display(), "template saved");
                    self.template_save = LazyValue::Success(path);
                    self.switch_tab(Tab::Info);
                    self.reload_templates();
                }
                Err(message) => self.fail_load(kind, message),
            },
            WizardLoadEvent::TemplateDeleted { result, .. } => match result {
                Ok(()) => {
                    self.template_delete = LazyVoid::Success(());
                    if self.state.template().map(SurfaceTemplate::id) == Some(ticket.key.as_str()) {
                        self.select_template(None);
                    }
                    self.reload_templates();
                }
                Err(message) => self.fail_load(kind, message),
            },
        }
        FlowSignal::Continue
    }

    fn key_is_current(&self, kind: LoadKind, key: &str) -> bool {
        match kind {
            LoadKind::Templates | LoadKind::Packages => self.state.editor_version() == Some(key),
            LoadKind::TemplateDetails | LoadKind::Files => {
                self.state.template().map(SurfaceTemplate::id) == Some(key)
            }
            LoadKind::Creation | LoadKind::TemplateSave | LoadKind::TemplateDelete => true,
        }
    }

    fn start_load<F>(&mut self, kind: LoadKind, key: String, spawn: F)
    where
        F: FnOnce(&dyn WizardLoader, u64) -> Receiver<WizardLoadEvent>,
    {
        let token = self.next_token;
        self.next_token = self.next_token.saturating_add(1);
        tracing::debug!(kind = kind.label(), token, key = %key, "starting load");

        let receiver = spawn(self.loader.as_ref(), token);
        self.tickets.insert(kind, Ticket { token, key });
        self.pending.push(PendingLoad {
            kind,
            token,
            receiver,
        });
    }

    fn load_is_active(&self, kind: LoadKind) -> bool {
        self.tickets
            .get(&kind)
            .is_some_and(|ticket| self.key_is_current(kind, &ticket.key))
    }

    fn switch_tab(&mut self, tab: Tab) {
        match self.state.tab {
            Tab::Info => self.basic_info.unmount(),
            Tab::NewTemplate => self.new_template.unmount(),
            Tab::Template | Tab::Package | Tab::Files => {}
        }

        self.load_failure = None;
        self.state.apply(WizardAction::ChangeTab(tab));

        match tab {
            Tab::Template => {
                if self.templates.is_error() {
                    self.reload_templates();
                }
                if self.template_details.is_error()
                    && let Some(template) = self.state.template().cloned()
                {
                    self.load_template_details(template);
                }
            }
            Tab::Package => self.ensure_default_packages(),
            Tab::Files => self.ensure_file_tree(),
            Tab::Info => self.basic_info.mount(),
            Tab::NewTemplate => self.new_template.mount(),
        }
    }

    fn set_editor(&mut self, editor: Option<EditorInstall>) {
        if self.state.initial_template.editor == editor {
            return;
        }
        self.state.apply(WizardAction::SetEditorVersion(editor));
        self.clear_template_loads();

        self.tickets.remove(&LoadKind::Packages);
        self.default_packages = LazyValue::Idle;
        self.default_packages_version = None;

        self.reload_templates();
        if self.state.tab == Tab::Package {
            self.ensure_default_packages();
        }
    }

    fn clear_template_loads(&mut self) {
        self.tickets.remove(&LoadKind::TemplateDetails);
        self.tickets.remove(&LoadKind::Files);
        self.template_details = LazyValue::Idle;
        self.file_tree = LazyVoid::Idle;
        if self.state.error.is_loading() {
            self.state.apply(WizardAction::SetError(LazyVoid::Idle));
        }
    }

    fn load_template_details(&mut self, template: SurfaceTemplate) {
        self.template_details = LazyValue::Loading;
        let key = template.id().to_string();
        self.start_load(LoadKind::TemplateDetails, key, move |loader, token| {
            loader.spawn_template_details(template, token)
        });
    }

    fn reload_templates(&mut self) {
        let Some(version) = self.state.editor_version().map(str::to_string) else {
            self.tickets.remove(&LoadKind::Templates);
            self.templates = LazyValue::Idle;
            return;
        };
        self.templates = LazyValue::Loading;
        let key = version.clone();
        self.start_load(LoadKind::Templates, key, move |loader, token| {
            loader.spawn_templates(version, token)
        });
    }

    /// Fetches the editor's default packages once per editor version.
    fn ensure_default_packages(&mut self) {
        let Some(version) = self.state.editor_version().map(str::to_string) else {
            return;
        };
        let loaded = self.default_packages.is_success()
            && self.default_packages_version.as_deref() == Some(version.as_str());
        if loaded || self.load_is_active(LoadKind::Packages) {
            return;
        }

        self.default_packages = LazyValue::Loading;
        let key = version.clone();
        self.start_load(LoadKind::Packages, key, move |loader, token| {
            loader.spawn_packages(version, token)
        });
    }

    /// Fetches the selected template's file tree unless it is already loaded.
    /// Next stays disabled until the tree arrives.
    fn ensure_file_tree(&mut self) {
        let Some(template) = self.state.template().cloned() else {
            return;
        };
        if self.state.files.is_loaded() {
            return;
        }

        self.state.apply(WizardAction::SetError(LazyVoid::Loading));
        if self.load_is_active(LoadKind::Files) {
            return;
        }

        self.file_tree = LazyVoid::Loading;
        let key = template.id().to_string();
        self.start_load(LoadKind::Files, key, move |loader, token| {
            loader.spawn_files(template, token)
        });
    }

    fn load_cached_packages(&mut self, ops: &dyn NewProjectOps) {
        match ops.cached_packages() {
            Ok(cache) => {
                self.state
                    .apply(WizardAction::SetGitPackages(cache.git_packages));
                self.state
                    .apply(WizardAction::SetLocalPackages(cache.local_packages));
            }
            Err(error) => self.fail_page(format!("{error:#}")),
        }
    }

    fn template_info(&mut self) -> Option<TemplateInfoForGeneration> {
        let Some(editor) = self.state.initial_template.editor.clone() else {
            self.fail_page("select an editor version first".to_string());
            return None;
        };
        let template = self.state.initial_template.template.clone();
        if template.is_some() && !self.state.files.is_loaded() {
            self.fail_page(
                "the template's files are not loaded yet; open the Files tab first".to_string(),
            );
            return None;
        }

        Some(TemplateInfoForGeneration {
            is_empty: template.is_none(),
            template,
            editor_version: editor,
            packages: resolve_packages(self.default_package_list(), &self.state.packages),
            selected_files: self.state.files.selected_paths(),
        })
    }

    fn default_package_list(&self) -> &[MinimalPackage] {
        self.default_packages
            .value()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn fail_load(&mut self, kind: LoadKind, message: String) {
        match kind {
            LoadKind::Templates => self.templates = LazyValue::Error(message.clone()),
            LoadKind::TemplateDetails => self.template_details = LazyValue::Error(message.clone()),
            LoadKind::Files => self.file_tree = LazyVoid::Error(message.clone()),
            LoadKind::Packages => self.default_packages = LazyValue::Error(message.clone()),
            LoadKind::Creation => self.creation = LazyValue::Error(message.clone()),
            LoadKind::TemplateSave => self.template_save = LazyValue::Error(message.clone()),
            LoadKind::TemplateDelete => self.template_delete = LazyVoid::Error(message.clone()),
        }

        // Off-tab failures stay in their lazy value and are retried on entry.
        let owner = owning_tab(kind);
        if owner == self.state.tab {
            self.fail_page(message);
        } else {
            tracing::warn!(
                kind = kind.label(),
                tab = owner.label(),
                %message,
                "load failed while its tab was not shown"
            );
        }
    }

    fn clear_page_error(&mut self) {
        self.load_failure = None;
        if !self.state.error.is_idle() {
            self.state.apply(WizardAction::SetError(LazyVoid::Idle));
        }
    }

    fn fail_page(&mut self, message: String) {
        let failure = LoadFailure::classify(message.clone());
        tracing::warn!(%message, hint = failure.hint(), "new project page failed");
        self.load_failure = Some(failure);
        self.state
            .apply(WizardAction::SetError(LazyVoid::Error(message)));
    }
}

/// The tab whose page a failed load belongs to.
fn owning_tab(kind: LoadKind) -> Tab {
    match kind {
        LoadKind::Templates | LoadKind::TemplateDetails | LoadKind::TemplateDelete => Tab::Template,
        LoadKind::Packages => Tab::Package,
        LoadKind::Files => Tab::Files,
        LoadKind::Creation => Tab::Info,
        LoadKind::TemplateSave => Tab::NewTemplate,
    }
}

/// The selected template's own dependencies as package-list entries.
fn template_packages(template: &Template) -> Vec<MinimalPackage> {
    let internal = template
        .dependencies
        .internal
        .iter()
        .map(|(name, version)| MinimalPackage {
            name: name.clone(),
            version: version.clone(),
            is_discoverable: true,
            package_type: PackageType::Internal,
        });
    let custom = template
        .dependencies
        .custom
        .iter()
        .filter_map(|(name, custom)| {
            custom
                .git_url
                .as_ref()
                .map(|url| MinimalPackage::git(name.clone(), url.clone()))
        });
    internal.chain(custom).collect()
}
