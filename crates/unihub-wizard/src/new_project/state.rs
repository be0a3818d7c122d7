use unihub_core::editor::EditorInstall;
use unihub_core::file_dir::FileDir;
use unihub_core::lazy::LazyVoid;
use unihub_core::package::{MinimalPackage, SelectedPackage};
use unihub_core::template::SurfaceTemplate;

use super::files::FileSelection;

pub const DEFAULT_PROJECT_NAME: &str = "New Project";
pub const DEFAULT_TEMPLATE_NAME: &str = "com.name.template";
pub const DEFAULT_TEMPLATE_DISPLAY_NAME: &str = "New Template";
pub const DEFAULT_TEMPLATE_VERSION: &str = "1.0.0";
pub const DEFAULT_TEMPLATE_DESCRIPTION: &str = "A custom template";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tab {
    Template,
    Package,
    Files,
    Info,
    NewTemplate,
}

impl Tab {
    pub fn next(self) -> Option<Tab> {
        match self {
            Self::Template => Some(Self::Package),
            Self::Package => Some(Self::Files),
            Self::Files => Some(Self::Info),
            Self::Info | Self::NewTemplate => None,
        }
    }

    /// The new-template branch returns to the info tab.
    pub fn previous(self) -> Option<Tab> {
        match self {
            Self::Template => None,
            Self::Package => Some(Self::Template),
            Self::Files => Some(Self::Package),
            Self::Info => Some(Self::Files),
            Self::NewTemplate => Some(Self::Info),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Template => "Template",
            Self::Package => "Packages",
            Self::Files => "Files",
            Self::Info => "Info",
            Self::NewTemplate => "New Template",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialTemplateInfo {
    pub editor: Option<EditorInstall>,
    pub template: Option<SurfaceTemplate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageInfo {
    pub git_packages: Vec<MinimalPackage>,
    pub local_packages: Vec<MinimalPackage>,
    /// Dependencies declared by the selected template.
    pub template_packages: Vec<MinimalPackage>,
    pub selected_packages: Vec<SelectedPackage>,
}

impl PackageInfo {
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected_packages
            .iter()
            .any(|package| package.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicInfo {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTemplateInfo {
    pub name: String,
    pub display_name: String,
    pub version: String,
    pub description: String,
}

impl Default for NewTemplateInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_TEMPLATE_NAME.to_string(),
            display_name: DEFAULT_TEMPLATE_DISPLAY_NAME.to_string(),
            version: DEFAULT_TEMPLATE_VERSION.to_string(),
            description: DEFAULT_TEMPLATE_DESCRIPTION.to_string(),
        }
    }
}

/// Everything the wizard tabs share. Only [`WizardState::apply`] mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub tab: Tab,
    pub initial_template: InitialTemplateInfo,
    pub packages: PackageInfo,
    pub files: FileSelection,
    pub basic_info: BasicInfo,
    pub new_template: NewTemplateInfo,
    /// Page-level blocking flag. `Loading` and `Error` both disable Next.
    pub error: LazyVoid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    ChangeTab(Tab),
    SetError(LazyVoid),
    SetEditorVersion(Option<EditorInstall>),
    SetInitialTemplate(Option<SurfaceTemplate>),
    SetTemplatePackages(Vec<MinimalPackage>),
    SetSelectedPackages(Vec<SelectedPackage>),
    SetFilesRoot(FileDir),
    ToggleFolder(String),
    ToggleFileSelection(String),
    SelectAllFiles,
    DeselectAllFiles,
    SetBasicInfoName(String),
    SetBasicInfoPath(String),
    SetNewTemplateName(String),
    SetNewTemplateDisplayName(String),
    SetNewTemplateVersion(String),
    SetNewTemplateDescription(String),
    AddGitPackage(MinimalPackage),
    AddLocalPackage(MinimalPackage),
    SetGitPackages(Vec<MinimalPackage>),
    SetLocalPackages(Vec<MinimalPackage>),
    DestroyPackage(String),
}

impl WizardState {
    pub fn new(editor: Option<EditorInstall>, project_path: String, pinned_paths: Vec<String>) -> Self {
        Self {
            tab: Tab::Template,
            initial_template: InitialTemplateInfo {
                editor,
                template: None,
            },
            packages: PackageInfo::default(),
            files: FileSelection::new(pinned_paths),
            basic_info: BasicInfo {
                name: DEFAULT_PROJECT_NAME.to_string(),
                path: project_path,
            },
            new_template: NewTemplateInfo::default(),
            error: LazyVoid::Idle,
        }
    }

    pub fn editor_version(&self) -> Option<&str> {
        self.initial_template
            .editor
            .as_ref()
            .map(|editor| editor.version.as_str())
    }

    pub fn template(&self) -> Option<&SurfaceTemplate> {
        self.initial_template.template.as_ref()
    }

    pub fn apply(&mut self, action: WizardAction) {
        match action {
            WizardAction::ChangeTab(tab) => {
                self.tab = tab;
                self.error = LazyVoid::Idle;
            }
            WizardAction::SetError(error) => self.error = error,
            WizardAction::SetEditorVersion(editor) => {
                if self.initial_template.editor == editor {
                    return;
                }
                self.initial_template.editor = editor;
                self.clear_template_dependents();
                self.initial_template.template = None;
            }
            WizardAction::SetInitialTemplate(template) => {
                if self.initial_template.template == template {
                    return;
                }
                self.initial_template.template = template;
                self.clear_template_dependents();
            }
            WizardAction::SetTemplatePackages(packages) => {
                self.packages.template_packages = packages;
            }
            WizardAction::SetSelectedPackages(packages) => {
                self.packages.selected_packages = packages;
            }
            WizardAction::SetFilesRoot(root) => self.files.load(root),
            WizardAction::ToggleFolder(id) => self.files.toggle_folder(&id),
            WizardAction::ToggleFileSelection(id) => self.files.toggle_selection(&id),
            WizardAction::SelectAllFiles => self.files.select_all(),
            WizardAction::DeselectAllFiles => self.files.deselect_all(),
            WizardAction::SetBasicInfoName(name) => self.basic_info.name = name,
            WizardAction::SetBasicInfoPath(path) => self.basic_info.path = path,
            WizardAction::SetNewTemplateName(name) => self.new_template.name = name,
            WizardAction::SetNewTemplateDisplayName(display_name) => {
                self.new_template.display_name = display_name;
            }
            WizardAction::SetNewTemplateVersion(version) => self.new_template.version = version,
            WizardAction::SetNewTemplateDescription(description) => {
                self.new_template.description = description;
            }
            WizardAction::AddGitPackage(package) => {
                let duplicate = self
                    .packages
                    .git_packages
                    .iter()
                    .any(|existing| existing.version == package.version);
                if !duplicate {
                    self.packages.git_packages.push(package);
                }
            }
            WizardAction::AddLocalPackage(package) => {
                let duplicate = self
                    .packages
                    .local_packages
                    .iter()
                    .any(|existing| existing.name == package.name);
                if !duplicate {
                    self.packages.local_packages.push(package);
                }
            }
            WizardAction::SetGitPackages(packages) => self.packages.git_packages = packages,
            WizardAction::SetLocalPackages(packages) => self.packages.local_packages = packages,
            WizardAction::DestroyPackage(name) => {
                self.packages.git_packages.retain(|package| package.name != name);
                self.packages.local_packages.retain(|package| package.name != name);
                self.packages.template_packages.retain(|package| package.name != name);
                self.packages.selected_packages.retain(|package| package.name != name);
            }
        }
    }

    fn clear_template_dependents(&mut self) {
        self.packages.template_packages.clear();
        self.packages.selected_packages.clear();
        self.files.reset();
    }
}
