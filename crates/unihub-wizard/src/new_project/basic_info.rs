use unihub_core::validate::{self, FieldError};

use super::state::WizardState;
use crate::validation::{ValidatedField, ValidationRegistry};

pub const PROJECT_NAME_KEY: &str = "projectName";
pub const PROJECT_PATH_KEY: &str = "projectPath";

#[derive(Debug)]
pub struct BasicInfoForm {
    name: ValidatedField,
    path: ValidatedField,
    registry: ValidationRegistry,
}

impl BasicInfoForm {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: ValidatedField::new(PROJECT_NAME_KEY, name, validate::project_name),
            path: ValidatedField::new(PROJECT_PATH_KEY, path, validate::project_path),
            registry: ValidationRegistry::new(),
        }
    }

    pub fn mount(&mut self) {
        self.name.mount(&mut self.registry);
        self.path.mount(&mut self.registry);
    }

    pub fn unmount(&mut self) {
        self.name.unmount(&mut self.registry);
        self.path.unmount(&mut self.registry);
    }

    pub fn set_name(&mut self, value: &str) -> bool {
        self.name.set_value(value, &mut self.registry)
    }

    pub fn set_path(&mut self, value: &str) -> bool {
        self.path.set_value(value, &mut self.registry)
    }

    pub fn has_error(&self) -> bool {
        self.registry.has_any_error()
    }

    pub fn error_for(&self, key: &str) -> Option<&FieldError> {
        self.registry.error_for(key)
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.registry.errors()
    }
}

/// Read-only summary shown beside the basic-info fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    pub editor_version: Option<String>,
    pub template: Option<String>,
    pub packages: Vec<String>,
    pub selected_files: usize,
    pub total_files: usize,
}

pub fn overview(state: &WizardState) -> Overview {
    Overview {
        editor_version: state.editor_version().map(str::to_string),
        template: state
            .template()
            .map(|template| format!("{}@{}", template.id(), template.version)),
        packages: state
            .packages
            .selected_packages
            .iter()
            .map(|package| package.name.clone())
            .collect(),
        selected_files: state.files.selected_count(),
        total_files: state.files.total_count(),
    }
}
