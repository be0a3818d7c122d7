use unihub_core::validate::{self, FieldError};

use crate::validation::{ValidatedField, ValidationRegistry};

pub const NAME_KEY: &str = "name";
pub const DISPLAY_NAME_KEY: &str = "displayName";
pub const VERSION_KEY: &str = "version";
pub const DESCRIPTION_KEY: &str = "description";

fn display_name(value: &str) -> Option<FieldError> {
    validate::non_empty("Display name", value)
}

fn description(value: &str) -> Option<FieldError> {
    validate::non_empty("Description", value)
}

/// Fields of the "save as template" side flow.
#[derive(Debug)]
pub struct NewTemplateForm {
    name: ValidatedField,
    display_name: ValidatedField,
    version: ValidatedField,
    description: ValidatedField,
    registry: ValidationRegistry,
}

impl NewTemplateForm {
    pub fn new(name: &str, display: &str, version: &str, about: &str) -> Self {
        Self {
            name: ValidatedField::new(NAME_KEY, name, validate::template_name),
            display_name: ValidatedField::new(DISPLAY_NAME_KEY, display, display_name),
            version: ValidatedField::new(VERSION_KEY, version, validate::semantic_version),
            description: ValidatedField::new(DESCRIPTION_KEY, about, description),
            registry: ValidationRegistry::new(),
        }
    }

    pub fn mount(&mut self) {
        self.name.mount(&mut self.registry);
        self.display_name.mount(&mut self.registry);
        self.version.mount(&mut self.registry);
        self.description.mount(&mut self.registry);
    }

    pub fn unmount(&mut self) {
        self.name.unmount(&mut self.registry);
        self.display_name.unmount(&mut self.registry);
        self.version.unmount(&mut self.registry);
        self.description.unmount(&mut self.registry);
    }

    pub fn set_name(&mut self, value: &str) -> bool {
        self.name.set_value(value, &mut self.registry)
    }

    pub fn set_display_name(&mut self, value: &str) -> bool {
        self.display_name.set_value(value, &mut self.registry)
    }

    pub fn set_version(&mut self, value: &str) -> bool {
        self.version.set_value(value, &mut self.registry)
    }

    pub fn set_description(&mut self, value: &str) -> bool {
        self.description.set_value(value, &mut self.registry)
    }

    /// Marks the current name as taken. Cleared by the next name edit.
    pub fn reject_name(&mut self) {
        let name = self.name.value().to_string();
        self.registry
            .set_error(NAME_KEY, Some(FieldError::TemplateExists { name }));
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
