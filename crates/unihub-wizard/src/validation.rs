use std::collections::BTreeMap;
use std::fmt;

use unihub_core::tracked::Tracked;
use unihub_core::validate::FieldError;

pub type Validator = fn(&str) -> Option<FieldError>;
type ErrorListener = Box<dyn FnMut(bool) + Send>;

/// Field errors for one form. A key that is absent counts as valid.
#[derive(Default)]
pub struct ValidationRegistry {
    errors: BTreeMap<String, Option<FieldError>>,
    listeners: Vec<ErrorListener>,
}

impl fmt::Debug for ValidationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRegistry")
            .field("errors", &self.errors)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ValidationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the error for `key`; the last write wins.
    pub fn set_error(&mut self, key: &str, error: Option<FieldError>) {
        self.errors.insert(key.to_string(), error);
        self.notify();
    }

    pub fn remove(&mut self, key: &str) {
        if self.errors.remove(key).is_some() {
            self.notify();
        }
    }

    pub fn has_any_error(&self) -> bool {
        self.errors.values().any(Option::is_some)
    }

    pub fn error_for(&self, key: &str) -> Option<&FieldError> {
        self.errors.get(key).and_then(Option::as_ref)
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.errors
            .iter()
            .filter_map(|(key, error)| error.as_ref().map(|error| (key.as_str(), error)))
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.errors.contains_key(key)
    }

    /// Registers an `on_error_changed` listener. It is called with the
    /// aggregate after every change to the map.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self) {
        let has_error = self.has_any_error();
        for listener in &mut self.listeners {
            listener(has_error);
        }
    }
}

/// An input bound to one registry key.
#[derive(Debug, Clone)]
pub struct ValidatedField {
    key: &'static str,
    value: Tracked<String>,
    validator: Validator,
    mounted: bool,
}

impl ValidatedField {
    pub fn new(key: &'static str, value: impl Into<String>, validator: Validator) -> Self {
        Self {
            key,
            value: Tracked::new(value.into()),
            validator,
            mounted: false,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn value(&self) -> &str {
        self.value.value()
    }

    pub fn error(&self) -> Option<FieldError> {
        (self.validator)(self.value.value())
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn mount(&mut self, registry: &mut ValidationRegistry) {
        self.mounted = true;
        registry.set_error(self.key, self.error());
    }

    /// Returns whether the value changed. The registry is only touched on a
    /// change, and only while mounted.
    pub fn set_value(&mut self, value: impl Into<String>, registry: &mut ValidationRegistry) -> bool {
        if !self.value.set(value.into()) {
            return false;
        }
        if self.mounted {
            registry.set_error(self.key, self.error());
        }
        true
    }

    pub fn unmount(&mut self, registry: &mut ValidationRegistry) {
        self.mounted = false;
        registry.remove(self.key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use unihub_core::validate::{self, FieldError};

    use super::{ValidatedField, ValidationRegistry};

    #[test]
    fn aggregate_tracks_any_non_null_entry() {
        let mut registry = ValidationRegistry::new();
        assert!(!registry.has_any_error());

        registry.set_error("projectName", Some(FieldError::EmptyProjectName));
        registry.set_error("projectPath", None);
        assert!(registry.has_any_error());

        registry.set_error("projectName", None);
        assert!(!registry.has_any_error());
        assert!(registry.is_registered("projectName"));
    }

    #[test]
    fn listener_sees_every_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ValidationRegistry::new();
        let sink = Arc::clone(&seen);
        registry.subscribe(move |has_error| sink.lock().expect("seen lock").push(has_error));

        registry.set_error("a", Some(FieldError::EmptyProjectPath));
        registry.set_error("b", None);
        registry.set_error("a", None);

        assert_eq!(*seen.lock().expect("seen lock"), vec![true, true, false]);
    }

    #[test]
    fn field_registers_on_mount_and_clears_on_unmount() {
        let mut registry = ValidationRegistry::new();
        let mut field = ValidatedField::new("projectName", "", validate::project_name);

        assert!(!registry.has_any_error());
        field.mount(&mut registry);
        assert_eq!(
            registry.error_for("projectName"),
            Some(&FieldError::EmptyProjectName)
        );

        assert!(field.set_value("Game", &mut registry));
        assert!(!registry.has_any_error());

        field.set_value("", &mut registry);
        field.unmount(&mut registry);
        assert!(!registry.has_any_error());
        assert!(!registry.is_registered("projectName"));
    }

    #[test]
    fn unchanged_value_does_not_reregister() {
        let calls = Arc::new(Mutex::new(0usize));
        let mut registry = ValidationRegistry::new();
        let counter = Arc::clone(&calls);
        registry.subscribe(move |_| *counter.lock().expect("count lock") += 1);

        let mut field = ValidatedField::new("projectName", "Game", validate::project_name);
        field.mount(&mut registry);
        assert!(!field.set_value("Game", &mut registry));

        assert_eq!(*calls.lock().expect("count lock"), 1);
    }

    #[test]
    fn unmounted_field_does_not_write() {
        let mut registry = ValidationRegistry::new();
        let mut field = ValidatedField::new("projectName", "Game", validate::project_name);
        field.set_value("", &mut registry);
        assert!(!registry.is_registered("projectName"));
    }
}
