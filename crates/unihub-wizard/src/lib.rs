pub mod loading;
pub mod new_project;
pub mod validation;

use std::path::PathBuf;

pub use loading::{LoadKind, SystemWizardLoader, WizardLoadEvent, WizardLoader};
pub use new_project::{NewProjectFlow, NewProjectOps};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiExit {
    /// The project was generated at this path.
    Completed(PathBuf),
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowSignal {
    Continue,
    Exit(UiExit),
}
