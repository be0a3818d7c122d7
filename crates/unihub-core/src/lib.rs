pub mod backend;
pub mod command_runner;
pub mod config;
pub mod editor;
pub mod file_dir;
pub mod generate;
pub mod lazy;
pub mod logging;
pub mod package;
pub mod prefs;
pub mod process_backend;
pub mod project;
pub mod template;
#[cfg(test)]
pub(crate) mod test_support;
pub mod time;
pub mod tracked;
pub mod validate;
