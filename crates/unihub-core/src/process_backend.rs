use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::backend::{Backend, BackendError};
use crate::command_runner::{CommandRunner, Invocation, SystemCommandRunner};
use crate::config::BackendConfig;
use crate::editor::EditorInstall;
use crate::file_dir::FileDir;
use crate::generate::{GenerateProjectRequest, NewTemplateRequest};
use crate::package::{MinimalPackage, PackageType};
use crate::prefs::{Prefs, UserCache, UserCacheKey};
use crate::project::Project;
use crate::template::{SurfaceTemplate, TemplateRecord};

/// Talks to the backend executable: every call spawns
/// `<program> <args...> <command> <json-args>` and reads one JSON document
/// from stdout.
pub struct ProcessBackend<R = SystemCommandRunner> {
    program: String,
    args: Vec<String>,
    runner: R,
}

impl ProcessBackend<SystemCommandRunner> {
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.args.clone(),
            SystemCommandRunner::new(),
        )
    }
}

impl<R: CommandRunner> ProcessBackend<R> {
    pub fn new(program: impl Into<String>, args: Vec<String>, runner: R) -> Self {
        Self {
            program: program.into(),
            args,
            runner,
        }
    }

    fn invoke(&self, command: &str, payload: Value) -> Result<String, BackendError> {
        let encoded = serde_json::to_string(&payload).map_err(|source| BackendError::Encode {
            command: command.to_string(),
            source,
        })?;

        let mut args = self.args.clone();
        args.push(command.to_string());
        args.push(encoded);
        let invocation = Invocation::new(self.program.clone(), args);

        tracing::debug!(command, "backend call");
        let output = self
            .runner
            .run(&invocation)
            .map_err(|error| BackendError::Execute {
                command: command.to_string(),
                message: format!("{error:#}"),
            })?;

        if !output.succeeded() {
            tracing::warn!(command, status = output.status_code, "backend call failed");
            return Err(BackendError::CommandFailed {
                command: command.to_string(),
                status: output.status_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(output.stdout)
    }

    fn call<T: DeserializeOwned>(&self, command: &str, payload: Value) -> Result<T, BackendError> {
        let stdout = self.invoke(command, payload)?;
        serde_json::from_str(stdout.trim()).map_err(|source| BackendError::Decode {
            command: command.to_string(),
            source,
        })
    }

    fn call_unit(&self, command: &str, payload: Value) -> Result<(), BackendError> {
        self.invoke(command, payload).map(|_| ())
    }

    fn encode<T: serde::Serialize>(command: &str, value: &T) -> Result<Value, BackendError> {
        serde_json::to_value(value).map_err(|source| BackendError::Encode {
            command: command.to_string(),
            source,
        })
    }
}

fn cache_command(package: &MinimalPackage, add: bool) -> &'static str {
    match (package.package_type, add) {
        (PackageType::Local, true) => "add_local_package_to_cache",
        (PackageType::Local, false) => "remove_local_package_from_cache",
        (_, true) => "add_git_package_to_cache",
        (_, false) => "remove_git_package_from_cache",
    }
}

impl<R: CommandRunner> Backend for ProcessBackend<R> {
    fn default_project_path(&self) -> anyhow::Result<PathBuf> {
        Ok(self.call("get_default_project_path", json!({}))?)
    }

    fn editors(&self) -> anyhow::Result<Vec<EditorInstall>> {
        Ok(self.call("get_editors", json!({}))?)
    }

    fn surface_templates(&self, editor_version: &str) -> anyhow::Result<Vec<SurfaceTemplate>> {
        Ok(self.call(
            "get_surface_templates",
            json!({ "editorVersion": editor_version }),
        )?)
    }

    fn template_information(&self, template: &SurfaceTemplate) -> anyhow::Result<TemplateRecord> {
        let command = "get_template_information";
        let surface_template = Self::encode(command, template)?;
        Ok(self.call(command, json!({ "surfaceTemplate": surface_template }))?)
    }

    fn template_file_paths(&self, template: &SurfaceTemplate) -> anyhow::Result<FileDir> {
        let command = "get_template_file_paths";
        let surface_template = Self::encode(command, template)?;
        Ok(self.call(command, json!({ "surfaceTemplate": surface_template }))?)
    }

    fn default_editor_packages(
        &self,
        editor_version: &str,
    ) -> anyhow::Result<Vec<MinimalPackage>> {
        Ok(self.call(
            "get_default_editor_packages",
            json!({ "editorVersion": editor_version }),
        )?)
    }

    fn user_cache(&self) -> anyhow::Result<UserCache> {
        Ok(self.call("get_user_cache", json!({}))?)
    }

    fn set_user_cache_value(&self, key: UserCacheKey, value: &str) -> anyhow::Result<()> {
        Ok(self.call_unit(
            "set_user_cache_value",
            json!({ "key": key.as_str(), "value": value }),
        )?)
    }

    fn add_cached_package(&self, package: &MinimalPackage) -> anyhow::Result<()> {
        let command = cache_command(package, true);
        let package = Self::encode(command, package)?;
        Ok(self.call_unit(command, json!({ "package": package }))?)
    }

    fn remove_cached_package(&self, package: &MinimalPackage) -> anyhow::Result<()> {
        let command = cache_command(package, false);
        let package = Self::encode(command, package)?;
        Ok(self.call_unit(command, json!({ "package": package }))?)
    }

    fn prefs(&self) -> anyhow::Result<Prefs> {
        Ok(self.call("get_prefs", json!({}))?)
    }

    fn generate_project(&self, request: &GenerateProjectRequest) -> anyhow::Result<PathBuf> {
        let command = "generate_project";
        let payload = Self::encode(command, request)?;
        Ok(self.call(command, payload)?)
    }

    fn generate_template(&self, request: &NewTemplateRequest) -> anyhow::Result<PathBuf> {
        let command = "generate_template";
        let payload = Self::encode(command, request)?;
        Ok(self.call(command, payload)?)
    }

    fn delete_template(
        &self,
        template: &SurfaceTemplate,
        editor_version: &str,
    ) -> anyhow::Result<()> {
        let command = "delete_template";
        let surface_template = Self::encode(command, template)?;
        Ok(self.call_unit(
            command,
            json!({ "surfaceTemplate": surface_template, "editorVersion": editor_version }),
        )?)
    }

    fn projects(&self) -> anyhow::Result<Vec<Project>> {
        Ok(self.call("get_projects", json!({}))?)
    }

    fn is_valid_path(&self, path: &Path) -> anyhow::Result<bool> {
        Ok(self.call("is_valid_path", json!({ "path": path }))?)
    }

    fn is_valid_dir(&self, path: &Path) -> anyhow::Result<bool> {
        Ok(self.call("is_valid_dir", json!({ "path": path }))?)
    }

    fn is_valid_file(&self, path: &Path) -> anyhow::Result<bool> {
        Ok(self.call("is_valid_file", json!({ "path": path }))?)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::backend::{Backend, BackendError};
    use crate::command_runner::CommandOutput;
    use crate::package::MinimalPackage;
    use crate::test_support::{RecordingRunner, output, payload};

    use super::ProcessBackend;

    fn backend(outputs: Vec<anyhow::Result<CommandOutput>>) -> ProcessBackend<RecordingRunner> {
        ProcessBackend::new(
            "unihub-backend",
            vec!["--profile".to_string(), "dev".to_string()],
            RecordingRunner::from_outputs(outputs),
        )
    }

    #[test]
    fn passes_command_and_json_arguments_after_configured_args() {
        let backend = backend(vec![output(
            r#"[{"name":"com.unity.template.3d","version":"1.0.0","path":"/t/3d.tgz","editorVersion":"2022.3.40f1"}]"#,
            "",
            0,
        )]);

        let templates = backend
            .surface_templates("2022.3.40f1")
            .expect("templates");
        assert_eq!(templates[0].id(), "com.unity.template.3d");

        let calls = backend.runner.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "unihub-backend");
        assert_eq!(&calls[0].args[..3], ["--profile", "dev", "get_surface_templates"]);
        assert_eq!(calls[0].command(), Some("get_surface_templates"));
        assert_eq!(payload(&calls[0])["editorVersion"], "2022.3.40f1");
    }

    #[test]
    fn non_zero_exit_carries_stderr() {
        let backend = backend(vec![output("", "Invalid hub_editors_path\n", 1)]);

        let error = backend.editors().expect_err("should fail");
        let backend_error = error
            .downcast_ref::<BackendError>()
            .expect("backend error");
        assert!(matches!(
            backend_error,
            BackendError::CommandFailed { status: 1, .. }
        ));
        assert!(error.to_string().contains("Invalid hub_editors_path"));
    }

    #[test]
    fn malformed_stdout_is_a_decode_error() {
        let backend = backend(vec![output("not json", "", 0)]);

        let error = backend.default_project_path().expect_err("should fail");
        assert!(matches!(
            error.downcast_ref::<BackendError>(),
            Some(BackendError::Decode { .. })
        ));
    }

    #[test]
    fn unit_commands_ignore_stdout() {
        let backend = backend(vec![output("", "", 0), output("", "", 0)]);

        backend
            .add_cached_package(&MinimalPackage::local("../tools"))
            .expect("add local");
        backend
            .remove_cached_package(&MinimalPackage::git("com.a.b", "https://x/b.git"))
            .expect("remove git");

        let calls = backend.runner.invocations();
        assert_eq!(calls[0].command(), Some("add_local_package_to_cache"));
        assert_eq!(calls[1].command(), Some("remove_git_package_from_cache"));
        assert_eq!(payload(&calls[0])["package"]["type"], "local");
    }

    #[test]
    fn path_checks_decode_booleans() {
        let backend = backend(vec![output("true\n", "", 0)]);
        assert!(
            backend
                .is_valid_dir(&PathBuf::from("/projects"))
                .expect("path check")
        );
    }
}
