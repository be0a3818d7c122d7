use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

pub const EDITOR_VERSION: &str = "2022.3.40f1";

/// Answers backend calls the way the real backend would, from canned JSON.
/// `generate_project` writes its payload to `$UNIHUB_TEST_CAPTURE`.
const FAKE_BACKEND: &str = r#"case "$1" in
  get_editors)
    echo '[{"exePath":"/opt/editors/2022.3.40f1/Editor","version":"2022.3.40f1","modules":[{"name":"Android Build Support","id":"android","visible":true},{"name":"Docs","id":"docs","visible":false}]}]' ;;
  get_user_cache)
    echo '{}' ;;
  get_default_project_path)
    echo '"/projects"' ;;
  get_surface_templates)
    echo '[{"name":"com.unity.template.3d","version":"9.0.0","path":"/t/3d.tgz","editorVersion":"2022.3.40f1"},{"name":"com.studio.custom","version":"1.0.0","path":"/t/custom.tgz","editorVersion":"2022.3.40f1"}]' ;;
  get_default_editor_packages)
    echo '[{"name":"com.unity.ugui","version":"1.0.0","type":"default"},{"name":"com.unity.timeline","version":"1.7.6","type":"default"}]' ;;
  get_projects)
    echo '[{"name":"Alpha","path":"/p/alpha","version":"2022.3.40f1","isPinned":true,"lastOpenedAt":100},{"name":"Bravo","path":"/p/bravo","version":"2022.3.40f1","lastOpenedAt":500},{"name":"Charlie","path":"/p/charlie","version":"2021.3.1f1","lastOpenedAt":400},{"name":"Delta","path":"/p/delta","version":"2021.3.1f1","lastOpenedAt":300},{"name":"Echo","path":"/p/echo","version":"2021.3.1f1","lastOpenedAt":200}]' ;;
  is_valid_dir)
    echo true ;;
  is_valid_path)
    echo false ;;
  generate_project)
    printf '%s' "$2" > "$UNIHUB_TEST_CAPTURE"
    echo '"/projects/Game"' ;;
  *)
    echo "unsupported command $1" >&2
    exit 2 ;;
esac"#;

pub fn new_command_with_temp_home() -> (Command, tempfile::TempDir) {
    let temp_home = tempfile::tempdir().expect("temp home");
    let binary = assert_cmd::cargo::cargo_bin!("unihub");
    let mut command = Command::new(binary);
    command.env("HOME", temp_home.path());
    command.env("XDG_CONFIG_HOME", temp_home.path().join(".config"));
    command.env("XDG_DATA_HOME", temp_home.path().join(".local").join("share"));
    command.env("UNIHUB_TEST_CAPTURE", capture_path(temp_home.path()));
    (command, temp_home)
}

pub fn capture_path(home: &Path) -> PathBuf {
    home.join("generate-request.json")
}

/// Points the backend at `sh` running [`FAKE_BACKEND`], two projects per page.
pub fn write_valid_config(home: &Path) {
    let config_dir = home.join(".config").join("unihub");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(
        config_dir.join("config.toml"),
        format!(
            r#"
version = 1

[backend]
program = "sh"
args = ["-c", '''{FAKE_BACKEND}''', "unihub-backend"]

[projects]
per_page = 2
"#
        ),
    )
    .expect("write config");
}

pub fn write_config(home: &Path, contents: &str) {
    let config_dir = home.join(".config").join("unihub");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(config_dir.join("config.toml"), contents).expect("write config");
}
