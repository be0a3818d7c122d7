mod support;

use std::path::PathBuf;

use unihub_app::App;
use unihub_core::editor::EditorInstall;
use unihub_core::generate::{
    GenerateProjectRequest, ProjectInfoForGeneration, TemplateInfoForGeneration,
};
use unihub_core::package::{MinimalPackage, PackageType};
use unihub_core::prefs::UserCache;

use support::{FakeBackend, editor, record, surface_template};

fn request(name: &str, path: &str, editor: EditorInstall) -> GenerateProjectRequest {
    GenerateProjectRequest {
        project_info: ProjectInfoForGeneration {
            name: name.to_string(),
            path: PathBuf::from(path),
        },
        template_info: TemplateInfoForGeneration {
            template: None,
            editor_version: editor,
            packages: Vec::new(),
            selected_files: Vec::new(),
            is_empty: true,
        },
    }
}

#[test]
fn prepare_prefers_cached_editor_version() {
    let backend = FakeBackend {
        editors: vec![editor("2021.3.1f1"), editor("2022.3.40f1")],
        default_project_path: PathBuf::from("/home/me/projects"),
        user_cache: std::sync::Mutex::new(UserCache {
            last_editor_version: Some("2022.3.40f1".to_string()),
            ..UserCache::default()
        }),
        ..FakeBackend::default()
    };

    let prepare = App::new(&backend)
        .new_project_prepare()
        .expect("prepare");

    assert_eq!(prepare.editors.len(), 2);
    assert_eq!(
        prepare.editor.map(|editor| editor.version),
        Some("2022.3.40f1".to_string())
    );
    assert_eq!(prepare.default_project_path, PathBuf::from("/home/me/projects"));
}

#[test]
fn prepare_surfaces_invalid_install_path() {
    let backend = FakeBackend {
        failures: [("get_editors", "Invalid hub_editors_path".to_string())].into(),
        ..FakeBackend::default()
    };

    let error = App::new(&backend)
        .new_project_prepare()
        .expect_err("should fail");
    let rendered = format!("{error:#}");
    assert!(rendered.contains("failed to list installed editors"));
    assert!(rendered.contains("Invalid hub_editors_path"));
}

#[test]
fn template_details_decode_manifest_dependencies() {
    let template = surface_template("com.unity.template.3d", "2022.3.40f1");
    let backend = FakeBackend {
        records: [(
            template.name.clone(),
            record(
                &template,
                &[
                    ("com.unity.ugui", "1.0.0"),
                    ("com.studio.tools", "https://example.com/tools.git"),
                ],
            ),
        )]
        .into(),
        ..FakeBackend::default()
    };

    let details = App::new(&backend)
        .new_project_template_details(&template)
        .expect("details");
    assert_eq!(details.template.dependencies.internal.len(), 1);
    assert_eq!(details.template.dependencies.custom.len(), 1);
}

#[test]
fn generate_rejects_empty_name_without_calling_backend() {
    let backend = FakeBackend::default();
    let error = App::new(&backend)
        .new_project_generate(&request("", "/projects", editor("2022.3.40f1")))
        .expect_err("should fail");

    assert_eq!(error.to_string(), "Project name cannot be empty");
    assert!(backend.calls().is_empty());
}

#[test]
fn generate_refuses_existing_output_directory() {
    let backend = FakeBackend {
        existing_paths: [PathBuf::from("/projects"), PathBuf::from("/projects/Game")].into(),
        ..FakeBackend::default()
    };

    let error = App::new(&backend)
        .new_project_generate(&request("Game", "/projects", editor("2022.3.40f1")))
        .expect_err("should fail");

    assert!(error.to_string().contains("already exists"));
    assert!(!backend.calls().contains(&"generate_project".to_string()));
}

#[test]
fn generate_sends_single_request() {
    let backend = FakeBackend {
        existing_paths: [PathBuf::from("/projects")].into(),
        ..FakeBackend::default()
    };

    let path = App::new(&backend)
        .new_project_generate(&request("Game", "/projects", editor("2022.3.40f1")))
        .expect("generate");

    assert_eq!(path, PathBuf::from("/projects/Game"));
    assert_eq!(backend.generated.lock().expect("generated").len(), 1);
}

#[test]
fn git_and_local_packages_round_trip_through_cache() {
    let backend = FakeBackend {
        existing_paths: [PathBuf::from("/shared/tools")].into(),
        ..FakeBackend::default()
    };
    let app = App::new(&backend);

    let git = app
        .new_project_add_git_package("com.studio.net", "https://example.com/net.git")
        .expect("git");
    let manifest = app
        .new_project_add_manifest_package(r#""com.studio.ai": "git@example.com:ai.git","#)
        .expect("manifest");
    let local = app
        .new_project_add_local_package(&PathBuf::from("/shared/tools"))
        .expect("local");

    assert_eq!(local.package_type, PackageType::Local);
    assert_eq!(local.manifest_value(), "file:/shared/tools");

    let cache = app.new_project_cached_packages().expect("cache");
    assert_eq!(cache.git_packages, vec![git.clone(), manifest]);
    assert_eq!(cache.local_packages, vec![local]);

    app.new_project_remove_package(&git).expect("remove");
    let cache = app.new_project_cached_packages().expect("cache");
    assert_eq!(cache.git_packages.len(), 1);
}

#[test]
fn default_packages_cannot_be_removed() {
    let backend = FakeBackend::default();
    let package = MinimalPackage {
        name: "com.unity.ugui".to_string(),
        version: "1.0.0".to_string(),
        is_discoverable: true,
        package_type: PackageType::Default,
    };

    let error = App::new(&backend)
        .new_project_remove_package(&package)
        .expect_err("should fail");
    assert!(error.to_string().contains("default packages cannot be removed"));
}

#[test]
fn invalid_git_url_is_rejected_before_caching() {
    let backend = FakeBackend::default();
    let error = App::new(&backend)
        .new_project_add_git_package("com.studio.net", "not a url")
        .expect_err("should fail");

    assert!(error.to_string().contains("is not a git url"));
    assert!(backend.calls().is_empty());
}

#[test]
fn remember_editor_updates_user_cache() {
    let backend = FakeBackend::default();
    App::new(&backend)
        .new_project_remember_editor("6000.0.1f1")
        .expect("remember");

    assert_eq!(
        backend
            .user_cache
            .lock()
            .expect("cache")
            .last_editor_version
            .as_deref(),
        Some("6000.0.1f1")
    );
}
