mod support;

use std::path::PathBuf;

use unihub_app::App;
use unihub_core::generate::{NewTemplateRequest, TemplateInfoForGeneration};
use unihub_core::prefs::Prefs;

use support::{FakeBackend, editor};

fn request(name: &str, version: &str) -> NewTemplateRequest {
    NewTemplateRequest {
        template: TemplateInfoForGeneration {
            template: None,
            editor_version: editor("2022.3.40f1"),
            packages: Vec::new(),
            selected_files: Vec::new(),
            is_empty: true,
        },
        name: name.to_string(),
        display_name: "New Template".to_string(),
        version: version.to_string(),
        description: "A custom template".to_string(),
    }
}

fn backend_with_appdata() -> FakeBackend {
    FakeBackend {
        prefs: Prefs {
            hub_appdata_path: Some(PathBuf::from("/appdata")),
            ..Prefs::default()
        },
        ..FakeBackend::default()
    }
}

#[test]
fn saves_template_under_user_templates_dir() {
    let backend = backend_with_appdata();
    let app = App::new(&backend);

    assert_eq!(
        app.new_template_target("com.studio.template")
            .expect("target"),
        PathBuf::from("/appdata/Templates/com.studio.template.tgz")
    );

    let path = app
        .new_template_save(&request("com.studio.template", "1.0.0"))
        .expect("save");
    assert_eq!(path, PathBuf::from("/templates/com.studio.template.tgz"));
    assert_eq!(backend.saved_templates.lock().expect("saved").len(), 1);
}

#[test]
fn name_collision_is_reported_before_generation() {
    let mut backend = backend_with_appdata();
    backend
        .existing_paths
        .insert(PathBuf::from("/appdata/Templates/com.studio.template.tgz"));

    let app = App::new(&backend);
    assert!(app.new_template_exists("com.studio.template").expect("exists"));

    let error = app
        .new_template_save(&request("com.studio.template", "1.0.0"))
        .expect_err("should fail");
    assert!(error.to_string().contains("template already exists at"));
    assert!(format!("{error:#}").contains("A template named 'com.studio.template' already exists"));
    assert!(!backend.calls().contains(&"generate_template".to_string()));
}

#[test]
fn invalid_fields_block_submission() {
    let backend = backend_with_appdata();
    let app = App::new(&backend);

    let error = app
        .new_template_save(&request("com.studio", "1.0.0"))
        .expect_err("should fail");
    assert!(error.to_string().contains("at least 3 dot-separated parts"));

    let error = app
        .new_template_save(&request("com.studio.template", "v1"))
        .expect_err("should fail");
    assert!(error.to_string().contains("Version must look like 1.0.0"));
    assert!(backend.calls().is_empty());
}

#[test]
fn missing_appdata_path_points_to_settings() {
    let backend = FakeBackend::default();
    let error = App::new(&backend)
        .new_template_target("com.studio.template")
        .expect_err("should fail");
    assert!(error.to_string().contains("fix it in settings"));
}
