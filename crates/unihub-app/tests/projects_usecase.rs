mod support;

use unihub_app::App;

use support::{ENV_LOCK, FakeBackend, project, write_valid_config};

fn backend_with_projects(count: usize) -> FakeBackend {
    FakeBackend {
        projects: (0..count)
            .map(|index| project(&format!("Project {index:02}"), index as i64, false))
            .collect(),
        ..FakeBackend::default()
    }
}

#[test]
fn pages_floor_partial_trailing_page() {
    let backend = backend_with_projects(25);
    let app = App::new(&backend);

    let first = app.projects_page(None, 0, 10).expect("first page");
    assert_eq!(first.page_count, 2);
    assert_eq!(first.total, 25);
    assert_eq!(first.projects.len(), 10);
    // Most recently opened first.
    assert_eq!(first.projects[0].name, "Project 24");

    let error = app.projects_page(None, 2, 10).expect_err("out of range");
    assert!(error.to_string().contains("page 3 is out of range"));
}

#[test]
fn pinned_projects_sort_first_and_query_filters() {
    let mut backend = backend_with_projects(3);
    backend.projects.push(project("Pinned Racer", -1, true));
    let app = App::new(&backend);

    let all = app.projects(None).expect("projects");
    assert_eq!(all[0].name, "Pinned Racer");

    let filtered = app.projects(Some("racer")).expect("filtered");
    assert_eq!(filtered.len(), 1);
}

#[test]
fn ensure_config_ready_reports_missing_config() {
    let _guard = ENV_LOCK.lock().expect("env lock");

    let temp = tempfile::tempdir().expect("temp dir");
    unsafe {
        std::env::set_var("HOME", temp.path());
    }

    let error = App::ensure_config_ready().expect_err("missing config");
    assert!(error.to_string().contains("missing config at"));

    write_valid_config(temp.path());
    let config = App::ensure_config_ready().expect("config");
    assert_eq!(config.backend.program, "unihub-backend");
    assert_eq!(config.projects.per_page, 10);
}
