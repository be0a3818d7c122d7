use std::sync::Arc;

use anyhow::{Result, anyhow};
use comfy_table::{Cell, ContentArrangement, Table};
use unihub_app::{App, ProjectPage};
use unihub_core::backend::Backend;
use unihub_core::config::UnihubConfig;
use unihub_core::editor::EditorInstall;
use unihub_core::time::epoch_millis_rfc3339;
use unihub_wizard::new_project::{
    Overview, PackageCategory, PackageRow, PackageView, TemplateCategory, TemplateRow, TemplateView,
};
use unihub_wizard::{NewProjectFlow, SystemWizardLoader};

use crate::cli::{Cli, Command, DeleteTemplateArgs, NewArgs, PackagesArgs, ProjectsArgs, TemplatesArgs};
use crate::headless::{self, NewProjectPlan, Outcome, TemplatePlan};

pub fn run_with_deps(cli: Cli, backend: Arc<dyn Backend>, config: &UnihubConfig) -> Result<()> {
    let app = App::new(backend.as_ref());
    match cli.command {
        Command::Editors => run_editors_command(&app),
        Command::Templates(args) => run_templates_command(&app, backend.clone(), config, args),
        Command::Packages(args) => run_packages_command(&app, backend.clone(), config, args),
        Command::Projects(args) => run_projects_command(&app, config, args),
        Command::New(args) => run_new_command(&app, backend.clone(), config, args),
        Command::DeleteTemplate(args) => run_delete_template_command(&app, backend.clone(), config, args),
    }
}

fn run_editors_command(app: &App<'_>) -> Result<()> {
    let editors = app.editors()?;
    if editors.is_empty() {
        println!("No editors installed.");
        return Ok(());
    }
    print_editors(&editors);
    Ok(())
}

fn run_templates_command(
    app: &App<'_>,
    backend: Arc<dyn Backend>,
    config: &UnihubConfig,
    args: TemplatesArgs,
) -> Result<()> {
    let view = TemplateView {
        category: args
            .category
            .as_deref()
            .map(str::parse::<TemplateCategory>)
            .transpose()?,
        query: args.query.unwrap_or_default(),
    };

    let loader = Arc::new(SystemWizardLoader::new(backend));
    let mut flow = NewProjectFlow::new(app, loader, config.wizard.pinned_paths.clone())?;
    let rows = headless::list_templates(&mut flow, app, args.editor.as_deref(), view)?;
    if rows.is_empty() {
        let editor = flow.state().editor_version().unwrap_or("-");
        println!("No templates match for editor {editor}.");
        return Ok(());
    }
    print_templates(&rows);
    Ok(())
}

fn run_packages_command(
    app: &App<'_>,
    backend: Arc<dyn Backend>,
    config: &UnihubConfig,
    args: PackagesArgs,
) -> Result<()> {
    let view = PackageView {
        category: args
            .category
            .as_deref()
            .map(str::parse::<PackageCategory>)
            .transpose()?
            .unwrap_or(PackageCategory::All),
        query: args.query.unwrap_or_default(),
        ..PackageView::default()
    };

    let loader = Arc::new(SystemWizardLoader::new(backend));
    let mut flow = NewProjectFlow::new(app, loader, config.wizard.pinned_paths.clone())?;
    let rows = headless::list_packages(
        &mut flow,
        app,
        args.editor.as_deref(),
        args.template.as_deref(),
        view,
    )?;
    if rows.is_empty() {
        println!("No packages match.");
        return Ok(());
    }
    print_packages(&rows);
    Ok(())
}

fn run_projects_command(app: &App<'_>, config: &UnihubConfig, args: ProjectsArgs) -> Result<()> {
    let index = args
        .page
        .checked_sub(1)
        .ok_or_else(|| anyhow!("pages are numbered from 1"))?;
    let page = app.projects_page(args.query.as_deref(), index, config.projects.per_page)?;
    print_projects(&page);
    Ok(())
}

fn run_new_command(
    app: &App<'_>,
    backend: Arc<dyn Backend>,
    config: &UnihubConfig,
    args: NewArgs,
) -> Result<()> {
    let plan = NewProjectPlan {
        name: args.name,
        path: args.path,
        editor: args.editor,
        template: args.template,
        packages: args.packages,
        excludes: args.excludes,
        save_template: args.save_template.map(|name| TemplatePlan {
            name,
            display_name: args.display_name,
            version: args.template_version,
            description: args.description,
        }),
    };

    let loader = Arc::new(SystemWizardLoader::new(backend));
    let mut flow = NewProjectFlow::new(app, loader, config.wizard.pinned_paths.clone())?;
    let outcome = headless::run_new_project(&mut flow, app, &plan)?;

    match outcome {
        Outcome::Project(path) => {
            print_overview(&flow.overview());
            println!("Created project at {}", path.display());
        }
        Outcome::Template(path) => println!("Saved template to {}", path.display()),
    }
    Ok(())
}

fn run_delete_template_command(
    app: &App<'_>,
    backend: Arc<dyn Backend>,
    config: &UnihubConfig,
    args: DeleteTemplateArgs,
) -> Result<()> {
    let loader = Arc::new(SystemWizardLoader::new(backend));
    let mut flow = NewProjectFlow::new(app, loader, config.wizard.pinned_paths.clone())?;
    headless::delete_template(&mut flow, app, args.editor.as_deref(), &args.id)?;
    println!("Deleted template {}", args.id);
    Ok(())
}

fn print_editors(editors: &[EditorInstall]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Version", "Path", "Modules"]);

    for editor in editors {
        table.add_row(vec![
            Cell::new(editor.version.as_str()),
            Cell::new(editor.exe_path.display()),
            Cell::new(editor.visible_module_names().join(", ")),
        ]);
    }

    println!("{table}");
}

fn print_templates(rows: &[TemplateRow]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Id", "Version", "Category"]);

    for row in rows {
        table.add_row(vec![
            Cell::new(row.display_name.as_str()),
            Cell::new(row.template.id()),
            Cell::new(row.template.version.as_str()),
            Cell::new(row.category.label()),
        ]);
    }

    println!("{table}");
}

fn print_packages(rows: &[PackageRow]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Version", "Type", "In package"]);

    for row in rows {
        table.add_row(vec![
            Cell::new(row.package.name.as_str()),
            Cell::new(row.package.version.as_str()),
            Cell::new(row.package.package_type.label()),
            Cell::new(if row.in_package { "yes" } else { "" }),
        ]);
    }

    println!("{table}");
}

fn print_projects(page: &ProjectPage) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Version", "Path", "Last opened", "Pinned"]);

    for project in &page.projects {
        let last_opened = project
            .last_opened_at
            .and_then(|millis| epoch_millis_rfc3339(millis).ok())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(project.name.as_str()),
            Cell::new(project.version.as_str()),
            Cell::new(project.path.display()),
            Cell::new(last_opened),
            Cell::new(if project.is_pinned { "yes" } else { "" }),
        ]);
    }

    println!("{table}");
    println!(
        "Page {} of {} ({} projects)",
        page.index + 1,
        page.page_count,
        page.total
    );
    if !page.nearby_pages.is_empty() {
        let nearby: Vec<String> = page
            .nearby_pages
            .iter()
            .map(|index| (index + 1).to_string())
            .collect();
        println!("Nearby pages: {}", nearby.join(" "));
    }
}

fn print_overview(overview: &Overview) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec![
        Cell::new("Editor"),
        Cell::new(overview.editor_version.as_deref().unwrap_or("-")),
    ]);
    table.add_row(vec![
        Cell::new("Template"),
        Cell::new(overview.template.as_deref().unwrap_or("empty project")),
    ]);
    table.add_row(vec![
        Cell::new("Packages"),
        Cell::new(overview.packages.join(", ")),
    ]);
    table.add_row(vec![
        Cell::new("Files"),
        Cell::new(format!("{} of {}", overview.selected_files, overview.total_files)),
    ]);
    println!("{table}");
}
