use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use unihub_core::template::SurfaceTemplate;
use unihub_wizard::new_project::{
    NewProjectFlow, NewProjectOps, PackageRow, PackageView, TemplateRow, TemplateView,
};
use unihub_wizard::{FlowSignal, UiExit};

const TICK: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Default)]
pub struct NewProjectPlan {
    pub name: String,
    pub path: Option<PathBuf>,
    pub editor: Option<String>,
    pub template: Option<String>,
    pub packages: Vec<String>,
    pub excludes: Vec<String>,
    pub save_template: Option<TemplatePlan>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplatePlan {
    pub name: String,
    pub display_name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Project(PathBuf),
    Template(PathBuf),
}

/// Walks the wizard tab by tab the way a user would, waiting for each tab's
/// loads before touching it.
pub fn run_new_project(
    flow: &mut NewProjectFlow,
    ops: &dyn NewProjectOps,
    plan: &NewProjectPlan,
) -> Result<Outcome> {
    prepare_editor(flow, ops, plan.editor.as_deref())?;
    enter_packages(flow, ops, plan.template.as_deref())?;

    for name in &plan.packages {
        flow.toggle_package(name)?;
    }
    advance(flow, ops)?;
    wait(flow)?;

    for path in &plan.excludes {
        exclude_path(flow, path)?;
    }
    advance(flow, ops)?;

    flow.set_project_name(&plan.name);
    if let Some(path) = &plan.path {
        flow.set_project_path(&path.display().to_string());
    }

    if let Some(template) = &plan.save_template {
        return save_template(flow, ops, template);
    }

    advance(flow, ops)?;
    match wait(flow)? {
        FlowSignal::Exit(UiExit::Completed(path)) => Ok(Outcome::Project(path)),
        FlowSignal::Exit(UiExit::Canceled) | FlowSignal::Continue => {
            bail!("project generation finished without a result")
        }
    }
}

/// The template tab's rows for `editor` under `view`.
pub fn list_templates(
    flow: &mut NewProjectFlow,
    ops: &dyn NewProjectOps,
    editor: Option<&str>,
    view: TemplateView,
) -> Result<Vec<TemplateRow>> {
    prepare_editor(flow, ops, editor)?;
    *flow.template_view_mut() = view;
    Ok(flow.template_rows())
}

/// The package tab's rows under `view`, after choosing `template` (or none).
pub fn list_packages(
    flow: &mut NewProjectFlow,
    ops: &dyn NewProjectOps,
    editor: Option<&str>,
    template: Option<&str>,
    view: PackageView,
) -> Result<Vec<PackageRow>> {
    prepare_editor(flow, ops, editor)?;
    enter_packages(flow, ops, template)?;
    *flow.package_view_mut() = view;
    Ok(flow.package_rows())
}

pub fn delete_template(
    flow: &mut NewProjectFlow,
    ops: &dyn NewProjectOps,
    editor: Option<&str>,
    id: &str,
) -> Result<()> {
    prepare_editor(flow, ops, editor)?;
    let template = find_template(flow, id)?;
    flow.delete_template(&template)?;
    wait(flow)?;
    if !flow.template_delete().is_success() {
        bail!("template '{id}' was not deleted");
    }
    Ok(())
}

fn prepare_editor(flow: &mut NewProjectFlow, ops: &dyn NewProjectOps, editor: Option<&str>) -> Result<()> {
    wait(flow)?;
    if let Some(version) = editor {
        flow.select_editor(ops, version)?;
        wait(flow)?;
    }
    Ok(())
}

/// Picks the template (or starts empty) and waits on the package tab.
fn enter_packages(flow: &mut NewProjectFlow, ops: &dyn NewProjectOps, template: Option<&str>) -> Result<()> {
    match template {
        Some(id) => {
            let template = find_template(flow, id)?;
            flow.select_template(Some(template));
            wait(flow)?;
            advance(flow, ops)?;
        }
        None => flow.start_empty(ops),
    }
    wait(flow)?;
    Ok(())
}

fn find_template(flow: &NewProjectFlow, id: &str) -> Result<SurfaceTemplate> {
    let editor = flow.state().editor_version().unwrap_or("none");
    flow.templates()
        .value()
        .and_then(|templates| templates.iter().find(|template| template.id() == id))
        .cloned()
        .ok_or_else(|| anyhow!("template '{id}' is not available for editor {editor}"))
}

fn exclude_path(flow: &mut NewProjectFlow, path: &str) -> Result<()> {
    let files = &flow.state().files;
    let node = files
        .find_path(path)
        .ok_or_else(|| anyhow!("'{path}' is not part of the template"))?;
    if files.is_pinned(&node.id) {
        bail!("'{path}' is required by the template and cannot be excluded");
    }
    let id = node.id.clone();
    if files.is_selected(&id) {
        flow.toggle_file(&id);
    }
    Ok(())
}

fn save_template(
    flow: &mut NewProjectFlow,
    ops: &dyn NewProjectOps,
    template: &TemplatePlan,
) -> Result<Outcome> {
    flow.open_new_template(ops);
    flow.set_template_name(&template.name);
    if let Some(display_name) = &template.display_name {
        flow.set_template_display_name(display_name);
    }
    if let Some(version) = &template.version {
        flow.set_template_version(version);
    }
    if let Some(description) = &template.description {
        flow.set_template_description(description);
    }

    advance(flow, ops)?;
    if flow.new_template().has_error() {
        bail!(blocked_reason(flow));
    }
    wait(flow)?;
    flow.template_save()
        .value()
        .cloned()
        .map(Outcome::Template)
        .ok_or_else(|| anyhow!("template save finished without a result"))
}

fn advance(flow: &mut NewProjectFlow, ops: &dyn NewProjectOps) -> Result<()> {
    if !flow.can_go_next() {
        bail!(blocked_reason(flow));
    }
    flow.next(ops);
    Ok(())
}

/// Ticks until nothing is in flight. A page error left behind by a load
/// becomes the command's error.
fn wait(flow: &mut NewProjectFlow) -> Result<FlowSignal> {
    loop {
        let signal = flow.on_tick();
        if signal != FlowSignal::Continue {
            return Ok(signal);
        }
        if !flow.is_busy() {
            break;
        }
        thread::sleep(TICK);
    }

    if flow.state().error.is_error() {
        bail!(blocked_reason(flow));
    }
    Ok(FlowSignal::Continue)
}

fn blocked_reason(flow: &NewProjectFlow) -> String {
    if let Some(failure) = flow.load_failure() {
        return match failure.hint() {
            Some(hint) => format!("{} ({hint})", failure.message()),
            None => failure.message().to_string(),
        };
    }
    if let Some(message) = flow.state().error.error() {
        return message.to_string();
    }

    let errors: Vec<String> = flow
        .basic_info()
        .errors()
        .chain(flow.new_template().errors())
        .map(|(_, error)| error.to_string())
        .collect();
    if errors.is_empty() {
        format!("the {} tab is still loading", flow.tab().label())
    } else {
        errors.join("; ")
    }
}
