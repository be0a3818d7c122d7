use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "unihub")]
#[command(bin_name = "unihub")]
#[command(version)]
#[command(about = "Browse editor installs and projects, and create projects from templates")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "List installed editors")]
    Editors,
    #[command(about = "List project templates for an editor")]
    Templates(TemplatesArgs),
    #[command(about = "List the packages a new project can pick from")]
    Packages(PackagesArgs),
    #[command(about = "List known projects, one page at a time")]
    Projects(ProjectsArgs),
    #[command(about = "Create a new project from a template")]
    New(NewArgs),
    #[command(about = "Delete a custom template")]
    DeleteTemplate(DeleteTemplateArgs),
}

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    /// Editor version; defaults to the last used editor.
    #[arg(long)]
    pub editor: Option<String>,
    /// One of core, sample, learning, custom.
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Debug, Args)]
pub struct PackagesArgs {
    #[arg(long)]
    pub editor: Option<String>,
    /// Template id; its own dependencies show as "in package".
    #[arg(long)]
    pub template: Option<String>,
    /// One of all, in-package, default, internal, git, local.
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProjectsArgs {
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Debug, Args)]
pub struct NewArgs {
    #[arg(long)]
    pub name: String,
    /// Parent directory; defaults to the configured project location.
    #[arg(long)]
    pub path: Option<PathBuf>,
    #[arg(long)]
    pub editor: Option<String>,
    /// Template id. Without it the project starts empty.
    #[arg(long)]
    pub template: Option<String>,
    /// Package to add; repeatable.
    #[arg(long = "package")]
    pub packages: Vec<String>,
    /// Template path (below ProjectData~) to leave out; repeatable.
    #[arg(long = "exclude")]
    pub excludes: Vec<String>,
    /// Save the selection as a template with this name instead of creating a
    /// project.
    #[arg(long)]
    pub save_template: Option<String>,
    #[arg(long, requires = "save_template")]
    pub display_name: Option<String>,
    #[arg(long, requires = "save_template")]
    pub template_version: Option<String>,
    #[arg(long, requires = "save_template")]
    pub description: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteTemplateArgs {
    pub id: String,
    #[arg(long)]
    pub editor: Option<String>,
}
