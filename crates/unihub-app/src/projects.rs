use anyhow::{Context, Result, bail};
use unihub_core::project::{self, Project};

use crate::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPage {
    pub projects: Vec<Project>,
    pub index: usize,
    pub page_count: usize,
    /// Page numbers to offer between the first and last page.
    pub nearby_pages: Vec<usize>,
    pub total: usize,
}

impl<'a> App<'a> {
    pub fn projects(&self, query: Option<&str>) -> Result<Vec<Project>> {
        let mut projects = self
            .backend
            .projects()
            .context("failed to load projects")?;

        if let Some(query) = query {
            projects = project::filter_by_name(&projects, query)
                .into_iter()
                .cloned()
                .collect();
        }

        // Pinned first, then most recently opened.
        projects.sort_by(|left, right| {
            right
                .is_pinned
                .cmp(&left.is_pinned)
                .then_with(|| right.last_opened_at.cmp(&left.last_opened_at))
        });
        Ok(projects)
    }

    pub fn projects_page(
        &self,
        query: Option<&str>,
        index: usize,
        per_page: usize,
    ) -> Result<ProjectPage> {
        let projects = self.projects(query)?;
        let page_count = project::page_count(projects.len(), per_page);

        let Some(rows) = project::page(&projects, index, per_page) else {
            bail!(
                "page {} is out of range ({page_count} pages of {per_page})",
                index + 1
            );
        };

        Ok(ProjectPage {
            projects: rows.to_vec(),
            index,
            page_count,
            nearby_pages: project::page_numbers_around(index, page_count),
            total: projects.len(),
        })
    }
}
