use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    pub version: String,
    #[serde(default)]
    pub is_pinned: bool,
    pub added_at: Option<i64>,
    pub last_opened_at: Option<i64>,
}

pub const BUTTONS_EACH_SIDE: usize = 2;

/// Page count for a project list.
///
/// This floors, so a trailing partial page is not counted: 25 projects at 10
/// per page gives 2 pages and the last 5 projects are unreachable. The project
/// list has always behaved this way.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total / per_page
}

/// Items on page `index`, or `None` when the index is outside `page_count`.
pub fn page<T>(items: &[T], index: usize, per_page: usize) -> Option<&[T]> {
    if index >= page_count(items.len(), per_page) {
        return None;
    }
    let start = index * per_page;
    let end = (start + per_page).min(items.len());
    Some(&items[start..end])
}

/// Page numbers shown between the always-visible first and last buttons,
/// padded so the window keeps its width near either end.
pub fn page_numbers_around(current: usize, count: usize) -> Vec<usize> {
    if count < 3 {
        return Vec::new();
    }

    let current = current as i64;
    let last = count as i64 - 1;
    let each_side = BUTTONS_EACH_SIDE as i64;

    let mut start = current - each_side;
    let mut end = current + each_side;

    if start <= 0 {
        end += (-(start - 1)).max(0);
    }
    if end >= last {
        start -= (end - (last - 1)).max(0);
    }

    let start = start.max(0);
    let end = end.min(last);

    (start..=end)
        .filter(|page| *page != 0 && *page != last)
        .map(|page| page as usize)
        .collect()
}

pub fn filter_by_name<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let needle = query.trim().to_lowercase();
    projects
        .iter()
        .filter(|project| project.name.to_lowercase().contains(&needle))
        .collect()
}
