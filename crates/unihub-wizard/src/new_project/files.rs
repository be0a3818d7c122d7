use std::collections::BTreeSet;
use std::path::PathBuf;

use unihub_core::file_dir::FileDir;

/// Sub-root the files tab works in when the template has one.
pub const PROJECT_DATA_DIR: &str = "ProjectData~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub is_file: bool,
    pub is_open: bool,
    pub selected: bool,
    pub pinned: bool,
}

/// Selection state over one template file tree.
///
/// `selected` only ever holds ids present in `root`, and every pinned id stays
/// selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    root: Option<FileDir>,
    open_folders: BTreeSet<String>,
    selected: BTreeSet<String>,
    pinned: BTreeSet<String>,
    pinned_paths: Vec<String>,
}

impl FileSelection {
    pub fn new(pinned_paths: Vec<String>) -> Self {
        Self {
            pinned_paths,
            ..Self::default()
        }
    }

    /// Installs a freshly fetched tree: everything selected, folders closed.
    pub fn load(&mut self, root: FileDir) {
        self.selected = root.all_ids().into_iter().collect();
        self.open_folders.clear();
        self.pinned = pinned_ids(&root, &self.pinned_paths);
        self.root = Some(root);
    }

    pub fn reset(&mut self) {
        self.root = None;
        self.open_folders.clear();
        self.selected.clear();
        self.pinned.clear();
    }

    pub fn root(&self) -> Option<&FileDir> {
        self.root.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.root.is_some()
    }

    pub fn working_root(&self) -> Option<&FileDir> {
        let root = self.root.as_ref()?;
        Some(root.find_child_named(PROJECT_DATA_DIR).unwrap_or(root))
    }

    /// Node at a slash-separated path below the working root.
    pub fn find_path(&self, path: &str) -> Option<&FileDir> {
        let mut node = self.working_root()?;
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            node = node.find_child_named(segment)?;
        }
        Some(node)
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open_folders.contains(id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pinned.contains(id)
    }

    pub fn selected_ids(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn pinned_ids(&self) -> &BTreeSet<String> {
        &self.pinned
    }

    pub fn toggle_folder(&mut self, id: &str) {
        let is_folder = self
            .root
            .as_ref()
            .and_then(|root| root.find(id))
            .is_some_and(|node| !node.is_file());
        if !is_folder {
            return;
        }
        if !self.open_folders.remove(id) {
            self.open_folders.insert(id.to_string());
        }
    }

    /// Flips `id` and cascades the new state to every descendant. Pinned ids
    /// are not user-toggleable and always survive a cascade.
    pub fn toggle_selection(&mut self, id: &str) {
        if self.pinned.contains(id) {
            return;
        }
        let Some(node) = self.root.as_ref().and_then(|root| root.find(id)) else {
            return;
        };

        let ids = node.all_ids();
        if self.selected.contains(id) {
            for id in ids {
                if !self.pinned.contains(&id) {
                    self.selected.remove(&id);
                }
            }
        } else {
            self.selected.extend(ids);
        }
    }

    pub fn select_all(&mut self) {
        let Some(ids) = self.working_root().map(FileDir::all_ids) else {
            return;
        };
        self.selected.extend(ids);
    }

    pub fn deselect_all(&mut self) {
        let Some(ids) = self.working_root().map(FileDir::all_ids) else {
            return;
        };
        for id in ids {
            if !self.pinned.contains(&id) {
                self.selected.remove(&id);
            }
        }
    }

    /// Node count of the working root, itself included.
    pub fn total_count(&self) -> usize {
        self.working_root()
            .map(|root| root.descendant_count() + 1)
            .unwrap_or(0)
    }

    pub fn selected_count(&self) -> usize {
        self.working_root()
            .map(|root| {
                root.all_ids()
                    .iter()
                    .filter(|id| self.selected.contains(id.as_str()))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Selected nodes as paths from the tree root (root name included), in
    /// tree order.
    pub fn selected_paths(&self) -> Vec<PathBuf> {
        let Some(root) = &self.root else {
            return Vec::new();
        };
        root.all_ids()
            .iter()
            .filter(|id| self.selected.contains(id.as_str()))
            .filter_map(|id| root.path_of(id))
            .map(PathBuf::from)
            .collect()
    }

    /// Visible rows under the working root. Children of closed folders are
    /// hidden.
    pub fn rows(&self) -> Vec<FileRow> {
        let mut rows = Vec::new();
        if let Some(root) = self.working_root() {
            self.push_rows(root, 0, &mut rows);
        }
        rows
    }

    fn push_rows(&self, node: &FileDir, depth: usize, rows: &mut Vec<FileRow>) {
        let is_open = self.open_folders.contains(&node.id);
        rows.push(FileRow {
            id: node.id.clone(),
            name: node.name.clone(),
            depth,
            is_file: node.is_file(),
            is_open,
            selected: self.selected.contains(&node.id),
            pinned: self.pinned.contains(&node.id),
        });
        if is_open {
            for child in node.children() {
                self.push_rows(child, depth + 1, rows);
            }
        }
    }
}

/// Ids whose root-relative path, each segment followed by `/`, is on the
/// denylist. The root's own name is not part of the path.
fn pinned_ids(root: &FileDir, pinned_paths: &[String]) -> BTreeSet<String> {
    let mut pinned = BTreeSet::new();
    for child in root.children() {
        collect_pinned(child, "", pinned_paths, &mut pinned);
    }
    pinned
}

fn collect_pinned(
    node: &FileDir,
    prefix: &str,
    pinned_paths: &[String],
    pinned: &mut BTreeSet<String>,
) {
    let path = format!("{prefix}{}/", node.name);
    if pinned_paths.iter().any(|pinned_path| *pinned_path == path) {
        pinned.insert(node.id.clone());
    }
    for child in node.children() {
        collect_pinned(child, &path, pinned_paths, pinned);
    }
}
