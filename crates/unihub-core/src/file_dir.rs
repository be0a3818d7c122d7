use serde::{Deserialize, Serialize};

/// One node of a template's file listing.
///
/// `id` is stable and independent of `name`; selection and open-state are
/// keyed on it. Ids are unique across a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDir {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub children: Option<Vec<FileDir>>,
}

impl FileDir {
    pub fn folder(id: impl Into<String>, name: impl Into<String>, children: Vec<FileDir>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Some(children),
        }
    }

    pub fn file(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Some(Vec::new()),
        }
    }

    /// A leaf with an empty child list and a dotted name. Everything else,
    /// including an empty `Assets` directory, is a folder.
    pub fn is_file(&self) -> bool {
        matches!(&self.children, Some(children) if children.is_empty()) && self.name.contains('.')
    }

    pub fn children(&self) -> &[FileDir] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn find(&self, id: &str) -> Option<&FileDir> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    pub fn find_child_named(&self, name: &str) -> Option<&FileDir> {
        self.children().iter().find(|child| child.name == name)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Ids of this node and every descendant, depth-first.
    pub fn all_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<String>) {
        ids.push(self.id.clone());
        for child in self.children() {
            child.collect_ids(ids);
        }
    }

    pub fn descendant_count(&self) -> usize {
        self.children()
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Slash-joined path of `id` from this node, including this node's name.
    pub fn path_of(&self, id: &str) -> Option<String> {
        if self.id == id {
            return Some(self.name.clone());
        }
        self.children().iter().find_map(|child| {
            child
                .path_of(id)
                .map(|rest| format!("{}/{rest}", self.name))
        })
    }
}
