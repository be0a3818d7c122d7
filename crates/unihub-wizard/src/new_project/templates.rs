use std::str::FromStr;

use anyhow::{Error, bail};
use unihub_core::template::SurfaceTemplate;

pub const TEMPLATE_ID_PREFIX: &str = "com.unity.template.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateCategory {
    Core,
    Sample,
    Learning,
    Custom,
}

impl TemplateCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Core => "Core",
            Self::Sample => "Sample",
            Self::Learning => "Learning",
            Self::Custom => "Custom",
        }
    }
}

impl FromStr for TemplateCategory {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "core" => Ok(Self::Core),
            "sample" => Ok(Self::Sample),
            "learning" => Ok(Self::Learning),
            "custom" => Ok(Self::Custom),
            other => bail!("unknown template category '{other}' (expected core, sample, learning or custom)"),
        }
    }
}

/// Display names for the templates editors ship with, keyed by the id
/// suffix after [`TEMPLATE_ID_PREFIX`].
pub const KNOWN_TEMPLATES: &[(&str, &str, TemplateCategory)] = &[
    ("2d", "2D (Built-in Render Pipeline)", TemplateCategory::Core),
    ("2d-cross-platform", "Universal 2D (URP)", TemplateCategory::Core),
    ("3d", "3D (Built-in Render Pipeline)", TemplateCategory::Core),
    ("3d-cross-platform", "Universal 3D (URP)", TemplateCategory::Core),
    ("universal-2d", "Universal 2D (URP)", TemplateCategory::Core),
    ("urp-blank", "Universal 3D (URP)", TemplateCategory::Core),
    ("hdrp-blank", "High Definition 3D (HDRP)", TemplateCategory::Core),
    ("3d-high-end", "High Definition 3D (HDRP)", TemplateCategory::Core),
    ("mobile3d", "3D Mobile", TemplateCategory::Core),
    ("mobile2d", "2D Mobile", TemplateCategory::Core),
    ("mixed-reality", "Mixed Reality", TemplateCategory::Core),
    ("vr", "VR", TemplateCategory::Core),
    ("ar-mobile", "AR Mobile", TemplateCategory::Core),
    ("multiplayer-ngo", "Small Scale Competitive Multiplayer", TemplateCategory::Core),
    ("urp-sample", "Universal 3D (URP) Sample", TemplateCategory::Sample),
    ("hd", "High Definition (HDRP) 3D Sample", TemplateCategory::Sample),
    ("vr-multiplayer", "VR Multiplayer", TemplateCategory::Sample),
    ("cinematic-studio-sample", "Cinematic Studio", TemplateCategory::Sample),
    ("platformer", "2D Platformer Microgame", TemplateCategory::Learning),
    ("fps", "FPS Microgame", TemplateCategory::Learning),
];

fn known_template(id: &str) -> Option<(&'static str, TemplateCategory)> {
    let suffix = id.strip_prefix(TEMPLATE_ID_PREFIX)?;
    KNOWN_TEMPLATES
        .iter()
        .find(|(known, _, _)| *known == suffix)
        .map(|(_, name, category)| (*name, *category))
}

pub fn category_of(template: &SurfaceTemplate) -> TemplateCategory {
    known_template(template.id())
        .map(|(_, category)| category)
        .unwrap_or(TemplateCategory::Custom)
}

pub fn is_custom(template: &SurfaceTemplate) -> bool {
    category_of(template) == TemplateCategory::Custom
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRow {
    pub template: SurfaceTemplate,
    /// Friendly name for known templates, the id otherwise.
    pub display_name: String,
    pub category: TemplateCategory,
}

impl TemplateRow {
    pub fn from_template(template: &SurfaceTemplate) -> Self {
        let (display_name, category) = match known_template(template.id()) {
            Some((name, category)) => (name.to_string(), category),
            None => (template.id().to_string(), TemplateCategory::Custom),
        };
        Self {
            template: template.clone(),
            display_name,
            category,
        }
    }
}

/// Filter state of the template picker. `category: None` means all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateView {
    pub category: Option<TemplateCategory>,
    pub query: String,
}

impl TemplateView {
    pub fn rows(&self, templates: &[SurfaceTemplate]) -> Vec<TemplateRow> {
        let query = self.query.to_lowercase();
        let mut rows: Vec<TemplateRow> = templates
            .iter()
            .map(TemplateRow::from_template)
            .filter(|row| row.display_name.to_lowercase().contains(&query))
            .filter(|row| self.category.is_none_or(|category| row.category == category))
            .collect();

        rows.sort_by(|left, right| {
            let left_custom = left.category == TemplateCategory::Custom;
            let right_custom = right.category == TemplateCategory::Custom;
            left_custom
                .cmp(&right_custom)
                .then_with(|| left.display_name.to_lowercase().cmp(&right.display_name.to_lowercase()))
        });
        rows
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use unihub_core::template::SurfaceTemplate;

    use super::{TemplateCategory, TemplateView, category_of, is_custom};

    fn template(id: &str) -> SurfaceTemplate {
        SurfaceTemplate {
            name: id.to_string(),
            version: "1.0.0".to_string(),
            path: PathBuf::from(format!("/templates/{id}.tgz")),
            editor_version: "2022.3.40f1".to_string(),
        }
    }

    fn catalog() -> Vec<SurfaceTemplate> {
        vec![
            template("com.studio.arena"),
            template("com.unity.template.vr"),
            template("com.unity.template.fps"),
            template("com.unity.template.3d"),
            template("com.unity.template.hd"),
        ]
    }

    #[test]
    fn classifies_known_ids_and_falls_back_to_custom() {
        assert_eq!(category_of(&template("com.unity.template.urp-blank")), TemplateCategory::Core);
        assert_eq!(category_of(&template("com.unity.template.platformer")), TemplateCategory::Learning);
        assert!(is_custom(&template("com.unity.template.unknown")));
        assert!(is_custom(&template("vr")));
    }

    #[test]
    fn sorts_alphabetically_with_custom_last() {
        let names: Vec<String> = TemplateView::default()
            .rows(&catalog())
            .into_iter()
            .map(|row| row.display_name)
            .collect();

        assert_eq!(
            names,
            vec![
                "3D (Built-in Render Pipeline)",
                "FPS Microgame",
                "High Definition (HDRP) 3D Sample",
                "VR",
                "com.studio.arena",
            ]
        );
    }

    #[test]
    fn filters_by_category_and_query() {
        let view = TemplateView {
            category: Some(TemplateCategory::Core),
            query: "vr".to_string(),
        };
        let rows = view.rows(&catalog());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].template.id(), "com.unity.template.vr");

        let custom = TemplateView {
            category: Some(TemplateCategory::Custom),
            query: "ARENA".to_string(),
        };
        assert_eq!(custom.rows(&catalog()).len(), 1);
    }

    #[test]
    fn parses_category_names() {
        assert_eq!("learning".parse::<TemplateCategory>().expect("parse"), TemplateCategory::Learning);
        assert!("misc".parse::<TemplateCategory>().is_err());
    }
}
