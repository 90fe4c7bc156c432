//! Component scaffolding
//!
//! This module provides:
//! - Component name validation (`ComponentName`)
//! - The file kinds that can be generated (`FileKind`)
//! - Output path layout and the per-file plan (`plan`)
//! - String templates (`templates`) and the file writer (`writer`)

pub mod templates;
pub mod writer;

use crate::config::PathSettings;
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;
use thiserror::Error;

pub use templates::TemplateFlags;
pub use writer::{write_planned_file, WriteOutcome};

static PASCAL_CASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z]*$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not PascalCase (letters only, starting with an uppercase letter)")]
pub struct InvalidComponentName(pub String);

/// A validated PascalCase component name, e.g. `HeroBanner`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentName(String);

impl ComponentName {
    pub fn parse(input: &str) -> Result<Self, InvalidComponentName> {
        let trimmed = input.trim();
        if PASCAL_CASE.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(InvalidComponentName(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name with its first letter lower-cased (`HeroBanner` -> `heroBanner`)
    pub fn lower_first(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kinds of files the scaffold can generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    DatoBlock,
    UiComponent,
    CssModule,
    GraphqlFragment,
    StorybookStory,
}

impl FileKind {
    /// All kinds, in prompt order
    pub const ALL: [FileKind; 5] = [
        FileKind::DatoBlock,
        FileKind::UiComponent,
        FileKind::CssModule,
        FileKind::GraphqlFragment,
        FileKind::StorybookStory,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            FileKind::DatoBlock => "Dato block",
            FileKind::UiComponent => "UI component",
            FileKind::CssModule => "CSS module",
            FileKind::GraphqlFragment => "GraphQL fragment",
            FileKind::StorybookStory => "Storybook story",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            FileKind::DatoBlock => "dato-block",
            FileKind::UiComponent => "ui-component",
            FileKind::CssModule => "css-module",
            FileKind::GraphqlFragment => "graphql-fragment",
            FileKind::StorybookStory => "storybook-story",
        }
    }

    /// Parse a slug or short alias (`block`, `ui`, `css`, `fragment`, `story`)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dato-block" | "block" | "dato" => Some(FileKind::DatoBlock),
            "ui-component" | "ui" | "component" => Some(FileKind::UiComponent),
            "css-module" | "css" => Some(FileKind::CssModule),
            "graphql-fragment" | "fragment" | "graphql" | "gql" => {
                Some(FileKind::GraphqlFragment)
            }
            "storybook-story" | "story" | "stories" => Some(FileKind::StorybookStory),
            _ => None,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A file ready to be written, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub kind: FileKind,
    pub path: PathBuf,
    pub contents: String,
}

/// Relative output path for one kind of file
pub fn output_path(kind: FileKind, name: &ComponentName, paths: &PathSettings) -> PathBuf {
    let component_dir = paths.ui.join(name.as_str());

    match kind {
        FileKind::DatoBlock => {
            let block = format!("DatoBlock{}", name);
            paths.blocks.join(&block).join(format!("{}.tsx", block))
        }
        FileKind::UiComponent => component_dir.join(format!("{}.tsx", name)),
        FileKind::CssModule => component_dir.join(format!("{}.module.css", name.lower_first())),
        FileKind::GraphqlFragment => paths.fragments.join(format!("{}.fragment.graphql", name)),
        FileKind::StorybookStory => component_dir
            .join("stories")
            .join(format!("{}.stories.tsx", name)),
    }
}

/// Render every selected kind, in selection order, without duplicates
pub fn plan(name: &ComponentName, kinds: &[FileKind], paths: &PathSettings) -> Vec<PlannedFile> {
    let flags = TemplateFlags {
        has_css_module: kinds.contains(&FileKind::CssModule),
    };

    let mut planned: Vec<PlannedFile> = Vec::new();
    for &kind in kinds {
        if planned.iter().any(|p| p.kind == kind) {
            continue;
        }
        planned.push(PlannedFile {
            kind,
            path: output_path(kind, name, paths),
            contents: templates::render(kind, name, flags),
        });
    }
    planned
}
