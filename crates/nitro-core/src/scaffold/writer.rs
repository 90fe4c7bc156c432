//! Writing planned files under the project root

use super::PlannedFile;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// What happened to one planned file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
    /// The file existed and overwriting was not allowed
    Skipped,
}

/// Write `file` below `root`, creating parent directories as needed
pub async fn write_planned_file(root: &Path, file: &PlannedFile, overwrite: bool) -> Result<WriteOutcome> {
    let target_path = root.join(&file.path);
    let existed = fs::try_exists(&target_path).await.unwrap_or(false);

    if existed && !overwrite {
        return Ok(WriteOutcome::Skipped);
    }

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(&target_path, &file.contents)
        .await
        .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

    Ok(if existed {
        WriteOutcome::Overwritten
    } else {
        WriteOutcome::Created
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathSettings;
    use crate::scaffold::{plan, ComponentName, FileKind};
    use std::path::PathBuf;

    fn planned(kind: FileKind) -> PlannedFile {
        let name = ComponentName::parse("Card").unwrap();
        plan(&name, &[kind], &PathSettings::default()).remove(0)
    }

    #[tokio::test]
    async fn test_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = planned(FileKind::StorybookStory);

        let outcome = write_planned_file(dir.path(), &file, false).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Created);

        let written = std::fs::read_to_string(
            dir.path().join("src/components/ui/Card/stories/Card.stories.tsx"),
        )
        .unwrap();
        assert_eq!(written, file.contents);
    }

    #[tokio::test]
    async fn test_existing_file_skipped_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let file = planned(FileKind::GraphqlFragment);
        let target = dir.path().join(&file.path);
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, "hand edited").unwrap();

        let outcome = write_planned_file(dir.path(), &file, false).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "hand edited");

        let outcome = write_planned_file(dir.path(), &file, true).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Overwritten);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), file.contents);
    }

    #[tokio::test]
    async fn test_unwritable_location_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected
        std::fs::write(dir.path().join("src"), "not a directory").unwrap();

        let file = PlannedFile {
            kind: FileKind::UiComponent,
            path: PathBuf::from("src/components/ui/Card/Card.tsx"),
            contents: String::new(),
        };
        let err = write_planned_file(dir.path(), &file, false).await.unwrap_err();
        assert!(err.to_string().contains("Failed to create directory"));
    }
}
