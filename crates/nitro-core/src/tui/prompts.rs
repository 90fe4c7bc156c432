//! Charm-style CLI prompts using cliclack

use crate::config::Settings;
use crate::product::ProductConfig;
use crate::scaffold::{self, ComponentName, FileKind, PlannedFile, WriteOutcome};
use crate::update::{
    self, reinvoke_self, restart::exit_code, Prompter, RestartFlags, UpdateCoordinator,
    UpdateDecision,
};
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::ffi::OsString;
use std::path::Path;

/// Utilities offered in the task menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Generate React / DatoCMS component files
    Scaffold,
    /// Explain how to add a new utility to this CLI
    AddCommand,
}

impl Task {
    fn label(&self) -> &'static str {
        match self {
            Task::Scaffold => "React Dato component scaffold",
            Task::AddCommand => "Add your own commands",
        }
    }
}

/// CLI arguments for an interactive run
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// This process was started by a successful self-update
    pub updated: bool,

    /// Skip the update check for this run only
    pub skip_update_check: bool,

    /// Task to run instead of showing the task menu
    pub task: Option<Task>,

    /// Component name (PascalCase)
    pub component: Option<String>,

    /// File kinds to generate
    pub files: Option<Vec<String>>,

    /// Overwrite existing files without asking
    pub force: bool,

    /// Non-interactive mode: auto-confirm scaffold prompts, skip the self-update
    pub yes: bool,

    /// Original command-line arguments, replayed on restart
    pub forwarded_args: Vec<OsString>,
}

/// How an interactive run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// Work was handed to a freshly installed process with this exit code
    Restarted(i32),
}

/// Reports update progress through cliclack
///
/// In non-interactive (`--yes`) mode the update consent is declined: a global
/// install is never made without someone answering the prompt.
pub struct CliclackPrompter {
    non_interactive: bool,
    spinner: RefCell<Option<cliclack::ProgressBar>>,
}

impl CliclackPrompter {
    pub fn new(non_interactive: bool) -> Self {
        Self {
            non_interactive,
            spinner: RefCell::new(None),
        }
    }

    /// Show a spinner until the next message or `stop_spinner`
    pub fn start_spinner(&self, message: &str) {
        let spinner = cliclack::spinner();
        spinner.start(message);
        *self.spinner.borrow_mut() = Some(spinner);
    }

    pub fn stop_spinner(&self) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.stop("Update check finished");
        }
    }
}

impl Prompter for CliclackPrompter {
    fn confirm(&self, message: &str) -> bool {
        self.stop_spinner();
        if self.non_interactive {
            let _ = cliclack::log::info("Skipping update (--yes mode)");
            return false;
        }
        cliclack::confirm(message)
            .initial_value(true)
            .interact()
            .unwrap_or(false)
    }

    fn info(&self, message: &str) {
        self.stop_spinner();
        let _ = cliclack::log::info(message);
    }

    fn warning(&self, message: &str) {
        self.stop_spinner();
        let _ = cliclack::log::warning(message);
    }
}

/// Whether this run must skip the update check
///
/// A process started by a restart always skips.
fn should_skip_update(args: &RunArgs, settings: &Settings) -> bool {
    args.updated || args.skip_update_check || !settings.update.enabled
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: RunArgs, cli_version: &str) -> Result<RunOutcome> {
    let project_root = std::env::current_dir().context("Failed to read current directory")?;
    let settings = Settings::load(config, &project_root)?;

    // Step 1: Banner
    cliclack::intro(config.display_name())?;
    if args.updated {
        cliclack::log::info(format!("Running updated package version: {}", cli_version))?;
    } else {
        cliclack::log::success(format!(
            "This is a CLI utility collection used at {} ({}).\nLocally installed package version: {}",
            config.display_name(),
            config.homepage_url(),
            cli_version
        ))?;
    }

    // Step 2: Self-update (the restarted process always skips)
    let skip = should_skip_update(&args, &settings);
    if skip && !args.updated {
        cliclack::log::info("Skipping update check")?;
    }

    let decision = reconcile(config, &settings, &args, skip).await;
    if decision.restart_required() {
        cliclack::outro(format!("Updated. Restarting {}...", config.bin_name()))?;
        let status = reinvoke_self(
            config.bin_name(),
            &args.forwarded_args,
            RestartFlags {
                skip_update_check: true,
            },
        )
        .await
        .with_context(|| {
            format!(
                "Update installed, but the new version could not be started. Run `{}` again.",
                config.bin_name()
            )
        })?;
        return Ok(RunOutcome::Restarted(exit_code(status)));
    }

    // Step 3: Select and run utilities
    for task in select_tasks(&args)? {
        match task {
            Task::Scaffold => scaffold_component(config, &settings, &project_root, &args).await?,
            Task::AddCommand => cliclack::log::success(config.contributing_hint())?,
        }
    }

    cliclack::outro("Happy coding!")?;

    Ok(RunOutcome::Completed)
}

async fn reconcile<C: ProductConfig>(
    config: &C,
    settings: &Settings,
    args: &RunArgs,
    skip: bool,
) -> UpdateDecision {
    let prompter = CliclackPrompter::new(args.yes);

    let oracle = match update::oracle_from_settings(config, settings) {
        Ok(oracle) => oracle,
        Err(_) if skip => return UpdateDecision::Skipped,
        Err(e) => {
            prompter.warning(&format!("Could not check for updates: {}", e));
            return UpdateDecision::NoRemoteVersion;
        }
    };

    if !skip {
        prompter.start_spinner("Checking for package updates...");
    }

    let coordinator = UpdateCoordinator::new(oracle, prompter, config.package_name())
        .with_upgrade_command(config.upgrade_command());
    let decision = coordinator.reconcile(skip).await;
    coordinator.prompter().stop_spinner();

    decision
}

/// Print installed and latest versions without installing anything
pub async fn check_update<C: ProductConfig>(config: &C, cli_version: &str) -> Result<()> {
    let project_root = std::env::current_dir().context("Failed to read current directory")?;
    let settings = Settings::load(config, &project_root)?;

    cliclack::intro(format!("{} update check", config.display_name()))?;
    cliclack::log::info(format!("Running version: {}", cli_version))?;

    let prompter = CliclackPrompter::new(false);
    let oracle = match update::oracle_from_settings(config, &settings) {
        Ok(oracle) => oracle,
        Err(e) => {
            prompter.warning(&format!("Could not check for updates: {}", e));
            cliclack::outro("Update status unknown")?;
            return Ok(());
        }
    };

    prompter.start_spinner("Checking for package updates...");
    let coordinator = UpdateCoordinator::new(oracle, prompter, config.package_name());
    let report = coordinator.check().await;
    coordinator.prompter().stop_spinner();

    let show = |v: &Option<semver::Version>, missing: &str| {
        v.as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| missing.to_string())
    };
    cliclack::log::info(format!(
        "Installed globally: {}",
        show(&report.installed, "not found")
    ))?;
    cliclack::log::info(format!("Latest in registry: {}", show(&report.latest, "unknown")))?;

    if report.update_available() {
        cliclack::log::warning(format!(
            "Update available. Run `{}` to update, or: {}",
            config.bin_name(),
            config.upgrade_command()
        ))?;
    } else {
        cliclack::log::success("No update needed")?;
    }

    cliclack::outro("Done")?;

    Ok(())
}

fn select_tasks(args: &RunArgs) -> Result<Vec<Task>> {
    if let Some(task) = args.task {
        return Ok(vec![task]);
    }
    if args.yes {
        return Ok(vec![Task::Scaffold]);
    }

    let mut multi = cliclack::multiselect("Which CLI utilities would you like to run?")
        .initial_values(vec![Task::Scaffold]);
    for task in [Task::Scaffold, Task::AddCommand] {
        multi = multi.item(task, task.label(), "");
    }

    let tasks: Vec<Task> = multi.required(false).interact()?;
    Ok(tasks)
}

async fn scaffold_component<C: ProductConfig>(
    config: &C,
    settings: &Settings,
    project_root: &Path,
    args: &RunArgs,
) -> Result<()> {
    let kinds = select_file_kinds(args)?;
    if kinds.is_empty() {
        cliclack::log::warning("No component files selected")?;
        return Ok(());
    }

    confirm_paths(config, settings, args)?;

    let name = select_component_name(args)?;
    let planned = scaffold::plan(&name, &kinds, &settings.paths);

    for file in &planned {
        let overwrite = args.force || confirm_overwrite(project_root, file, args)?;

        let outcome = scaffold::write_planned_file(project_root, file, overwrite).await?;
        match outcome {
            WriteOutcome::Created => cliclack::log::success(format!("✅ {}", file.path.display()))?,
            WriteOutcome::Overwritten => {
                cliclack::log::success(format!("✅ {} (overwritten)", file.path.display()))?
            }
            WriteOutcome::Skipped => {
                cliclack::log::warning(format!("Kept existing {}", file.path.display()))?
            }
        }
    }

    Ok(())
}

fn select_file_kinds(args: &RunArgs) -> Result<Vec<FileKind>> {
    if let Some(files) = &args.files {
        let mut kinds = Vec::new();
        for file in files {
            match FileKind::parse(file) {
                Some(kind) if !kinds.contains(&kind) => kinds.push(kind),
                Some(_) => {}
                None => cliclack::log::warning(format!("Unknown file kind: {}", file))?,
            }
        }
        return Ok(kinds);
    }

    if args.yes {
        return Ok(FileKind::ALL.to_vec());
    }

    let mut multi = cliclack::multiselect("Which Dato component files would you like to create?")
        .initial_values(FileKind::ALL.to_vec());
    for kind in FileKind::ALL {
        multi = multi.item(kind, kind.display_name(), kind.slug());
    }

    let kinds: Vec<FileKind> = multi.required(false).interact()?;
    Ok(kinds)
}

fn confirm_paths<C: ProductConfig>(config: &C, settings: &Settings, args: &RunArgs) -> Result<()> {
    if settings.has_custom_paths() {
        let from = settings
            .source_file
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| config.settings_file().to_string());
        cliclack::log::info(format!("Using component paths from {}", from))?;
        return Ok(());
    }

    if args.yes {
        return Ok(());
    }

    let use_defaults: bool = cliclack::confirm("Use default paths for component files?")
        .initial_value(true)
        .interact()?;
    if !use_defaults {
        cliclack::log::warning(format!(
            "Custom file paths are not supported interactively. Set them under `paths:` in {}. Using defaults.",
            config.settings_file()
        ))?;
    }

    Ok(())
}

fn select_component_name(args: &RunArgs) -> Result<ComponentName> {
    if let Some(name) = &args.component {
        let name = ComponentName::parse(name)?;
        cliclack::log::info(format!("Component: {}", name))?;
        return Ok(name);
    }

    let input: String = cliclack::input("Input component name in PascalCase")
        .placeholder("HeroBanner")
        .validate(|input: &String| {
            ComponentName::parse(input)
                .map(|_| ())
                .map_err(|_| "Name not PascalCase. Try again!")
        })
        .interact()?;

    Ok(ComponentName::parse(&input)?)
}

fn confirm_overwrite(project_root: &Path, file: &PlannedFile, args: &RunArgs) -> Result<bool> {
    if !project_root.join(&file.path).exists() {
        return Ok(false);
    }
    if args.yes {
        return Ok(true);
    }

    let overwrite: bool = cliclack::confirm(format!("{} already exists. Overwrite?", file.path.display()))
        .initial_value(false)
        .interact()?;
    Ok(overwrite)
}
