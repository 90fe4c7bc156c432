//! Nitro CLI - utility collection for scaffolding React / DatoCMS components

use anyhow::Result;
use clap::{Parser, Subcommand};
use nitro_core::tui::{RunArgs, RunOutcome, Task};
use nitro_core::ProductConfig;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nitro product configuration
#[derive(Clone)]
pub struct NitroConfig;

impl ProductConfig for NitroConfig {
    fn name(&self) -> &'static str {
        "nitro"
    }

    fn display_name(&self) -> &'static str {
        "Nitro"
    }

    fn package_name(&self) -> &'static str {
        "nitro-cli"
    }

    fn bin_name(&self) -> &'static str {
        "nitro-cli"
    }

    fn default_registry_url(&self) -> &'static str {
        "https://registry.npmjs.org"
    }

    fn registry_url_env(&self) -> &'static str {
        "NITRO_REGISTRY_URL"
    }

    fn settings_file(&self) -> &'static str {
        "nitro.yaml"
    }

    fn homepage_url(&self) -> &'static str {
        "https://nitro.fi"
    }

    fn contributing_hint(&self) -> &'static str {
        "Follow the collaboration guide in README.md"
    }

    fn upgrade_command(&self) -> &'static str {
        "npm install -g nitro-cli@latest"
    }
}

#[derive(Parser, Debug)]
#[command(name = "nitro-cli")]
#[command(about = "CLI utility collection for scaffolding React and DatoCMS components")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Marks a run started by a successful self-update; skips the update check
    #[arg(long, global = true)]
    pub updated: bool,

    /// Skip the update check for this run
    #[arg(long = "no-update-check", global = true)]
    pub no_update_check: bool,

    /// Non-interactive mode: auto-confirm scaffold prompts, skip the self-update
    #[arg(short, long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scaffold React / DatoCMS component files
    Scaffold(ScaffoldArgs),
    /// Show installed and latest versions without updating
    CheckUpdate,
}

#[derive(Parser, Debug)]
pub struct ScaffoldArgs {
    /// Component name in PascalCase
    #[arg(short, long)]
    pub name: Option<String>,

    /// Files to create (comma-separated: dato-block,ui-component,css-module,graphql-fragment,storybook-story)
    #[arg(short, long, value_delimiter = ',')]
    pub files: Option<Vec<String>>,

    /// Overwrite existing files without asking
    #[arg(long)]
    pub force: bool,
}

impl Args {
    fn into_run_args(self, forwarded_args: Vec<std::ffi::OsString>) -> RunArgs {
        let mut run_args = RunArgs {
            updated: self.updated,
            skip_update_check: self.no_update_check,
            yes: self.yes,
            forwarded_args,
            ..RunArgs::default()
        };

        if let Some(Command::Scaffold(scaffold)) = self.command {
            run_args.task = Some(Task::Scaffold);
            run_args.component = scaffold.name;
            run_args.files = scaffold.files;
            run_args.force = scaffold.force;
        }

        run_args
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = NitroConfig;

    if let Some(Command::CheckUpdate) = args.command {
        let result = nitro_core::tui::check_update(&config, CLI_VERSION).await;
        let _ = console::Term::stderr().show_cursor();
        return result;
    }

    let forwarded_args: Vec<_> = std::env::args_os().skip(1).collect();
    let result = nitro_core::run(&config, args.into_run_args(forwarded_args), CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result? {
        RunOutcome::Completed => Ok(()),
        // The restarted process did the work; mirror its exit status
        RunOutcome::Restarted(code) => std::process::exit(code),
    }
}
