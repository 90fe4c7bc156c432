//! Nitro Core - shared library behind the `nitro-cli` binary
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - version queries against npm and the
//!   registry, component templates, file writes
//! - **Layer 2: Orchestration** - `ProductConfig`, `Settings` and the
//!   `UpdateCoordinator` that decides whether to self-update and restart
//! - **Layer 3: CLI/TUI Interface** - cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based interactive flow
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use nitro_core::update::{NpmOracle, UpdateCoordinator};
//!
//! let coordinator = UpdateCoordinator::new(NpmOracle::new(), my_prompter, "nitro-cli");
//! let decision = coordinator.reconcile(args.updated).await;
//! if decision.restart_required() {
//!     // re-invoke with --updated and exit
//! }
//! ```

pub mod config;
pub mod product;
pub mod scaffold;
pub mod update;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::Settings;
pub use product::ProductConfig;
pub use scaffold::{ComponentName, FileKind};
pub use update::{UpdateCoordinator, UpdateDecision, VersionOracle};

#[cfg(feature = "tui")]
pub use tui::run;
