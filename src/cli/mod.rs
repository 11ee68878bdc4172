//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the oshift binary.

use clap::{Args, Parser, Subcommand};

/// OpenShift broker command-line interface.
#[derive(Parser, Debug)]
#[command(name = "oshift", about = "OpenShift broker CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log requests to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the authenticated user.
    User,

    /// Manage domains.
    #[command(subcommand)]
    Domain(DomainCommand),

    /// Manage applications.
    #[command(subcommand, alias = "application")]
    App(AppCommand),

    /// List the cartridges the broker offers.
    Cartridges,
}

/// Domain subcommands.
#[derive(Subcommand, Debug)]
pub enum DomainCommand {
    /// List the user's domains.
    List,

    /// Show a single domain.
    Show {
        /// Namespace of the domain.
        id: String,
    },

    /// Create a domain.
    Create {
        /// Namespace of the new domain.
        id: String,
    },

    /// Change the namespace of a domain.
    Rename {
        /// Current namespace.
        id: String,

        /// New namespace.
        new_id: String,
    },

    /// Destroy a domain.
    Destroy {
        /// Namespace of the domain.
        id: String,

        /// Also destroy the domain's applications.
        #[arg(long)]
        force: bool,
    },
}

/// Locates an application inside a domain.
#[derive(Args, Debug, Clone)]
pub struct AppTarget {
    /// Namespace of the owning domain.
    #[arg(long, short)]
    pub domain: String,

    /// Application name.
    pub name: String,
}

/// Application subcommands.
#[derive(Subcommand, Debug)]
pub enum AppCommand {
    /// List the applications of a domain.
    List {
        /// Namespace of the domain.
        #[arg(long, short)]
        domain: String,
    },

    /// Show an application with its cartridges.
    Show(AppTarget),

    /// Create an application.
    Create {
        #[command(flatten)]
        target: AppTarget,

        /// Standalone cartridge name (e.g. php-5.4).
        #[arg(long, short)]
        cartridge: String,

        /// Create a scalable application.
        #[arg(long)]
        scale: bool,

        /// Gear profile (e.g. small).
        #[arg(long)]
        gear_profile: Option<String>,

        /// Embedded cartridges to add on creation.
        #[arg(long = "embed", value_delimiter = ',')]
        embed: Vec<String>,
    },

    /// Destroy an application.
    Destroy(AppTarget),

    /// Start an application.
    Start(AppTarget),

    /// Stop an application.
    Stop {
        #[command(flatten)]
        target: AppTarget,

        /// Kill the application's processes.
        #[arg(long)]
        force: bool,
    },

    /// Restart an application.
    Restart(AppTarget),
}
