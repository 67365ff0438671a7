// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the cleanup subcommands and the flags shared by all of them.

use clap::{Parser, Subcommand};
use docker_tidy::cleanup::{ResourceKind, Target};

#[derive(Parser)]
#[command(name = "docker-tidy")]
#[command(about = "Remove unused Docker and Podman resources")]
#[command(version)]
pub struct Cli {
    /// Show what would be removed without removing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Only prune images and build cache older than this many days (0 disables)
    #[arg(long, global = true, value_name = "DAYS", default_value_t = 0)]
    pub older_than: u32,

    /// Print disk usage before each cleanup step
    #[arg(long, global = true)]
    pub show_size: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Copy)]
pub enum Commands {
    /// Remove stopped containers
    Containers,

    /// Remove images no container uses
    Images,

    /// Remove dangling images
    DanglingImages,

    /// Remove volumes no container mounts
    Volumes,

    /// Remove networks no container is attached to
    Networks,

    /// Remove unused build cache
    Builds,

    /// Run every cleanup step in order
    All,
}

impl Commands {
    pub fn target(self) -> Target {
        match self {
            Commands::Containers => Target::Only(ResourceKind::Containers),
            Commands::Images => Target::Only(ResourceKind::Images),
            Commands::DanglingImages => Target::Only(ResourceKind::DanglingImages),
            Commands::Volumes => Target::Only(ResourceKind::Volumes),
            Commands::Networks => Target::Only(ResourceKind::Networks),
            Commands::Builds => Target::Only(ResourceKind::BuildCache),
            Commands::All => Target::All,
        }
    }
}
