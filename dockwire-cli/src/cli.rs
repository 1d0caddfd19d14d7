//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dockwire_engine::PortBinding;

/// dockwire -- thin client for the Docker Engine HTTP API.
///
/// Use `dockwire <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "dockwire", version, about, long_about = None)]
pub struct Cli {
    /// Path to the dockwire.toml configuration file.
    #[arg(short, long, default_value = "dockwire.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage containers.
    Container(ContainerArgs),

    /// Manage named volumes.
    Volume(VolumeArgs),

    /// Manage images.
    Image(ImageArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- container ----

#[derive(Args, Debug)]
pub struct ContainerArgs {
    #[command(subcommand)]
    pub action: ContainerAction,
}

#[derive(Subcommand, Debug)]
pub enum ContainerAction {
    /// Create a container (does not start it).
    Create(CreateContainerArgs),
    /// List containers.
    List {
        /// Include stopped containers.
        #[arg(short, long)]
        all: bool,
        /// Show only the N most recently created containers.
        #[arg(long)]
        limit: Option<u32>,
        /// Include size information.
        #[arg(short, long)]
        size: bool,
        /// JSON-encoded filters, e.g. '{"status":["running"]}'.
        #[arg(long)]
        filters: Option<String>,
    },
    /// Show low-level information about a container.
    Inspect { id: String },
    /// Start a container.
    Start { id: String },
    /// Stop a container.
    Stop { id: String },
    /// Restart a container.
    Restart { id: String },
    /// Kill a container.
    Kill { id: String },
    /// Pause all processes in a container.
    Pause { id: String },
    /// Resume a paused container.
    Unpause { id: String },
    /// Rename a container.
    Rename { id: String, name: String },
    /// List processes running inside a container.
    Top {
        id: String,
        /// Arguments passed to ps.
        #[arg(long, default_value = "-ef", allow_hyphen_values = true)]
        ps_args: String,
    },
    /// Print container logs.
    Logs {
        id: String,
        /// Number of lines from the end, or "all".
        #[arg(long, default_value = "all")]
        tail: String,
        /// Prefix each line with its timestamp.
        #[arg(short, long)]
        timestamps: bool,
        /// Include stderr.
        #[arg(long)]
        stderr: bool,
    },
    /// Show a single resource usage snapshot.
    Stats { id: String },
    /// Resize the container TTY.
    Resize {
        id: String,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
    },
    /// Remove a container.
    Rm {
        id: String,
        /// Remove anonymous volumes too.
        #[arg(short, long)]
        volumes: bool,
        /// Kill the container first if it is running.
        #[arg(short, long)]
        force: bool,
    },
}

/// Create a container from an image.
#[derive(Args, Debug)]
pub struct CreateContainerArgs {
    /// Container name.
    pub name: String,

    /// Image reference, e.g. ubuntu:latest.
    #[arg(long)]
    pub image: String,

    /// Environment variable (KEY=VALUE), repeatable.
    #[arg(short, long = "env", value_parser = parse_key_val)]
    pub env: Vec<(String, String)>,

    /// Published port ([IP:]HOST:CONTAINER[/tcp|udp]), repeatable.
    #[arg(short, long = "port")]
    pub port: Vec<PortBinding>,

    /// Named volume mount (VOLUME:/container/path), repeatable.
    #[arg(short, long = "volume", value_parser = parse_volume)]
    pub volume: Vec<(String, String)>,

    /// Label (KEY=VALUE), repeatable.
    #[arg(short, long = "label", value_parser = parse_key_val)]
    pub label: Vec<(String, String)>,

    /// Command argument, repeatable (default: /bin/sh).
    #[arg(long = "cmd", allow_hyphen_values = true)]
    pub cmd: Vec<String>,

    /// Allocate a pseudo-TTY.
    #[arg(short, long)]
    pub tty: bool,

    /// Working directory inside the container.
    #[arg(short, long)]
    pub workdir: Option<String>,
}

// ---- volume ----

#[derive(Args, Debug)]
pub struct VolumeArgs {
    #[command(subcommand)]
    pub action: VolumeAction,
}

#[derive(Subcommand, Debug)]
pub enum VolumeAction {
    /// Create a named volume.
    Create {
        name: String,
        /// Volume driver.
        #[arg(short, long, default_value = "local")]
        driver: String,
        /// Label (KEY=VALUE), repeatable.
        #[arg(short, long = "label", value_parser = parse_key_val)]
        label: Vec<(String, String)>,
    },
    /// List volumes.
    List,
    /// Show low-level information about a volume.
    Inspect { name: String },
    /// Remove a volume.
    Rm {
        name: String,
        /// Remove even if in use.
        #[arg(short, long)]
        force: bool,
    },
}

// ---- image ----

#[derive(Args, Debug)]
pub struct ImageArgs {
    #[command(subcommand)]
    pub action: ImageAction,
}

#[derive(Subcommand, Debug)]
pub enum ImageAction {
    /// Pull an image from a registry.
    Pull { reference: String },
    /// List images.
    List {
        /// Include intermediate images.
        #[arg(short, long)]
        all: bool,
    },
    /// Show low-level information about an image.
    Inspect { reference: String },
    /// Remove an image.
    Rm {
        reference: String,
        /// Remove even if tagged in multiple repositories or in use.
        #[arg(short, long)]
        force: bool,
        /// Keep untagged parent images.
        #[arg(long)]
        no_prune: bool,
    },
}

// ---- config ----

/// Manage dockwire configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, docker).
        #[arg(long)]
        section: Option<String>,
    },
}

/// Parses `KEY=VALUE`.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{s}'"))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{s}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

/// Parses `VOLUME:/container/path`.
fn parse_volume(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((volume, path)) if !volume.is_empty() && path.starts_with('/') => {
            Ok((volume.to_owned(), path.to_owned()))
        }
        _ => Err(format!(
            "invalid volume mount '{s}': expected VOLUME:/container/path"
        )),
    }
}
