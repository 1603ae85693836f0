//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};

use crate::params::OutputFormat;

/// AI previews and photo checks for party-bus service packages.
#[derive(Parser, Debug)]
#[command(name = "partybus-visuals", version, about)]
pub struct Cli {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a preview image for a service package.
    Visualize {
        /// Service package id (see `services`).
        service: String,

        /// Output file path (auto-generated if not specified).
        #[arg(short, long)]
        output: Option<String>,

        /// Output format: jpeg, png, webp.
        #[arg(short, long, default_value = "png")]
        format: OutputFormat,

        /// Model name or alias, overriding the configured visual model.
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Recommend a package for the group in a photo.
    Analyze {
        /// Path to the group photo.
        photo: String,
    },

    /// Check whether a photo fits the community gallery.
    Validate {
        /// Path to the photo.
        photo: String,
    },

    /// Restyle a party photo.
    Edit {
        /// Path to the photo.
        photo: String,

        /// What to change.
        instruction: String,

        /// Output file path (auto-generated if not specified).
        #[arg(short, long)]
        output: Option<String>,

        /// Output format: jpeg, png, webp.
        #[arg(short, long, default_value = "png")]
        format: OutputFormat,
    },

    /// List the service packages that can be visualized.
    Services,
}
