//! partybus-visuals - AI previews and photo checks for party-bus service packages.

mod adapters;
mod cassette;
mod catalogue;
mod cli;
mod config;
mod context;
mod controller;
mod error;
mod gateway;
mod model;
mod output;
mod params;
mod ports;
mod prompt;
#[cfg(test)]
mod testing;

use std::path::Path;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::adapters::live::terminal::{TerminalCredentials, TerminalNotifier};
use crate::catalogue::Catalogue;
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::context::{Mode, ServiceContext};
use crate::controller::{VisualizationController, VisualizeOutcome};
use crate::error::GatewayError;
use crate::gateway::{Gateway, VisualResult};
use crate::output::{read_photo_base64, resolve_output_path, save_artifact};
use crate::params::check_image_shape;
use crate::ports::generative_model::ImageConfig;
use crate::ports::CredentialAuthority;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "partybus_visuals=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), GatewayError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(GatewayError::Config)?;
    debug!(path = %config_path.display(), "config loaded");

    check_image_shape(&config.image.aspect_ratio, &config.image.size)
        .map_err(GatewayError::InvalidArgument)?;

    let mut models = config.model_set();
    if let Command::Visualize { model: Some(name), .. } = &cli.command {
        models.visual.clone_from(name);
    }
    let models = models.resolved().map_err(GatewayError::InvalidArgument)?;
    debug!(?models, "models resolved");

    let catalogue = Catalogue::with_overrides(&config.services);
    let credentials = Arc::new(TerminalCredentials::new(config.gemini_key().is_some()));

    let ServiceContext { model, recording } = ServiceContext::for_mode(&Mode::from_env(), &config)?;
    let gateway = Gateway::new(model)
        .with_models(models)
        .with_image_config(ImageConfig {
            aspect_ratio: config.image.aspect_ratio.clone(),
            image_size: config.image.size.clone(),
        })
        .with_timeout(config.gateway.timeout());

    let result = execute(cli.command, gateway, &catalogue, credentials).await;

    // Finish recording if active
    if let Some(session) = recording {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    result
}

async fn execute(
    command: Command,
    gateway: Gateway,
    catalogue: &Catalogue,
    credentials: Arc<TerminalCredentials>,
) -> Result<(), GatewayError> {
    match command {
        Command::Visualize { service, output, format, .. } => {
            let package = catalogue.get(&service)?;
            let request = package.visual_request()?;
            let controller =
                VisualizationController::new(gateway, credentials, Arc::new(TerminalNotifier));

            match controller.visualize(&package.id, &request).await {
                VisualizeOutcome::Generated(_) => {
                    let shown = controller.display_image(&package.id, &package.image);
                    let path = resolve_output_path(output.as_deref(), &package.id, format);
                    save_artifact(&shown, format, &path)?;
                    eprintln!("Saved: {}", path.display());
                    Ok(())
                }
                VisualizeOutcome::CredentialRejected => Err(GatewayError::CredentialRejected),
                VisualizeOutcome::Failed(kind) => Err(GatewayError::GenerationFailed(format!(
                    "Preview for '{}' failed: {kind}",
                    package.id
                ))),
                VisualizeOutcome::AlreadyInFlight => Err(GatewayError::GenerationFailed(format!(
                    "A preview for '{}' is already being generated",
                    package.id
                ))),
            }
        }
        Command::Analyze { photo } => {
            let image = read_photo_base64(Path::new(&photo))?;
            println!("{}", gateway.analyze_image(&image).await);
            Ok(())
        }
        Command::Validate { photo } => {
            let image = read_photo_base64(Path::new(&photo))?;
            let verdict = if gateway.validate_photo(&image).await { "accepted" } else { "rejected" };
            println!("{verdict}");
            Ok(())
        }
        Command::Edit { photo, instruction, output, format } => {
            if instruction.trim().is_empty() {
                return Err(GatewayError::InvalidArgument("instruction must not be empty".into()));
            }
            let image = read_photo_base64(Path::new(&photo))?;
            if !credentials.has_selected_credential() {
                credentials.open_credential_selector();
            }

            match gateway.edit_photo(&image, &instruction).await {
                VisualResult::ImageArtifact(uri) => {
                    let path = resolve_output_path(output.as_deref(), &instruction, format);
                    save_artifact(&uri, format, &path)?;
                    eprintln!("Saved: {}", path.display());
                    Ok(())
                }
                VisualResult::CredentialError => {
                    credentials.open_credential_selector();
                    Err(GatewayError::CredentialRejected)
                }
                VisualResult::Failure(kind) => {
                    Err(GatewayError::GenerationFailed(format!("Photo edit failed: {kind}")))
                }
            }
        }
        Command::Services => {
            for package in catalogue.iter() {
                println!("{:<14} {:<34} {}", package.id, package.title, package.image);
            }
            Ok(())
        }
    }
}
