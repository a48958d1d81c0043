/// Relaygate CLI Tool
///
/// Computes selectors and answers authorization questions against a
/// deployment configuration, replayed on an in-memory host.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relaygate_sdk::{Address, AuthorizationPath, DeploymentConfig, Deployment, MethodRef, Selector};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "relaygate-cli")]
#[command(about = "A command-line interface for relaygate gateways")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the 4-byte selector of each signature
    Selector {
        #[arg(required = true)]
        signatures: Vec<String>,
    },
    /// Report how a call to `method` on `target` would be authorized
    Check {
        /// Deployment configuration (JSON)
        #[arg(long, env = "RELAYGATE_CONFIG")]
        config: PathBuf,
        /// Destination address
        #[arg(long)]
        target: Address,
        /// Signature, hex selector or `receive`
        #[arg(long)]
        method: MethodRef,
        /// Account deploying the contracts
        #[arg(long)]
        deployer: Option<Address>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Selector { signatures } => {
            for signature in signatures {
                println!("{}  {signature}", Selector::from_signature(&signature));
            }
        }
        Commands::Check {
            config,
            target,
            method,
            deployer,
        } => check(&config, target, method, deployer)?,
    }

    Ok(())
}

fn check(path: &Path, target: Address, method: MethodRef, deployer: Option<Address>) -> Result<()> {
    let config = DeploymentConfig::load(path)
        .with_context(|| format!("loading deployment config from {}", path.display()))?;
    let deployer = deployer.unwrap_or_else(|| Address::from_label("deployer"));
    debug!(%deployer, "deploying configuration");

    let deployment = Deployment::deploy(&config, deployer).context("deploying configuration")?;
    let decision = deployment
        .decision(target, method.selector())
        .context("querying the policy store")?;

    println!("gateway:    {}", deployment.gateway.address());
    println!("policy:     {}", deployment.policy.address());
    println!("target:     {target}");
    println!("selector:   {method}");
    match decision.path {
        Some(AuthorizationPath::Target) => println!("authorized: yes (target whitelist)"),
        Some(AuthorizationPath::Method) => println!("authorized: yes (method whitelist)"),
        None => println!("authorized: no"),
    }
    match decision.predicate {
        Some(predicate) => println!("predicate:  {predicate}"),
        None => println!("predicate:  none"),
    }
    Ok(())
}
