use anyhow::Context;
use clap::Parser;
use generator::profile::generate_profile;
use gui_bridge::bridge::GuiBridge;
use log::info;
use smpcore::profile::Profile;
use smpcore::sidebar::{DetectKind, PanelCommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::controller::Controller;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Snow micropenetrometer profile workbench")]
struct Args {
    /// Open a profile stored as JSON
    #[arg(long)]
    profile: Option<PathBuf>,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Generate a synthetic recording instead of loading one
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    /// Seed for the synthetic recording
    #[arg(long)]
    seed: Option<u64>,
    /// Re-detect surface and ground after opening
    #[arg(long, default_value_t = false)]
    detect: bool,
    /// Print the sidebar once and exit
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Write the profile, including edits, back as JSON
    #[arg(long)]
    save: Option<PathBuf>,
    /// Keep the HTTP sidebar bridge alive for incoming edits
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Address for the sidebar bridge
    #[arg(long)]
    bind: Option<SocketAddr>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    };
    if let Some(seed) = args.seed {
        workflow_config.generator.seed = seed;
    }
    if let Some(address) = args.bind {
        workflow_config.bridge_address = address;
    }

    let profile = match (&args.profile, args.synthetic) {
        (Some(path), false) => Profile::load(path)
            .with_context(|| format!("opening profile {}", path.display()))?,
        (Some(_), true) => anyhow::bail!("--profile and --synthetic are mutually exclusive"),
        (None, _) => {
            info!("no profile given, generating a synthetic recording");
            generate_profile(&workflow_config.generator)?
        }
    };

    let address = workflow_config.bridge_address;
    let mut controller = Controller::new(workflow_config);
    controller.open(profile);

    if args.detect {
        for kind in [DetectKind::Surface, DetectKind::Ground] {
            controller
                .run_command(PanelCommand::Detect { kind })
                .with_context(|| format!("running {:?} detection", kind))?;
        }
    }

    if args.offline || !args.serve {
        print!("{}", controller.view());
        let metrics = controller.metrics();
        println!(
            "commands applied={} rejected={} failed={}",
            metrics.applied, metrics.rejected, metrics.failed
        );
    }

    if let Some(path) = &args.save {
        controller.save(path)?;
        info!("saved profile to {}", path.display());
    }

    if args.serve {
        let gui_bridge = GuiBridge::new(controller, address);
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;

        if let Some(path) = &args.save {
            let state = gui_bridge.state();
            let guard = state
                .lock()
                .map_err(|_| anyhow::anyhow!("controller lock poisoned"))?;
            guard.save(path)?;
            info!("saved edited profile to {}", path.display());
        }
    }

    Ok(())
}
