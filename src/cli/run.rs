// ABOUTME: The run command - detect, select, launch, and multiplex services
//
// Control flow: detect descriptors -> selection stage -> non-interactive
// ones run synchronously in the foreground -> interactive ones launch
// concurrently -> the multiplexer owns the sessions until quit. An empty
// selection is a clean no-op; an empty session registry after launch is
// fatal.

use crate::detect;
use crate::mux::{
    launch_interactive_services, run_foreground_services, run_multiplexer, select_services,
};
use anyhow::{bail, Context, Result};
use tracing::info;

pub async fn execute() -> Result<()> {
    let root = std::env::current_dir().context("cannot determine current directory")?;
    let services = detect::detect_services(&root);
    if services.is_empty() {
        println!("No run commands detected. Try running the project manually.");
        return Ok(());
    }

    let selected = select_services(services)?;
    if selected.is_empty() {
        info!("selection cancelled, nothing to run");
        println!("No service selected.");
        return Ok(());
    }

    let (interactive, foreground): (Vec<_>, Vec<_>) =
        selected.into_iter().partition(|s| s.interactive);

    run_foreground_services(&foreground).await;

    if interactive.is_empty() {
        return Ok(());
    }

    let sessions = launch_interactive_services(&interactive).await;
    if sessions.is_empty() {
        bail!("no interactive sessions available: every launch failed");
    }

    run_multiplexer(sessions).await?;
    Ok(())
}
