// ABOUTME: The list command - print the services detected in the current directory

use crate::cli::OutputFormat;
use crate::detect;
use anyhow::{Context, Result};

pub fn execute(format: OutputFormat) -> Result<()> {
    let root = std::env::current_dir().context("cannot determine current directory")?;
    let services = detect::detect_services(&root);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&services)?);
        }
        OutputFormat::Text => {
            if services.is_empty() {
                println!("No run commands detected.");
                return Ok(());
            }
            let name_width = services.iter().map(|s| s.name.len()).max().unwrap_or(0);
            for service in &services {
                let kind = if service.interactive { "interactive" } else { "foreground" };
                println!("{:name_width$}  [{kind}]  {}", service.name, service.command);
            }
        }
    }
    Ok(())
}
