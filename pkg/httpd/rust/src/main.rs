// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::undocumented_unsafe_blocks)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use httpd_vhostgen::cli::{Cli, Mode};
use httpd_vhostgen::config::{config_path, load_config};
use httpd_vhostgen::inventory::{DEFAULT_INVENTORY_PATH, Inventory};
use httpd_vhostgen::process::SystemRunner;
use httpd_vhostgen::provision::SystemOwnership;
use httpd_vhostgen::trace::TraceContext;
use httpd_vhostgen::{ApacheLocator, Orchestrator};
use log::{Level, info, warn};

fn load_inventory(path: Option<PathBuf>) -> Result<Inventory> {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_INVENTORY_PATH));
    Inventory::load(&path).context("an inventory is required in hosted and clustered modes")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = config_path(cli.config.clone());
    let loaded = load_config(&config_path)?;
    let config_missing = loaded.is_none();
    let config = loaded.unwrap_or_default();
    let log_level = match cli.log_level.as_deref() {
        Some(level) => Level::from_str(level).map_err(|_| anyhow!("invalid log level: {level}"))?,
        None => config.log_level().unwrap_or(Level::Info),
    };
    simple_logger::init_with_level(log_level)?;
    info!("Log level set to: {:?}", log_level);

    if config_missing {
        warn!(
            "config file not found at {}, using defaults",
            config_path.display()
        );
    }
    if let Err(raw) = config.log_level() {
        warn!("invalid log_level {raw:?} in config, using info");
    }

    let trace = TraceContext::new(config.trace);
    let locator = ApacheLocator::new(SystemRunner, &config, trace);
    let orchestrator = Orchestrator::new(config, trace, locator, SystemOwnership);

    match cli.mode {
        Mode::Standalone { path } => {
            orchestrator.run_standalone(&path)?;
        }
        Mode::Hosted { server, site } => {
            let inventory = load_inventory(cli.inventory)?;
            let written =
                orchestrator.run_hosted(&inventory, server.as_deref(), site.as_deref())?;
            info!("{} files written", written.len());
        }
        Mode::Clustered { server, site } => {
            let inventory = load_inventory(cli.inventory)?;
            let written = orchestrator.run_clustered(&inventory, &server, site.as_deref())?;
            info!("{} files written", written.len());
        }
    }

    Ok(())
}
