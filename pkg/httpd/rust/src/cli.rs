// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vhostgen")]
#[command(about = "Generates Apache HTTP Server virtual host configuration", long_about = None)]
pub struct Cli {
    /// Tool configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Inventory of servers and sites (hosted and clustered modes)
    #[arg(short, long, global = true)]
    pub inventory: Option<PathBuf>,

    /// Overrides the configured log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Mode {
    /// Single site served from a local host folder
    Standalone {
        /// Host folder of the site
        #[arg(short, long)]
        path: PathBuf,
    },
    /// Every site of one server
    Hosted {
        /// Server key, the configured default when omitted
        #[arg(short, long)]
        server: Option<String>,

        /// Regenerates only this site's file
        #[arg(long)]
        site: Option<String>,
    },
    /// Every site of one cluster node
    Clustered {
        #[arg(short, long)]
        server: String,

        /// Regenerates only this site's file
        #[arg(long)]
        site: Option<String>,
    },
}
