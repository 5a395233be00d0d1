// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Detection of the Apache HTTP Server installed on the host.
//!
//! Locating runs a linear state machine:
//! `Unlocated -> BinaryFound -> InfoParsed -> PathResolved -> ModuleResolved`.
//! Every step is attempted once; a failing step leaves the location in the
//! last state reached and skips the remaining ones. None of these failures
//! is an error: the caller decides what an incomplete location means.

use crate::config::Config;
use crate::facts::{SERVER_VERSION, ServerFacts};
use crate::paths::resolve_config_dir;
use crate::process::ProcessRunner;
use crate::trace::TraceContext;
use log::{debug, info};
use std::path::{Path, PathBuf};

pub const UNKNOWN_VERSION: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LocateState {
    Unlocated,
    BinaryFound,
    InfoParsed,
    PathResolved,
    ModuleResolved,
}

/// What is known about the detected server. Each variant carries exactly the
/// fields that are valid once that state has been reached.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ServerLocation {
    #[default]
    Unlocated,
    BinaryFound {
        binary: PathBuf,
    },
    InfoParsed {
        binary: PathBuf,
        facts: ServerFacts,
    },
    PathResolved {
        binary: PathBuf,
        facts: ServerFacts,
        config_dir: PathBuf,
    },
    ModuleResolved {
        binary: PathBuf,
        facts: ServerFacts,
        config_dir: PathBuf,
        module: String,
    },
}

impl ServerLocation {
    pub fn state(&self) -> LocateState {
        match self {
            ServerLocation::Unlocated => LocateState::Unlocated,
            ServerLocation::BinaryFound { .. } => LocateState::BinaryFound,
            ServerLocation::InfoParsed { .. } => LocateState::InfoParsed,
            ServerLocation::PathResolved { .. } => LocateState::PathResolved,
            ServerLocation::ModuleResolved { .. } => LocateState::ModuleResolved,
        }
    }

    /// True when both the control binary and the configuration directory
    /// are known. A missing version or scripting module does not matter.
    pub fn is_located(&self) -> bool {
        self.state() >= LocateState::PathResolved
    }

    pub fn binary(&self) -> Option<&Path> {
        match self {
            ServerLocation::Unlocated => None,
            ServerLocation::BinaryFound { binary }
            | ServerLocation::InfoParsed { binary, .. }
            | ServerLocation::PathResolved { binary, .. }
            | ServerLocation::ModuleResolved { binary, .. } => Some(binary),
        }
    }

    pub fn facts(&self) -> Option<&ServerFacts> {
        match self {
            ServerLocation::Unlocated | ServerLocation::BinaryFound { .. } => None,
            ServerLocation::InfoParsed { facts, .. }
            | ServerLocation::PathResolved { facts, .. }
            | ServerLocation::ModuleResolved { facts, .. } => Some(facts),
        }
    }

    pub fn config_dir(&self) -> Option<&Path> {
        match self {
            ServerLocation::PathResolved { config_dir, .. }
            | ServerLocation::ModuleResolved { config_dir, .. } => Some(config_dir),
            _ => None,
        }
    }

    /// Apache module name of the scripting runtime (`php7_module`...).
    pub fn scripting_module(&self) -> Option<&str> {
        match self {
            ServerLocation::ModuleResolved { module, .. } => Some(module),
            _ => None,
        }
    }

    /// Parsed server version, or `"Unknown"`.
    pub fn server_version(&self) -> &str {
        self.facts()
            .and_then(|facts| facts.text(SERVER_VERSION))
            .unwrap_or(UNKNOWN_VERSION)
    }
}

pub trait ServerIntrospector {
    fn locate(&self) -> ServerLocation;
}

/// Maps the scripting runtime's major version onto its Apache module name.
pub fn module_for_major(major: char) -> Option<&'static str> {
    match major {
        '5' => Some("php5_module"),
        '7' => Some("php7_module"),
        _ => None,
    }
}

/// Takes the version token out of `php -v` output
/// (`PHP 7.4.3 (cli) (built: ...)`).
fn parse_scripting_version(first_line: &str) -> Option<&str> {
    first_line
        .trim()
        .strip_prefix("PHP ")?
        .split_whitespace()
        .next()
}

/// Takes the binary path out of one `whereis` line. The line may be
/// prefixed with `<name>:`; a bare label means no candidate.
fn parse_locate_line<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let line = line
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(line);
    line.split_whitespace().next()
}

pub struct ApacheLocator<R> {
    runner: R,
    control_binary: String,
    locate_command: String,
    scripting_binary: String,
    scripting_version: Option<String>,
    trace: TraceContext,
}

impl<R: ProcessRunner> ApacheLocator<R> {
    pub fn new(runner: R, config: &Config, trace: TraceContext) -> Self {
        Self {
            runner,
            control_binary: config.control_binary.clone(),
            locate_command: config.locate_command.clone(),
            scripting_binary: config.scripting_binary.clone(),
            scripting_version: config.scripting_version.clone(),
            trace,
        }
    }

    /// Looks the control binary up. Only a single candidate line counts as
    /// found; zero or several candidates are treated as not found.
    fn find_binary(&self) -> Option<PathBuf> {
        let lookup = format!("{} {}", self.locate_command, self.control_binary);
        let output = self.runner.run(&lookup, &[]);
        if !output.success {
            return None;
        }
        let [line] = output.lines.as_slice() else {
            debug!(
                "{} returned {} candidate lines for {}",
                self.locate_command,
                output.lines.len(),
                self.control_binary
            );
            return None;
        };
        parse_locate_line(line, &self.control_binary).map(PathBuf::from)
    }

    fn query_info(&self, binary: &Path) -> Option<ServerFacts> {
        let output = self.runner.run(&binary.to_string_lossy(), &[("V", "")]);
        output.success.then(|| ServerFacts::parse(&output.lines))
    }

    fn scripting_version(&self) -> Option<String> {
        if let Some(version) = &self.scripting_version {
            return Some(version.clone());
        }
        let output = self.runner.run(&self.scripting_binary, &[("v", "")]);
        if !output.success {
            return None;
        }
        output
            .lines
            .first()
            .and_then(|line| parse_scripting_version(line))
            .map(str::to_string)
    }

    fn scripting_module(&self) -> Option<String> {
        let version = self.scripting_version()?;
        let module = version.chars().next().and_then(module_for_major);
        if module.is_none() {
            info!("no Apache module known for scripting runtime {version}");
        }
        module.map(str::to_string)
    }
}

impl<R: ProcessRunner> ServerIntrospector for ApacheLocator<R> {
    fn locate(&self) -> ServerLocation {
        let Some(binary) = self.find_binary() else {
            info!("{} not found", self.control_binary);
            return ServerLocation::Unlocated;
        };
        self.trace.trace_log("Binary", binary.display());

        let Some(facts) = self.query_info(&binary) else {
            info!("could not query {}", binary.display());
            return ServerLocation::BinaryFound { binary };
        };

        let Some(config_dir) = resolve_config_dir(&facts) else {
            info!("no configuration directory found for {}", binary.display());
            return ServerLocation::InfoParsed { binary, facts };
        };
        self.trace.trace_log("Config Path", config_dir.display());

        let Some(module) = self.scripting_module() else {
            return ServerLocation::PathResolved {
                binary,
                facts,
                config_dir,
            };
        };
        self.trace.trace_log("Scripting Module", &module);

        ServerLocation::ModuleResolved {
            binary,
            facts,
            config_dir,
            module,
        }
    }
}
