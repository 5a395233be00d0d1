// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Blocking execution of external commands with captured stdout.

use log::debug;
use std::process::{Command, Stdio};

/// Result of one command invocation. A command that could not be spawned or
/// exited non-zero is reported as `success == false` with no lines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub lines: Vec<String>,
}

impl CommandOutput {
    pub fn failed() -> Self {
        Self::default()
    }
}

pub trait ProcessRunner {
    /// Runs `command`, a program optionally followed by whitespace-separated
    /// arguments, appending each flag as `-key value` (or a bare `-key` when
    /// the value is empty).
    fn run(&self, command: &str, flags: &[(&str, &str)]) -> CommandOutput;
}

/// Runs commands on the host, resolving them through `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

fn flag_args(flags: &[(&str, &str)]) -> Vec<String> {
    let mut args = Vec::with_capacity(flags.len() * 2);
    for (key, value) in flags {
        args.push(format!("-{key}"));
        if !value.is_empty() {
            args.push((*value).to_string());
        }
    }
    args
}

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &str, flags: &[(&str, &str)]) -> CommandOutput {
        let mut words = command.split_whitespace();
        let Some(program) = words.next() else {
            return CommandOutput::failed();
        };
        let mut args: Vec<String> = words.map(str::to_string).collect();
        args.extend(flag_args(flags));

        let output = match Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                debug!("could not run {command}: {e}");
                return CommandOutput::failed();
            }
        };

        debug!("{program} {} exited with {}", args.join(" "), output.status);
        if !output.status.success() {
            return CommandOutput::failed();
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        CommandOutput {
            success: true,
            lines: stdout.lines().map(str::to_string).collect(),
        }
    }
}
