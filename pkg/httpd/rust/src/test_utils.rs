// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Fakes for the process and ownership boundaries.
#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use crate::facts::ServerFacts;
use crate::locator::ServerLocation;
use crate::process::{CommandOutput, ProcessRunner};
use crate::provision::OwnershipManager;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Answers commands from a table keyed by the command string and records
/// every invocation. Unknown commands fail.
#[derive(Default)]
pub struct FakeRunner {
    outputs: HashMap<String, CommandOutput>,
    calls: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, command: &str, output: CommandOutput) -> Self {
        self.outputs.insert(command.to_string(), output);
        self
    }

    pub fn with_output(self, command: &str, lines: &[&str]) -> Self {
        self.with_lines(command, lines.iter().map(|l| l.to_string()).collect())
    }

    pub fn with_lines(self, command: &str, lines: Vec<String>) -> Self {
        self.with(
            command,
            CommandOutput {
                success: true,
                lines,
            },
        )
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, command: &str, flags: &[(&str, &str)]) -> CommandOutput {
        let mut call = command.to_string();
        for (key, value) in flags {
            call.push_str(&format!(" -{key}"));
            if !value.is_empty() {
                call.push_str(&format!(" {value}"));
            }
        }
        self.calls.borrow_mut().push(call);
        self.outputs.get(command).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chown {
    pub path: PathBuf,
    pub uid: u32,
    pub gid: u32,
}

/// Resolves accounts from fixed tables and records `chown` calls instead of
/// performing them.
#[derive(Default)]
pub struct RecordingOwnership {
    users: HashMap<String, u32>,
    groups: HashMap<String, u32>,
    chowns: RefCell<Vec<Chown>>,
}

impl RecordingOwnership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, name: &str, uid: u32) -> Self {
        self.users.insert(name.to_string(), uid);
        self
    }

    pub fn with_group(mut self, name: &str, gid: u32) -> Self {
        self.groups.insert(name.to_string(), gid);
        self
    }

    pub fn chowns(&self) -> Vec<Chown> {
        self.chowns.borrow().clone()
    }
}

impl OwnershipManager for RecordingOwnership {
    fn user_id(&self, name: &str) -> Option<u32> {
        self.users.get(name).copied()
    }

    fn group_id(&self, name: &str) -> Option<u32> {
        self.groups.get(name).copied()
    }

    fn chown(&self, path: &Path, uid: u32, gid: u32) -> std::io::Result<()> {
        self.chowns.borrow_mut().push(Chown {
            path: path.to_path_buf(),
            uid,
            gid,
        });
        Ok(())
    }
}

/// A fully located Apache 2.4 server, with or without a scripting module.
pub fn located(module: Option<&str>) -> ServerLocation {
    let binary = PathBuf::from("/usr/sbin/apachectl");
    let facts = ServerFacts::parse(&["Server version: Apache/2.4.57 (Unix)"]);
    let config_dir = PathBuf::from("/etc/httpd/conf.d");
    match module {
        Some(module) => ServerLocation::ModuleResolved {
            binary,
            facts,
            config_dir,
            module: module.to_string(),
        },
        None => ServerLocation::PathResolved {
            binary,
            facts,
            config_dir,
        },
    }
}
