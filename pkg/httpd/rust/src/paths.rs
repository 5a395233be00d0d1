// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::facts::{HTTPD_ROOT, SERVER_CONFIG_FILE, ServerFacts};
use normalize_path::NormalizePath;
use std::path::{Path, PathBuf};

pub const OTHER_FOLDER: &str = "other";
pub const CONF_D_FOLDER: &str = "conf.d";

/// Picks the directory where generated configuration must be dropped so the
/// server includes it.
///
/// Precedence:
/// 1. `SERVER_CONFIG_FILE` names an existing file: look next to it, `other`
///    first and `conf.d` second. A relative value is taken from `HTTPD_ROOT`.
/// 2. otherwise `HTTPD_ROOT`: `conf.d` first and `other` second.
///
/// The two branches intentionally disagree on subfolder order. When the
/// config file exists but neither subfolder does, `HTTPD_ROOT` is not tried.
pub fn resolve_config_dir(facts: &ServerFacts) -> Option<PathBuf> {
    let root = facts.text(HTTPD_ROOT).map(|root| Path::new(strip_quotes(root)));

    if let Some(config_file) = facts.text(SERVER_CONFIG_FILE).map(Path::new) {
        let config_file = match root {
            Some(root) if config_file.is_relative() => root.join(config_file),
            _ => config_file.to_path_buf(),
        };
        if config_file.is_file() {
            let base = config_file.parent()?;
            return first_existing_dir(base, &[OTHER_FOLDER, CONF_D_FOLDER]);
        }
    }

    first_existing_dir(root?, &[CONF_D_FOLDER, OTHER_FOLDER])
}

fn first_existing_dir(base: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|name| base.join(name))
        .find(|path| path.is_dir())
}

fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// Appends a layout fragment such as `/acme/` or `/httpdocs` to `base`.
/// Separators between the two collapse, and a trailing separator is dropped,
/// so `/vhosts/` + `/acme/` gives `/vhosts/acme`.
pub fn concat<P: AsRef<Path>>(base: P, tail: &str) -> PathBuf {
    base.as_ref().join(tail.trim_start_matches('/')).normalize()
}
