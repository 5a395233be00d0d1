// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use anyhow::{Context, Result};
use log::Level;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_CONFIG_PATH: &str = "/etc/vhostgen/vhostgen.yaml";
pub const CONFIG_PATH_ENV: &str = "VHOSTGEN_CONFIG";

/// Folder and file names used below a site's base path.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Layout {
    pub httpdocs: String,
    pub httpsdocs: String,
    pub commondocs: String,
    pub private: String,
    pub config_folder: String,
    pub fragment_filename: String,
    pub runtime_folder: String,
    pub runtime_framework_folder: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            httpdocs: "/httpdocs".to_string(),
            httpsdocs: "/httpsdocs".to_string(),
            commondocs: "/commondocs".to_string(),
            private: "/private".to_string(),
            config_folder: "/conf".to_string(),
            fragment_filename: "httpd.conf".to_string(),
            runtime_folder: "/runtime".to_string(),
            runtime_framework_folder: "/framework".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    /// Emits key/value trace records for located servers and sites.
    pub trace: bool,
    pub control_binary: String,
    pub locate_command: String,
    pub scripting_binary: String,
    /// Skips asking `scripting_binary` for its version when set.
    pub scripting_version: Option<String>,
    pub etc_path: String,
    pub cluster_config_root: String,
    /// Framework location used by the standalone topology.
    pub framework_path: String,
    pub service_account: String,
    pub rotatelogs: String,
    pub hosted_default_key: String,
    pub config_filename: String,
    pub standalone_server_name: String,
    pub layout: Layout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            trace: true,
            control_binary: "apachectl".to_string(),
            locate_command: "whereis".to_string(),
            scripting_binary: "php".to_string(),
            scripting_version: None,
            etc_path: "/etc/vhostgen".to_string(),
            cluster_config_root: "/etc/vhostgen/cluster".to_string(),
            framework_path: "/opt/vhostgen/framework".to_string(),
            service_account: "apache".to_string(),
            rotatelogs: "/usr/sbin/rotatelogs".to_string(),
            hosted_default_key: "vhostgen-hosted".to_string(),
            config_filename: "vhostgen.conf".to_string(),
            standalone_server_name: "builtin.vhostgen.local".to_string(),
            layout: Layout::default(),
        }
    }
}

impl Config {
    /// Log level from the config file, `info` when unset. An unparseable
    /// value is handed back as is.
    pub fn log_level(&self) -> std::result::Result<Level, &str> {
        match self.log_level.as_deref() {
            Some(raw) => Level::from_str(raw).map_err(|_| raw),
            None => Ok(Level::Info),
        }
    }
}

/// Config file location: explicit path, then `VHOSTGEN_CONFIG`, then the
/// system default.
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Loads the config file. `None` when it does not exist; the caller falls
/// back to defaults once logging is up.
pub fn load_config(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(Some(Config::default()));
    }
    serde_yaml::from_str(&contents)
        .map(Some)
        .with_context(|| format!("parsing {}", path.display()))
}
