// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Drives one generation run for the selected topology.

use crate::config::Config;
use crate::errors::Error;
use crate::inventory::{Inventory, Server, Site};
use crate::layout::{SiteLayout, Topology};
use crate::locator::{ServerIntrospector, ServerLocation};
use crate::provision::{OwnershipManager, SiteProvisioner};
use crate::render::{ConfigRenderer, SiteFile, SiteIndex, StandaloneFile};
use crate::trace::TraceContext;
use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::fs::DirBuilder;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

/// Folders of a standalone host, at least one of which must exist.
const HOST_FOLDERS: &[&str] = &["private", "httpdocs", "httpsdocs", "phputils", "templates"];

pub struct Orchestrator<I, O> {
    config: Config,
    trace: TraceContext,
    introspector: I,
    provisioner: SiteProvisioner<O>,
}

impl<I: ServerIntrospector, O: OwnershipManager> Orchestrator<I, O> {
    pub fn new(config: Config, trace: TraceContext, introspector: I, owner: O) -> Self {
        let provisioner = SiteProvisioner::new(owner, &config.service_account);
        Self {
            config,
            trace,
            introspector,
            provisioner,
        }
    }

    /// Locates the server and requires a usable configuration directory.
    fn locate(&self, key: &str) -> Result<(ServerLocation, PathBuf)> {
        let location = self.introspector.locate();
        let (Some(binary), Some(config_dir)) = (location.binary(), location.config_dir()) else {
            return Err(Error::ServerUnusable {
                key: key.to_string(),
            }
            .into());
        };
        info!(
            "Apache HTTP Server detected: version {}, binary {}, config path {}",
            location.server_version(),
            binary.display(),
            config_dir.display()
        );
        let config_dir = config_dir.to_path_buf();
        Ok((location, config_dir))
    }

    fn index_path(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(&self.config.config_filename)
    }

    /// Writes the configuration of a single local site hosted in `path`.
    pub fn run_standalone(&self, path: &Path) -> Result<PathBuf> {
        if !path.is_dir() {
            return Err(Error::FolderNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        let host_path = path
            .to_str()
            .with_context(|| format!("host path {} is not valid UTF-8", path.display()))?;

        let (location, config_dir) = self.locate("standalone")?;
        if !check_host_folders(path) {
            bail!("{} does not look like a site folder", path.display());
        }

        let server = Server::builtin(host_path, &self.config.framework_path);
        let site = Site::builtin();
        self.trace.trace_log("Host Path", path.display());

        let document = StandaloneFile::new(&location, &self.config, &server, &site).render()?;
        let target = self.index_path(&config_dir);
        document.write_to(&target)?;
        info!("standalone configuration written to {}", target.display());
        Ok(target)
    }

    /// Writes every site file of the server plus the hosted index.
    pub fn run_hosted(
        &self,
        inventory: &Inventory,
        server_key: Option<&str>,
        only_site: Option<&str>,
    ) -> Result<Vec<PathBuf>> {
        let key = server_key.unwrap_or(&self.config.hosted_default_key);
        self.run_sites(inventory, key, only_site, Topology::Hosted)
    }

    /// Like the hosted run, but provisions the site folders first and
    /// writes the files beneath the shared cluster root.
    pub fn run_clustered(
        &self,
        inventory: &Inventory,
        server_key: &str,
        only_site: Option<&str>,
    ) -> Result<Vec<PathBuf>> {
        self.run_sites(inventory, server_key, only_site, Topology::Clustered)
    }

    fn run_sites(
        &self,
        inventory: &Inventory,
        server_key: &str,
        only_site: Option<&str>,
        topology: Topology,
    ) -> Result<Vec<PathBuf>> {
        let server = inventory.server(server_key)?;
        self.trace.trace_log("Server", &server.key);
        let (location, config_dir) = self.locate(server_key)?;

        let sites = inventory
            .sites_index(server)
            .collect::<std::result::Result<Vec<&Site>, Error>>()?;

        let selected: Vec<&Site> = match only_site {
            Some(key) => {
                let site = sites
                    .iter()
                    .copied()
                    .find(|site| site.key == key)
                    .ok_or_else(|| Error::SiteNotFound {
                        key: key.to_string(),
                    })?;
                if !site.published {
                    return Err(Error::SiteNotPublished {
                        key: key.to_string(),
                    }
                    .into());
                }
                vec![site]
            }
            None => sites.clone(),
        };

        let mut written = Vec::with_capacity(selected.len() + 1);
        for site in selected {
            self.trace.trace_log("Site", &site.key);
            written.push(self.write_site_file(&location, server, site, topology)?);
        }

        let index = SiteIndex::new(&self.config, server, &sites, topology).render()?;
        let target = self.index_path(&config_dir);
        index.write_to(&target)?;
        info!(
            "{} index for server {} written to {}",
            topology.name(),
            server.key,
            target.display()
        );
        written.push(target);
        Ok(written)
    }

    fn write_site_file(
        &self,
        location: &ServerLocation,
        server: &Server,
        site: &Site,
        topology: Topology,
    ) -> Result<PathBuf> {
        if topology == Topology::Clustered {
            self.provisioner.ensure_site_directories(server, site)?;
        }

        let layout = SiteLayout::new(&self.config, server, site);
        let document = SiteFile::new(location, &self.config, server, site, topology).render()?;

        let folder = layout.fragment_dir(topology);
        DirBuilder::new()
            .recursive(true)
            .mode(0o755)
            .create(&folder)
            .map_err(|source| Error::FolderCreate {
                path: folder.clone(),
                source,
            })?;

        let target = layout.fragment_path(topology);
        document.write_to(&target)?;
        debug!("site {} written to {}", site.key, target.display());
        Ok(target)
    }
}

/// Reports the expected host folders and whether at least one exists.
fn check_host_folders(path: &Path) -> bool {
    let mut found = false;
    for folder in HOST_FOLDERS {
        let target = path.join(folder);
        if target.is_dir() {
            info!("host folder {} exists", target.display());
            found = true;
        } else {
            info!("host folder {} not present", target.display());
        }
    }
    found
}
