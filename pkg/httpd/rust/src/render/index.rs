// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Top-level file including the generated file of every published site.

use super::ConfigRenderer;
use crate::config::Config;
use crate::errors::Result;
use crate::inventory::{Server, Site};
use crate::layout::{SiteLayout, Topology};
use log::debug;

pub struct SiteIndex<'a> {
    config: &'a Config,
    server: &'a Server,
    sites: &'a [&'a Site],
    topology: Topology,
}

impl<'a> SiteIndex<'a> {
    pub fn new(
        config: &'a Config,
        server: &'a Server,
        sites: &'a [&'a Site],
        topology: Topology,
    ) -> Self {
        Self {
            config,
            server,
            sites,
            topology,
        }
    }
}

impl ConfigRenderer for SiteIndex<'_> {
    fn descriptor(&self) -> &'static str {
        match self.topology {
            Topology::Clustered => "vhostgen - Apache HTTP Server Cluster Index",
            Topology::Hosted | Topology::Standalone => "vhostgen - Apache HTTP Server Host Index",
        }
    }

    fn body(&self, padding: &str, out: &mut Vec<String>) -> Result<()> {
        for site in self.sites {
            if !site.published {
                debug!("site {} not published, left out of the index", site.key);
                continue;
            }
            let fragment = SiteLayout::new(self.config, self.server, site)
                .fragment_path(self.topology);
            if !fragment.is_file() {
                debug!("site {} has no file at {}", site.key, fragment.display());
                continue;
            }
            out.push(format!(
                "{padding}# Host: [{}] {}",
                site.key,
                site.display_name()?
            ));
            out.push(format!("{padding}Include \"{}\"", fragment.display()));
        }
        Ok(())
    }
}
