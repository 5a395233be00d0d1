// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Where each topology expects a site's folders and generated files.

use crate::config::Config;
use crate::inventory::{Server, Site};
use crate::paths::concat;
use std::path::PathBuf;

/// Deployment mode selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// A single local site served from a host folder.
    Standalone,
    /// Several sites on one server, files under the server's virtual-hosts
    /// tree.
    Hosted,
    /// Sites spread over a cluster, files under the shared configuration
    /// root.
    Clustered,
}

impl Topology {
    pub fn name(self) -> &'static str {
        match self {
            Topology::Standalone => "standalone",
            Topology::Hosted => "hosted",
            Topology::Clustered => "clustered",
        }
    }
}

pub struct SiteLayout<'a> {
    config: &'a Config,
    server: &'a Server,
    site: &'a Site,
}

impl<'a> SiteLayout<'a> {
    pub fn new(config: &'a Config, server: &'a Server, site: &'a Site) -> Self {
        Self {
            config,
            server,
            site,
        }
    }

    /// Root of the site below the server's virtual-hosts tree.
    pub fn host_path(&self) -> PathBuf {
        concat(&self.server.virtual_hosts_path, &self.site.base_path)
    }

    pub fn library_path(&self) -> PathBuf {
        concat(&self.server.virtual_library_path, &self.site.base_path)
    }

    pub fn cache_path(&self) -> PathBuf {
        concat(&self.server.virtual_cache_path, &self.site.base_path)
    }

    /// Document root: the secure folder for SSL hosts, the plain one
    /// otherwise.
    pub fn docs_path(&self, ssl: bool) -> PathBuf {
        let layout = &self.config.layout;
        let folder = if ssl {
            &layout.httpsdocs
        } else {
            &layout.httpdocs
        };
        concat(self.host_path(), folder)
    }

    pub fn commondocs_path(&self) -> PathBuf {
        concat(self.host_path(), &self.config.layout.commondocs)
    }

    pub fn private_path(&self) -> PathBuf {
        concat(self.host_path(), &self.config.layout.private)
    }

    /// Per-server folder holding hand-written fragments (`vhost.conf`,
    /// `aliases.conf`...) and, for the hosted topology, the generated file.
    pub fn conf_path(&self) -> PathBuf {
        concat(
            concat(self.host_path(), &self.config.layout.config_folder),
            &self.server.key,
        )
    }

    /// Folder receiving the generated site file.
    pub fn fragment_dir(&self, topology: Topology) -> PathBuf {
        match topology {
            Topology::Clustered => {
                let root = concat(&self.config.cluster_config_root, &self.site.base_path);
                concat(
                    concat(root, &self.config.layout.config_folder),
                    &self.server.key,
                )
            }
            Topology::Hosted | Topology::Standalone => self.conf_path(),
        }
    }

    pub fn fragment_path(&self, topology: Topology) -> PathBuf {
        self.fragment_dir(topology)
            .join(&self.config.layout.fragment_filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Server {
        Server {
            virtual_library_path: "/var/lib/vhosts/".to_string(),
            virtual_cache_path: "/var/cache/vhosts".to_string(),
            key: "web1".to_string(),
            ..Server::builtin("/vhosts/", "/framework")
        }
    }

    fn site() -> Site {
        Site {
            key: "acme".to_string(),
            base_path: "/acme/".to_string(),
            ..Site::builtin()
        }
    }

    #[test]
    fn test_site_paths() {
        let config = Config::default();
        let (server, site) = (server(), site());
        let layout = SiteLayout::new(&config, &server, &site);
        assert_eq!(layout.host_path(), PathBuf::from("/vhosts/acme"));
        assert_eq!(layout.library_path(), PathBuf::from("/var/lib/vhosts/acme"));
        assert_eq!(layout.cache_path(), PathBuf::from("/var/cache/vhosts/acme"));
        assert_eq!(layout.docs_path(false), PathBuf::from("/vhosts/acme/httpdocs"));
        assert_eq!(layout.docs_path(true), PathBuf::from("/vhosts/acme/httpsdocs"));
        assert_eq!(layout.private_path(), PathBuf::from("/vhosts/acme/private"));
        assert_eq!(layout.commondocs_path(), PathBuf::from("/vhosts/acme/commondocs"));
    }

    #[test]
    fn test_fragment_paths() {
        let config = Config::default();
        let (server, site) = (server(), site());
        let layout = SiteLayout::new(&config, &server, &site);
        assert_eq!(
            layout.fragment_path(Topology::Hosted),
            PathBuf::from("/vhosts/acme/conf/web1/httpd.conf")
        );
        assert_eq!(
            layout.fragment_path(Topology::Clustered),
            PathBuf::from("/etc/vhostgen/cluster/acme/conf/web1/httpd.conf")
        );
    }

    #[test]
    fn test_standalone_site_uses_host_folder() {
        let config = Config::default();
        let server = Server::builtin("/srv/site", "/framework");
        let site = Site::builtin();
        let layout = SiteLayout::new(&config, &server, &site);
        assert_eq!(layout.host_path(), PathBuf::from("/srv/site"));
        assert_eq!(layout.docs_path(false), PathBuf::from("/srv/site/httpdocs"));
    }
}
