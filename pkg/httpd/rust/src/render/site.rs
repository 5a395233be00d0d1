// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Per-site virtual host file for the hosted and clustered topologies.
//!
//! One `<VirtualHost>` block is written for each host record of the site
//! bound on the server. Optional pieces (aliases, admin address,
//! certificates, hand-written fragments) only appear when present.

use super::{ConfigRenderer, indent, populate_common_docs, scripting_block};
use crate::config::Config;
use crate::errors::Result;
use crate::inventory::{ClusterGroup, ClusterUser, Server, Site, VirtualHostRecord};
use crate::layout::{SiteLayout, Topology};
use crate::locator::ServerLocation;
use crate::paths::concat;
use std::path::{Path, PathBuf};

const TMP_PATH: &str = "/tmp";
const VHOST_FRAGMENT: &str = "vhost.conf";
const ALIASES_FRAGMENT: &str = "aliases.conf";
const MEDIA_FRAGMENT: &str = "media.conf";

pub struct SiteFile<'a> {
    location: &'a ServerLocation,
    config: &'a Config,
    server: &'a Server,
    site: &'a Site,
    topology: Topology,
}

/// Paths shared by every virtual host of the site.
struct SitePaths {
    site: PathBuf,
    conf: PathBuf,
    private: PathBuf,
    commondocs: PathBuf,
    logs: PathBuf,
    runtime: PathBuf,
    runtime_framework: PathBuf,
    framework: Option<PathBuf>,
}

impl<'a> SiteFile<'a> {
    pub fn new(
        location: &'a ServerLocation,
        config: &'a Config,
        server: &'a Server,
        site: &'a Site,
        topology: Topology,
    ) -> Self {
        Self {
            location,
            config,
            server,
            site,
            topology,
        }
    }

    fn paths(&self) -> SitePaths {
        let layout = SiteLayout::new(self.config, self.server, self.site);
        let folders = &self.config.layout;
        let runtime = concat(&self.server.base_path, &folders.runtime_folder);
        SitePaths {
            site: layout.host_path(),
            conf: layout.conf_path(),
            private: layout.private_path(),
            commondocs: layout.commondocs_path(),
            logs: concat(&self.server.logs_path, &self.server.key),
            runtime_framework: concat(&runtime, &folders.runtime_framework_folder),
            runtime,
            framework: self
                .site
                .use_framework
                .then(|| concat(&self.server.base_path, &self.server.framework_path)),
        }
    }

    fn virtual_host(
        &self,
        padding: &str,
        host: &VirtualHostRecord,
        (user, group): (&ClusterUser, &ClusterGroup),
        paths: &SitePaths,
        out: &mut Vec<String>,
    ) {
        let p1 = indent(padding, 1);
        let layout = SiteLayout::new(self.config, self.server, self.site);
        let docs = layout.docs_path(host.ssl);
        let module = self.location.scripting_module();

        out.push(format!("{padding}<VirtualHost {}:{}>", host.address, host.port));
        out.push(format!("{p1}ServerName {}", host.name));
        if !host.aliases.is_empty() {
            out.push(format!("{p1}ServerAlias {}", host.aliases.join(" ")));
        }
        out.push(padding.to_string());
        out.push(format!("{p1}UseCanonicalName Off"));
        out.push(format!("{p1}SuexecUserGroup {} {}", user.os_nick, group.os_nick));
        if let Some(email) = self.server.admin_email() {
            out.push(format!("{p1}ServerAdmin \"{email}\""));
        }
        out.push(format!("{p1}DocumentRoot {}", docs.display()));
        self.logs(&p1, &host.name, &paths.logs, out);
        out.push(padding.to_string());
        self.ssl(&p1, host.ssl, &paths.private, out);
        out.push(padding.to_string());

        let p2 = indent(padding, 2);
        let framework = paths.framework.as_deref();
        out.push(format!("{p1}<Directory {}>", docs.display()));
        let mut open_basedir = vec![
            self.config.etc_path.clone(),
            paths.site.display().to_string(),
        ];
        open_basedir.extend(framework.map(|path| path.display().to_string()));
        open_basedir.push(TMP_PATH.to_string());
        scripting_block(&p2, module, &open_basedir, framework, out);
        out.push(format!("{p2}AllowOverride All"));
        out.push(format!("{p2}Options +Includes -ExecCGI +FollowSymLinks"));
        out.push(format!("{p2}Require all granted"));
        out.push(format!("{p1}</Directory>"));
        out.push(padding.to_string());

        let alias = &self.config.layout.runtime_folder;
        out.push(format!("{p1}Alias {alias} {}", paths.runtime.display()));
        out.push(format!("{p1}<Location {alias}>"));
        out.push(format!("{p2}Order allow,deny"));
        out.push(format!("{p2}Allow from all"));
        out.push(format!("{p1}</Location>"));
        out.push(format!("{p1}<Directory {}>", paths.runtime.display()));
        out.push(format!("{p2}AllowOverride All"));
        out.push(format!("{p2}Require all granted"));
        out.push(format!("{p1}</Directory>"));
        out.push(format!("{p1}<Directory {}>", paths.runtime_framework.display()));
        let mut open_basedir = vec![
            paths.site.display().to_string(),
            paths.runtime_framework.display().to_string(),
        ];
        open_basedir.extend(framework.map(|path| path.display().to_string()));
        open_basedir.push(TMP_PATH.to_string());
        scripting_block(&p2, module, &open_basedir, framework, out);
        out.push(format!("{p2}Options -Includes -ExecCGI"));
        out.push(format!("{p2}Require all granted"));
        out.push(format!("{p1}</Directory>"));
        populate_common_docs(&p1, &paths.commondocs, out);
        out.push(padding.to_string());

        let fragments = [
            (VHOST_FRAGMENT, self.site.enable_vhost_file),
            (ALIASES_FRAGMENT, true),
            (MEDIA_FRAGMENT, true),
        ];
        for (name, enabled) in fragments {
            let fragment = paths.conf.join(name);
            if enabled && fragment.is_file() {
                out.push(format!("{p1}Include {}", fragment.display()));
            }
        }
        out.push(format!("{padding}</VirtualHost>"));
    }

    fn logs(&self, padding: &str, server_name: &str, logs: &Path, out: &mut Vec<String>) {
        let rotatelogs = &self.config.rotatelogs;
        let prefix = logs.join(server_name);
        out.push(format!(
            "{padding}CustomLog \"|{rotatelogs} -l {}.%Y%m%d.access_log 86400\" combined",
            prefix.display()
        ));
        out.push(format!(
            "{padding}ErrorLog \"|{rotatelogs} -l {}.%Y%m%d.error_log 86400\"",
            prefix.display()
        ));
    }

    fn ssl(&self, padding: &str, enabled: bool, private: &Path, out: &mut Vec<String>) {
        let inner = indent(padding, 1);
        out.push(format!("{padding}<IfModule mod_ssl.c>"));
        if enabled {
            out.push(format!("{inner}SSLEngine on"));
            out.push(format!("{inner}SSLVerifyClient none"));
            let key = &self.site.key;
            let certificates = [
                ("SSLCertificateFile", format!("{key}.crt")),
                ("SSLCertificateKeyFile", format!("{key}_private.key")),
                ("SSLCertificateChainFile", format!("{key}_intermediate.crt")),
                ("SSLCACertificateFile", format!("{key}_root.crt")),
            ];
            for (directive, file) in certificates {
                let path = private.join(file);
                if path.is_file() {
                    out.push(format!("{inner}{directive} {}", path.display()));
                }
            }
            out.push(format!("{inner}SSLProxyEngine on"));
        } else {
            out.push(format!("{inner}SSLEngine off"));
        }
        out.push(format!("{padding}</IfModule>"));
    }
}

impl ConfigRenderer for SiteFile<'_> {
    fn descriptor(&self) -> &'static str {
        match self.topology {
            Topology::Clustered => "vhostgen - Apache HTTP Server Cluster Host configuration",
            Topology::Hosted | Topology::Standalone => {
                "vhostgen - Apache HTTP Server Host configuration"
            }
        }
    }

    fn body(&self, padding: &str, out: &mut Vec<String>) -> Result<()> {
        let owner = self.site.owner()?;
        let paths = self.paths();
        for host in self.site.hosts_for(self.server) {
            self.virtual_host(padding, host, owner, &paths, out);
        }
        Ok(())
    }
}
