// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Configuration for a single site served from a local host folder.

use super::{ConfigRenderer, indent, populate_common_docs, scripting_block};
use crate::config::Config;
use crate::errors::Result;
use crate::inventory::{Server, Site};
use crate::layout::SiteLayout;
use crate::locator::ServerLocation;
use crate::paths::concat;

const TMP_PATHS: &str = "/var/tmp:/tmp";

pub struct StandaloneFile<'a> {
    location: &'a ServerLocation,
    config: &'a Config,
    server: &'a Server,
    site: &'a Site,
}

impl<'a> StandaloneFile<'a> {
    pub fn new(
        location: &'a ServerLocation,
        config: &'a Config,
        server: &'a Server,
        site: &'a Site,
    ) -> Self {
        Self {
            location,
            config,
            server,
            site,
        }
    }
}

impl ConfigRenderer for StandaloneFile<'_> {
    fn descriptor(&self) -> &'static str {
        "vhostgen - Apache HTTP Server Standalone configuration"
    }

    fn body(&self, padding: &str, out: &mut Vec<String>) -> Result<()> {
        let layout = SiteLayout::new(self.config, self.server, self.site);
        let site_path = layout.host_path();
        let docs = layout.docs_path(false);
        let framework = self
            .site
            .use_framework
            .then(|| concat(&self.server.framework_path, ""));

        let mut open_basedir = vec![site_path.display().to_string()];
        if let Some(framework) = &framework {
            open_basedir.push(framework.display().to_string());
        }
        open_basedir.push(self.config.etc_path.clone());
        open_basedir.push(TMP_PATHS.to_string());

        out.push(format!("{padding}DocumentRoot \"{}\"", docs.display()));
        out.push(format!(
            "{padding}ServerName {}",
            self.config.standalone_server_name
        ));
        out.push(format!("{padding}<Directory \"{}\">", docs.display()));
        let inner = indent(padding, 1);
        scripting_block(
            &inner,
            self.location.scripting_module(),
            &open_basedir,
            framework.as_deref(),
            out,
        );
        out.push(format!("{inner}Options -Includes -ExecCGI"));
        out.push(format!("{inner}AllowOverride All"));
        out.push(format!("{inner}Require all granted"));
        out.push(format!("{padding}</Directory>"));

        populate_common_docs(padding, &layout.commondocs_path(), out);
        Ok(())
    }
}
