// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Server, site and virtual-host records, loaded from a YAML inventory.
//!
//! ```yaml
//! servers:
//!   - key: web1
//!     virtual_hosts_path: /var/www/vhosts/
//!     sites: [acme]
//! sites:
//!   - key: acme
//!     base_path: /acme/
//!     published: true
//!     translations: { en: Acme }
//!     cluster_user: { os_nick: acme, group: { os_nick: acme } }
//!     hosts:
//!       - { server: web1, address: 10.0.0.1, port: 80, name: acme.example.com }
//! ```

use crate::errors::{Error, Result};
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_INVENTORY_PATH: &str = "/etc/vhostgen/inventory.yaml";

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AdminUser {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Server {
    pub key: String,
    #[serde(default)]
    pub base_path: String,
    pub virtual_hosts_path: String,
    #[serde(default)]
    pub virtual_library_path: String,
    #[serde(default)]
    pub virtual_cache_path: String,
    #[serde(default)]
    pub logs_path: String,
    #[serde(default)]
    pub framework_path: String,
    #[serde(default)]
    pub admin: Option<AdminUser>,
    /// Keys of the sites served, in index order.
    #[serde(default)]
    pub sites: Vec<String>,
}

impl Server {
    /// Server used by the standalone topology: a single host folder and no
    /// inventory behind it.
    pub fn builtin(host_path: &str, framework_path: &str) -> Self {
        Self {
            key: "builtin".to_string(),
            base_path: String::new(),
            virtual_hosts_path: host_path.to_string(),
            virtual_library_path: String::new(),
            virtual_cache_path: String::new(),
            logs_path: String::new(),
            framework_path: framework_path.to_string(),
            admin: None,
            sites: Vec::new(),
        }
    }

    pub fn admin_email(&self) -> Option<&str> {
        self.admin.as_ref().and_then(|admin| admin.email.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClusterGroup {
    pub os_nick: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClusterUser {
    pub os_nick: String,
    pub group: Option<ClusterGroup>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VirtualHostRecord {
    /// Key of the server this host is bound on.
    pub server: String,
    pub address: String,
    pub port: u16,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub ssl: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Site {
    pub key: String,
    #[serde(default)]
    pub base_path: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub use_framework: bool,
    #[serde(default)]
    pub enable_vhost_file: bool,
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    #[serde(default)]
    pub cluster_user: Option<ClusterUser>,
    #[serde(default)]
    pub hosts: Vec<VirtualHostRecord>,
}

impl Site {
    pub fn builtin() -> Self {
        Self {
            key: "builtin".to_string(),
            base_path: String::new(),
            published: true,
            use_framework: true,
            enable_vhost_file: false,
            default_language: default_language(),
            translations: BTreeMap::new(),
            cluster_user: None,
            hosts: Vec::new(),
        }
    }

    /// Virtual hosts of this site bound on `server`, in inventory order.
    pub fn hosts_for<'a>(
        &'a self,
        server: &'a Server,
    ) -> impl Iterator<Item = &'a VirtualHostRecord> {
        self.hosts.iter().filter(move |host| host.server == server.key)
    }

    /// Name of the site in its default language.
    pub fn display_name(&self) -> Result<&str> {
        self.translations
            .get(&self.default_language)
            .map(String::as_str)
            .ok_or_else(|| Error::TranslationNotFound {
                site: self.key.clone(),
                language: self.default_language.clone(),
            })
    }

    /// Cluster user owning the site's files and that user's group.
    pub fn owner(&self) -> Result<(&ClusterUser, &ClusterGroup)> {
        let user = self
            .cluster_user
            .as_ref()
            .ok_or_else(|| Error::ClusterUserNotFound {
                site: self.key.clone(),
            })?;
        let group = user.group.as_ref().ok_or_else(|| Error::ClusterGroupNotFound {
            site: self.key.clone(),
            user: user.os_nick.clone(),
        })?;
        Ok((user, group))
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Inventory {
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub sites: Vec<Site>,
}

impl Inventory {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading inventory {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing inventory {}", path.display()))
    }

    pub fn server(&self, key: &str) -> Result<&Server> {
        self.servers
            .iter()
            .find(|server| server.key == key)
            .ok_or_else(|| Error::ServerNotFound {
                key: key.to_string(),
            })
    }

    pub fn site(&self, key: &str) -> Result<&Site> {
        self.sites
            .iter()
            .find(|site| site.key == key)
            .ok_or_else(|| Error::SiteNotFound {
                key: key.to_string(),
            })
    }

    /// Sites served by `server`, in index order. An index entry without a
    /// matching site yields `SiteNotFound`.
    pub fn sites_index<'a>(
        &'a self,
        server: &'a Server,
    ) -> impl Iterator<Item = Result<&'a Site>> + 'a {
        server.sites.iter().map(move |key| self.site(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::fs;

    const INVENTORY: &str = r#"
servers:
  - key: web1
    base_path: /opt/vhostgen
    virtual_hosts_path: /var/www/vhosts/
    virtual_library_path: /var/lib/vhosts/
    virtual_cache_path: /var/cache/vhosts/
    logs_path: /var/log/httpd
    framework_path: /framework
    admin: { email: hostmaster@example.com }
    sites: [acme, beta]
sites:
  - key: beta
    base_path: /beta/
    translations: { es: Beta }
    default_language: es
  - key: acme
    base_path: /acme/
    published: true
    translations: { en: Acme Corp }
    cluster_user: { os_nick: acme, group: { os_nick: acmegrp } }
    hosts:
      - { server: web1, address: 10.0.0.1, port: 80, name: acme.example.com }
      - { server: web2, address: 10.0.0.2, port: 80, name: acme.example.org }
      - server: web1
        address: 10.0.0.1
        port: 443
        name: secure.acme.example.com
        aliases: [shop.acme.example.com]
        ssl: true
"#;

    fn inventory() -> Inventory {
        serde_yaml::from_str(INVENTORY).unwrap()
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.yaml");
        fs::write(&path, INVENTORY).unwrap();
        let inventory = Inventory::load(&path).unwrap();
        assert_eq!(inventory.servers.len(), 1);
        assert_eq!(inventory.sites.len(), 2);
        assert!(Inventory::load(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_defaults() {
        let inventory = inventory();
        let beta = inventory.site("beta").unwrap();
        assert!(!beta.published);
        assert!(!beta.use_framework);
        assert!(beta.hosts.is_empty());
        assert!(beta.cluster_user.is_none());
        let acme = inventory.site("acme").unwrap();
        assert_eq!(acme.default_language, "en");
    }

    #[test]
    fn test_server_lookup() {
        let inventory = inventory();
        let server = inventory.server("web1").unwrap();
        assert_eq!(server.admin_email(), Some("hostmaster@example.com"));
        assert!(matches!(
            inventory.server("web9"),
            Err(Error::ServerNotFound { key }) if key == "web9"
        ));
    }

    #[test]
    fn test_sites_index_order() {
        let inventory = inventory();
        let server = inventory.server("web1").unwrap();
        let keys: Vec<&str> = inventory
            .sites_index(server)
            .map(|site| site.unwrap().key.as_str())
            .collect();
        assert_eq!(keys, vec!["acme", "beta"]);
    }

    #[test]
    fn test_sites_index_unknown_site() {
        let mut inventory = inventory();
        inventory.servers[0].sites.push("gone".to_string());
        let server = inventory.servers[0].clone();
        let last = inventory.sites_index(&server).last().unwrap();
        assert!(matches!(last, Err(Error::SiteNotFound { key }) if key == "gone"));
    }

    #[test]
    fn test_hosts_for_server() {
        let inventory = inventory();
        let server = inventory.server("web1").unwrap();
        let names: Vec<&str> = inventory
            .site("acme")
            .unwrap()
            .hosts_for(server)
            .map(|host| host.name.as_str())
            .collect();
        assert_eq!(names, vec!["acme.example.com", "secure.acme.example.com"]);
    }

    #[test]
    fn test_display_name() {
        let inventory = inventory();
        assert_eq!(inventory.site("acme").unwrap().display_name().unwrap(), "Acme Corp");
        assert_eq!(inventory.site("beta").unwrap().display_name().unwrap(), "Beta");

        let mut site = inventory.site("acme").unwrap().clone();
        site.default_language = "fr".to_string();
        assert!(matches!(
            site.display_name(),
            Err(Error::TranslationNotFound { language, .. }) if language == "fr"
        ));
    }

    #[test]
    fn test_owner() {
        let inventory = inventory();
        let (user, group) = inventory.site("acme").unwrap().owner().unwrap();
        assert_eq!(user.os_nick, "acme");
        assert_eq!(group.os_nick, "acmegrp");

        assert!(matches!(
            inventory.site("beta").unwrap().owner(),
            Err(Error::ClusterUserNotFound { site }) if site == "beta"
        ));

        let mut site = inventory.site("acme").unwrap().clone();
        if let Some(user) = site.cluster_user.as_mut() {
            user.group = None;
        }
        assert!(matches!(
            site.owner(),
            Err(Error::ClusterGroupNotFound { user, .. }) if user == "acme"
        ));
    }
}
