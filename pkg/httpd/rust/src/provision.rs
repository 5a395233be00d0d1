// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Site folder creation and ownership.

use crate::errors::{Error, Result};
use crate::inventory::{Server, Site};
use crate::paths::concat;
use log::{debug, info, warn};
use std::fs::DirBuilder;
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

const FOLDER_MODE: u32 = 0o755;

/// Maps operating-system account names to ids and changes file ownership.
pub trait OwnershipManager {
    fn user_id(&self, name: &str) -> Option<u32>;
    fn group_id(&self, name: &str) -> Option<u32>;
    fn chown(&self, path: &Path, uid: u32, gid: u32) -> std::io::Result<()>;
}

/// Account database and `chown` of the running host.
pub struct SystemOwnership;

impl OwnershipManager for SystemOwnership {
    fn user_id(&self, name: &str) -> Option<u32> {
        uzers::get_user_by_name(name).map(|user| user.uid())
    }

    fn group_id(&self, name: &str) -> Option<u32> {
        uzers::get_group_by_name(name).map(|group| group.gid())
    }

    fn chown(&self, path: &Path, uid: u32, gid: u32) -> std::io::Result<()> {
        std::os::unix::fs::chown(path, Some(uid), Some(gid))
    }
}

fn create_folder(path: &Path) -> Result<()> {
    DirBuilder::new()
        .recursive(true)
        .mode(FOLDER_MODE)
        .create(path)
        .map_err(|source| Error::FolderCreate {
            path: path.to_path_buf(),
            source,
        })
}

pub struct SiteProvisioner<O> {
    owner: O,
    service_account: String,
}

impl<O: OwnershipManager> SiteProvisioner<O> {
    pub fn new(owner: O, service_account: &str) -> Self {
        Self {
            owner,
            service_account: service_account.to_string(),
        }
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    fn uid(&self, name: &str) -> Result<u32> {
        self.owner.user_id(name).ok_or_else(|| Error::OsUserNotFound {
            name: name.to_string(),
        })
    }

    fn gid(&self, name: &str) -> Result<u32> {
        self.owner.group_id(name).ok_or_else(|| Error::OsGroupNotFound {
            name: name.to_string(),
        })
    }

    /// Creates `path` and hands it over to `uid:gid` unless it already
    /// exists. Returns whether the folder was created.
    fn ensure_owned(&self, path: &Path, uid: u32, gid: u32) -> Result<bool> {
        if path.exists() {
            debug!("{} already exists", path.display());
            return Ok(false);
        }
        create_folder(path)?;
        if let Err(source) = self.owner.chown(path, uid, gid) {
            // a folder left behind would be skipped as existing on the next run
            if let Err(e) = std::fs::remove_dir(path) {
                warn!("could not remove {}: {e}", path.display());
            }
            return Err(Error::Ownership {
                path: path.to_path_buf(),
                source,
            });
        }
        info!("created {} owned by {uid}:{gid}", path.display());
        Ok(true)
    }

    /// Makes sure the server roots and the site's host, library and cache
    /// folders exist. Folders created here belong to the site's cluster
    /// user (host) or the service account (library, cache), with the
    /// user's group in all cases. Existing folders are left untouched.
    pub fn ensure_site_directories(&self, server: &Server, site: &Site) -> Result<bool> {
        let roots = [
            &server.virtual_hosts_path,
            &server.virtual_library_path,
            &server.virtual_cache_path,
        ];
        for root in roots {
            create_folder(Path::new(root))?;
        }

        let (user, group) = site.owner()?;
        let user_id = self.uid(&user.os_nick)?;
        let service_id = self.uid(&self.service_account)?;
        let group_id = self.gid(&group.os_nick)?;

        let host = concat(&server.virtual_hosts_path, &site.base_path);
        let library = concat(&server.virtual_library_path, &site.base_path);
        let cache = concat(&server.virtual_cache_path, &site.base_path);

        self.ensure_owned(&host, user_id, group_id)?;
        self.ensure_owned(&library, service_id, group_id)?;
        self.ensure_owned(&cache, service_id, group_id)?;

        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::inventory::{ClusterGroup, ClusterUser};
    use crate::test_utils::{Chown, RecordingOwnership};
    use std::cell::Cell;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn server(root: &Path) -> Server {
        Server {
            virtual_library_path: root.join("lib").to_str().unwrap().to_string(),
            virtual_cache_path: root.join("cache").to_str().unwrap().to_string(),
            ..Server::builtin(root.join("vhosts").to_str().unwrap(), "/framework")
        }
    }

    fn site(group: Option<&str>) -> Site {
        Site {
            key: "acme".to_string(),
            base_path: "/acme/".to_string(),
            cluster_user: Some(ClusterUser {
                os_nick: "acme".to_string(),
                group: group.map(|name| ClusterGroup {
                    os_nick: name.to_string(),
                }),
            }),
            ..Site::builtin()
        }
    }

    fn ownership() -> RecordingOwnership {
        RecordingOwnership::new()
            .with_user("acme", 1001)
            .with_user("apache", 48)
            .with_group("webusers", 2000)
    }

    #[test]
    fn test_creates_and_chowns_site_folders() {
        let dir = TempDir::new().unwrap();
        let provisioner = SiteProvisioner::new(ownership(), "apache");

        let created = provisioner
            .ensure_site_directories(&server(dir.path()), &site(Some("webusers")))
            .unwrap();
        assert!(created);

        for folder in ["vhosts/acme", "lib/acme", "cache/acme"] {
            let path = dir.path().join(folder);
            assert!(path.is_dir(), "{folder} missing");
            let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
            // umask may clear bits, never add them
            assert_eq!(mode & !FOLDER_MODE, 0);
        }

        assert_eq!(
            provisioner.owner.chowns(),
            vec![
                Chown {
                    path: dir.path().join("vhosts/acme"),
                    uid: 1001,
                    gid: 2000
                },
                Chown {
                    path: dir.path().join("lib/acme"),
                    uid: 48,
                    gid: 2000
                },
                Chown {
                    path: dir.path().join("cache/acme"),
                    uid: 48,
                    gid: 2000
                },
            ]
        );
    }

    #[test]
    fn test_existing_folders_keep_their_owner() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("vhosts/acme")).unwrap();
        let provisioner = SiteProvisioner::new(ownership(), "apache");

        provisioner
            .ensure_site_directories(&server(dir.path()), &site(Some("webusers")))
            .unwrap();

        let chowned: Vec<_> = provisioner
            .owner
            .chowns()
            .into_iter()
            .map(|chown| chown.path)
            .collect();
        assert_eq!(
            chowned,
            vec![dir.path().join("lib/acme"), dir.path().join("cache/acme")]
        );
    }

    #[test]
    fn test_missing_cluster_group() {
        let dir = TempDir::new().unwrap();
        let provisioner = SiteProvisioner::new(ownership(), "apache");

        let err = provisioner
            .ensure_site_directories(&server(dir.path()), &site(None))
            .unwrap_err();
        assert!(matches!(err, Error::ClusterGroupNotFound { .. }));
        // roots are ensured before the owner is resolved
        assert!(dir.path().join("vhosts").is_dir());
        assert!(!dir.path().join("vhosts/acme").exists());
    }

    #[test]
    fn test_missing_os_accounts() {
        let dir = TempDir::new().unwrap();

        let provisioner = SiteProvisioner::new(RecordingOwnership::new(), "apache");
        let err = provisioner
            .ensure_site_directories(&server(dir.path()), &site(Some("webusers")))
            .unwrap_err();
        assert!(matches!(err, Error::OsUserNotFound { name } if name == "acme"));

        let provisioner = SiteProvisioner::new(
            RecordingOwnership::new()
                .with_user("acme", 1001)
                .with_user("apache", 48),
            "apache",
        );
        let err = provisioner
            .ensure_site_directories(&server(dir.path()), &site(Some("webusers")))
            .unwrap_err();
        assert!(matches!(err, Error::OsGroupNotFound { name } if name == "webusers"));
        assert!(provisioner.owner.chowns().is_empty());
    }

    /// Fails the first `chown`, then behaves like `RecordingOwnership`.
    struct FailOnce {
        failed: Cell<bool>,
        inner: RecordingOwnership,
    }

    impl OwnershipManager for FailOnce {
        fn user_id(&self, name: &str) -> Option<u32> {
            self.inner.user_id(name)
        }

        fn group_id(&self, name: &str) -> Option<u32> {
            self.inner.group_id(name)
        }

        fn chown(&self, path: &Path, uid: u32, gid: u32) -> std::io::Result<()> {
            if !self.failed.replace(true) {
                return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
            }
            self.inner.chown(path, uid, gid)
        }
    }

    #[test]
    fn test_failed_chown_removes_new_folder() {
        let dir = TempDir::new().unwrap();
        let host = dir.path().join("vhosts/acme");
        let provisioner = SiteProvisioner::new(
            FailOnce {
                failed: Cell::new(false),
                inner: ownership(),
            },
            "apache",
        );

        let err = provisioner
            .ensure_site_directories(&server(dir.path()), &site(Some("webusers")))
            .unwrap_err();
        assert!(matches!(err, Error::Ownership { path, .. } if path == host));
        assert!(!host.exists());

        provisioner
            .ensure_site_directories(&server(dir.path()), &site(Some("webusers")))
            .unwrap();
        let chowned: Vec<_> = provisioner
            .owner
            .inner
            .chowns()
            .into_iter()
            .map(|chown| (chown.path, chown.uid))
            .collect();
        assert_eq!(
            chowned,
            vec![
                (host, 1001),
                (dir.path().join("lib/acme"), 48),
                (dir.path().join("cache/acme"), 48),
            ]
        );
    }

    #[test]
    fn test_root_creation_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("vhosts");
        fs::write(&blocker, "not a folder").unwrap();
        let provisioner = SiteProvisioner::new(ownership(), "apache");

        let err = provisioner
            .ensure_site_directories(&server(dir.path()), &site(Some("webusers")))
            .unwrap_err();
        assert!(matches!(err, Error::FolderCreate { path, .. } if path == blocker));
    }
}
