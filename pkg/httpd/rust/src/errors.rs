// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;
use thiserror::Error;

/// Precondition violations that abort the current render or provisioning
/// step. Introspection failures are not represented here: they leave the
/// `ServerLocation` partially populated instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("server not found: {key}")]
    ServerNotFound { key: String },

    #[error("server {key} located but unusable: no configuration directory resolved")]
    ServerUnusable { key: String },

    #[error("site not found: {key}")]
    SiteNotFound { key: String },

    #[error("site not published: {key}")]
    SiteNotPublished { key: String },

    #[error("site {site} has no cluster user")]
    ClusterUserNotFound { site: String },

    #[error("cluster user {user} of site {site} has no group")]
    ClusterGroupNotFound { site: String, user: String },

    #[error("site {site} has no translation for language {language}")]
    TranslationNotFound { site: String, language: String },

    #[error("operating system user not found: {name}")]
    OsUserNotFound { name: String },

    #[error("operating system group not found: {name}")]
    OsGroupNotFound { name: String },

    #[error("folder not found: {}", path.display())]
    FolderNotFound { path: PathBuf },

    #[error("could not create folder {}: {source}", path.display())]
    FolderCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not change ownership of {}: {source}", path.display())]
    Ownership {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
