// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Apache configuration documents.
//!
//! Every document starts with the same license block and a descriptor
//! naming its kind, followed by a body built by the concrete renderer.
//! Bodies take a padding prefix so they can be nested inside other blocks.

pub mod index;
pub mod site;
pub mod standalone;

use crate::errors::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};

pub use index::SiteIndex;
pub use site::SiteFile;
pub use standalone::StandaloneFile;

pub const RULE: &str =
    "# ===========================================================================";

const LICENSE: &[&str] = &[
    "# Generated by vhostgen. Manual changes are lost on the next run.",
    "#",
    "# Licensed under the Apache License, Version 2.0 (the \"License\");",
    "# you may not use this file except in compliance with the License.",
    "# You may obtain a copy of the License at",
    "#",
    "#     http://www.apache.org/licenses/LICENSE-2.0",
    "#",
    "# Unless required by applicable law or agreed to in writing, software",
    "# distributed under the License is distributed on an \"AS IS\" BASIS,",
    "# WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.",
    "# See the License for the specific language governing permissions and",
    "# limitations under the License.",
];

/// One nesting level inside an Apache block.
pub const INDENT: &str = "        ";

const COMMON_FRAGMENT_EXTENSION: &str = "conf";

/// Rendered text, one entry per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    lines: Vec<String>,
}

impl RenderedDocument {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains_line(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l.trim() == line)
    }

    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_text()).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("wrote {} lines to {}", self.lines.len(), path.display());
        Ok(())
    }
}

/// A document kind able to produce its body.
pub trait ConfigRenderer {
    /// Title placed in the descriptor block.
    fn descriptor(&self) -> &'static str;

    /// Appends the body to `out`, every line prefixed with `padding`.
    fn body(&self, padding: &str, out: &mut Vec<String>) -> Result<()>;

    /// Full document. Fails without producing anything when a required
    /// relation is missing.
    fn render(&self) -> Result<RenderedDocument> {
        let mut lines = vec![RULE.to_string(), format!("# {}", self.descriptor())];
        lines.push(RULE.to_string());
        lines.extend(LICENSE.iter().map(|line| line.to_string()));
        lines.push(RULE.to_string());
        lines.push(String::new());
        self.body("", &mut lines)?;
        Ok(RenderedDocument { lines })
    }
}

/// `padding` followed by `depth` levels of indentation.
pub(crate) fn indent(padding: &str, depth: usize) -> String {
    format!("{padding}{}", INDENT.repeat(depth))
}

/// Sorted `*.conf` files directly inside `folder`.
fn common_fragments(folder: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("no common fragments in {}: {e}", folder.display());
            return Vec::new();
        }
    };
    let mut fragments: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == COMMON_FRAGMENT_EXTENSION)
        })
        .collect();
    fragments.sort();
    fragments
}

/// `Include` lines for the shared fragments of a site.
pub(crate) fn populate_common_docs(padding: &str, folder: &Path, out: &mut Vec<String>) {
    for fragment in common_fragments(folder) {
        out.push(format!("{padding}Include {}", fragment.display()));
    }
}

/// Scripting-module directives guarded by `<IfModule>`. Nothing is emitted
/// when the module could not be resolved.
pub(crate) fn scripting_block(
    padding: &str,
    module: Option<&str>,
    open_basedir: &[String],
    include_path: Option<&Path>,
    out: &mut Vec<String>,
) {
    let Some(module) = module else {
        return;
    };
    let inner = indent(padding, 1);
    let open_basedir: Vec<&str> = open_basedir
        .iter()
        .map(String::as_str)
        .filter(|entry| !entry.is_empty())
        .collect();
    out.push(format!("{padding}<IfModule {module}>"));
    out.push(format!("{inner}php_admin_flag engine on"));
    out.push(format!("{inner}php_admin_flag safe_mode off"));
    out.push(format!(
        "{inner}php_admin_value open_basedir \"{}\"",
        open_basedir.join(":")
    ));
    if let Some(include_path) = include_path {
        out.push(format!(
            "{inner}php_value include_path \".:{}\"",
            include_path.display()
        ));
    }
    out.push(format!("{padding}</IfModule>"));
}
