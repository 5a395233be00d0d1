// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use log::info;
use std::fmt::Display;

const TRACE_TARGET: &str = "vhostgen::trace";

/// Key/value trace records for the objects a run touches (server, site,
/// binary...). Passed explicitly to the components that emit them.
#[derive(Debug, Clone, Copy)]
pub struct TraceContext {
    enabled: bool,
}

impl TraceContext {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn trace_log(&self, key: &str, value: impl Display) {
        if self.enabled {
            info!(target: TRACE_TARGET, "{key}: {value}");
        }
    }
}
