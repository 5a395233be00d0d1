// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::undocumented_unsafe_blocks)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

pub mod cli;
pub mod config;
pub mod errors;
pub mod facts;
pub mod inventory;
pub mod layout;
pub mod locator;
pub mod orchestrator;
pub mod paths;
pub mod process;
pub mod provision;
pub mod render;
pub mod trace;

#[cfg(test)]
pub(crate) mod test_utils;

pub use errors::{Error, Result};
pub use layout::Topology;
pub use locator::{ApacheLocator, ServerIntrospector, ServerLocation};
pub use orchestrator::Orchestrator;
