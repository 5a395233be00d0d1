// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Facts reported by the control binary's `-V` output.
//!
//! Two kinds of lines are recognized:
//! 1. data lines such as `Server version: Apache/2.4.57 (Unix)`, mapped onto
//!    a fixed set of fact keys;
//! 2. compiled-in defines such as ` -D HTTPD_ROOT="/etc/httpd"` or
//!    ` -D APR_HAS_SENDFILE`, stored under the define's own name.
//!
//! Anything else is ignored.

use nom::{IResult, bytes::complete::tag, character::complete::multispace1};
use phf::phf_map;
use std::collections::BTreeMap;

pub const SERVER_VERSION: &str = "server-version";
pub const SERVER_BUILT: &str = "server-built";
pub const SERVER_MAGIC_NUMBER: &str = "server-magic-number";
pub const SERVER_ARCHITECTURE: &str = "server-architecture";
pub const SERVER_MPM: &str = "server-mpm";
pub const SERVER_MPM_THREADED: &str = "server-mpm-threaded";
pub const SERVER_MPM_FORKED: &str = "server-mpm-forked";

pub const SERVER_CONFIG_FILE: &str = "SERVER_CONFIG_FILE";
pub const HTTPD_ROOT: &str = "HTTPD_ROOT";

static DATA_LABELS: phf::Map<&'static str, &'static str> = phf_map! {
    "Server version" => SERVER_VERSION,
    "Server built" => SERVER_BUILT,
    "Server's Module Magic Number" => SERVER_MAGIC_NUMBER,
    "Architecture" => SERVER_ARCHITECTURE,
    "Server MPM" => SERVER_MPM,
    "threaded" => SERVER_MPM_THREADED,
    "forked" => SERVER_MPM_FORKED,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactValue {
    Text(String),
    Flag(bool),
}

impl FactValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FactValue::Text(s) => Some(s),
            FactValue::Flag(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerFacts {
    facts: BTreeMap<String, FactValue>,
}

impl ServerFacts {
    /// Builds a fresh fact table from the control binary's output. Parsing
    /// the same lines twice yields equal tables.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut facts = BTreeMap::new();
        for line in lines {
            let line = line.as_ref();
            if let Some((key, value)) = parse_data_line(line) {
                facts.insert(key.to_string(), FactValue::Text(value.to_string()));
            } else if let Some((name, value)) = parse_define_line(line) {
                facts.insert(name.to_string(), value);
            }
        }
        Self { facts }
    }

    pub fn get(&self, key: &str) -> Option<&FactValue> {
        self.facts.get(key)
    }

    /// Text value of a fact; boolean defines have none.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FactValue::as_str)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Splits on the first colon that is followed by whitespace.
fn split_label(line: &str) -> Option<(&str, &str)> {
    let mut chars = line.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if c == ':' && chars.peek().is_some_and(|(_, next)| next.is_whitespace()) {
            return Some((line.get(..idx)?, line.get(idx + 1..)?));
        }
    }
    None
}

fn parse_data_line(line: &str) -> Option<(&'static str, &str)> {
    let (label, value) = split_label(line)?;
    let key = DATA_LABELS.get(label.trim())?;
    Some((key, value.trim()))
}

fn define_prefix(input: &str) -> IResult<&str, ()> {
    let (input, _) = multispace1(input)?;
    let (input, _) = tag("-D")(input)?;
    let (input, _) = multispace1(input)?;
    Ok((input, ()))
}

fn parse_define_line(line: &str) -> Option<(&str, FactValue)> {
    let (rest, ()) = define_prefix(line).ok()?;
    match rest.split_once('=') {
        Some((name, value)) => Some((name, FactValue::Text(value.replace('"', "")))),
        None => {
            let name = rest.trim_end();
            (!name.is_empty()).then_some((name, FactValue::Flag(true)))
        }
    }
}
