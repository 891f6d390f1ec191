/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

/// Command-line interface module for kubeshift.
pub mod commands;
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Long flag names that are also accepted with a single leading dash.
const LONG_FLAGS: [&str; 6] = [
    "kubeconfig",
    "cluster_a_context",
    "cluster-a-context",
    "cluster_b_context",
    "cluster-b-context",
    "namespace",
];

/// Copy all Deployments of a namespace from one cluster to another through a
/// shared kubeconfig.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the kubeconfig file [default: $HOME/.kube/config]
    #[arg(long = "kubeconfig", value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Context of the source cluster (defaults to the current context)
    #[arg(
        long = "cluster_a_context",
        alias = "cluster-a-context",
        value_name = "NAME",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub cluster_a_context: Option<String>,

    /// Context of the destination cluster
    #[arg(
        long = "cluster_b_context",
        alias = "cluster-b-context",
        value_name = "NAME",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub cluster_b_context: String,

    /// Namespace to copy
    #[arg(
        long = "namespace",
        value_name = "NAME",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub namespace: String,
}

/// Rewrites `-name` and `-name=value` to `--name` and `--name=value` for the
/// known long flags. Everything after a bare `--` is left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split('=').next().unwrap_or(rest);
                    if LONG_FLAGS.contains(&name) {
                        OsString::from(format!("-{}", text))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

/// Parses command-line arguments into the Cli structure.
///
/// Long flags are accepted with one or two dashes. Usage errors, including
/// missing required flags, print help to stderr and exit with status 1.
/// `--help` and `--version` exit with status 0.
pub fn parse_cli() -> Cli {
    Cli::try_parse_from(normalize_args(std::env::args_os())).unwrap_or_else(|e| {
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        std::process::exit(code);
    })
}
