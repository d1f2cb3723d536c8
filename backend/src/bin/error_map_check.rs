//! Validate an error-mapping file and print the classification it defines.
//!
//! # Examples
//! ```sh
//! cargo run --manifest-path backend/Cargo.toml --bin error-map-check -- --path fixtures/error-map.json
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tenant_backend::RepositorySettings;
use tenant_backend::domain::ErrorMappingTable;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `error-map-check` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "error-map-check",
    about = "Validate an error-mapping JSON file and list its entries",
    version
)]
struct CliArgs {
    /// Mapping file to check. Falls back to `TENANT_BACKEND_ERROR_MAP_PATH`
    /// and then the bundled fixture.
    #[arg(long, value_name = "path")]
    path: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let args = CliArgs::parse();
    let path = match args.path {
        Some(path) => path,
        None => RepositorySettings::load_from_iter([OsString::from("error-map-check")])
            .map_err(|error| eyre!("failed to load settings: {error}"))?
            .error_map_path(),
    };

    let table = ErrorMappingTable::from_file(&path)
        .wrap_err_with(|| format!("error map at {} is invalid", path.display()))?;
    info!(path = %path.display(), entries = table.len(), "error map is valid");

    write_report(&mut io::stdout().lock(), &table).wrap_err("failed to write report")
}

fn write_report(out: &mut impl Write, table: &ErrorMappingTable) -> io::Result<()> {
    for (failure, entry) in table.sorted_entries() {
        writeln!(out, "{failure}\t{}\t{}", entry.kind(), entry.template())?;
    }
    let default = table.default_entry();
    writeln!(
        out,
        "{}\t{}\t{}",
        ErrorMappingTable::DEFAULT_LABEL,
        default.kind(),
        default.template()
    )
}
