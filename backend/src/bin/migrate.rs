//! Apply pending database migrations to the contact store.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;

use clap::Parser;
use ortho_config::OrthoConfig;
use tracing::info;

use backend::config::DatabaseSettings;
use backend::outbound::persistence::run_pending_migrations;
use backend::telemetry;

/// `migrate` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "migrate",
    about = "Apply pending contact store migrations",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `CONTACTS_DATABASE_URL` when
    /// omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    telemetry::init_tracing();

    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url)?;

    run_pending_migrations(&database_url)
        .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;

    info!("contact store migrations up to date");
    Ok(())
}

fn resolve_database_url(from_args: Option<String>) -> io::Result<String> {
    if let Some(url) = from_args {
        return Ok(url);
    }

    let settings = DatabaseSettings::load_from_iter([OsString::from("migrate")])
        .map_err(|error| io::Error::other(format!("load database settings: {error}")))?;
    Ok(settings.database_url)
}
