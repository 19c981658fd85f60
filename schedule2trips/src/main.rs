// Copyright (C) 2025 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};
use transit_schedule::{configuration, read_utils, schedule, write, Result};

lazy_static::lazy_static! {
    pub static ref GIT_VERSION: String = transit_schedule::binary_full_version(env!("CARGO_PKG_VERSION"));
}

fn get_version() -> &'static str {
    &GIT_VERSION
}

#[derive(Debug, Parser)]
#[command(
    name = "schedule2trips",
    about = "Generate the trips of transit schedules.",
    version = get_version()
)]
struct Opt {
    /// JSON file containing an array of schedules.
    #[arg(short = 's', long = "schedules")]
    schedules: PathBuf,

    /// JSON file containing the lines and paths.
    #[arg(short = 'p', long = "paths")]
    paths: PathBuf,

    /// JSON file containing the generation configuration.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Shortname of the period to generate, all the periods if not set.
    #[arg(long = "period")]
    period: Option<String>,

    /// Output directory.
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Output report file path.
    #[arg(short = 'r', long = "report")]
    report: Option<PathBuf>,
}

fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter_subscriber = EnvFilter::try_new(rust_log).unwrap_or_else(|e| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            e,
        );
        EnvFilter::new(default_level.to_string())
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter_subscriber)
        .init();
}

fn run(opt: Opt) -> Result<()> {
    info!("Launching schedule2trips...");

    let config = configuration::read_config(opt.config)?;
    let collections = read_utils::read_collections(opt.paths)?;
    let mut schedules = read_utils::read_schedules(opt.schedules)?;

    let report = schedule::generate_batch(
        &mut schedules,
        opt.period.as_deref(),
        &collections,
        &config,
    );

    std::fs::create_dir_all(&opt.output)?;
    write::write_trips_and_stop_times(&opt.output, &schedules, &collections)?;
    write::write_schedules(&opt.output, &schedules)?;
    if let Some(report_path) = opt.report {
        write::write_report(&report_path, &report)?;
    }
    Ok(())
}

fn main() {
    init_logger();
    if let Err(err) = run(Opt::parse()) {
        for cause in err.chain() {
            eprintln!("{cause}");
        }
        std::process::exit(1);
    }
}
