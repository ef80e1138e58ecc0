// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use roster_app::{AppState, Location};
use roster_faker::PeopleFaker;
use roster_store::Store;
use roster_tui::UiOptions;
use runtime::StoreRuntime;
use std::env;
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `roster --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    let location = startup_location(&options, &config)?;
    let log_path = config.log_path()?;
    if options.check_only {
        logging::env_filter(config.log_level())?;
        println!("config ok: {}", options.config_path.display());
        return Ok(());
    }

    logging::init_logging(&log_path, config.log_level())?;

    let seed = options
        .seed
        .or_else(|| config.seed())
        .unwrap_or_else(clock_seed);
    let people = PeopleFaker::new(seed).people(config.record_count());
    let mut store = Store::from_people(people)
        .with_context(|| format!("build directory from seed {seed}; try another --seed"))?;
    info!(
        seed,
        records = store.len(),
        location = %location,
        "directory ready"
    );

    let mut state = AppState::from_location(&location, config.page_size());
    let ui_options = UiOptions {
        operator: config.operator().to_owned(),
    };
    let mut runtime = StoreRuntime::new(&mut store);
    roster_tui::run_app(&mut state, &mut runtime, &ui_options)?;

    let final_location = state.location();
    info!(location = %final_location, "session ended");
    println!("{final_location}");
    Ok(())
}

/// `--location` wins over the configured start page; `--query` then replaces
/// whatever query the location carried.
fn startup_location(options: &CliOptions, config: &Config) -> Result<Location> {
    let location = match &options.location {
        Some(raw) => Location::parse(raw)?,
        None => Location::default().with_section(config.start_page()),
    };
    Ok(match &options.query {
        Some(query) => location.with_query(query),
        None => location,
    })
}

fn clock_seed() -> u64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    (nanos as u64) ^ ((nanos >> 64) as u64)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    location: Option<String>,
    query: Option<String>,
    seed: Option<u64>,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        location: None,
        query: None,
        seed: None,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--location" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--location requires a path such as /people?query=design"))?;
                options.location = Some(value.as_ref().to_owned());
            }
            "--query" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--query requires search text"))?;
                options.query = Some(value.as_ref().to_owned());
            }
            "--seed" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--seed requires a number"))?;
                let seed = value.as_ref().parse::<u64>().with_context(|| {
                    format!("invalid --seed {:?}; use a non-negative integer", value.as_ref())
                })?;
                options.seed = Some(seed);
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("roster: people directory console");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --location <path>        Start at a location, e.g. /people?query=design");
    println!("  --query <text>           Start with a search query applied");
    println!("  --seed <n>               Generate the directory from a fixed seed");
    println!("  --check                  Validate config and startup options, then exit");
    println!("  --help                   Show this help");
}
