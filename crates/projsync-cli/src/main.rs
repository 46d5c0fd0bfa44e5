// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;

use anyhow::{Context, Result};
use config::Config;
use projsync_app::ProjectService;
use projsync_testkit::MemoryService;
use projsync_tui::{Controller, UiOptions};
use std::env;
use std::path::PathBuf;

const DEMO_SEED: u64 = 2026;
const DEMO_PROJECTS: usize = 12;

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
            "load config {}; run `projsync --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let log_path = config.log_path()?;
    logging::init_logging(config.log_level(), &log_path)?;

    let (mut service, origin) = build_service(&options, &config)?;
    tracing::info!(%origin, demo = options.demo, "starting projsync");

    if options.check_only {
        let count = check(service.as_mut(), &origin)?;
        println!("ok: {count} projects at {origin}");
        return Ok(());
    }

    let mut controller = Controller::new(service, config.messages().clone());
    projsync_tui::run_app(
        &mut controller,
        UiOptions {
            notification_ttl: config.notification_ttl(),
        },
    )
}

fn build_service(
    options: &CliOptions,
    config: &Config,
) -> Result<(Box<dyn ProjectService>, String)> {
    if options.demo {
        let service = MemoryService::seeded(DEMO_SEED, DEMO_PROJECTS);
        return Ok((Box::new(service), "in-memory demo data".to_owned()));
    }

    let base_url = config.api_base_url(options.base_url.as_deref());
    let client =
        projsync_api::Client::with_headers(base_url, config.api_timeout()?, config.api_headers())
            .with_context(|| {
                format!(
                    "invalid [api] config in {}; fix base_url/timeout/headers values",
                    options.config_path.display()
                )
            })?;
    let origin = client.base_url().to_owned();
    Ok((Box::new(client), origin))
}

fn check(service: &mut dyn ProjectService, origin: &str) -> Result<usize> {
    let projects = service
        .list()
        .with_context(|| format!("list projects from {origin}"))?;
    Ok(projects.len())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    base_url: Option<String>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
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
        base_url: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--base-url" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--base-url requires a URL"))?;
                options.base_url = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("projsync");
    println!("  --config <path>          Use a specific config path");
    println!("  --base-url <url>         Override [api].base_url");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Run against seeded in-memory projects");
    println!("  --check                  Validate config and fetch the project list once");
    println!("  --help                   Show this help");
}
