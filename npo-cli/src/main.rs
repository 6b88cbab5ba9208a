mod cli;
mod commands;
mod config;
mod error;

use crate::{
    cli::{Args, Commands},
    commands::CommandExecutor,
    config::AppConfig,
    error::Result,
};
use clap::Parser;
#[cfg(feature = "colored-output")]
use colored::*;
use npo_parser::extractor::UrlMode;
use std::process;
use tracing::{Level, debug, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(args).await {
        error!("Application error: {}", e);
        #[cfg(feature = "colored-output")]
        {
            eprintln!("{} {}", "[!]".red().bold(), e);
        }
        #[cfg(not(feature = "colored-output"))]
        {
            eprintln!("[!] {}", e);
        }
        process::exit(e.exit_code());
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(cookies) = args.cookies {
        config.cookie_file = cookies;
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if args.legacy {
        config.url_mode = UrlMode::Legacy;
    }
    if args.proxy.is_some() {
        config.proxy = args.proxy;
    }
    debug!("Effective configuration: {:?}", config);

    match args.command {
        Commands::Resolve { url } => {
            let executor = CommandExecutor::new(config)?;
            println!("{}", executor.resolve(&url).await?);
        }

        Commands::Extract { url, downloader } => {
            let executor = CommandExecutor::new(config)?;
            executor.extract(&url, downloader.as_deref()).await?;
        }

        Commands::Completions { shell } => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Args::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        }

        Commands::Config { show, reset } => {
            if reset {
                AppConfig::reset(args.config.as_deref())?;
                println!("Configuration reset to defaults");
            } else if show {
                println!("{}", config.show()?);
            } else {
                println!(
                    "Use --show to display current configuration or --reset to reset to defaults"
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(verbose)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
