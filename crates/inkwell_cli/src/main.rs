//! `inkwell` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration (environment, then flags) and initialize logging.
//! - Dispatch to the server, the seeder or a local article listing.

mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::{ArticlesArgs, Cli, Command};
use inkwell_core::db::open_db;
use inkwell_core::{seed_demo_content, ArticleService, SqliteArticleRepository};
use inkwell_server::ServerConfig;
use log::info;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.apply_to(ServerConfig::from_env()?);
    init_logging(&config)?;

    match &cli.command {
        Command::Serve(args) => {
            if args.seed {
                seed(&config)?;
            }
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(inkwell_server::run(&config))?;
        }
        Command::Seed => seed(&config)?,
        Command::Articles(args) => list_articles(&config, args)?,
        Command::Ping => {
            println!("inkwell_core ping={}", inkwell_core::ping());
            println!("inkwell_core version={}", inkwell_core::core_version());
        }
    }
    Ok(())
}

fn init_logging(config: &ServerConfig) -> Result<()> {
    let result = match config.log_dir.as_ref() {
        Some(dir) => {
            let dir = dir
                .to_str()
                .ok_or_else(|| anyhow!("log directory is not valid UTF-8"))?;
            inkwell_core::init_logging(&config.log_level, dir)
        }
        None => inkwell_core::init_stderr_logging(&config.log_level),
    };
    result.map_err(|err| anyhow!(err))
}

fn seed(config: &ServerConfig) -> Result<()> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let outcome = seed_demo_content(&conn)?;
    info!("event=cli_seed module=cli status=ok outcome={outcome:?}");
    println!("{outcome:?}");
    Ok(())
}

fn list_articles(config: &ServerConfig, args: &ArticlesArgs) -> Result<()> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let service = ArticleService::new(SqliteArticleRepository::try_new(&conn)?);
    let articles = service.list_articles(&args.to_params())?;
    println!("{}", serde_json::to_string_pretty(&articles)?);
    Ok(())
}
