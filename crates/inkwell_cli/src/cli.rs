use clap::{Args, Parser, Subcommand};
use inkwell_core::ArticleQueryParams;
use inkwell_server::ServerConfig;
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "inkwell")]
#[command(about = "Blog article store with a filtered listing API", version)]
pub struct Cli {
    /// Log level (trace|debug|info|warn|error); overrides INKWELL_LOG_LEVEL.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Write rolling log files here instead of stderr; overrides INKWELL_LOG_DIR.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// SQLite database file; overrides INKWELL_DB_PATH.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Insert demo authors, categories and articles into an empty store
    Seed,
    /// Run an article listing locally and print it as JSON
    Articles(ArticlesArgs),
    /// Print core linkage and version
    Ping,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Overrides INKWELL_BIND.
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Overrides INKWELL_PORT.
    #[arg(long)]
    pub port: Option<u16>,

    /// Seed demo content before serving.
    #[arg(long)]
    pub seed: bool,
}

/// Listing filters, passed through as raw strings so they are validated the
/// same way the HTTP endpoint validates them.
#[derive(Debug, Args)]
pub struct ArticlesArgs {
    #[arg(long)]
    pub category: Option<String>,

    /// Comma-separated tag names.
    #[arg(long)]
    pub tags: Option<String>,

    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub offset: Option<String>,

    #[arg(long)]
    pub limit: Option<String>,
}

impl ArticlesArgs {
    pub fn to_params(&self) -> ArticleQueryParams {
        ArticleQueryParams {
            category: self.category.clone(),
            tags: self.tags.clone(),
            search: self.search.clone(),
            offset: self.offset.clone(),
            limit: self.limit.clone(),
        }
    }
}

impl Cli {
    /// Layers command-line flags over an environment-derived config.
    pub fn apply_to(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(level) = self.log_level.as_ref() {
            config.log_level = level.clone();
        }
        if let Some(dir) = self.log_dir.as_ref() {
            config.log_dir = Some(dir.clone());
        }
        if let Some(db) = self.db.as_ref() {
            config.db_path = db.clone();
        }
        if let Command::Serve(serve) = &self.command {
            if let Some(bind) = serve.bind {
                config.bind = bind;
            }
            if let Some(port) = serve.port {
                config.port = port;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use inkwell_server::ServerConfig;
    use std::path::PathBuf;

    #[test]
    fn flags_override_config_values() {
        let cli = Cli::try_parse_from([
            "inkwell",
            "serve",
            "--port",
            "9001",
            "--db",
            "/tmp/x.sqlite3",
            "--log-level",
            "warn",
        ])
        .unwrap();
        let config = cli.apply_to(ServerConfig::default());
        assert_eq!(config.port, 9001);
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.sqlite3"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.bind.to_string(), "127.0.0.1");
    }

    #[test]
    fn articles_arguments_stay_raw() {
        let cli = Cli::try_parse_from([
            "inkwell",
            "articles",
            "--tags",
            "ml, nlp",
            "--limit",
            "abc",
        ])
        .unwrap();
        let Command::Articles(args) = &cli.command else {
            panic!("expected articles command");
        };
        let params = args.to_params();
        assert_eq!(params.tags.as_deref(), Some("ml, nlp"));
        assert_eq!(params.limit.as_deref(), Some("abc"));
        assert_eq!(params.category, None);
    }

    #[test]
    fn serve_flags_are_ignored_for_other_commands() {
        let cli = Cli::try_parse_from(["inkwell", "seed"]).unwrap();
        assert_eq!(cli.apply_to(ServerConfig::default()), ServerConfig::default());
    }
}
