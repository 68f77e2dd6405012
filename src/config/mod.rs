pub mod data_source;

use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use dotenv::dotenv;

pub use data_source::DataSource;

#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Base url of the content API
    #[arg(long, env = "BLOG_API_URL", default_value = "http://localhost:1337")]
    base_url: String,
    /// Where posts come from
    #[arg(long, env = "BLOG_SOURCE", default_value = "remote")]
    source: DataSource,
    /// Session store file
    #[arg(long, env = "BLOG_STORE", default_value = "./blogspace.db")]
    store: PathBuf,
    /// Publish delay of the local source, in milliseconds
    #[arg(long, default_value = "1000")]
    delay: u64,
    /// Retry transient request failures this many times
    #[arg(long, default_value = "0")]
    retries: u32,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Show the latest posts
    List,
    /// Publish a new post
    Publish {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
        /// Comma separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Remember an identity and an already issued token
    Login {
        #[arg(short, long)]
        name: String,
        #[arg(short, long, env = "BLOG_TOKEN")]
        token: String,
    },
    /// Forget the stored identity and token
    Logout,
}

impl Config {
    /// Parse the configuration from the environment and command line arguments
    pub fn parse() -> Self {
        dotenv().ok();
        <Self as Parser>::parse()
    }
    /// Create a logger with the configured verbosity level
    pub fn init_logger(&self) {
        env_logger::Builder::new()
            .filter_level(self.verbose.log_level_filter())
            .format_target(false)
            .init();
    }
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
    pub const fn source(&self) -> DataSource {
        self.source
    }
    pub const fn store(&self) -> &PathBuf {
        &self.store
    }
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay)
    }
    pub const fn retries(&self) -> u32 {
        self.retries
    }
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::List)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_remote_listing() {
        let config = Config::try_parse_from(["blogspace"]).unwrap();
        assert_eq!(config.source(), DataSource::Remote);
        assert_eq!(config.command(), Command::List);
        assert_eq!(config.retries(), 0);
        assert_eq!(config.delay(), Duration::from_millis(1000));
    }

    #[test]
    fn trims_trailing_slash() {
        let config =
            Config::try_parse_from(["blogspace", "--base-url", "https://cms.example.com/"]).unwrap();
        assert_eq!(config.base_url(), "https://cms.example.com");
    }

    #[test]
    fn parses_publish() {
        let config = Config::try_parse_from([
            "blogspace",
            "--source",
            "local",
            "publish",
            "-t",
            "Hello",
            "-c",
            "World",
            "--tags",
            "a, b",
        ])
        .unwrap();
        assert_eq!(config.source(), DataSource::Local);
        assert_eq!(
            config.command(),
            Command::Publish {
                title: "Hello".into(),
                content: "World".into(),
                tags: "a, b".into(),
            }
        );
    }
}
