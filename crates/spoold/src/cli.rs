use clap::{Parser, Subcommand, ValueEnum};
use infrastructure::config::{LogFormat, LogLevel};
use infrastructure::constants::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(
    name = "spoold",
    about = "Durable audit trail spooling and emission",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "AUDISPOOL_CONFIG")]
    pub config: String,

    /// Log level override (takes precedence over config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevelArg>,

    /// Log format: json (default, production) or text (development)
    #[arg(long)]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the flush scheduler daemon (default)
    Run,

    /// Flush every sink's backlog once and exit
    Flush {
        /// Restrict the flush to one sink
        #[arg(long)]
        sink: Option<String>,
    },

    /// Show backlog and dead-letter counts per sink
    Backlog,

    /// Parse and validate the configuration, then exit
    CheckConfig,

    /// Display version information
    Version,
}

/// clap-facing mirror of [`LogLevel`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
            LogLevelArg::Trace => Self::Trace,
        }
    }
}

/// clap-facing mirror of [`LogFormat`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Json,
    Text,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Json => Self::Json,
            LogFormatArg::Text => Self::Text,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["spoold"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn flush_accepts_a_sink_filter() {
        let cli = Cli::try_parse_from(["spoold", "flush", "--sink", "central"]).unwrap();
        let Some(Command::Flush { sink }) = cli.command else {
            panic!("expected flush command");
        };
        assert_eq!(sink.as_deref(), Some("central"));
    }
}
