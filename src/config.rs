//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::{
    anti_sleep::{MAX_INTERVAL_SECS, MIN_INTERVAL_SECS},
    Defaults,
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "nightcap")]
#[command(about = "A state-managed control server for anti-sleep clicking and delayed shutdown")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Default seconds between anti-sleep clicks
    #[arg(
        short,
        long,
        default_value = "60",
        value_parser = clap::value_parser!(u64).range(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS)
    )]
    pub interval: u64,

    /// Default shutdown offset, hours part
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(0..=23))]
    pub hours: u32,

    /// Default shutdown offset, minutes part
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(0..=59))]
    pub minutes: u32,

    /// Log clicks and shutdown commands instead of performing them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Values used when a request leaves the interval or offset out
    pub fn defaults(&self) -> Defaults {
        Defaults {
            interval_seconds: self.interval,
            hours: self.hours,
            minutes: self.minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_input_widgets() {
        let config = Config::try_parse_from(["nightcap"]).unwrap();
        assert_eq!(config.defaults(), Defaults::default());
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn interval_outside_range_is_rejected() {
        assert!(Config::try_parse_from(["nightcap", "--interval", "9"]).is_err());
        assert!(Config::try_parse_from(["nightcap", "--interval", "3601"]).is_err());
        assert!(Config::try_parse_from(["nightcap", "-i", "3600"]).is_ok());
    }

    #[test]
    fn offset_outside_range_is_rejected() {
        assert!(Config::try_parse_from(["nightcap", "--hours", "24"]).is_err());
        assert!(Config::try_parse_from(["nightcap", "--minutes", "60"]).is_err());

        let config = Config::try_parse_from(["nightcap", "--hours", "0", "--minutes", "45"]).unwrap();
        assert_eq!(config.defaults().hours, 0);
        assert_eq!(config.defaults().minutes, 45);
    }
}
