use std::path::PathBuf;
use std::time::Duration;

use clap::{Arg, ArgAction, ArgMatches, value_parser};
use libroomtune_player::roomtune_player::{Settings, SimulatedSettings};

use crate::clap_base_command;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SPEED: f64 = 1.0;
const DEFAULT_DURATION_SECS: u64 = 180;
const DEFAULT_EVENT_CAPACITY: usize = 32;

pub fn command() -> clap::Command {
    clap_base_command()
        .name("roomtuned")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Plays requested tracks in chat rooms, one queue per room")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .env("ROOMTUNE_LOG")
                .default_value(DEFAULT_LOG_LEVEL)
                .help("Log filter, either a level or a full tracing directive"),
        )
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .env("ROOMTUNE_LOG_DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Directory for the daily log file [default: the user data directory]"),
        )
        .arg(
            Arg::new("no-log-file")
                .long("no-log-file")
                .action(ArgAction::SetTrue)
                .help("Only log to stderr"),
        )
        .arg(
            Arg::new("speed")
                .long("speed")
                .env("ROOMTUNE_SPEED")
                .default_value("1.0")
                .value_parser(parse_speed)
                .help("Simulated playback speed factor"),
        )
        .arg(
            Arg::new("default-duration-secs")
                .long("default-duration-secs")
                .env("ROOMTUNE_DEFAULT_DURATION")
                .default_value("180")
                .value_parser(value_parser!(u64))
                .help("Length assumed for tracks without a known duration"),
        )
        .arg(
            Arg::new("event-capacity")
                .long("event-capacity")
                .env("ROOMTUNE_EVENT_CAPACITY")
                .default_value("32")
                .value_parser(parse_capacity)
                .help("Player events buffered per subscriber"),
        )
        .arg(
            Arg::new("yt-dlp-path")
                .long("yt-dlp-path")
                .env("YT_DLP_PATH")
                .help("yt-dlp executable [default: looked up in PATH]"),
        )
}

fn parse_speed(value: &str) -> Result<f64, String> {
    let speed: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(format!("speed must be a positive number, got {speed}"))
    }
}

fn parse_capacity(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("capacity must be at least 1".to_owned()),
        Ok(capacity) => Ok(capacity),
        Err(e) => Err(format!("{e}")),
    }
}

fn default_log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "roomtune").map(|dirs| dirs.data_dir().join("logs"))
}

#[derive(Clone, Debug)]
pub struct Config {
    pub log_level: String,
    /// `None` disables the log file.
    pub log_dir: Option<PathBuf>,
    pub speed: f64,
    pub default_duration: Duration,
    pub event_capacity: usize,
    pub yt_dlp_path: Option<String>,
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let log_dir = if matches.get_flag("no-log-file") {
            None
        } else {
            matches
                .get_one::<PathBuf>("log-dir")
                .cloned()
                .or_else(default_log_dir)
        };

        Self {
            log_level: matches
                .get_one::<String>("log-level")
                .cloned()
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
            log_dir,
            speed: matches.get_one("speed").copied().unwrap_or(DEFAULT_SPEED),
            default_duration: Duration::from_secs(
                matches
                    .get_one("default-duration-secs")
                    .copied()
                    .unwrap_or(DEFAULT_DURATION_SECS),
            ),
            event_capacity: matches
                .get_one("event-capacity")
                .copied()
                .unwrap_or(DEFAULT_EVENT_CAPACITY),
            yt_dlp_path: matches.get_one::<String>("yt-dlp-path").cloned(),
        }
    }

    pub fn player_settings(&self) -> Settings {
        Settings {
            event_capacity: self.event_capacity,
        }
    }

    pub fn simulated_settings(&self) -> SimulatedSettings {
        SimulatedSettings {
            speed: self.speed,
            default_duration: self.default_duration,
        }
    }
}

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;
