//! Configuration management for cardform.
//!
//! Handles:
//! - Command-line argument parsing
//! - Optional TOML config file (`--config`, or `./cardform.toml`)
//! - Card type rule directories
//! - Trail animation settings

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::card::CardTypeRegistry;
use crate::trail::RibbonStyle;

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "cardform.toml";

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "cardform")]
#[command(about = "Credit card form validation engine with a cursor trail animation")]
#[command(version)]
pub struct Args {
    /// Extra directory of card type TOML files
    #[arg(long, global = true, help = "Directory containing card type TOML files")]
    pub rules_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true, help = "Path to a cardform TOML config file")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(
        long,
        global = true,
        help = "Log level (trace, debug, info, warn, error) [default: info]"
    )]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Read form events as JSON lines on stdin, answer on stdout
    Serve,
    /// Validate one set of field values and print the resulting state
    Check {
        #[arg(long, default_value = "")]
        number: String,
        #[arg(long, default_value = "")]
        expiry: String,
        #[arg(long, default_value = "")]
        cvv: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Feed pointer samples from stdin into the trail and print frames
    Trail {
        #[arg(long, default_value_t = 60)]
        frames: usize,
    },
}

/// Trail animation settings
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Pointer samples kept
    pub capacity: usize,
    /// Frames per second
    pub fps: u32,
    /// Viewport size in CSS pixels
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
    pub style: RibbonStyle,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            capacity: crate::trail::DEFAULT_TRAIL_CAPACITY,
            fps: 60,
            width: 1280.0,
            height: 720.0,
            device_pixel_ratio: 1.0,
            style: RibbonStyle::default(),
        }
    }
}

impl TrailConfig {
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

/// Contents of a config file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub rules_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub trail: TrailConfig,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,
    /// Rule directories, lowest priority first
    pub rules_dirs: Vec<PathBuf>,
    pub log_level: String,
    pub trail: TrailConfig,
    /// Config file that was loaded, if any
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let config_path = args.config.or_else(|| {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            local.exists().then_some(local)
        });

        let file = match &config_path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let mut rules_dirs = Vec::new();

        // User config directory has the lowest priority
        if let Some(config_dir) = dirs::config_dir() {
            rules_dirs.push(config_dir.join("cardform").join("card-types"));
        }
        if let Some(dir) = file.rules_dir {
            rules_dirs.push(dir);
        }
        if let Some(dir) = args.rules_dir {
            rules_dirs.push(dir);
        }

        Ok(Config {
            command: args.command.unwrap_or(Command::Serve),
            rules_dirs,
            log_level: args
                .log_level
                .or(file.log_level)
                .unwrap_or_else(|| "info".to_string()),
            trail: file.trail,
            config_path,
        })
    }

    /// Built-in card types overlaid with every configured rule directory
    pub fn load_registry(&self) -> Result<CardTypeRegistry> {
        let mut registry = CardTypeRegistry::builtin();
        for dir in &self.rules_dirs {
            let added = registry.load_dir(dir)?;
            if added > 0 {
                log::info!("Loaded {} card types from {}", added, dir.display());
            }
        }
        Ok(registry)
    }
}
