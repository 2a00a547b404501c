//! Mirrordeck CLI - scrcpy device mirroring from the terminal
//!
//! Usage:
//!   mirrordeck devices     - List connected devices
//!   mirrordeck connect ip  - Bridge to a device over wifi
//!   mirrordeck run         - Launch the mirror with saved settings

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mirrordeck_core::{settings::SettingsStore, toolchain::Toolchain, DEFAULT_WIFI_PORT};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mirrordeck - mirror and control Android devices via scrcpy
#[derive(Parser)]
#[command(name = "mirrordeck")]
#[command(author = "Mirrordeck Team")]
#[command(version)]
#[command(about = "Build, launch and watch scrcpy mirroring sessions")]
#[command(long_about = r#"
Mirrordeck wraps scrcpy and adb so you never have to remember their flags.

List devices, bridge over wifi, then mirror:
  $ mirrordeck devices
  $ mirrordeck connect 192.168.1.42
  $ mirrordeck run --serial 192.168.1.42:5555 --max-fps 30

Settings edited in the Mirrordeck GUI are picked up automatically;
command-line flags override them for a single launch.
"#)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the adb executable (overrides MIRRORDECK_ADB)
    #[arg(long, global = true, value_name = "PATH")]
    adb: Option<PathBuf>,

    /// Path to the scrcpy executable (overrides MIRRORDECK_SCRCPY)
    #[arg(long, global = true, value_name = "PATH")]
    scrcpy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected devices
    Devices {
        /// Keep polling and print connection events
        #[arg(short, long)]
        watch: bool,

        /// Print the device list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Bridge to a device over wifi
    Connect {
        /// Device IP address
        ip: String,

        /// adb tcpip port on the device
        #[arg(short, long, default_value_t = DEFAULT_WIFI_PORT)]
        port: u16,
    },

    /// Drop a wifi bridge
    Disconnect {
        /// Device IP address
        ip: String,

        /// adb tcpip port on the device
        #[arg(short, long, default_value_t = DEFAULT_WIFI_PORT)]
        port: u16,
    },

    /// Launch the mirror with saved settings plus overrides
    Run {
        #[command(flatten)]
        overrides: commands::run::MirrorOverrides,
    },

    /// Print the scrcpy command line without launching it
    Args {
        #[command(flatten)]
        overrides: commands::run::MirrorOverrides,
    },

    /// Manage saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the saved settings as a command preview
    Show,
    /// Show the settings file path
    Path,
    /// Reset all settings to defaults
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();

    let mut toolchain = Toolchain::from_env();
    if let Some(adb) = cli.adb {
        toolchain.adb = adb;
    }
    if let Some(scrcpy) = cli.scrcpy {
        toolchain.scrcpy = scrcpy;
    }

    match cli.command {
        Commands::Devices { watch, json } => commands::devices::run(&toolchain, watch, json).await,
        Commands::Connect { ip, port } => commands::connect::connect(&toolchain, &ip, port).await,
        Commands::Disconnect { ip, port } => {
            commands::connect::disconnect(&toolchain, &ip, port).await
        }
        Commands::Run { overrides } => commands::run::launch(&toolchain, &overrides).await,
        Commands::Args { overrides } => commands::run::print_args(&overrides),
        Commands::Config { action } => run_config(action),
    }
}

fn run_config(action: ConfigAction) -> Result<()> {
    use colored::Colorize;

    let store = SettingsStore::default_location()?;

    match action {
        ConfigAction::Show => {
            let settings = store.load()?;
            if settings.is_empty() {
                println!("{}", "No settings saved.".dimmed());
                println!();
                println!(
                    "Settings are written by the GUI, or mirror once with flags: {}",
                    "mirrordeck run --max-fps 30".cyan()
                );
            } else {
                let options = settings.to_options();
                println!("{}", "Saved launch command:".bold());
                println!("  {}", options.preview().cyan());
                println!();
                println!("{}", format!("({} saved values)", settings.len()).dimmed());
            }
        }
        ConfigAction::Path => {
            println!("{}", store.path().display());
        }
        ConfigAction::Reset => {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt("Reset all settings to defaults?")
                .default(false)
                .interact()?;
            if confirmed {
                store.reset()?;
                println!("{} Settings reset.", "✓".green());
            } else {
                println!("{}", "Nothing changed.".dimmed());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parsing() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_devices_defaults() {
        let cli = Cli::try_parse_from(["mirrordeck", "devices"]).unwrap();
        match cli.command {
            Commands::Devices { watch, json } => {
                assert!(!watch);
                assert!(!json);
            }
            _ => panic!("Expected Devices command"),
        }
    }

    #[test]
    fn test_connect_default_port() {
        let cli = Cli::try_parse_from(["mirrordeck", "connect", "192.168.1.42"]).unwrap();
        match cli.command {
            Commands::Connect { ip, port } => {
                assert_eq!(ip, "192.168.1.42");
                assert_eq!(port, DEFAULT_WIFI_PORT);
            }
            _ => panic!("Expected Connect command"),
        }
    }

    #[test]
    fn test_connect_custom_port() {
        let cli =
            Cli::try_parse_from(["mirrordeck", "connect", "10.0.0.7", "--port", "4444"]).unwrap();
        match cli.command {
            Commands::Connect { port, .. } => assert_eq!(port, 4444),
            _ => panic!("Expected Connect command"),
        }
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::try_parse_from([
            "mirrordeck",
            "run",
            "--serial",
            "R58M",
            "--max-fps",
            "30",
            "--no-audio",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { overrides } => {
                assert_eq!(overrides.serial.as_deref(), Some("R58M"));
                assert_eq!(overrides.max_fps, Some(30));
                assert!(overrides.no_audio);
                assert!(!overrides.fullscreen);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_args_takes_the_same_overrides() {
        let cli = Cli::try_parse_from(["mirrordeck", "args", "--record", "cap.mkv"]).unwrap();
        match cli.command {
            Commands::Args { overrides } => {
                assert_eq!(overrides.record.as_deref(), Some("cap.mkv"));
            }
            _ => panic!("Expected Args command"),
        }
    }

    #[test]
    fn test_toolchain_override_flags() {
        let cli = Cli::try_parse_from([
            "mirrordeck",
            "--adb",
            "/opt/platform-tools/adb",
            "devices",
        ])
        .unwrap();
        assert_eq!(
            cli.adb,
            Some(PathBuf::from("/opt/platform-tools/adb"))
        );
        assert!(cli.scrcpy.is_none());
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::try_parse_from(["mirrordeck", "-v", "devices"]).unwrap();
        assert!(cli.verbose);
    }
}
