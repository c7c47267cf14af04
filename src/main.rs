use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use attribute_gateway::attributes::AttributeWriteRequest;
use attribute_gateway::zcl::{self, BASIC_MANUFACTURER_U8};
use attribute_gateway::{Config, Daemon};

/// attrgw - REST gateway for writing Zigbee device attributes
#[derive(Parser)]
#[command(name = "attrgw", version, about)]
struct Cli {
    /// Port to listen on (overrides config file)
    #[arg(long, env = "ATTRGW_PORT")]
    port: Option<u16>,

    /// Path to the TOML config file
    #[arg(short, long, env = "ATTRGW_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List devices from the configuration
    Devices,
    /// Print the ZCL frame a write request would produce
    Frame {
        /// Attribute id
        #[arg(short, long)]
        key: u16,
        /// Attribute value
        #[arg(short, long)]
        value: u8,
        /// ZCL sequence number
        #[arg(long, default_value = "0")]
        seq: u8,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,attribute_gateway=info",
        1 => "info,attribute_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.api_server.port = port;
    }

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Devices => list_devices(config),
            Command::Frame { key, value, seq } => {
                print_frame(key, value, seq);
                Ok(())
            }
        };
    }

    tracing::info!(port = config.api_server.port, "starting attribute gateway");
    tracing::debug!(?config, "loaded configuration");

    let daemon = Daemon::new(config)?;
    daemon.run().await?;

    Ok(())
}

/// List devices from the configuration
fn list_devices(config: Config) -> anyhow::Result<()> {
    let daemon = Daemon::new(config)?;
    let devices = daemon.registry().list();
    if devices.is_empty() {
        println!("No devices configured.");
        return Ok(());
    }

    for device in devices {
        println!(
            "{:>4}  {}  nwk=0x{:04x}  {}",
            device.id,
            device.unique_id(),
            device.nwk,
            device.name.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

/// Print the encoded write frame as hex
fn print_frame(key: u16, value: u8, seq: u8) {
    let command = BASIC_MANUFACTURER_U8.build(&AttributeWriteRequest {
        external_id: String::new(),
        key,
        value,
    });
    let frame = zcl::encode_write_attributes(&command, seq);
    println!(
        "cluster=0x{:04x} endpoint=0x{:02x} zcl={}",
        command.cluster_id,
        command.endpoint,
        hex::encode(frame)
    );
}
