//! US-428 GW - Rust implementation
//!
//! Gateway routing a Tascam US-428 control surface onto a host mixer.

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use us428_gw::config::AppConfig;
use us428_gw::host::SimHost;
use us428_gw::router::Router;
use us428_gw::surface::{self, Us428Driver};

/// Number of mixer channels the simulated host exposes
const SIM_CHANNELS: u16 = 24;

/// US-428 Gateway - Drive a host mixer from a Tascam US-428
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// List available MIDI ports
    #[arg(long)]
    list_ports: bool,

    /// Print the control mapping and binding table
    #[arg(long)]
    test_mappings: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    info!("Starting US-428 GW...");
    info!("Configuration file: {}", args.config);

    if args.list_ports {
        list_ports_formatted();
        return Ok(());
    }

    let config = AppConfig::load_or_default(&args.config).await?;

    if args.test_mappings {
        test_control_mappings(&config)?;
        return Ok(());
    }

    run_app(config, shutdown_signal()).await?;

    info!("US-428 GW shutdown complete");
    Ok(())
}

async fn run_app(
    config: AppConfig,
    shutdown: impl std::future::Future<Output = ()>,
) -> Result<()> {
    info!("Starting main application loop...");

    let mut driver = Us428Driver::new(&config.midi);
    driver.connect()?;
    info!("US-428 connected successfully");

    let codec = driver.codec();
    let leds = driver.led_output()?;
    let mut events = driver
        .take_event_receiver()
        .ok_or_else(|| anyhow::anyhow!("Failed to get US-428 event receiver"))?;

    let mut router = Router::new(&config, SimHost::new(SIM_CHANNELS), leds)?;
    router.subscribe_mode(|change| {
        if change.is_transition() {
            info!("🎛️  Mode {} → {}", change.previous, change.current);
        }
    });
    router.activate();

    info!("Ready to process MIDI events!");

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                debug!("Received US-428 event: raw={:02X?}", event.raw);

                match codec.decode(&event.raw) {
                    Ok(Some(control)) => router.on_event(control),
                    Ok(None) => debug!("Ignoring unmapped message {:02X?}", event.raw),
                    Err(e) => warn!("Dropping surface message: {}", e),
                }
                router.process_host_notifications();
            }

            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping event loop");
                break;
            }
        }
    }

    info!("Shutting down...");
    driver.disconnect();

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    info!("Shutdown signal received");
}

fn list_ports_formatted() {
    use colored::*;

    println!("\n{}", "=== MIDI Ports ===".bold().cyan());

    for (title, ports) in [
        ("Inputs:", Us428Driver::list_input_ports()),
        ("Outputs:", Us428Driver::list_output_ports()),
    ] {
        println!("\n{}", title.bold());
        match ports {
            Ok(ports) if ports.is_empty() => println!("  {}", "(none)".dimmed()),
            Ok(ports) => {
                for (i, name) in ports.iter().enumerate() {
                    if surface::is_us428_port(name) {
                        println!("  {}: {}", i, name.green().bold());
                    } else {
                        println!("  {}: {}", i, name);
                    }
                }
            }
            Err(e) => println!("  {}", e.to_string().red()),
        }
    }

    match surface::find_us428_ports() {
        Some((input, output)) => println!(
            "\n{} in={} out={}",
            "US-428 found:".green().bold(),
            input.yellow(),
            output.yellow()
        ),
        None => println!("\n{}", "No US-428 ports detected".yellow()),
    }
}

fn test_control_mappings(config: &AppConfig) -> Result<()> {
    use colored::*;
    use us428_gw::binding::{us428_bindings, BindingTable};
    use us428_gw::control_mapping::us428_map;
    use us428_gw::controls::Control;
    use us428_gw::host::Host;
    use us428_gw::ChannelBank;

    println!("\n{}", "=== Testing Control Mappings ===".bold().cyan());

    let map = us428_map();
    println!("\n{}", "Loaded Mappings:".bold());
    println!("  Total controls: {}", map.len().to_string().green());

    let host = SimHost::new(SIM_CHANNELS);
    let bank = ChannelBank::new(host.mixer_channels())?;
    let table = BindingTable::build(us428_bindings(&bank, &config.surface))?;
    println!("  Bindings: {}", table.len().to_string().green());

    println!("\n{}", "Controls:".bold());
    for control in Control::all() {
        let cc = map
            .cc_for_control(control)
            .map(|cc| format!("CC {:3}", cc))
            .unwrap_or_else(|| "  -   ".to_string());
        let count = table.bindings_for(control).count();
        println!(
            "  {} {:<24} {} binding(s)",
            cc.green(),
            format!("{:?}", control).yellow(),
            count
        );
    }

    println!("\n{}", "✅ Control mapping test complete!".green().bold());

    Ok(())
}
