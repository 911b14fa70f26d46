use clap::{Parser, Subcommand};
use nat64r::config;
use nat64r::telemetry::{init_logging, LogConfig, MetricsRegistry};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "nat64r")]
#[command(about = "A stateful NAT64 translator implemented in Rust")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Run the translator daemon
    Run {
        /// Path to config.toml
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate config.lock from config.toml
    Generate {
        /// Path to config.toml
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Output path for config.lock
        #[arg(short, long, default_value = "config.lock")]
        output: PathBuf,
    },
    /// Validate config.toml without generating lock file
    Validate {
        /// Path to config.toml
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { action }) => {
            init_logging(None);
            let result = match action {
                ConfigAction::Generate {
                    config: config_path,
                    output,
                } => cmd_config_generate(&config_path, &output),
                ConfigAction::Validate {
                    config: config_path,
                } => cmd_config_validate(&config_path),
            };
            if let Err(e) = result {
                eprintln!("[ERROR] {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Run {
            config: config_path,
        }) => {
            if let Err(e) = cmd_run(&config_path) {
                eprintln!("[ERROR] {}", e);
                std::process::exit(1);
            }
        }
        None => {
            if let Err(e) = cmd_run(&PathBuf::from("config.toml")) {
                eprintln!("[ERROR] {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn cmd_config_generate(config_path: &PathBuf, output_path: &PathBuf) -> Result<(), String> {
    println!("[INFO] Loading {}...", config_path.display());

    let content = std::fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read config file: {}", e))?;

    let cfg = config::load(config_path).map_err(|e| format!("Failed to parse config: {}", e))?;

    let validation = config::validate(&cfg);
    validation.print_diagnostics();

    if validation.has_errors() {
        return Err("Validation failed with errors".to_string());
    }

    let lock = config::generate_lock(&cfg, &content);

    let lock_toml =
        toml::to_string_pretty(&lock).map_err(|e| format!("Failed to serialize lock: {}", e))?;

    let output = format!(
        "# Generated by nat64r - DO NOT EDIT\n# Source: {} (sha256: {})\n\n{}",
        config_path.display(),
        &lock.source_hash[..16],
        lock_toml
    );

    std::fs::write(output_path, output).map_err(|e| format!("Failed to write lock file: {}", e))?;

    println!("[INFO] Generated {}", output_path.display());
    Ok(())
}

fn cmd_config_validate(config_path: &PathBuf) -> Result<(), String> {
    println!("[INFO] Validating {}...", config_path.display());

    let cfg = config::load(config_path).map_err(|e| format!("Failed to parse config: {}", e))?;

    let validation = config::validate(&cfg);
    validation.print_diagnostics();

    if validation.has_errors() {
        Err("Validation failed".to_string())
    } else {
        println!("[INFO] Configuration is valid");
        Ok(())
    }
}

fn cmd_run(config_path: &PathBuf) -> Result<(), String> {
    use std::time::Instant;
    use tokio::runtime::Runtime;
    use tracing::debug;

    let cfg = config::load(config_path).map_err(|e| format!("Failed to parse config: {}", e))?;
    init_logging(Some(&LogConfig::from(&cfg.log)));

    let validation = config::validate(&cfg);
    validation.print_diagnostics();
    if validation.has_errors() {
        return Err("Validation failed with errors".to_string());
    }

    let mut translator =
        config::build_translator(&cfg).map_err(|e| format!("Failed to configure: {}", e))?;
    info!(state = %translator.state(), "translator configured");

    let rt = Runtime::new().map_err(|e| format!("Failed to create runtime: {}", e))?;

    rt.block_on(async move {
        let metrics = MetricsRegistry::new();
        let mut sweep = tokio::time::interval(translator.sweep_period());
        // First tick fires immediately; skip it.
        sweep.tick().await;

        info!("translator running, sweeping expired mappings");
        // TODO: wire the translator into a tun device datapath so packets
        // flow through translate_ip6_to_ip4/translate_ip4_to_ip6 here.
        loop {
            tokio::select! {
                _ = sweep.tick() => {
                    let evicted = translator.process_expiry(Instant::now());
                    if evicted > 0 {
                        debug!(evicted, "expiry sweep complete");
                    }
                    metrics.observe(&translator);
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("shutting down");
                    for (name, value) in metrics.export() {
                        info!(metric = %name, value, "final counter");
                    }
                    break;
                }
            }
        }
        Ok(())
    })
}
