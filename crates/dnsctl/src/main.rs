// # dnsctl - DNS record command-line tool
//
// Thin front end over the `dnsproviders` facade. All record logic lives in
// the provider crates; this binary only reads configuration, builds a
// provider and prints results.
//
// ## Configuration
//
// Flags or environment variables:
//
// - `DNSCTL_PROVIDER`: Provider type (cloudflare, googleclouddns, opentelekomcloud)
// - `DNSCTL_ZONE`: Zone to operate on
// - `DNSCTL_CREDENTIALS_FILE`: JSON object of string credential values
// - `DNSCTL_CONFIG`: Full provider configuration JSON (replaces the three above)
// - `DNSCTL_LOG_LEVEL`: trace, debug, info, warn, error (default: warn)
//
// ## Example
//
// ```bash
// export DNSCTL_PROVIDER=cloudflare
// export DNSCTL_ZONE=example.com
// export DNSCTL_CREDENTIALS_FILE=~/.config/dnsctl/cloudflare.json
//
// dnsctl set www.example.com A 192.0.2.1 --ttl 300
// dnsctl get www.example.com
// dnsctl delete www.example.com
// ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dnsproviders::{Credentials, ProviderConfig, default_registry};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// - 0: Success
/// - 1: Configuration error
/// - 2: Runtime error (provider or network failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DnsctlExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DnsctlExitCode> for ExitCode {
    fn from(code: DnsctlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "dnsctl", version, about = "Manage DNS records across hosting providers")]
struct Cli {
    /// Provider type
    #[arg(long, env = "DNSCTL_PROVIDER")]
    provider: Option<String>,

    /// Zone to operate on
    #[arg(long, env = "DNSCTL_ZONE")]
    zone: Option<String>,

    /// JSON file holding the provider credentials
    #[arg(long, env = "DNSCTL_CREDENTIALS_FILE")]
    credentials_file: Option<PathBuf>,

    /// JSON file holding a full provider configuration
    #[arg(long, env = "DNSCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "DNSCTL_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    #[command(flatten)]
    Record(RecordCommand),
    /// List the compiled-in provider types
    Providers,
}

/// Commands that talk to a provider
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum RecordCommand {
    /// List record sets, optionally only those with NAME
    Get {
        #[arg(default_value = "")]
        name: String,
    },
    /// Create or update a record
    Set {
        name: String,
        record_type: String,
        content: String,
        #[arg(long, default_value_t = 300)]
        ttl: u32,
        /// Proxy traffic through the provider (Cloudflare only)
        #[arg(long)]
        proxy: bool,
    },
    /// Delete the record sets with NAME
    Delete { name: String },
}

impl Cli {
    /// Validate flag combinations and values
    fn validate(&self) -> Result<()> {
        parse_log_level(&self.log_level)?;

        if self.config.is_some()
            && (self.provider.is_some() || self.zone.is_some() || self.credentials_file.is_some())
        {
            anyhow::bail!(
                "DNSCTL_CONFIG cannot be combined with DNSCTL_PROVIDER, DNSCTL_ZONE or \
                DNSCTL_CREDENTIALS_FILE"
            );
        }

        if let Command::Record(RecordCommand::Set { ttl: 0, .. }) = self.command {
            anyhow::bail!("--ttl must be greater than 0");
        }

        Ok(())
    }

    /// Assemble the provider configuration from flags, env or config file
    fn provider_config(&self) -> Result<ProviderConfig> {
        let config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                ProviderConfig::from_json_str(&json)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
            None => {
                let Some(provider) = &self.provider else {
                    anyhow::bail!(
                        "DNSCTL_PROVIDER is required. \
                        Set it via: export DNSCTL_PROVIDER=cloudflare"
                    );
                };
                let Some(path) = &self.credentials_file else {
                    anyhow::bail!(
                        "DNSCTL_CREDENTIALS_FILE is required. \
                        Set it via: export DNSCTL_CREDENTIALS_FILE=/path/to/credentials.json"
                    );
                };

                let credentials = Credentials::from_json_file(path)?;
                ProviderConfig::new(
                    provider.parse()?,
                    self.zone.clone().unwrap_or_default(),
                    credentials,
                )
            }
        };

        if config.zone.is_empty() {
            anyhow::bail!("DNSCTL_ZONE is required. Set it via: export DNSCTL_ZONE=example.com");
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "DNSCTL_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

/// Configuration problems exit with 1, everything else with 2
fn exit_code_for(err: &anyhow::Error) -> DnsctlExitCode {
    match err.downcast_ref::<dnsproviders::Error>() {
        Some(dnsproviders::Error::Config(_) | dnsproviders::Error::UnknownProviderType(_)) => {
            DnsctlExitCode::ConfigError
        }
        _ => DnsctlExitCode::RuntimeError,
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            eprintln!("{}", e);
            return DnsctlExitCode::ConfigError.into();
        }
        // --help and --version
        Err(e) => e.exit(),
    };

    if let Err(e) = cli.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DnsctlExitCode::ConfigError.into();
    }

    let log_level = parse_log_level(&cli.log_level).unwrap_or(Level::WARN);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DnsctlExitCode::ConfigError.into();
    }

    let Command::Record(command) = &cli.command else {
        print_providers();
        return DnsctlExitCode::Success.into();
    };

    let config = match cli.provider_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DnsctlExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DnsctlExitCode::RuntimeError.into();
        }
    };

    match rt.block_on(run(command, config)) {
        Ok(()) => DnsctlExitCode::Success.into(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e).into()
        }
    }
}

fn print_providers() {
    for provider_type in default_registry().list_providers() {
        println!("{}", provider_type);
    }
}

/// Execute one record command
async fn run(command: &RecordCommand, config: ProviderConfig) -> Result<()> {
    let provider = dnsproviders::create_provider(&config, None).await?;
    let zone = config.zone.as_str();
    debug!("Using {} provider for zone {}", provider.provider_name(), zone);

    match command {
        RecordCommand::Get { name } => {
            let records = provider.get_dns_records(zone, name).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        RecordCommand::Set {
            name,
            record_type,
            content,
            ttl,
            proxy,
        } => {
            let outcome = provider
                .create_or_update_dns_record(zone, name, record_type, content, *ttl, *proxy)
                .await?;
            println!("{} {} {}", outcome, record_type, name);
        }
        RecordCommand::Delete { name } => {
            let deleted = provider.delete_dns_record(zone, name).await?;
            println!("deleted {} record set(s) named {}", deleted, name);
        }
    }

    Ok(())
}
