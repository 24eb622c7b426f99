use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use pay_notify_relay::application::dispatcher::{self, DispatcherConfig};
use pay_notify_relay::application::environment::EnvironmentSource;
use pay_notify_relay::application::relay::Relay;
use pay_notify_relay::domain::config::{Deployment, Environment};
use pay_notify_relay::domain::event::{Amount, PaymentEvent};
use pay_notify_relay::domain::ports::SettingsStore;
use pay_notify_relay::infrastructure::http::ReqwestTransport;
use pay_notify_relay::infrastructure::json_file::JsonFileSettingsStore;
use pay_notify_relay::interfaces::csv::notification_reader::NotificationReader;
use pay_notify_relay::interfaces::notification::{
    AmountExtraction, DEFAULT_AMOUNT_PATTERN, DEFAULT_PACKAGE, NotificationFilter,
};
use pay_notify_relay::telemetry;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the development backend
    #[arg(long, env = "PAY_NOTIFY_DEV_HOST", global = true)]
    dev_host: Option<String>,

    /// Base URL of the production backend
    #[arg(long, env = "PAY_NOTIFY_PROD_HOST", global = true)]
    prod_host: Option<String>,

    /// Shared HMAC secret used to sign payment events
    #[arg(long, env = "PAY_NOTIFY_SECRET_KEY", hide_env_values = true, global = true)]
    secret_key: Option<String>,

    /// JSON file holding the dev/prod toggle
    #[arg(
        long,
        env = "PAY_NOTIFY_SETTINGS",
        default_value = "pay-notify-settings.json",
        global = true
    )]
    settings: PathBuf,

    /// Per-request HTTP timeout (e.g. "5s", "1500ms")
    #[arg(long, default_value = "5s", value_parser = humantime::parse_duration, global = true)]
    timeout: Duration,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay captured notifications from a CSV file through the relay
    Relay {
        /// CSV with columns package,title,text,time
        input: PathBuf,

        /// Only notifications from this package are relayed
        #[arg(long, default_value = DEFAULT_PACKAGE)]
        package: String,

        /// Regex whose first group is the amount
        #[arg(long, default_value = DEFAULT_AMOUNT_PATTERN)]
        pattern: String,

        /// Report this amount for every matching notification instead of parsing text
        #[arg(long, conflicts_with = "pattern")]
        fixed_amount: Option<String>,

        /// Maximum number of relays in flight
        #[arg(long, default_value_t = 16)]
        max_concurrent: usize,
    },
    /// Relay a single payment event
    Send {
        #[arg(long)]
        amount: String,

        /// Observation time in epoch millis (defaults to now)
        #[arg(long)]
        time: Option<i64>,
    },
    /// Show or switch the relay environment
    Env {
        #[command(subcommand)]
        action: Option<EnvAction>,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum EnvAction {
    /// Print the current environment
    Show,
    /// Relay to the production backend
    Prod,
    /// Relay to the development backend
    Dev,
}

impl Cli {
    fn deployment(&self) -> Result<Deployment> {
        let dev_host = self
            .dev_host
            .clone()
            .ok_or_else(|| miette!("missing --dev-host (or PAY_NOTIFY_DEV_HOST)"))?;
        let prod_host = self
            .prod_host
            .clone()
            .ok_or_else(|| miette!("missing --prod-host (or PAY_NOTIFY_PROD_HOST)"))?;
        let secret_key = self
            .secret_key
            .clone()
            .ok_or_else(|| miette!("missing --secret-key (or PAY_NOTIFY_SECRET_KEY)"))?;
        Ok(Deployment::new(dev_host, prod_host, secret_key))
    }

    fn environment(&self) -> Result<EnvironmentSource> {
        Ok(EnvironmentSource::new(
            self.deployment()?,
            Box::new(JsonFileSettingsStore::new(&self.settings)),
        ))
    }

    fn relay(&self) -> Result<Relay> {
        let transport = ReqwestTransport::new(self.timeout).into_diagnostic()?;
        Ok(Relay::new(Box::new(transport)))
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init().into_diagnostic()?;

    match &cli.command {
        Command::Relay {
            input,
            package,
            pattern,
            fixed_amount,
            max_concurrent,
        } => {
            let extraction = match fixed_amount {
                Some(amount) => {
                    AmountExtraction::Fixed(Amount::new(amount.as_str()).into_diagnostic()?)
                }
                None => AmountExtraction::pattern(pattern).into_diagnostic()?,
            };
            let filter = NotificationFilter::new(package.as_str(), extraction);

            let shutdown = CancellationToken::new();
            let (sender, dispatcher) = dispatcher::channel(
                Arc::new(cli.relay()?),
                Arc::new(cli.environment()?),
                DispatcherConfig {
                    max_concurrent_relays: *max_concurrent,
                    ..DispatcherConfig::default()
                },
                shutdown.clone(),
            );
            let handle = dispatcher.spawn();

            let ctrl_c_shutdown = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupted, abandoning in-flight relays");
                    ctrl_c_shutdown.cancel();
                }
            });

            let file = File::open(input).into_diagnostic()?;
            let reader = NotificationReader::new(file);
            for notification in reader.notifications() {
                let notification = match notification {
                    Ok(n) => n,
                    Err(e) => {
                        tracing::warn!(error = %e, "Error reading notification");
                        continue;
                    }
                };
                match filter.to_event(&notification) {
                    Ok(Some(event)) => {
                        if let Err(e) = sender.send(event).await {
                            tracing::warn!(error = %e, "Error queueing payment event");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!(error = %e, "Error extracting payment event"),
                }
            }
            drop(sender);

            let summary = handle.await.into_diagnostic()?;
            println!(
                "delivered={} rejected={} failed={} abandoned={}",
                summary.delivered, summary.rejected, summary.failed, summary.abandoned
            );
        }
        Command::Send { amount, time } => {
            let event = PaymentEvent::new(
                Amount::new(amount.as_str()).into_diagnostic()?,
                time.unwrap_or_else(now_millis),
            );
            let config = cli.environment()?.snapshot().await.into_diagnostic()?;
            let ack = cli.relay()?.relay(&event, &config).await.into_diagnostic()?;
            println!("delivered status={}", ack.status);
        }
        Command::Env { action } => {
            let store = JsonFileSettingsStore::new(&cli.settings);
            let target = match action.unwrap_or(EnvAction::Show) {
                EnvAction::Show => None,
                EnvAction::Prod => Some(Environment::Prod),
                EnvAction::Dev => Some(Environment::Dev),
            };
            if let Some(environment) = target {
                store
                    .set_production(environment.is_production())
                    .await
                    .into_diagnostic()?;
                tracing::info!(environment = %environment, "Relay environment switched");
            }
            let current =
                Environment::from_production_flag(store.is_production().await.into_diagnostic()?);
            println!("{}", current);
        }
    }

    Ok(())
}
