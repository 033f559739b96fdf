use clap::Parser;
use dropin::application::channel::{Delivery, EventChannel};
use dropin::application::host::DropInHost;
use dropin::domain::event::ChannelKey;
use dropin::domain::ports::{CheckoutClientRef, HostCompletionRef};
use dropin::domain::request::{EXTRA_CHECKOUT_REQUEST, LaunchExtras};
use dropin::infrastructure::in_memory::{InMemoryCheckoutClient, RecordingHost};
use dropin::interfaces::csv::result_writer::ResultWriter;
use dropin::interfaces::csv::scenario_reader::{ScenarioReader, ScenarioStep};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scenario CSV file (action,kind,value,extra)
    scenario: PathBuf,

    /// Checkout request JSON file passed to the host as its launch extra
    #[arg(long)]
    request: Option<PathBuf>,

    /// Device data returned by the checkout client when collection is requested
    #[arg(long)]
    device_data: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut extras = LaunchExtras::new();
    if let Some(path) = cli.request {
        let file = File::open(path).into_diagnostic()?;
        let value: serde_json::Value = serde_json::from_reader(file).into_diagnostic()?;
        extras.insert(EXTRA_CHECKOUT_REQUEST, value);
    }

    let mut client = InMemoryCheckoutClient::new();
    if let Some(device_data) = cli.device_data {
        client = client.with_device_data(device_data);
    }
    let completion = RecordingHost::new();

    let client_ref: CheckoutClientRef = Arc::new(client.clone());
    let completion_ref: HostCompletionRef = Arc::new(completion.clone());
    let host = DropInHost::new(&extras, client_ref, completion_ref, EventChannel::new())
        .into_diagnostic()?;

    let file = File::open(cli.scenario).into_diagnostic()?;
    let reader = ScenarioReader::new(file);
    for step in reader.steps() {
        match step {
            Ok(ScenarioStep::Lifecycle(state)) => host.on_state_changed(state).await,
            Ok(ScenarioStep::Publish(event)) => {
                if host.channel().publish(ChannelKey::DROP_IN_EVENT, event) == Delivery::Dropped {
                    debug!("event published while detached");
                }
            }
            Ok(ScenarioStep::PublishPayload(payload)) => {
                host.channel().publish_payload(ChannelKey::DROP_IN_EVENT, &payload);
            }
            Ok(ScenarioStep::StageRedirect(response)) => client.stage_redirect(response).await,
            Ok(ScenarioStep::StageUnreadableRedirect(reason)) => {
                client.stage_unreadable_redirect(reason).await
            }
            Err(e) => error!(error = %e, "skipping scenario step"),
        }
    }

    let stdout = io::stdout();
    let mut writer = ResultWriter::new(stdout.lock());
    writer
        .write_result(host.result(), &client.analytics_events())
        .into_diagnostic()?;

    Ok(())
}
