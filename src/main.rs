mod github;
mod settings;
mod telemetry;

use github::{get_user_chained, get_user_sequential, wait_for_fetches};
use settings::{Settings, client_builder};
use tracing::info;

const USER: &str = "benthecoder";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();

    let settings = Settings::load()?;
    let client = client_builder(&settings).build()?;

    info!(api_base = %settings.api_base, user = USER, "fetching user");

    // Both start before either is awaited; each task reports its own outcome.
    let chained = get_user_chained(&client, &settings.api_base, USER);
    let sequential = get_user_sequential(&client, &settings.api_base, USER);

    wait_for_fetches(vec![("chained", chained), ("sequential", sequential)]).await;

    Ok(())
}
