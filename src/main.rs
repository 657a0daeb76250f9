// this binary will target "package name"
use rolehome::configuration::get_configuration;
use rolehome::startup::Application;
use rolehome::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("rolehome".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("failed to read configuration");

    let application = Application::build(configuration).await?;
    if let Err(e) = application.run_until_stopped().await {
        tracing::error! {
            error.cause_chain = ?e,
            error.message = %e,
            "API failed"
        };
        return Err(e.into());
    }
    tracing::info!("API has exited");
    Ok(())
}
