use tracing_subscriber::EnvFilter;
use tutor_proxy::config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        base_url = %config.base_url,
        model = %config.model,
        upload_dir = %config.upload_dir.display(),
        "starting tutor proxy"
    );

    tutor_proxy::run(config).await?;
    Ok(())
}
