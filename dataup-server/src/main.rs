use anyhow::Result;
use dataup_server::{build, config, ServerSettings};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = config::load();
    let settings = ServerSettings::from_snapshot(&config.snapshot())?;

    let ax = build(&config).await?;

    let addr = settings.addr();
    println!("[dataup] listening on http://{addr}");

    ax.listen(addr).await?;

    Ok(())
}
