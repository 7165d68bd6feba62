use crate::{cli::ServeArgs, config::Config};
use anyhow::Result;
use relay::{Relay, RelayConfig, RelayServer};
use std::sync::Arc;
use tokio::sync::Notify;

pub async fn run(config: &Config, args: ServeArgs) -> Result<()> {
    let mut server_config = config.relay_server_config();
    if let Some(listen) = args.listen {
        server_config = server_config.with_address(listen);
    }

    let relay = Relay::with_api(RelayConfig::from_env(), config.api_config())?;
    let exit_notify = Arc::new(Notify::new());

    let notify = exit_notify.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("received Ctrl-C, shutting down");
            notify.notify_one();
        }
    });

    RelayServer::new(server_config, relay, exit_notify)
        .run()
        .await?;

    Ok(())
}
