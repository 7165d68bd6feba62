use crate::{Relay, ServerError, router};
use derive_setters::Setters;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::Notify};

#[non_exhaustive]
#[derive(Debug, Setters, Clone, Derivative)]
#[derivative(Default)]
#[setters[prefix = "with_"]]
pub struct RelayServerConfig {
    #[derivative(Default(value = "\"0.0.0.0:8000\".to_string()"))]
    pub address: String,
}

impl RelayServerConfig {
    pub fn new(address: String) -> Self {
        Self { address }
    }
}

pub struct RelayServer {
    config: RelayServerConfig,
    relay: Arc<Relay>,
    exit_notify: Arc<Notify>,
}

impl RelayServer {
    pub fn new(config: RelayServerConfig, relay: Relay, exit_notify: Arc<Notify>) -> Self {
        Self {
            config,
            relay: Arc::new(relay),
            exit_notify,
        }
    }

    pub async fn run(&self) -> Result<(), ServerError> {
        let socket_addr: SocketAddr = self.config.address.parse()?;
        let listener = TcpListener::bind(socket_addr).await?;
        self.serve(listener).await
    }

    /// Serves on an already bound listener until `exit_notify` fires.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        log::info!("Relay server listening on http://{}", listener.local_addr()?);

        if self.relay.config().credential.is_none() {
            log::warn!("no remove.bg API key configured, every request will fail");
        }

        let exit_notify = self.exit_notify.clone();
        axum::serve(listener, router(self.relay.clone()))
            .with_graceful_shutdown(async move {
                exit_notify.notified().await;
                log::info!("RelayServer receive `exit notify`. exit...");
            })
            .await?;

        Ok(())
    }
}
