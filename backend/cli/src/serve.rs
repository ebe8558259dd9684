//! `buzzbot serve`: wires the Discord session, router, pin refresher and
//! health server together and runs them until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use buzzbot_channels::{ChannelAdapter, DiscordAdapter, JokeApiClient};
use buzzbot_commands::{
    DEFAULT_HELP_PREAMBLE, DictionaryIndex, PinnedMessageCache, ResponseRouter, RouterParts,
    RouterSettings,
};
use buzzbot_config::{BotConfig, resolve_dictionary};
use buzzbot_core::{EventBus, JokeSource, PlatformConnection, RandomSource, ThreadRandom};
use buzzbot_gateway::{GatewayState, HealthState, PrometheusMetrics, install_recorder, start_server};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub async fn run(config: BotConfig) -> Result<()> {
    info!(config = ?config.redacted(), "Starting buzzbot");

    let dictionary = resolve_dictionary(&config.dictionary_path).await?;
    let random: Arc<dyn RandomSource> = Arc::new(ThreadRandom);
    let index = Arc::new(
        DictionaryIndex::new(&dictionary, Arc::clone(&random)).context("Dictionary rejected")?,
    );
    let listen: SocketAddr = config
        .listen_address
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.listen_address))?;
    let metrics_handle = install_recorder()?;

    let discord = Arc::new(DiscordAdapter::new(config.token.clone()));
    let platform: Arc<dyn PlatformConnection> = discord.clone();
    let jokes: Arc<dyn JokeSource> =
        Arc::new(JokeApiClient::new(&config.joke_api_url, config.upstream_timeout())?);
    let pinned = Arc::new(PinnedMessageCache::new(Arc::clone(&platform), random));

    let router = Arc::new(ResponseRouter::new(RouterParts {
        dictionary: index,
        platform,
        jokes,
        pinned: Arc::clone(&pinned),
        metrics: Arc::new(PrometheusMetrics),
        settings: RouterSettings {
            help_preamble: config
                .help_preamble
                .clone()
                .unwrap_or_else(|| DEFAULT_HELP_PREAMBLE.to_string()),
            upstream_timeout: config.upstream_timeout(),
            handle_message_updates: config.handle_message_updates,
        },
    }));

    let cancel = CancellationToken::new();
    let mut bus = EventBus::new();
    let inbound_rx = bus
        .take_inbound_rx()
        .context("Inbound receiver already taken")?;

    let router_task = tokio::spawn(router.run(inbound_rx, cancel.clone()));

    let refresh_task = {
        let pinned = Arc::clone(&pinned);
        let cancel = cancel.clone();
        let period = config.pinned_refresh_interval();
        tokio::spawn(async move { pinned.run_refresh_loop(period, cancel).await })
    };

    let server_task = tokio::spawn(start_server(
        listen,
        GatewayState {
            health: HealthState::new(discord.connected_flag()),
            metrics: metrics_handle,
        },
        cancel.clone(),
    ));

    let mut discord_task = {
        let discord = Arc::clone(&discord);
        let inbound_tx = bus.inbound_tx.clone();
        tokio::spawn(async move { discord.start(inbound_tx).await })
    };
    drop(bus);

    let outcome = tokio::select! {
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            Ok(())
        }
        joined = &mut discord_task => match joined {
            Ok(Ok(())) => {
                warn!("Discord session ended");
                Ok(())
            }
            Ok(Err(e)) => Err(e.context("Discord session failed")),
            Err(e) => Err(anyhow::Error::new(e).context("Discord task panicked")),
        },
    };

    cancel.cancel();
    discord.shutdown().await;
    discord_task.abort();

    if let Err(e) = router_task.await {
        error!(error = %e, "Router task failed");
    }
    if let Err(e) = refresh_task.await {
        error!(error = %e, "Pin refresh task failed");
    }
    match server_task.await {
        Ok(Err(e)) => error!(error = %e, "Health server failed"),
        Err(e) => error!(error = %e, "Health server task failed"),
        Ok(Ok(())) => {}
    }

    info!("buzzbot stopped");
    outcome
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
