use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Install signal handling and return a token that is cancelled on the
/// first SIGINT or SIGTERM. Clones of the token go to every long-lived
/// task; the flush scheduler uses it to run its final drain.
pub fn install() -> CancellationToken {
    let token = CancellationToken::new();
    let armed = token.clone();

    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("shutdown signal received");
        armed.cancel();
    });

    token
}

async fn wait_for_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
