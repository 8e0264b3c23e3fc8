use std::{env, net::SocketAddr};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use void_mindful::generator::TemplateGenerator;
use void_mindful::speech::{Speech, SystemSpeech};
use void_mindful::{load_data, resolve_data_path, router, AppState, Controller, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_path = resolve_data_path()?;
    if let Some(parent) = data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let data = load_data(&data_path).await;
    info!(path = %data_path.display(), sessions = data.sessions.len(), "state loaded");

    let speech = SystemSpeech::detect();
    match speech.program() {
        Some(program) => info!("speech playback via {}", program.display()),
        None => info!("speech playback unavailable"),
    }
    info!(supported = speech.supported(), "speech capability detected");

    let controller = Controller::new(
        Store::new(data_path, data),
        Box::new(TemplateGenerator::default()),
        Box::new(speech),
    );
    let app = router(AppState::new(controller));

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
