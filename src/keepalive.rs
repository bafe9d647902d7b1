//! Minimal HTTP responder for uptime probes of the hosting platform.

use std::{io, net::SocketAddr};

use axum::{routing::get, Router};
use tokio::net::TcpListener;

pub const BODY: &str = "✅ Bot ishlayapti va onlayn!";

pub fn router() -> Router {
    Router::new().route("/", get(home))
}

async fn home() -> &'static str {
    BODY
}

pub async fn serve(addr: SocketAddr) -> io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Keep-alive server listening on {}", addr);
    axum::serve(listener, router()).await
}
