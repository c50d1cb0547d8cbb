use axum::routing::get;
use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::rest;
use crate::DataupAxumState;

#[derive(Clone)]
pub struct AxumApp {
    pub state: DataupAxumState,
    pub router: Router<()>,
}

impl AxumApp {
    pub fn new(state: DataupAxumState) -> Self {
        let router = rest::video_router(state.clone())
            .route("/health", get(|| async { "ok" }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        Self { state, router }
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "Listening");
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

pub fn axum(state: DataupAxumState) -> AxumApp {
    AxumApp::new(state)
}
