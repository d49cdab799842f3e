use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{Html, Response},
    routing::get,
    Router,
};
use color_eyre::eyre::WrapErr as _;
use sentry::{Hub, SentryFutureExt as _};
use sentry_tower::SentryHttpLayer;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{identity::Session, state::AppState};

/// Build the application router with all routes
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(SentryHttpLayer::with_transaction())
        .layer(middleware::from_fn(bind_request_hub))
        .with_state(app_state)
}

/// Runs each request on its own Sentry hub forked from the current one
async fn bind_request_hub(request: Request, next: Next) -> Response {
    let hub = Arc::new(Hub::new_from_top(Hub::current()));
    next.run(request).bind_hub(hub).await
}

/// Executes one GraphQL request under the session resolved from its headers
async fn graphql_handler(
    State(state): State<AppState>,
    session: Session,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let request = request.into_inner().data(session);
    state.schema.execute(request).await.into()
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn health() -> &'static str {
    "ok"
}

/// Bind to `HOST`:`PORT` and serve until the process exits
pub async fn run_server(router: Router) -> color_eyre::Result<()> {
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());

    let addr = format!("{}:{}", host, port)
        .parse::<SocketAddr>()
        .wrap_err_with(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}/graphql", addr);

    axum::serve(listener, router)
        .await
        .wrap_err("Server stopped unexpectedly")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use tower::ServiceExt as _;

    use super::*;

    #[tokio::test]
    async fn test_requests_run_on_their_own_hub() {
        let outer = Hub::current();
        let app = Router::new()
            .route(
                "/",
                get(move || {
                    let outer = outer.clone();
                    async move {
                        if Arc::ptr_eq(&Hub::current(), &outer) {
                            "shared"
                        } else {
                            "own"
                        }
                    }
                }),
            )
            .layer(SentryHttpLayer::with_transaction())
            .layer(middleware::from_fn(bind_request_hub));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"own");
    }
}
