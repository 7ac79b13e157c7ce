use std::net::SocketAddr;
use axum::{
    body::HttpBody,
    routing::{get, post},
    BoxError, Router,
};
use lambda_http::{run, Error};
use tracing::info;
use book_catalog::catalog::controller::{add_book, find_book_by_id, remove_book};
use book_catalog::core::controller::AppState;
use book_catalog::core::domain::{Configuration, ServerRuntime};
use book_catalog::utils::logs::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let config = Configuration::from_env()?;
    info!(branch = config.branch_id.as_str(), store = %config.store, runtime = %config.runtime, "starting catalog");
    let state = AppState::new(&config).await;

    match config.runtime {
        ServerRuntime::Lambda => run(router(state)).await,
        ServerRuntime::Http => {
            let app = router(state);
            let addr: SocketAddr = config.bind_address.parse()?;
            info!(%addr, "listening");
            axum::Server::bind(&addr).serve(app.into_make_service()).await?;
            Ok(())
        }
    }
}

// generic over the request body so the same routes serve both lambda_http and hyper
fn router<B>(state: AppState) -> Router<(), B>
    where B: HttpBody + Send + 'static, B::Data: Send, B::Error: Into<BoxError> {
    Router::new()
        .route("/books", post(add_book))
        .route("/books/:id",
               get(find_book_by_id).delete(remove_book))
        .with_state(state)
}
