//! The HTTP server.
//!
//! > **Router** is the the only module that knows anything about HTTP. Every other part of the
//! > system has no knowledge of how the request is really being made. The router's responsibility
//! > is to call into the domain logic, and then render that response data with an appropriate view.

mod affiliations;
mod config;
mod errors;
mod pages;
mod results;
mod tasks;
mod util;

pub use crate::router::errors::ServerError;

use crate::{chat::ChatDirectory, dal::DB};
use failure::Fallible;
use log::info;
use std::{net::SocketAddr, sync::Arc};
use warp::{filters::BoxedFilter, Filter};

/// What every handler gets to work with.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct App {
    /// The database.
    pub db: DB,

    /// The chat integration.
    pub chat: Arc<dyn ChatDirectory>,
}

/// The filter handing out the `App` to handlers.
type State = BoxedFilter<(App,)>;

/// Starts an HTTP server at the given address, running until the server fails.
pub async fn serve_on(addr: SocketAddr, app: App) -> Fallible<()> {
    let server = routes(app)
        .recover(errors::recover)
        .with(warp::log("putzplan::router"));
    let (addr, server) = warp::serve(server).try_bind_ephemeral(addr)?;
    info!("Serving on {}", addr);
    server.await;
    Ok(())
}

fn routes(app: App) -> Resp!() {
    let state = warp::any().map(move || app.clone()).boxed();
    pages::routes(state.clone())
        .or(config::routes(state.clone()))
        .or(affiliations::routes(state.clone()))
        .or(tasks::routes(state.clone()))
        .or(results::routes(state))
        .boxed()
}
