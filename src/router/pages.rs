use crate::{
    forms::LoginForm,
    router::{App, State},
    view::{render_form, render_html},
};
use serde_derive::Deserialize;
use serde_json::json;
use warp::{http::Response, Filter, Rejection};

pub fn routes(state: State) -> Resp!() {
    let login_page = warp::get()
        .and(warp::path!("login"))
        .and(warp::query::<LoginQuery>())
        .and_then(login);
    route_any!(
        state;
        GET () => index,
    )
    .or(login_page)
    .boxed()
}

/// The query string of the login page.
#[derive(Debug, Deserialize)]
struct LoginQuery {
    username: Option<String>,
}

async fn index(_app: App) -> Result<Response<String>, Rejection> {
    render_html("index.html", json!({ "title": "Putzplan" }))
}

async fn login(query: LoginQuery) -> Result<Response<String>, Rejection> {
    render_form(
        "Einloggen",
        &LoginForm::new(query.username.as_deref()),
        None,
    )
}
