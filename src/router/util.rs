use crate::{
    forms::{FormData, InputForm},
    router::errors::ServerError,
    view::render_form,
};
use chrono::{Local, NaiveDate};
use failure::{Error, Fallible};
use std::future::Future;
use warp::{
    http::{header::LOCATION, Response, StatusCode},
    reject::custom,
    Filter, Rejection,
};

/// The largest form body accepted, in bytes.
const MAX_FORM_SIZE: u64 = 16 * 1024;

/// An extension trait for Results.
pub trait ResultExt<T> {
    /// Converts an error to a `warp::Rejection`.
    fn err_to_rejection(self) -> Result<T, Rejection>;
}

impl<T> ResultExt<T> for Fallible<T> {
    fn err_to_rejection(self) -> Result<T, Rejection> {
        self.map_err(|err| custom(ServerError(err)))
    }
}

/// Extracts a urlencoded form body.
pub fn form_body() -> impl Clone + Filter<Extract = (FormData,), Error = Rejection> {
    warp::body::content_length_limit(MAX_FORM_SIZE)
        .and(warp::body::form::<Vec<(String, String)>>())
        .map(|pairs: Vec<(String, String)>| FormData::from_pairs(pairs))
}

/// A "303 See Other" to the given path.
pub fn redirect(to: &str) -> Result<Response<String>, Rejection> {
    Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(LOCATION, to)
        .body(String::new())
        .map_err(Error::from)
        .err_to_rejection()
}

/// The current day, in the server's time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Validates a submission. A valid one is passed to `save`, which returns the path to redirect
/// to; an invalid one gets the form shown again with the errors.
pub async fn submit<F, S, Fut>(
    title: &str,
    form: &F,
    data: &FormData,
    save: S,
) -> Result<Response<String>, Rejection>
where
    F: InputForm,
    S: FnOnce(F::Cleaned) -> Fut,
    Fut: Future<Output = Fallible<String>>,
{
    match form.validate(data) {
        Ok(input) => {
            let next = save(input).await.err_to_rejection()?;
            redirect(&next)
        }
        Err(errors) => render_form(title, form, Some((data, &errors))),
    }
}
