use crate::util::log_err;
use diesel::result::Error as DieselError;
use failure::Error;
use warp::{
    http::{header::CONTENT_TYPE, Response, StatusCode},
    reject::{custom, Reject},
    Rejection,
};

/// An unexpected failure while handling a request, e.g. from the database or a template.
#[derive(Debug)]
pub struct ServerError(pub Error);

impl Reject for ServerError {}

/// A last-chance handler for rejections. Unknown routes and missing rows become 404s, and other
/// server errors become 500s listing their causes. Everything else is left to warp.
pub async fn recover(rejection: Rejection) -> Result<Response<String>, Rejection> {
    if rejection.is_not_found() {
        return respond(StatusCode::NOT_FOUND, "Seite nicht gefunden".to_string());
    }

    if let Some(ServerError(err)) = rejection.find() {
        if is_missing_row(err) {
            return respond(StatusCode::NOT_FOUND, "Seite nicht gefunden".to_string());
        }

        log_err(err);
        let mut msg = "Interner Serverfehler".to_string();
        for cause in err.iter_chain() {
            msg.push('\n');
            msg += &cause.to_string();
        }
        respond(StatusCode::INTERNAL_SERVER_ERROR, msg)
    } else {
        Err(rejection)
    }
}

fn is_missing_row(err: &Error) -> bool {
    err.iter_chain()
        .any(|cause| matches!(cause.downcast_ref::<DieselError>(), Some(DieselError::NotFound)))
}

fn respond(status: StatusCode, msg: String) -> Result<Response<String>, Rejection> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(msg)
        .map_err(|err| custom(ServerError(err.into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use failure::{format_err, ResultExt};

    #[test]
    fn missing_rows_are_found_through_context() {
        let err = Error::from(DieselError::NotFound);
        assert!(is_missing_row(&err));

        let err = Err::<(), _>(DieselError::NotFound)
            .context("Couldn't load the cleaner")
            .unwrap_err();
        assert!(is_missing_row(&err.into()));

        assert!(!is_missing_row(&format_err!("pool timed out")));
    }

    #[tokio::test]
    async fn server_errors_list_their_causes() {
        let rejection = custom(ServerError(format_err!("pool timed out")));
        let resp = recover(rejection).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.body().contains("pool timed out"));

        let resp = recover(custom(ServerError(DieselError::NotFound.into())))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = recover(warp::reject::not_found()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
