use crate::{
    forms::{AssignmentCleaningForm, FormData, InputForm, ResultsForm, DATE_FORMAT},
    logic,
    router::{
        util::{redirect, submit, today, ResultExt},
        App, State,
    },
    urls,
    view::{render_form, render_html},
};
use chrono::NaiveDate;
use serde_json::json;
use warp::{http::Response, Filter, Rejection};

pub fn routes(state: State) -> Resp!() {
    route_any!(
        state;
        GET ("results") => choose_range,
        POST ("results") => submit_range,
        GET ("results" / NaiveDate / NaiveDate) => report,
        GET ("assignment" / i32 / "comment") => edit_comment,
        POST ("assignment" / i32 / "comment") => save_comment,
    )
    .boxed()
}

async fn choose_range(_app: App) -> Result<Response<String>, Rejection> {
    render_form("Ergebnisse", &ResultsForm::new(today()), None)
}

async fn submit_range(_app: App, data: FormData) -> Result<Response<String>, Rejection> {
    let form = ResultsForm::new(today());
    match form.validate(&data) {
        Ok(range) => redirect(&urls::results_range(range.start_date, range.end_date)),
        Err(errors) => render_form("Ergebnisse", &form, Some((&data, &errors))),
    }
}

async fn report(start: NaiveDate, end: NaiveDate, app: App) -> Result<Response<String>, Rejection> {
    if let Some(to) = reversed_range_target(start, end) {
        return redirect(&to);
    }
    let rows = app
        .db
        .assignments_between(start, end)
        .await
        .err_to_rejection()?
        .into_iter()
        .map(|row| {
            json!({
                "cleaning_day": row.cleaning_day.format(DATE_FORMAT).to_string(),
                "schedule": row.schedule,
                "cleaner": row.cleaner,
                "cleaners_comment": row.cleaners_comment,
            })
        })
        .collect::<Vec<_>>();

    render_html(
        "results.html",
        json!({
            "title": format!(
                "Ergebnisse vom {} bis zum {}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT),
            ),
            "rows": rows,
            "back": urls::results(),
        }),
    )
}

async fn edit_comment(assignment: i32, app: App) -> Result<Response<String>, Rejection> {
    let assignment = app.db.assignment(assignment).await.err_to_rejection()?;
    render_form(
        &comment_title(&assignment.cleaning_day),
        &AssignmentCleaningForm::new(Some(&assignment)),
        None,
    )
}

async fn save_comment(
    assignment: i32,
    app: App,
    data: FormData,
) -> Result<Response<String>, Rejection> {
    let assignment = app.db.assignment(assignment).await.err_to_rejection()?;
    let form = AssignmentCleaningForm::new(Some(&assignment));
    let title = comment_title(&assignment.cleaning_day);
    submit(&title, &form, &data, |comment| async move {
        logic::comment_assignment(&app.db, assignment.id, comment)
            .await
            .map(|_| urls::assignment_comment(assignment.id))
    })
    .await
}

/// A range ending before it starts is sent back to the range form.
fn reversed_range_target(start: NaiveDate, end: NaiveDate) -> Option<String> {
    if end < start {
        Some(urls::results())
    } else {
        None
    }
}

fn comment_title(day: &NaiveDate) -> String {
    format!("Putzdienst am {}", day.format(DATE_FORMAT))
}
