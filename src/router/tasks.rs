use crate::{
    forms::{FormData, TaskTemplateForm},
    logic,
    router::{
        util::{submit, ResultExt},
        App, State,
    },
    urls,
    view::{render_form, render_html},
};
use serde_json::json;
use warp::{http::Response, Filter, Rejection};

pub fn routes(state: State) -> Resp!() {
    route_any!(
        state;
        GET ("schedule" / i32 / "tasks") => list,
        GET ("schedule" / i32 / "task" / "new") => new_task,
        POST ("schedule" / i32 / "task" / "new") => create_task,
        GET ("task" / i32) => edit_task,
        POST ("task" / i32) => update_task,
    )
    .boxed()
}

async fn list(schedule: i32, app: App) -> Result<Response<String>, Rejection> {
    let schedule = app.db.schedule(schedule).await.err_to_rejection()?;
    let tasks = app
        .db
        .task_templates(schedule.id)
        .await
        .err_to_rejection()?
        .into_iter()
        .map(|task| {
            json!({
                "name": task.task_name,
                "start_days_before": task.start_days_before,
                "end_days_after": task.end_days_after,
                "disabled": task.task_disabled,
                "edit": urls::task_edit(task.id),
            })
        })
        .collect::<Vec<_>>();

    render_html(
        "task-list.html",
        json!({
            "title": format!("Aufgaben von {}", schedule.name),
            "tasks": tasks,
            "new_task": urls::task_new(schedule.id),
            "back": urls::config(),
        }),
    )
}

async fn new_task(schedule: i32, app: App) -> Result<Response<String>, Rejection> {
    let schedule = app.db.schedule(schedule).await.err_to_rejection()?;
    render_form(
        &format!("Neue Aufgabe für {}", schedule.name),
        &TaskTemplateForm::new(Some(schedule.id), None),
        None,
    )
}

async fn create_task(schedule: i32, app: App, data: FormData) -> Result<Response<String>, Rejection> {
    let schedule = app.db.schedule(schedule).await.err_to_rejection()?;
    let form = TaskTemplateForm::new(Some(schedule.id), None);
    let title = format!("Neue Aufgabe für {}", schedule.name);
    submit(&title, &form, &data, |input| async move {
        logic::save_task_template(&app.db, schedule.id, None, input)
            .await
            .map(|_| urls::task_list(schedule.id))
    })
    .await
}

async fn edit_task(task: i32, app: App) -> Result<Response<String>, Rejection> {
    let task = app.db.task_template(task).await.err_to_rejection()?;
    render_form("Aufgabe ändern", &TaskTemplateForm::new(None, Some(&task)), None)
}

async fn update_task(task: i32, app: App, data: FormData) -> Result<Response<String>, Rejection> {
    let task = app.db.task_template(task).await.err_to_rejection()?;
    let form = TaskTemplateForm::new(None, Some(&task));
    submit("Aufgabe ändern", &form, &data, |input| async move {
        logic::save_task_template(&app.db, task.schedule, Some(task.id), input)
            .await
            .map(|_| urls::task_list(task.schedule))
    })
    .await
}
