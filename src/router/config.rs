use crate::{
    forms::{CleanerForm, FormData, ScheduleForm, ScheduleGroupForm},
    logic,
    router::{
        util::{redirect, submit, today, ResultExt},
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
        GET ("config") => overview,
        GET ("config" / "schedule" / "new") => new_schedule,
        POST ("config" / "schedule" / "new") => create_schedule,
        GET ("config" / "schedule" / i32) => edit_schedule,
        POST ("config" / "schedule" / i32) => update_schedule,
        GET ("config" / "group" / "new") => new_group,
        POST ("config" / "group" / "new") => create_group,
        GET ("config" / "group" / i32) => edit_group,
        POST ("config" / "group" / i32) => update_group,
        GET ("config" / "cleaner" / "new") => new_cleaner,
        POST ("config" / "cleaner" / "new") => create_cleaner,
        GET ("config" / "cleaner" / i32) => edit_cleaner,
        POST ("config" / "cleaner" / i32) => update_cleaner,
        GET ("config" / "cleaner" / i32 / "delete") => confirm_delete_cleaner,
        POST ("config" / "cleaner" / i32 / "delete") => delete_cleaner,
    )
    .boxed()
}

async fn overview(app: App) -> Result<Response<String>, Rejection> {
    let today = today();
    let schedules = app.db.schedules().await.err_to_rejection()?;
    let groups = app.db.groups().await.err_to_rejection()?;

    let mut cleaners = Vec::new();
    for cleaner in app.db.cleaners().await.err_to_rejection()? {
        let cleaner = logic::cleaner_affiliations(&app.db, cleaner.id)
            .await
            .err_to_rejection()?;
        cleaners.push(json!({
            "name": cleaner.cleaner.name,
            "active": cleaner.is_active(today),
            "edit": urls::cleaner_edit(cleaner.cleaner.id),
            "affiliations": urls::affiliation_list(cleaner.cleaner.id),
        }));
    }

    let schedules = schedules
        .iter()
        .map(|schedule| {
            json!({
                "name": schedule.name,
                "disabled": schedule.disabled,
                "edit": urls::schedule_edit(schedule.id),
                "tasks": urls::task_list(schedule.id),
            })
        })
        .collect::<Vec<_>>();
    let groups = groups
        .iter()
        .map(|group| {
            json!({
                "name": group.name,
                "disabled": group.disabled,
                "edit": urls::group_edit(group.id),
            })
        })
        .collect::<Vec<_>>();

    render_html(
        "config.html",
        json!({
            "title": "Konfiguration",
            "schedules": schedules,
            "groups": groups,
            "cleaners": cleaners,
            "new_schedule": urls::schedule_new(),
            "new_group": urls::group_new(),
            "new_cleaner": urls::cleaner_new(),
        }),
    )
}

/// The schedule form. Only enabled groups are offered, plus those the schedule is already in.
async fn schedule_form(app: &App, id: Option<i32>) -> Result<ScheduleForm, Rejection> {
    let mut groups = app.db.groups().await.err_to_rejection()?;
    let (schedule, member_of) = match id {
        Some(id) => (
            Some(app.db.schedule(id).await.err_to_rejection()?),
            app.db.schedule_group_ids(id).await.err_to_rejection()?,
        ),
        None => (None, Vec::new()),
    };
    groups.retain(|group| !group.disabled || member_of.contains(&group.id));
    Ok(ScheduleForm::new(schedule.as_ref(), &groups, &member_of))
}

async fn new_schedule(app: App) -> Result<Response<String>, Rejection> {
    render_form("Neuer Putzplan", &schedule_form(&app, None).await?, None)
}

async fn create_schedule(app: App, data: FormData) -> Result<Response<String>, Rejection> {
    let form = schedule_form(&app, None).await?;
    submit("Neuer Putzplan", &form, &data, |input| async move {
        logic::save_schedule(&app.db, None, input)
            .await
            .map(|_| urls::config())
    })
    .await
}

async fn edit_schedule(id: i32, app: App) -> Result<Response<String>, Rejection> {
    render_form("Putzplan ändern", &schedule_form(&app, Some(id)).await?, None)
}

async fn update_schedule(id: i32, app: App, data: FormData) -> Result<Response<String>, Rejection> {
    let form = schedule_form(&app, Some(id)).await?;
    submit("Putzplan ändern", &form, &data, |input| async move {
        logic::save_schedule(&app.db, Some(id), input)
            .await
            .map(|_| urls::config())
    })
    .await
}

async fn group_form(app: &App, id: Option<i32>) -> Result<ScheduleGroupForm, Rejection> {
    let schedules = app.db.schedules().await.err_to_rejection()?;
    let taken_names = app
        .db
        .groups()
        .await
        .err_to_rejection()?
        .into_iter()
        .filter(|group| Some(group.id) != id)
        .map(|group| group.name)
        .collect::<Vec<_>>();
    Ok(match id {
        Some(id) => {
            let group = app.db.group(id).await.err_to_rejection()?;
            let members = app.db.group_schedule_ids(id).await.err_to_rejection()?;
            ScheduleGroupForm::new(Some(&group), &schedules, &members, &taken_names)
        }
        None => ScheduleGroupForm::new(None, &schedules, &[], &taken_names),
    })
}

async fn new_group(app: App) -> Result<Response<String>, Rejection> {
    render_form("Neue Putzplan-Gruppe", &group_form(&app, None).await?, None)
}

async fn create_group(app: App, data: FormData) -> Result<Response<String>, Rejection> {
    let form = group_form(&app, None).await?;
    submit("Neue Putzplan-Gruppe", &form, &data, |input| async move {
        logic::save_group(&app.db, None, input)
            .await
            .map(|_| urls::config())
    })
    .await
}

async fn edit_group(id: i32, app: App) -> Result<Response<String>, Rejection> {
    render_form("Putzplan-Gruppe ändern", &group_form(&app, Some(id)).await?, None)
}

async fn update_group(id: i32, app: App, data: FormData) -> Result<Response<String>, Rejection> {
    let form = group_form(&app, Some(id)).await?;
    submit("Putzplan-Gruppe ändern", &form, &data, |input| async move {
        logic::save_group(&app.db, Some(id), input)
            .await
            .map(|_| urls::config())
    })
    .await
}

async fn cleaner_form(app: &App, id: Option<i32>) -> Result<CleanerForm, Rejection> {
    Ok(match id {
        Some(id) => {
            let cleaner = app.db.cleaner(id).await.err_to_rejection()?;
            CleanerForm::new(Some(&cleaner), &*app.chat)
        }
        None => CleanerForm::new(None, &*app.chat),
    })
}

async fn new_cleaner(app: App) -> Result<Response<String>, Rejection> {
    render_form("Neuer Putzer", &cleaner_form(&app, None).await?, None)
}

async fn create_cleaner(app: App, data: FormData) -> Result<Response<String>, Rejection> {
    let form = cleaner_form(&app, None).await?;
    submit("Neuer Putzer", &form, &data, |input| async move {
        logic::save_cleaner(&app.db, None, input)
            .await
            .map(urls::affiliation_new)
    })
    .await
}

async fn edit_cleaner(id: i32, app: App) -> Result<Response<String>, Rejection> {
    render_form("Putzer ändern", &cleaner_form(&app, Some(id)).await?, None)
}

async fn update_cleaner(id: i32, app: App, data: FormData) -> Result<Response<String>, Rejection> {
    let form = cleaner_form(&app, Some(id)).await?;
    submit("Putzer ändern", &form, &data, |input| async move {
        logic::save_cleaner(&app.db, Some(id), input)
            .await
            .map(|_| urls::config())
    })
    .await
}

async fn confirm_delete_cleaner(id: i32, app: App) -> Result<Response<String>, Rejection> {
    let cleaner = app.db.cleaner(id).await.err_to_rejection()?;
    render_html(
        "cleaner-delete.html",
        json!({
            "title": "Putzer löschen",
            "name": cleaner.name,
            "back": urls::cleaner_edit(id),
        }),
    )
}

async fn delete_cleaner(id: i32, app: App, _data: FormData) -> Result<Response<String>, Rejection> {
    logic::delete_cleaner(&app.db, id).await.err_to_rejection()?;
    redirect(&urls::config())
}
