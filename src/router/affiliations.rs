use crate::{
    forms::{AffiliationForm, FormData, DATE_FORMAT},
    logic,
    router::{
        util::{submit, today, ResultExt},
        App, State,
    },
    schema::{CleanerAffiliations, ScheduleGroup},
    urls,
    view::{render_form, render_html},
};
use serde_json::json;
use warp::{http::Response, Filter, Rejection};

pub fn routes(state: State) -> Resp!() {
    route_any!(
        state;
        GET ("cleaner" / i32 / "affiliations") => list,
        GET ("cleaner" / i32 / "affiliation" / "new") => new_affiliation,
        POST ("cleaner" / i32 / "affiliation" / "new") => create_affiliation,
        GET ("affiliation" / i32) => edit_affiliation,
        POST ("affiliation" / i32) => update_affiliation,
    )
    .boxed()
}

fn group_name(groups: &[ScheduleGroup], group: Option<i32>) -> &str {
    group
        .and_then(|id| groups.iter().find(|group| group.id == id))
        .map(|group| group.name.as_str())
        .unwrap_or("Ausgezogen")
}

async fn list(cleaner: i32, app: App) -> Result<Response<String>, Rejection> {
    let today = today();
    let cleaner = logic::cleaner_affiliations(&app.db, cleaner)
        .await
        .err_to_rejection()?;
    let groups = app.db.groups().await.err_to_rejection()?;

    let affiliations = cleaner
        .affiliations
        .iter()
        .rev()
        .map(|aff| {
            json!({
                "group": group_name(&groups, aff.group),
                "beginning": aff.beginning.format(DATE_FORMAT).to_string(),
                "end": aff.end.format(DATE_FORMAT).to_string(),
                "current": aff.covers(today),
                "edit": urls::affiliation_edit(aff.id),
            })
        })
        .collect::<Vec<_>>();

    render_html(
        "affiliation-list.html",
        json!({
            "title": format!("Zugehörigkeiten von {}", cleaner.cleaner.name),
            "affiliations": affiliations,
            "new_affiliation": urls::affiliation_new(cleaner.cleaner.id),
            "back": urls::config(),
        }),
    )
}

async fn new_form(
    app: &App,
    cleaner: i32,
) -> Result<(AffiliationForm, CleanerAffiliations), Rejection> {
    let cleaner = logic::cleaner_affiliations(&app.db, cleaner)
        .await
        .err_to_rejection()?;
    let groups = app.db.groups().await.err_to_rejection()?;
    let form = AffiliationForm::new(Some(&cleaner), None, &groups, today());
    Ok((form, cleaner))
}

async fn new_affiliation(cleaner: i32, app: App) -> Result<Response<String>, Rejection> {
    let (form, cleaner) = new_form(&app, cleaner).await?;
    render_form(&title(&cleaner), &form, None)
}

async fn create_affiliation(
    cleaner: i32,
    app: App,
    data: FormData,
) -> Result<Response<String>, Rejection> {
    let (form, cleaner) = new_form(&app, cleaner).await?;
    submit(&title(&cleaner), &form, &data, |input| async move {
        logic::add_affiliation(&app.db, &cleaner, input)
            .await
            .map(|_| urls::affiliation_list(cleaner.cleaner.id))
    })
    .await
}

async fn edit_form(
    app: &App,
    affiliation: i32,
) -> Result<(AffiliationForm, CleanerAffiliations), Rejection> {
    let affiliation = app.db.affiliation(affiliation).await.err_to_rejection()?;
    let cleaner = logic::cleaner_affiliations(&app.db, affiliation.cleaner)
        .await
        .err_to_rejection()?;
    let groups = app.db.groups().await.err_to_rejection()?;
    let form = AffiliationForm::new(Some(&cleaner), Some(&affiliation), &groups, today());
    Ok((form, cleaner))
}

async fn edit_affiliation(affiliation: i32, app: App) -> Result<Response<String>, Rejection> {
    let (form, cleaner) = edit_form(&app, affiliation).await?;
    render_form(&title(&cleaner), &form, None)
}

async fn update_affiliation(
    affiliation: i32,
    app: App,
    data: FormData,
) -> Result<Response<String>, Rejection> {
    let (form, cleaner) = edit_form(&app, affiliation).await?;
    let cleaner = cleaner.cleaner.id;
    submit("Zugehörigkeit ändern", &form, &data, |input| async move {
        logic::update_affiliation(&app.db, affiliation, input)
            .await
            .map(|_| urls::affiliation_list(cleaner))
    })
    .await
}

fn title(cleaner: &CleanerAffiliations) -> String {
    format!("Zugehörigkeit von {}", cleaner.cleaner.name)
}
