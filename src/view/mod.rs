//! Rendering to templates.
//!
//! > View is the only module that knows anything about HTML, or JSON, or other "renderings" of the
//! > response. I'm happy to call this "view" in common with traditional stateless MVC, because
//! > it's role is largely the same.

use crate::{
    forms::{FormErrors, FormData, InputForm},
    router::ServerError,
};
use failure::{Error, Fallible};
use serde::Serialize;
use serde_json::json;
use tera::{Context, Tera};
use warp::{
    http::{header::CONTENT_TYPE, Response, StatusCode},
    reject::custom,
    Rejection,
};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("templates/base.html")),
    ("macros.html", include_str!("templates/macros.html")),
    ("form.html", include_str!("templates/form.html")),
    ("index.html", include_str!("templates/index.html")),
    ("config.html", include_str!("templates/config.html")),
    ("affiliation-list.html", include_str!("templates/affiliation-list.html")),
    ("task-list.html", include_str!("templates/task-list.html")),
    ("cleaner-delete.html", include_str!("templates/cleaner-delete.html")),
    ("results.html", include_str!("templates/results.html")),
];

lazy_static::lazy_static! {
    static ref TERA: Tera = {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().cloned())
            .expect("the embedded templates are valid");
        tera
    };
}

/// Renders a template as HTML to a String.
pub fn render<T: Serialize>(name: &str, data: T) -> Fallible<String> {
    let context = Context::from_serialize(data)?;
    Ok(TERA.render(name, &context)?)
}

/// Renders a template as HTML to a `warp::Reply`.
pub fn render_html<T: Serialize>(name: &str, data: T) -> Result<Response<String>, Rejection> {
    render_html_with_status(StatusCode::OK, name, data)
}

/// Renders a template as HTML to a `warp::Reply` with the given status.
pub fn render_html_with_status<T: Serialize>(
    status: StatusCode,
    name: &str,
    data: T,
) -> Result<Response<String>, Rejection> {
    render(name, data)
        .and_then(|body| {
            Response::builder()
                .status(status)
                .header(CONTENT_TYPE, "text/html; charset=utf-8")
                .body(body)
                .map_err(Error::from)
        })
        .map_err(|err| custom(ServerError(err)))
}

/// Renders a page with a form on it. With `submitted`, the form is shown again with the rejected
/// data and the errors, as a 400.
pub fn render_form<F: InputForm>(
    title: &str,
    form: &F,
    submitted: Option<(&FormData, &FormErrors)>,
) -> Result<Response<String>, Rejection> {
    let (status, view) = match submitted {
        Some((data, errors)) => (StatusCode::BAD_REQUEST, form.form().view(Some(data), errors)),
        None => (StatusCode::OK, form.form().view(None, &FormErrors::default())),
    };
    render_html_with_status(
        status,
        "form.html",
        json!({ "title": title, "form": view }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chat::Offline,
        forms::{
            CleanerForm, Field, Form, Layout, LayoutItem, LoginForm, ResultsForm, ScheduleForm,
        },
    };
    use chrono::NaiveDate;
    use maplit::hashmap;

    fn page<F: InputForm>(form: &F, submitted: Option<(&FormData, &FormErrors)>) -> String {
        let view = match submitted {
            Some((data, errors)) => form.form().view(Some(data), errors),
            None => form.form().view(None, &FormErrors::default()),
        };
        render("form.html", json!({ "title": "Test", "form": view })).unwrap()
    }

    #[test]
    fn simple_pages_render() {
        let html = render("index.html", hashmap! { "title" => "Putzplan" }).unwrap();
        assert!(html.contains("<title>Putzplan</title>"));
    }

    #[test]
    fn login_page() {
        let html = page(&LoginForm::new(Some("anna")), None);
        assert!(html.contains(r#"name="username""#));
        assert!(html.contains(r#"value="anna""#));
        assert!(html.contains("disabled"));
        assert!(html.contains(r#"type="password""#));
        assert!(html.contains(r#"value="Einloggen""#));
    }

    #[test]
    fn choices_and_checkboxes() {
        let form = ScheduleForm::new(None, &[], &[]);
        let html = page(&form, None);
        assert!(html.contains(r#"<option value="1" selected>Jede Woche</option>"#));
        assert!(html.contains(r#"<option value="2">Gerade Wochen</option>"#));
        assert!(html.contains(r#"type="checkbox" name="disabled""#));
        assert!(!html.contains("checked"));
    }

    #[test]
    fn errors_are_shown_with_the_submission() {
        let form = CleanerForm::new(None, &Offline);
        let data = FormData::from_pairs(vec![
            ("name", "<b>Anna</b>"),
            ("email", "anna@example.com"),
            ("preference", "2"),
        ]);
        let errors = form.validate(&data).unwrap_err();
        let html = page(&form, Some((&data, &errors)));
        assert!(html.contains("vorname.nachname@pvka.de"));
        assert!(html.contains("alert-danger"));
        assert!(html.contains("&lt;b&gt;Anna&lt;&#x2F;b&gt;"));
        assert!(html.contains("Slack ist ausgeschaltet"));
    }

    #[test]
    fn html_items_are_not_escaped() {
        let today = NaiveDate::from_ymd_opt(2019, 3, 10).unwrap();
        let html = page(&ResultsForm::new(today), None);
        assert!(html.contains(r#"<button class="btn btn-success""#));
        assert!(html.contains(r#"value="08.02.2019""#));
    }

    #[test]
    fn nested_divs_render_every_level() {
        let form = Form::new(
            vec![Field::text("name", "Name")],
            Layout::new(vec![LayoutItem::Div {
                items: vec![
                    LayoutItem::html("<p>außen</p>"),
                    LayoutItem::Div {
                        items: vec![
                            "name".into(),
                            LayoutItem::Div {
                                items: vec![LayoutItem::html("<p>innen</p>")],
                            },
                        ],
                    },
                ],
            }]),
        );
        let view = form.view(None, &FormErrors::default());
        let html = render("form.html", json!({ "title": "Test", "form": view })).unwrap();
        assert!(html.contains(r#"name="name""#));
        let html: String = html.split_whitespace().collect();
        assert!(html.contains("<div><p>außen</p>"));
        assert!(html.contains("<div><p>innen</p></div></div></div>"));
    }
}
