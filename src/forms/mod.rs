//! The input forms.
//!
//! > Forms declare what a page asks for (fields with labels, help texts and choices), in what
//! > order it is shown (the layout), and which submissions are rejected. They don't do any IO:
//! > everything that depends on the outside world, including the current date, is passed in.
//!
//! Each form wraps a `Form` and implements `InputForm`, which turns submitted `FormData` into a
//! cleaned input type from `crate::schema`, or into `FormErrors` to show alongside the form.

mod affiliation;
mod assignment;
mod cleaner;
mod errors;
mod field;
mod group;
mod layout;
mod login;
mod results;
mod schedule;
mod task;

pub use crate::forms::{
    affiliation::AffiliationForm,
    assignment::AssignmentCleaningForm,
    cleaner::{email_matches, CleanerForm},
    errors::{FormErrors, ValidationError},
    field::{Choice, Field, FieldKind},
    group::ScheduleGroupForm,
    layout::{
        cancel_link, delete_link, heading, notice, save_and_cancel, save_button, Layout,
        LayoutItem,
    },
    login::LoginForm,
    results::ResultsForm,
    schedule::ScheduleForm,
    task::TaskTemplateForm,
};
use chrono::NaiveDate;
use serde_derive::Serialize;
use std::{collections::HashMap, iter::FromIterator};
use validator::{ValidateEmail, ValidateLength, ValidateRange};

/// The format dates are entered in, i.e. `TT.MM.JJJJ`.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// A form that turns submitted data into a cleaned value.
pub trait InputForm {
    /// What a valid submission is turned into.
    type Cleaned;

    /// The fields and layout of the form.
    fn form(&self) -> &Form;

    /// Cleans and checks a submission.
    fn validate(&self, data: &FormData) -> Result<Self::Cleaned, FormErrors>;
}

/// Submitted form data. Names may repeat (e.g. for checkboxes of a multiple choice).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormData {
    values: HashMap<String, Vec<String>>,
}

impl FormData {
    /// Collects `(name, value)` pairs, as decoded from a urlencoded body.
    pub fn from_pairs<I, K, V>(pairs: I) -> FormData
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// All values submitted under the given name.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first value submitted under the given name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> FormData {
        let mut values = HashMap::<String, Vec<String>>::new();
        for (name, value) in pairs {
            values.entry(name.into()).or_default().push(value.into());
        }
        FormData { values }
    }
}

/// The fields of a form and the layout they are shown in.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Form {
    fields: Vec<Field>,
    layout: Layout,
}

impl Form {
    /// Creates a form.
    pub fn new(fields: Vec<Field>, layout: Layout) -> Form {
        Form { fields, layout }
    }

    /// The field of the given name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// The field of the given name, mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    /// Makes a field read-only. Its initial value is used for submissions.
    pub fn disable(&mut self, name: &str) {
        if let Some(field) = self.field_mut(name) {
            field.disabled = true;
        }
    }

    /// Replaces the initial value of a field.
    pub fn set_initial(&mut self, name: &str, initial: impl ToString) {
        if let Some(field) = self.field_mut(name) {
            field.initial = vec![initial.to_string()];
        }
    }

    /// Drops a field from the form and its layout.
    pub fn remove_field(&mut self, name: &str) {
        self.fields.retain(|field| field.name != name);
        let _ = self.layout.remove_field(name);
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    /// Pairs the form with submitted data, to clean it field by field.
    pub fn bind<'a>(&'a self, data: &'a FormData) -> BoundForm<'a> {
        BoundForm {
            form: self,
            data,
            errors: FormErrors::default(),
        }
    }

    /// Builds what the templates need to show the form. With `data`, the submitted values are
    /// shown instead of the initial ones.
    pub fn view(&self, data: Option<&FormData>, errors: &FormErrors) -> FormView {
        FormView {
            items: self.view_items(self.layout.items(), data, errors),
            non_field_errors: errors.non_field.clone(),
        }
    }

    fn view_items(
        &self,
        items: &[LayoutItem],
        data: Option<&FormData>,
        errors: &FormErrors,
    ) -> Vec<ItemView> {
        items
            .iter()
            .filter_map(|item| match item {
                LayoutItem::Field { name } => {
                    let field = self.field(name)?;
                    let values = match (&field.kind, data) {
                        (FieldKind::Password, _) => Vec::new(),
                        (_, Some(data)) if !field.disabled => data.get_all(name).to_vec(),
                        _ => field.initial.clone(),
                    };
                    Some(ItemView::Field {
                        field: field.clone(),
                        values,
                        errors: errors.for_field(name).to_vec(),
                    })
                }
                LayoutItem::Html { html } => Some(ItemView::Html { html: html.clone() }),
                LayoutItem::Div { items } => Some(ItemView::Div {
                    items: self.view_items(items, data, errors),
                }),
                LayoutItem::Submit {
                    name,
                    value,
                    css_class,
                } => Some(ItemView::Submit {
                    name: *name,
                    value: value.clone(),
                    css_class: css_class.clone(),
                }),
            })
            .collect()
    }
}

/// A form, ready to be rendered.
#[derive(Clone, Debug, Serialize)]
pub struct FormView {
    pub items: Vec<ItemView>,
    pub non_field_errors: Vec<ValidationError>,
}

/// One layout item, ready to be rendered.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemView {
    Field {
        field: Field,
        values: Vec<String>,
        errors: Vec<ValidationError>,
    },
    Html {
        html: String,
    },
    Div {
        items: Vec<ItemView>,
    },
    Submit {
        name: &'static str,
        value: String,
        css_class: String,
    },
}

/// A form paired with submitted data. Cleaning a field records any error about it; the
/// accessors return `None` for fields that are missing, empty or invalid.
#[derive(Debug)]
pub struct BoundForm<'a> {
    form: &'a Form,
    data: &'a FormData,
    errors: FormErrors,
}

impl<'a> BoundForm<'a> {
    /// The values of a field; a disabled field always has its initial values.
    fn raw(&self, field: &'a Field) -> &'a [String] {
        if field.disabled {
            field.initial.as_slice()
        } else {
            self.data.get_all(field.name)
        }
    }

    /// The first raw value of a field, trimmed, or `None` if it is empty. Records an error if
    /// the field is required.
    fn present(&mut self, name: &str, trim: bool) -> Option<(&'a Field, &'a str)> {
        let field = self.form.field(name)?;
        let value = self.raw(field).first().map(String::as_str).unwrap_or("");
        let value = if trim { value.trim() } else { value };
        if value.is_empty() {
            if field.required {
                self.field_error(field, "Dieses Feld ist zwingend erforderlich.", "required");
            }
            None
        } else {
            Some((field, value))
        }
    }

    fn field_error(&mut self, field: &Field, message: impl Into<String>, code: &'static str) {
        self.errors
            .add_field(field.name, ValidationError::new(message, code))
    }

    fn check_length(&mut self, field: &Field, value: &str) -> bool {
        let limit = match field.kind {
            FieldKind::Text { max_length } | FieldKind::Textarea { max_length } => max_length,
            _ => None,
        };
        match limit {
            Some(limit) if !value.validate_length(None, Some(limit as u64), None) => {
                self.field_error(
                    field,
                    format!(
                        "Bitte sicherstellen, dass der Wert aus höchstens {} Zeichen besteht. \
                         (Er besteht aus {} Zeichen.)",
                        limit,
                        value.chars().count()
                    ),
                    "max_length",
                );
                false
            }
            _ => true,
        }
    }

    /// A text field, with surrounding whitespace removed.
    pub fn text(&mut self, name: &str) -> Option<String> {
        let (field, value) = self.present(name, true)?;
        if self.check_length(field, value) {
            Some(value.to_string())
        } else {
            None
        }
    }

    /// A text field; empty if it was left blank.
    pub fn text_or_empty(&mut self, name: &str) -> String {
        self.text(name).unwrap_or_default()
    }

    /// A password field, exactly as entered.
    pub fn password(&mut self, name: &str) -> Option<String> {
        self.present(name, false).map(|(_, value)| value.to_string())
    }

    /// An email field. Only the general shape is checked here.
    pub fn email(&mut self, name: &str) -> Option<String> {
        let (field, value) = self.present(name, true)?;
        if value.validate_email() {
            Some(value.to_string())
        } else {
            self.field_error(field, "Bitte gültige E-Mail-Adresse eingeben.", "invalid");
            None
        }
    }

    /// An integer field.
    pub fn integer(&mut self, name: &str) -> Option<i64> {
        let (field, value) = self.present(name, true)?;
        let n = match value.parse::<i64>() {
            Ok(n) => n,
            Err(_) => {
                self.field_error(field, "Ganze Zahl eingeben.", "invalid");
                return None;
            }
        };
        match field.kind {
            FieldKind::Integer {
                min_value: Some(min),
            } if !n.validate_range(Some(min), None, None, None) => {
                self.field_error(
                    field,
                    format!("Dieser Wert muss größer oder gleich {} sein.", min),
                    "min_value",
                );
                None
            }
            _ => Some(n),
        }
    }

    /// A date field, in the format the field was declared with.
    pub fn date(&mut self, name: &str) -> Option<NaiveDate> {
        let (field, value) = self.present(name, true)?;
        let format = match field.kind {
            FieldKind::Date { format } => format,
            _ => DATE_FORMAT,
        };
        match NaiveDate::parse_from_str(value, format) {
            Ok(date) => Some(date),
            Err(_) => {
                self.field_error(field, "Bitte ein gültiges Datum eingeben.", "invalid");
                None
            }
        }
    }

    /// A checkbox. Anything but nothing, `false` and `0` counts as checked.
    pub fn boolean(&mut self, name: &str) -> bool {
        match self.form.field(name) {
            Some(field) => match self.raw(field).first().map(String::as_str) {
                None | Some("") | Some("false") | Some("False") | Some("0") => false,
                Some(_) => true,
            },
            None => false,
        }
    }

    fn invalid_choice(&mut self, field: &Field, value: &str) {
        self.field_error(
            field,
            format!(
                "Bitte eine gültige Auswahl treffen. {} ist keine der verfügbaren Optionen.",
                value
            ),
            "invalid_choice",
        )
    }

    /// A single choice; its value must be one of the field's choices.
    pub fn choice(&mut self, name: &str) -> Option<String> {
        let (field, value) = self.present(name, true)?;
        if field.choices().iter().any(|choice| choice.value == value) {
            Some(value.to_string())
        } else {
            self.invalid_choice(field, value);
            None
        }
    }

    /// A single choice whose values are database IDs.
    pub fn choice_id(&mut self, name: &str) -> Option<i32> {
        let value = self.choice(name)?;
        match value.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                if let Some(field) = self.form.field(name) {
                    self.invalid_choice(field, &value);
                }
                None
            }
        }
    }

    /// Any number of choices; each must be one of the field's choices.
    pub fn choices(&mut self, name: &str) -> Vec<String> {
        let field = match self.form.field(name) {
            Some(field) => field,
            None => return Vec::new(),
        };
        let values = self
            .raw(field)
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>();
        if values.is_empty() && field.required {
            self.field_error(field, "Dieses Feld ist zwingend erforderlich.", "required");
            return Vec::new();
        }

        let mut out = Vec::with_capacity(values.len());
        for value in values {
            if field.choices().iter().any(|choice| choice.value == value) {
                out.push(value.to_string());
            } else {
                self.invalid_choice(field, value);
                return Vec::new();
            }
        }
        out
    }

    /// Any number of choices whose values are database IDs.
    pub fn choice_ids(&mut self, name: &str) -> Vec<i32> {
        let values = self.choices(name);
        let ids = values
            .iter()
            .map(|value| value.parse())
            .collect::<Result<Vec<i32>, _>>();
        match ids {
            Ok(ids) => ids,
            Err(_) => {
                if let Some(field) = self.form.field(name) {
                    self.invalid_choice(field, &values.join(", "));
                }
                Vec::new()
            }
        }
    }

    /// Records the outcome of a check concerning the form as a whole.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(err) = result {
            self.errors.add_non_field(err);
        }
    }

    /// Records the outcome of a check concerning a single field.
    pub fn check_field(&mut self, name: &str, result: Result<(), ValidationError>) {
        if let Err(err) = result {
            if let Some(field) = self.form.field(name) {
                self.errors.add_field(field.name, err);
            }
        }
    }

    /// Whether no errors were recorded so far.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finishes cleaning: fails with every recorded error, or builds the cleaned value. `build`
    /// is only called when nothing was rejected; returning `None` from it means a value it needs
    /// was missing after all.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, FormErrors> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        build().ok_or_else(|| {
            ValidationError::new("Das Formular ist unvollständig.", "incomplete").into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> Form {
        Form::new(
            vec![
                Field::text("name", "Name").max_length(5),
                Field::integer("days", "Tage").optional().min_value(0),
                Field::date("day", "Tag", DATE_FORMAT).optional(),
                Field::boolean("off", "Aus"),
                Field::multiple_choice(
                    "groups",
                    "Gruppen",
                    vec![Choice::new(1, "EG"), Choice::new(2, "1. OG")],
                )
                .optional(),
                Field::choice("pick", "Wahl", vec![Choice::new("a", "A")]).optional(),
            ],
            Layout::new(vec!["name".into(), "days".into(), save_button()]),
        )
    }

    #[test]
    fn required_and_length() {
        let form = form();
        let data = FormData::from_pairs(vec![("name", "   ")]);
        let mut bound = form.bind(&data);
        assert_eq!(bound.text("name"), None);
        let errs = bound.finish(|| Some(())).unwrap_err();
        assert_eq!(errs.for_field("name")[0].code, "required");

        let data = FormData::from_pairs(vec![("name", "Küchen")]);
        let mut bound = form.bind(&data);
        assert_eq!(bound.text("name"), None);
        assert!(!bound.is_valid());

        let data = FormData::from_pairs(vec![("name", " Küche ")]);
        let mut bound = form.bind(&data);
        assert_eq!(bound.text("name"), Some("Küche".to_string()));
        assert!(bound.is_valid());
    }

    #[test]
    fn email_shape() {
        let form = Form::new(vec![Field::email("email", "Email")], Layout::default());
        for valid in &["anna.schmidt@pvka.de", "a@b.de"] {
            let data = FormData::from_pairs(vec![("email", *valid)]);
            let mut bound = form.bind(&data);
            assert_eq!(bound.email("email").as_deref(), Some(*valid));
        }
        for invalid in &["anna", "anna@", "@pvka.de", "an na@pvka.de", "a@@pvka.de"] {
            let data = FormData::from_pairs(vec![("email", *invalid)]);
            let mut bound = form.bind(&data);
            assert_eq!(bound.email("email"), None, "{}", invalid);
            let errs = bound.finish(|| Some(())).unwrap_err();
            assert_eq!(errs.for_field("email")[0].code, "invalid");
        }
    }

    #[test]
    fn numbers_and_dates() {
        let form = form();
        let data = FormData::from_pairs(vec![("days", "-1"), ("day", "31.02.2020")]);
        let mut bound = form.bind(&data);
        assert_eq!(bound.integer("days"), None);
        assert_eq!(bound.date("day"), None);
        let errs = bound.finish(|| Some(())).unwrap_err();
        assert_eq!(errs.for_field("days")[0].code, "min_value");
        assert_eq!(errs.for_field("day")[0].code, "invalid");

        let data = FormData::from_pairs(vec![("days", "0"), ("day", "29.02.2020")]);
        let mut bound = form.bind(&data);
        assert_eq!(bound.integer("days"), Some(0));
        assert_eq!(bound.date("day"), NaiveDate::from_ymd_opt(2020, 2, 29));

        let data = FormData::default();
        let mut bound = form.bind(&data);
        assert_eq!(bound.integer("days"), None);
        assert!(bound.is_valid());
    }

    #[test]
    fn choices_and_checkboxes() {
        let form = form();
        let data = FormData::from_pairs(vec![("groups", "2"), ("groups", "1"), ("off", "on")]);
        let mut bound = form.bind(&data);
        assert_eq!(bound.choice_ids("groups"), vec![2, 1]);
        assert!(bound.boolean("off"));
        assert!(!bound.boolean("missing"));

        let data = FormData::from_pairs(vec![("groups", "3"), ("pick", "b")]);
        let mut bound = form.bind(&data);
        assert!(bound.choice_ids("groups").is_empty());
        assert_eq!(bound.choice("pick"), None);
        let errs = bound.finish(|| Some(())).unwrap_err();
        assert!(errs.for_field("groups")[0].code == "invalid_choice");
        assert!(errs.for_field("pick")[0].code == "invalid_choice");
    }

    #[test]
    fn disabled_fields_keep_their_initial_value() {
        let mut form = form();
        form.set_initial("name", "Bad");
        form.disable("name");
        let data = FormData::from_pairs(vec![("name", "Bar")]);
        let mut bound = form.bind(&data);
        assert_eq!(bound.text("name"), Some("Bad".to_string()));

        let view = form.view(Some(&data), &FormErrors::default());
        match &view.items[0] {
            ItemView::Field { values, .. } => assert_eq!(values, &vec!["Bad".to_string()]),
            item => panic!("not a field: {:?}", item),
        }
    }

    #[test]
    fn view_follows_the_layout() {
        let mut form = form();
        form.remove_field("days");
        let mut errors = FormErrors::default();
        errors.add_field("name", ValidationError::new("Zu lang", "max_length"));
        let data = FormData::from_pairs(vec![("name", "Küchen")]);
        let view = form.view(Some(&data), &errors);
        assert_eq!(view.items.len(), 2);
        match &view.items[0] {
            ItemView::Field { field, values, errors } => {
                assert_eq!(field.name, "name");
                assert_eq!(values, &vec!["Küchen".to_string()]);
                assert_eq!(errors[0].code, "max_length");
            }
            item => panic!("not a field: {:?}", item),
        }
        assert!(form.field("days").is_none());
    }
}
