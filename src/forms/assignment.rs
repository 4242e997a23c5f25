use crate::{
    forms::{Field, Form, FormData, FormErrors, InputForm, Layout, LayoutItem},
    schema::Assignment,
};

/// The comment box under an assignment.
#[derive(Clone, Debug)]
pub struct AssignmentCleaningForm {
    form: Form,
}

impl AssignmentCleaningForm {
    pub fn new(instance: Option<&Assignment>) -> AssignmentCleaningForm {
        let mut form = Form::new(
            vec![Field::textarea(
                "cleaners_comment",
                "Kommentare, Auffälligkeiten, ... (speichern nicht vergessen)",
            )
            .max_length(200)
            .optional()
            .help_text("Max. 200 Zeichen")],
            Layout::new(vec![
                LayoutItem::Div {
                    items: vec!["cleaners_comment".into()],
                },
                LayoutItem::submit("save_comment", "Kommentar speichern", "btn btn-block"),
            ]),
        );
        if let Some(assignment) = instance {
            form.set_initial("cleaners_comment", &assignment.cleaners_comment);
        }
        AssignmentCleaningForm { form }
    }
}

impl InputForm for AssignmentCleaningForm {
    /// The comment; empty if there is none.
    type Cleaned = String;

    fn form(&self) -> &Form {
        &self.form
    }

    fn validate(&self, data: &FormData) -> Result<String, FormErrors> {
        let mut bound = self.form.bind(data);
        let comment = bound.text_or_empty("cleaners_comment");
        bound.finish(|| Some(comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_is_optional_but_short() {
        let form = AssignmentCleaningForm::new(None);
        assert_eq!(form.validate(&FormData::default()), Ok(String::new()));

        let long = "x".repeat(201);
        let data = FormData::from_pairs(vec![("cleaners_comment", long.as_str())]);
        let errs = form.validate(&data).unwrap_err();
        assert_eq!(errs.for_field("cleaners_comment")[0].code, "max_length");

        let data = FormData::from_pairs(vec![("cleaners_comment", "Kein Spülmittel mehr da.")]);
        assert_eq!(form.validate(&data), Ok("Kein Spülmittel mehr da.".to_string()));
    }

    #[test]
    fn layout_has_a_div_and_a_submit_button() {
        let form = AssignmentCleaningForm::new(None);
        let items = form.form().layout().items();
        assert_eq!(form.form().layout().field_names(), vec!["cleaners_comment"]);
        assert_eq!(
            items[1],
            LayoutItem::submit("save_comment", "Kommentar speichern", "btn btn-block")
        );
    }
}
