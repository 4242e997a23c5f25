use crate::{
    chat::ChatDirectory,
    forms::{
        delete_link, notice, save_and_cancel, Choice, Field, Form, FormData, FormErrors,
        InputForm, Layout, ValidationError,
    },
    schema::{Cleaner, CleanerInput, PREFERENCE_CHOICES},
    urls,
};
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

lazy_static! {
    static ref PV_EMAIL: Regex =
        Regex::new(r"^[^\s@]+\.[^\s@]+@pvka\.de$").expect("the email pattern is valid");
}

/// Whether an email address has the house's `vorname.nachname@pvka.de` form.
pub fn email_matches(email: &str) -> bool {
    PV_EMAIL.is_match(email)
}

/// Creating or editing a cleaner.
#[derive(Clone, Debug)]
pub struct CleanerForm {
    form: Form,

    /// The chat ID to keep when the chat integration is off and the field isn't shown.
    kept_slack_id: Option<String>,
}

impl CleanerForm {
    /// Builds the form. The chat ID can only be picked while the chat integration is running.
    pub fn new(instance: Option<&Cleaner>, chat: &dyn ChatDirectory) -> CleanerForm {
        let mut form = Form::new(
            vec![
                Field::text("name", "Name des Putzers").max_length(20),
                Field::email(
                    "email",
                    "Email des Putzers in der Form vorname.nachname@pvka.de",
                ),
                Field::choice(
                    "preference",
                    "Putzvorlieben",
                    Choice::from_table(PREFERENCE_CHOICES),
                )
                .initial(2),
                Field::choice("slack_id", "Wähle des Putzers Slackprofil aus.", Vec::new())
                    .optional()
                    .empty_label("--------------------"),
            ],
            Layout::new(vec![
                "name".into(),
                "email".into(),
                "preference".into(),
                save_and_cancel(&urls::config()),
            ]),
        );

        if let Some(cleaner) = instance {
            form.set_initial("name", &cleaner.name);
            form.set_initial("email", &cleaner.email);
            form.set_initial("preference", cleaner.preference);
            if let Some(slack_id) = &cleaner.slack_id {
                form.set_initial("slack_id", slack_id);
            }
        }

        let users = if chat.is_running() {
            match chat.users() {
                Ok(users) => Some(users),
                Err(err) => {
                    warn!("Couldn't list the chat users: {}", err);
                    None
                }
            }
        } else {
            None
        };

        let kept_slack_id = match users {
            Some(users) => {
                let choices = users
                    .into_iter()
                    .map(|user| Choice::new(user.id, user.name))
                    .collect();
                if let Some(field) = form.field_mut("slack_id") {
                    field.set_choices(choices);
                }
                let index = form
                    .layout()
                    .position_of("preference")
                    .map(|i| i + 1)
                    .unwrap_or(0);
                form.layout_mut().insert(index, "slack_id");
                None
            }
            None => {
                form.remove_field("slack_id");
                form.layout_mut().insert(
                    0,
                    notice(
                        "Slack ist ausgeschaltet. Schalte Slack ein, um dem Putzer eine \
                         Slack-ID zuordnen zu können.",
                    ),
                );
                instance.and_then(|cleaner| cleaner.slack_id.clone())
            }
        };

        if let Some(cleaner) = instance {
            form.layout_mut()
                .push(delete_link(&urls::cleaner_delete(cleaner.id), "Lösche Putzer"));
        }

        CleanerForm {
            form,
            kept_slack_id,
        }
    }

    fn check_email(email: &str) -> Result<(), ValidationError> {
        if email_matches(email) {
            Ok(())
        } else {
            Err(ValidationError::new(
                "Ungültige Email! Sie muss wie folgt aussehen: vorname.nachname@pvka.de",
                "invalid_email",
            ))
        }
    }
}

impl InputForm for CleanerForm {
    type Cleaned = CleanerInput;

    fn form(&self) -> &Form {
        &self.form
    }

    fn validate(&self, data: &FormData) -> Result<CleanerInput, FormErrors> {
        let mut bound = self.form.bind(data);
        let name = bound.text("name");
        let email = bound.email("email");
        let preference = bound.choice_id("preference");
        let slack_id = if self.form.field("slack_id").is_some() {
            bound.choice("slack_id")
        } else {
            self.kept_slack_id.clone()
        };
        if let Some(email) = &email {
            bound.check(CleanerForm::check_email(email));
        }
        bound.finish(|| {
            Some(CleanerInput {
                name: name?,
                email: email?,
                preference: preference?,
                slack_id,
            })
        })
    }
}
