use crate::{
    forms::{Field, Form, FormData, FormErrors, InputForm, Layout, LayoutItem},
    schema::Credentials,
};

/// Logging in. A username passed along in the URL is filled in and can't be changed.
#[derive(Clone, Debug)]
pub struct LoginForm {
    form: Form,
}

impl LoginForm {
    pub fn new(username: Option<&str>) -> LoginForm {
        let mut form = Form::new(
            vec![
                Field::text("username", "Benutzername").max_length(150),
                Field::password("password", "Passwort"),
            ],
            Layout::new(vec![
                "username".into(),
                "password".into(),
                LayoutItem::submit("login", "Einloggen", "btn btn-block"),
            ]),
        );
        if let Some(username) = username.filter(|username| !username.is_empty()) {
            form.set_initial("username", username);
            form.disable("username");
        }
        LoginForm { form }
    }
}

impl InputForm for LoginForm {
    type Cleaned = Credentials;

    fn form(&self) -> &Form {
        &self.form
    }

    fn validate(&self, data: &FormData) -> Result<Credentials, FormErrors> {
        let mut bound = self.form.bind(data);
        let username = bound.text("username");
        let password = bound.password("password");
        bound.finish(|| {
            Some(Credentials {
                username: username?,
                password: password?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefilled_username_is_fixed() {
        let form = LoginForm::new(Some("anna"));
        assert!(form.form().field("username").unwrap().disabled);
        let data = FormData::from_pairs(vec![("username", "bernd"), ("password", " geheim ")]);
        assert_eq!(
            form.validate(&data),
            Ok(Credentials {
                username: "anna".to_string(),
                password: " geheim ".to_string(),
            })
        );
    }

    #[test]
    fn both_fields_are_needed() {
        let form = LoginForm::new(Some(""));
        assert!(!form.form().field("username").unwrap().disabled);
        let errs = form.validate(&FormData::default()).unwrap_err();
        assert_eq!(errs.for_field("username")[0].code, "required");
        assert_eq!(errs.for_field("password")[0].code, "required");
    }
}
