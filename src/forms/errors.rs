use serde_derive::Serialize;
use std::{
    collections::BTreeMap,
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// A rejected input, with a message for the user and a short code for code.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationError {
    /// The message shown to the user.
    pub message: String,

    /// A short symbolic code, e.g. `end_before_beginning`.
    pub code: &'static str,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(message: impl Into<String>, code: &'static str) -> ValidationError {
        ValidationError {
            message: message.into(),
            code,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, fmt: &mut Formatter) -> FmtResult {
        write!(fmt, "{} ({})", self.message, self.code)
    }
}

impl Error for ValidationError {}

/// All the reasons a submission was rejected.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FormErrors {
    /// Errors about the form as a whole, i.e. about how fields relate to each other.
    pub non_field: Vec<ValidationError>,

    /// Errors about single fields, by field name.
    pub fields: BTreeMap<String, Vec<ValidationError>>,
}

impl FormErrors {
    /// Whether there are no errors at all.
    pub fn is_empty(&self) -> bool {
        self.non_field.is_empty() && self.fields.values().all(Vec::is_empty)
    }

    /// Records an error about a single field.
    pub fn add_field(&mut self, field: &str, err: ValidationError) {
        self.fields.entry(field.to_string()).or_default().push(err)
    }

    /// Records an error about the form as a whole.
    pub fn add_non_field(&mut self, err: ValidationError) {
        self.non_field.push(err)
    }

    /// The errors about the given field.
    pub fn for_field(&self, field: &str) -> &[ValidationError] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any error (field or non-field) has the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.non_field
            .iter()
            .chain(self.fields.values().flatten())
            .any(|err| err.code == code)
    }
}

impl Display for FormErrors {
    fn fmt(&self, fmt: &mut Formatter) -> FmtResult {
        let mut first = true;
        let fields = self
            .fields
            .iter()
            .flat_map(|(name, errs)| errs.iter().map(move |err| (Some(name), err)));
        for (field, err) in self.non_field.iter().map(|err| (None, err)).chain(fields) {
            if !first {
                fmt.write_str("; ")?;
            }
            first = false;
            match field {
                Some(field) => write!(fmt, "{}: {}", field, err)?,
                None => write!(fmt, "{}", err)?,
            }
        }
        Ok(())
    }
}

impl Error for FormErrors {}

impl From<ValidationError> for FormErrors {
    fn from(err: ValidationError) -> FormErrors {
        FormErrors {
            non_field: vec![err],
            fields: BTreeMap::new(),
        }
    }
}
