use serde_derive::Serialize;

/// One option of a choice field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Choice {
    /// The submitted value.
    pub value: String,

    /// What the user sees.
    pub label: String,
}

impl Choice {
    /// Creates a choice.
    pub fn new(value: impl ToString, label: impl Into<String>) -> Choice {
        Choice {
            value: value.to_string(),
            label: label.into(),
        }
    }

    /// Turns a table of `(value, label)` pairs into choices.
    pub fn from_table(table: &[(i32, &str)]) -> Vec<Choice> {
        table
            .iter()
            .map(|&(value, label)| Choice::new(value, label))
            .collect()
    }
}

/// What kind of input a field takes, and how it is rendered.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// A single line of text.
    Text { max_length: Option<usize> },

    /// Multiple lines of text.
    Textarea { max_length: Option<usize> },

    /// An email address.
    Email,

    /// A password; never rendered back.
    Password,

    /// A whole number.
    Integer { min_value: Option<i64> },

    /// A date in the given `strftime` format.
    Date { format: &'static str },

    /// A checkbox.
    Boolean,

    /// One of the given choices. When the field is optional, `empty_label` is shown for no
    /// choice.
    Choice {
        choices: Vec<Choice>,
        empty_label: Option<String>,
    },

    /// Any number of the given choices, rendered as checkboxes.
    MultipleChoice { choices: Vec<Choice> },
}

/// A field of a form, with everything needed to render and clean it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub label: String,
    pub help_text: Option<String>,
    pub required: bool,

    /// A disabled field is shown but not editable; its initial value is used regardless of what
    /// was submitted.
    pub disabled: bool,

    pub initial: Vec<String>,
    pub kind: FieldKind,
}

impl Field {
    fn new(name: &'static str, label: &str, kind: FieldKind) -> Field {
        Field {
            name,
            label: label.to_string(),
            help_text: None,
            required: true,
            disabled: false,
            initial: Vec::new(),
            kind,
        }
    }

    pub fn text(name: &'static str, label: &str) -> Field {
        Field::new(name, label, FieldKind::Text { max_length: None })
    }

    pub fn textarea(name: &'static str, label: &str) -> Field {
        Field::new(name, label, FieldKind::Textarea { max_length: None })
    }

    pub fn email(name: &'static str, label: &str) -> Field {
        Field::new(name, label, FieldKind::Email)
    }

    pub fn password(name: &'static str, label: &str) -> Field {
        Field::new(name, label, FieldKind::Password)
    }

    pub fn integer(name: &'static str, label: &str) -> Field {
        Field::new(name, label, FieldKind::Integer { min_value: None })
    }

    pub fn date(name: &'static str, label: &str, format: &'static str) -> Field {
        Field::new(name, label, FieldKind::Date { format })
    }

    /// Checkboxes are never required; an unchecked box submits nothing.
    pub fn boolean(name: &'static str, label: &str) -> Field {
        Field::new(name, label, FieldKind::Boolean).optional()
    }

    pub fn choice(name: &'static str, label: &str, choices: Vec<Choice>) -> Field {
        Field::new(
            name,
            label,
            FieldKind::Choice {
                choices,
                empty_label: None,
            },
        )
    }

    pub fn multiple_choice(name: &'static str, label: &str, choices: Vec<Choice>) -> Field {
        Field::new(name, label, FieldKind::MultipleChoice { choices })
    }

    /// Makes the field optional.
    pub fn optional(mut self) -> Field {
        self.required = false;
        self
    }

    pub fn help_text(mut self, help_text: &str) -> Field {
        self.help_text = Some(help_text.to_string());
        self
    }

    pub fn initial(mut self, initial: impl ToString) -> Field {
        self.initial = vec![initial.to_string()];
        self
    }

    pub fn initial_all<I, T>(mut self, initial: I) -> Field
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.initial = initial.into_iter().map(|value| value.to_string()).collect();
        self
    }

    /// Limits the length of a text field. Has no effect on other kinds of fields.
    pub fn max_length(mut self, limit: usize) -> Field {
        match self.kind {
            FieldKind::Text { ref mut max_length }
            | FieldKind::Textarea { ref mut max_length } => *max_length = Some(limit),
            _ => {}
        }
        self
    }

    /// Sets the smallest value of an integer field. Has no effect on other kinds of fields.
    pub fn min_value(mut self, limit: i64) -> Field {
        if let FieldKind::Integer { ref mut min_value } = self.kind {
            *min_value = Some(limit);
        }
        self
    }

    /// Sets the label shown for "nothing chosen" on a choice field.
    pub fn empty_label(mut self, label: &str) -> Field {
        if let FieldKind::Choice {
            ref mut empty_label,
            ..
        } = self.kind
        {
            *empty_label = Some(label.to_string());
        }
        self
    }

    /// The choices of a (multiple) choice field; empty for other kinds of fields.
    pub fn choices(&self) -> &[Choice] {
        match self.kind {
            FieldKind::Choice { ref choices, .. } | FieldKind::MultipleChoice { ref choices } => {
                choices.as_slice()
            }
            _ => &[],
        }
    }

    /// Replaces the choices of a (multiple) choice field.
    pub fn set_choices(&mut self, new_choices: Vec<Choice>) {
        match self.kind {
            FieldKind::Choice {
                ref mut choices, ..
            }
            | FieldKind::MultipleChoice { ref mut choices } => *choices = new_choices,
            _ => {}
        }
    }
}
