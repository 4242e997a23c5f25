use crate::{
    forms::{
        save_and_cancel, Choice, Field, Form, FormData, FormErrors, InputForm, Layout,
        ValidationError,
    },
    schema::{Schedule, ScheduleGroup, ScheduleGroupInput},
    urls,
};

/// Creating or editing a schedule group.
#[derive(Clone, Debug)]
pub struct ScheduleGroupForm {
    form: Form,
    taken_names: Vec<String>,
}

impl ScheduleGroupForm {
    /// Builds the form. `schedules` are all schedules; `members` are those in the edited group.
    /// `taken_names` are the names of all other groups.
    pub fn new(
        instance: Option<&ScheduleGroup>,
        schedules: &[Schedule],
        members: &[i32],
        taken_names: &[String],
    ) -> ScheduleGroupForm {
        let schedule_choices = schedules
            .iter()
            .map(|schedule| Choice::new(schedule.id, schedule.name.as_str()))
            .collect();

        let mut form = Form::new(
            vec![
                Field::text("name", "Name der Putzplan-Gruppe")
                    .max_length(30)
                    .help_text(
                        "Dieser Name steht für ein Geschoss oder eine bestimmte Sammlung an \
                         Putzplänen, denen manche Bewohner angehören. Wenn du Putzer oder Pläne \
                         dieser Gruppe hinzufügen möchtest, so tue dies in den entsprechenden \
                         Putzer- und Putzplan-Änderungsformularen selbst.",
                    ),
                Field::multiple_choice("schedules", "Putzpläne", schedule_choices)
                    .optional()
                    .help_text("Wähle die Putzpläne, die dieser Gruppe angehören.")
                    .initial_all(members),
                Field::boolean("disabled", "Deaktivieren"),
            ],
            Layout::new(vec![
                "name".into(),
                "schedules".into(),
                "disabled".into(),
                save_and_cancel(&urls::config()),
            ]),
        );

        if let Some(group) = instance {
            form.set_initial("name", &group.name);
            form.set_initial("disabled", group.disabled);
        }

        ScheduleGroupForm {
            form,
            taken_names: taken_names.to_vec(),
        }
    }
}

impl InputForm for ScheduleGroupForm {
    type Cleaned = ScheduleGroupInput;

    fn form(&self) -> &Form {
        &self.form
    }

    fn validate(&self, data: &FormData) -> Result<ScheduleGroupInput, FormErrors> {
        let mut bound = self.form.bind(data);
        let name = bound.text("name");
        if let Some(name) = &name {
            if self.taken_names.contains(name) {
                bound.check_field(
                    "name",
                    Err(ValidationError::new(
                        "Eine Putzplan-Gruppe mit diesem Namen existiert bereits.",
                        "unique",
                    )),
                );
            }
        }
        let schedules = bound.choice_ids("schedules");
        let disabled = bound.boolean("disabled");
        bound.finish(|| {
            Some(ScheduleGroupInput {
                name: name?,
                schedules,
                disabled,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedules() -> Vec<Schedule> {
        ["Bad", "Küche", "Bar"]
            .iter()
            .enumerate()
            .map(|(i, name)| Schedule {
                id: i as i32 + 1,
                name: name.to_string(),
                slug: name.to_lowercase(),
                cleaners_per_date: 1,
                frequency: 1,
                disabled: false,
            })
            .collect()
    }

    #[test]
    fn layout_puts_buttons_last() {
        let form = ScheduleGroupForm::new(None, &schedules(), &[], &[]);
        let layout = form.form().layout();
        assert_eq!(layout.field_names(), vec!["name", "schedules", "disabled"]);
        assert_eq!(layout.items().len(), 4);
        assert_eq!(form.form().field("schedules").unwrap().choices().len(), 3);
    }

    #[test]
    fn editing_prefills() {
        let group = ScheduleGroup {
            id: 3,
            name: "2. OG".to_string(),
            disabled: true,
        };
        let form = ScheduleGroupForm::new(Some(&group), &schedules(), &[1, 3], &[]);
        assert_eq!(form.form().field("name").unwrap().initial, vec!["2. OG"]);
        assert_eq!(form.form().field("schedules").unwrap().initial, vec!["1", "3"]);
    }

    #[test]
    fn validates() {
        let form = ScheduleGroupForm::new(None, &schedules(), &[], &[]);
        let data = FormData::from_pairs(vec![("name", "Keller"), ("schedules", "3")]);
        assert_eq!(
            form.validate(&data),
            Ok(ScheduleGroupInput {
                name: "Keller".to_string(),
                schedules: vec![3],
                disabled: false,
            })
        );

        let data = FormData::from_pairs(vec![("name", "")]);
        let errs = form.validate(&data).unwrap_err();
        assert!(errs.has_code("required"));
    }

    #[test]
    fn names_are_unique() {
        let taken = vec!["EG".to_string(), "1. OG".to_string()];
        let form = ScheduleGroupForm::new(None, &schedules(), &[], &taken);
        let data = FormData::from_pairs(vec![("name", " EG ")]);
        let errs = form.validate(&data).unwrap_err();
        assert_eq!(errs.for_field("name")[0].code, "unique");

        let data = FormData::from_pairs(vec![("name", "eg")]);
        assert!(form.validate(&data).is_ok());

        let group = ScheduleGroup {
            id: 3,
            name: "2. OG".to_string(),
            disabled: false,
        };
        let form = ScheduleGroupForm::new(Some(&group), &schedules(), &[], &taken);
        let data = FormData::from_pairs(vec![("name", "2. OG")]);
        assert!(form.validate(&data).is_ok());
    }
}
