use crate::{
    forms::{
        save_and_cancel, Choice, Field, Form, FormData, FormErrors, InputForm, Layout, LayoutItem,
    },
    schema::{
        Schedule, ScheduleGroup, ScheduleInput, CLEANERS_PER_DATE_CHOICES, FREQUENCY_CHOICES,
    },
    urls,
};

/// Creating or editing a schedule.
#[derive(Clone, Debug)]
pub struct ScheduleForm {
    form: Form,
}

impl ScheduleForm {
    /// Builds the form. `groups` are the groups a schedule may be put in; `member_of` are the
    /// groups the edited schedule is in. How many cleaners a schedule needs and how often it is
    /// due can't be changed once it exists.
    pub fn new(
        instance: Option<&Schedule>,
        groups: &[ScheduleGroup],
        member_of: &[i32],
    ) -> ScheduleForm {
        let group_choices = groups
            .iter()
            .map(|group| Choice::new(group.id, group.name.as_str()))
            .collect();

        let mut form = Form::new(
            vec![
                Field::text("name", "Putzplan Name")
                    .max_length(20)
                    .help_text("Der Name des Putzplans"),
                Field::choice(
                    "cleaners_per_date",
                    "Anzahl der Putzer pro Woche",
                    Choice::from_table(CLEANERS_PER_DATE_CHOICES),
                )
                .help_text("Z.B. Bad braucht nur einen, Bar braucht zwei.")
                .initial(1),
                Field::choice(
                    "frequency",
                    "Häufigkeit der Putzdienste",
                    Choice::from_table(FREQUENCY_CHOICES),
                )
                .help_text(
                    "Wenn du zwei Putzdienste hast, die alle zwei Wochen dran sind, aber nicht an \
                     gleichen Tagen, dann wähle bei einem 'Gerade Wochen' und beim anderen \
                     'Ungerade Wochen' aus.",
                )
                .initial(1),
                Field::multiple_choice("schedule_group", "Zugehörigkeit", group_choices)
                    .optional()
                    .help_text("Wähle die Gruppe(n), zu der/denen der Putzplan gehört.")
                    .initial_all(member_of),
                Field::boolean("disabled", "Deaktivieren"),
            ],
            Layout::new(vec![
                LayoutItem::from("name"),
                "cleaners_per_date".into(),
                "frequency".into(),
                "schedule_group".into(),
                save_and_cancel(&urls::config()),
                "disabled".into(),
            ]),
        );

        if let Some(schedule) = instance {
            form.set_initial("name", &schedule.name);
            form.set_initial("cleaners_per_date", schedule.cleaners_per_date);
            form.set_initial("frequency", schedule.frequency);
            form.set_initial("disabled", schedule.disabled);
            form.disable("frequency");
            form.disable("cleaners_per_date");
        }

        ScheduleForm { form }
    }
}

impl InputForm for ScheduleForm {
    type Cleaned = ScheduleInput;

    fn form(&self) -> &Form {
        &self.form
    }

    fn validate(&self, data: &FormData) -> Result<ScheduleInput, FormErrors> {
        let mut bound = self.form.bind(data);
        let name = bound.text("name");
        let cleaners_per_date = bound.choice_id("cleaners_per_date");
        let frequency = bound.choice_id("frequency");
        let groups = bound.choice_ids("schedule_group");
        let disabled = bound.boolean("disabled");
        bound.finish(|| {
            Some(ScheduleInput {
                name: name?,
                cleaners_per_date: cleaners_per_date?,
                frequency: frequency?,
                groups,
                disabled,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<ScheduleGroup> {
        vec![
            ScheduleGroup {
                id: 1,
                name: "EG".to_string(),
                disabled: false,
            },
            ScheduleGroup {
                id: 2,
                name: "1. OG".to_string(),
                disabled: false,
            },
        ]
    }

    fn bad() -> Schedule {
        Schedule {
            id: 7,
            name: "Bad".to_string(),
            slug: "bad".to_string(),
            cleaners_per_date: 1,
            frequency: 2,
            disabled: false,
        }
    }

    #[test]
    fn layout() {
        let form = ScheduleForm::new(None, &groups(), &[]);
        assert_eq!(
            form.form().layout().field_names(),
            vec![
                "name",
                "cleaners_per_date",
                "frequency",
                "schedule_group",
                "disabled"
            ]
        );
        match &form.form().layout().items()[4] {
            LayoutItem::Html { html } => {
                assert!(html.contains("Speichern"));
                assert!(html.contains("href=\"/config\""));
            }
            item => panic!("not the buttons: {:?}", item),
        }
        assert_eq!(form.form().field("frequency").unwrap().initial, vec!["1"]);
    }

    #[test]
    fn creating() {
        let form = ScheduleForm::new(None, &groups(), &[]);
        let data = FormData::from_pairs(vec![
            ("name", "Bar"),
            ("cleaners_per_date", "2"),
            ("frequency", "3"),
            ("schedule_group", "1"),
            ("schedule_group", "2"),
        ]);
        assert_eq!(
            form.validate(&data),
            Ok(ScheduleInput {
                name: "Bar".to_string(),
                cleaners_per_date: 2,
                frequency: 3,
                groups: vec![1, 2],
                disabled: false,
            })
        );
    }

    #[test]
    fn rejects_long_names_and_unknown_choices() {
        let form = ScheduleForm::new(None, &groups(), &[]);
        let data = FormData::from_pairs(vec![
            ("name", "Ein viel zu langer Putzplanname"),
            ("cleaners_per_date", "9"),
            ("frequency", "1"),
        ]);
        let errs = form.validate(&data).unwrap_err();
        assert_eq!(errs.for_field("name")[0].code, "max_length");
        assert_eq!(errs.for_field("cleaners_per_date")[0].code, "invalid_choice");
    }

    #[test]
    fn editing_keeps_frequency_and_cleaner_count() {
        let form = ScheduleForm::new(Some(&bad()), &groups(), &[2]);
        assert!(form.form().field("frequency").unwrap().disabled);
        assert!(form.form().field("cleaners_per_date").unwrap().disabled);
        assert_eq!(form.form().field("schedule_group").unwrap().initial, vec!["2"]);

        let data = FormData::from_pairs(vec![
            ("name", "Bad unten"),
            ("cleaners_per_date", "4"),
            ("frequency", "1"),
            ("disabled", "on"),
        ]);
        let input = form.validate(&data).unwrap();
        assert_eq!(input.name, "Bad unten");
        assert_eq!(input.cleaners_per_date, 1);
        assert_eq!(input.frequency, 2);
        assert!(input.groups.is_empty());
        assert!(input.disabled);
    }
}
