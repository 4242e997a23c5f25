use crate::{
    forms::{
        cancel_link, save_button, Field, Form, FormData, FormErrors, InputForm, Layout,
        ValidationError,
    },
    schema::{TaskTemplate, TaskTemplateInput},
    urls,
};
use std::convert::TryFrom;

/// The longest a task's window may be, in days, counting the listed day itself.
const MAX_WINDOW_DAYS: i64 = 6;

/// Adding a task to a schedule, or editing one.
#[derive(Clone, Debug)]
pub struct TaskTemplateForm {
    form: Form,
}

impl TaskTemplateForm {
    /// Builds the form. `schedule` is the ID of the schedule the task belongs to, if known; it
    /// is needed for the link back to the task list.
    pub fn new(schedule: Option<i32>, instance: Option<&TaskTemplate>) -> TaskTemplateForm {
        let mut form = Form::new(
            vec![
                Field::text("task_name", "Name der Aufgabe"),
                Field::integer(
                    "start_days_before",
                    "Kann bis so viele Tage vor dem gelisteten Tag gemacht werden.",
                )
                .optional()
                .min_value(0)
                .initial(2)
                .help_text(
                    "Bei Putzdiensten, die immer für Sonntag gelistet sind, würde eine 1 \
                     bedeuten, dass der Putzdienst ab Samstag gemacht werden kann",
                ),
                Field::integer(
                    "end_days_after",
                    "Kann bis so viele Tage nach dem gelisteten Tag gemacht werden.",
                )
                .optional()
                .min_value(0)
                .initial(1)
                .help_text(
                    "Bei Putzdiensten, die immer für Sonntag gelistet sind, würde eine 2 \
                     bedeuten, dass der Putzdienst bis Dienstag gemacht werden kann",
                ),
                Field::textarea("task_help_text", "Hilfetext")
                    .optional()
                    .help_text(
                        "Gib dem Putzer Tipps, um die Aufgabe schnell und effektiv machen zu \
                         können.",
                    ),
                Field::boolean("task_disabled", "Deaktiviert"),
            ],
            Layout::new(vec![
                "task_name".into(),
                "start_days_before".into(),
                "end_days_after".into(),
                "task_help_text".into(),
                "task_disabled".into(),
                save_button(),
            ]),
        );

        if let Some(task) = instance {
            form.set_initial("task_name", &task.task_name);
            form.set_initial("start_days_before", task.start_days_before);
            form.set_initial("end_days_after", task.end_days_after);
            form.set_initial("task_help_text", &task.task_help_text);
            form.set_initial("task_disabled", task.task_disabled);
        }

        if let Some(schedule) = schedule.or_else(|| instance.map(|task| task.schedule)) {
            form.layout_mut().push(cancel_link(&urls::task_list(schedule)));
        }

        TaskTemplateForm { form }
    }

    fn clean(
        has_name: bool,
        start_days_before: Option<i64>,
        end_days_after: Option<i64>,
    ) -> Result<(), ValidationError> {
        if has_name && (start_days_before.is_none() || end_days_after.is_none()) {
            return Err(ValidationError::new(
                "Zu einer neuen Aufgabe müssen die Tage festgelegt sein, ab wann und bis wann \
                 die Aufgabe erledigt werden kann!",
                "incomplete_inputs",
            ));
        }
        if let (Some(before), Some(after)) = (start_days_before, end_days_after) {
            if before.saturating_add(after) > MAX_WINDOW_DAYS {
                return Err(ValidationError::new(
                    "Die Zeitspanne, in der die Aufgabe gemacht werden kann, darf nicht eine \
                     Woche oder mehr umfassen!",
                    "span_gt_one_week",
                ));
            }
        }
        Ok(())
    }
}

impl InputForm for TaskTemplateForm {
    type Cleaned = TaskTemplateInput;

    fn form(&self) -> &Form {
        &self.form
    }

    fn validate(&self, data: &FormData) -> Result<TaskTemplateInput, FormErrors> {
        let mut bound = self.form.bind(data);
        let task_name = bound.text("task_name");
        let start_days_before = bound.integer("start_days_before");
        let end_days_after = bound.integer("end_days_after");
        let task_help_text = bound.text_or_empty("task_help_text");
        let task_disabled = bound.boolean("task_disabled");
        bound.check(TaskTemplateForm::clean(
            task_name.is_some(),
            start_days_before,
            end_days_after,
        ));
        bound.finish(|| {
            Some(TaskTemplateInput {
                task_name: task_name?,
                start_days_before: i32::try_from(start_days_before?).ok()?,
                end_days_after: i32::try_from(end_days_after?).ok()?,
                task_help_text,
                task_disabled,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::LayoutItem;

    fn submit(pairs: Vec<(&str, &str)>) -> Result<TaskTemplateInput, FormErrors> {
        TaskTemplateForm::new(Some(3), None).validate(&FormData::from_pairs(pairs))
    }

    #[test]
    fn layout() {
        let form = TaskTemplateForm::new(None, None);
        assert_eq!(form.form().layout().items().len(), 6);
        assert_eq!(
            form.form().field("start_days_before").unwrap().initial,
            vec!["2"]
        );

        let form = TaskTemplateForm::new(Some(3), None);
        match form.form().layout().items().last().unwrap() {
            LayoutItem::Html { html } => assert!(html.contains("/schedule/3/tasks")),
            item => panic!("not the cancel link: {:?}", item),
        }
    }

    #[test]
    fn window_must_be_shorter_than_a_week() {
        let errs = submit(vec![
            ("task_name", "Spiegel putzen"),
            ("start_days_before", "4"),
            ("end_days_after", "3"),
        ])
        .unwrap_err();
        assert_eq!(errs.non_field[0].code, "span_gt_one_week");

        let input = submit(vec![
            ("task_name", "Spiegel putzen"),
            ("start_days_before", "3"),
            ("end_days_after", "3"),
            ("task_help_text", "  Glasreiniger steht unter dem Waschbecken. "),
        ])
        .unwrap();
        assert_eq!(input.start_days_before + input.end_days_after, 6);
        assert_eq!(input.task_help_text, "Glasreiniger steht unter dem Waschbecken.");
        assert!(!input.task_disabled);
    }

    #[test]
    fn window_must_be_given() {
        let errs = submit(vec![("task_name", "Boden wischen"), ("end_days_after", "1")])
            .unwrap_err();
        assert_eq!(errs.non_field[0].code, "incomplete_inputs");
    }

    #[test]
    fn zero_days_is_a_window() {
        let input = submit(vec![
            ("task_name", "Müll rausbringen"),
            ("start_days_before", "0"),
            ("end_days_after", "0"),
        ])
        .unwrap();
        assert_eq!((input.start_days_before, input.end_days_after), (0, 0));
    }

    #[test]
    fn editing_links_back_to_the_schedule() {
        let task = TaskTemplate {
            id: 9,
            schedule: 5,
            task_name: "Dusche".to_string(),
            start_days_before: 1,
            end_days_after: 2,
            task_help_text: String::new(),
            task_disabled: true,
        };
        let form = TaskTemplateForm::new(None, Some(&task));
        assert_eq!(form.form().field("task_disabled").unwrap().initial, vec!["true"]);
        assert_eq!(
            form.form().layout().items().last(),
            Some(&cancel_link("/schedule/5/tasks"))
        );
    }
}
