use crate::{
    forms::{
        cancel_link, heading, save_button, Choice, Field, Form, FormData, FormErrors, InputForm,
        Layout, ValidationError, DATE_FORMAT,
    },
    schema::{open_end, Affiliation, AffiliationInput, CleanerAffiliations, ScheduleGroup},
    urls,
};
use chrono::NaiveDate;

/// Adding an affiliation to a cleaner, or editing one.
///
/// A new affiliation always runs until 31.12.9999; the previous one is ended when it is saved.
/// Dates that already passed can't be changed anymore.
#[derive(Clone, Debug)]
pub struct AffiliationForm {
    form: Form,
    cleaner: Option<CleanerAffiliations>,
    instance: Option<i32>,
    today: NaiveDate,
}

impl AffiliationForm {
    /// Builds the form. `groups` should contain every group; only the enabled ones can be
    /// picked.
    pub fn new(
        cleaner: Option<&CleanerAffiliations>,
        instance: Option<&Affiliation>,
        groups: &[ScheduleGroup],
        today: NaiveDate,
    ) -> AffiliationForm {
        let group_choices = groups
            .iter()
            .filter(|group| !group.disabled)
            .map(|group| Choice::new(group.id, group.name.as_str()))
            .collect();

        let mut form = Form::new(
            vec![
                Field::choice("group", "Zugehörigkeit", group_choices)
                    .optional()
                    .empty_label("---Ausgezogen---")
                    .help_text("Wähle die Etage oder die Gruppe, zu der der Putzer gehört."),
                Field::date(
                    "beginning",
                    "Beginn der Zugehörigkeit TT.MM.YYYY",
                    DATE_FORMAT,
                ),
                Field::date("end", "Ende der Zugehörigkeit", DATE_FORMAT)
                    .help_text("Wenn kein genaues Datum bekannt ist, bitte 31.12.9999 eingeben")
                    .initial(open_end().format(DATE_FORMAT)),
            ],
            Layout::new(vec!["beginning".into(), "group".into(), save_button()]),
        );

        if let Some(current) = cleaner.and_then(|cleaner| cleaner.current_affiliation(today)) {
            if let Some(group) = current.group {
                form.set_initial("group", group);
            }
        }

        match instance {
            Some(aff) => {
                form.set_initial("beginning", aff.beginning.format(DATE_FORMAT));
                form.set_initial("end", aff.end.format(DATE_FORMAT));
                match aff.group {
                    Some(group) => form.set_initial("group", group),
                    None => {
                        if let Some(field) = form.field_mut("group") {
                            field.initial.clear();
                        }
                    }
                }

                form.layout_mut().insert(1, "end");
                if aff.beginning < today {
                    form.disable("beginning");
                }
                if aff.end < today {
                    form.disable("end");
                }

                let group_name = aff
                    .group
                    .and_then(|id| groups.iter().find(|group| group.id == id))
                    .map(|group| group.name.as_str())
                    .unwrap_or("Ausgezogen");
                form.layout_mut().insert(0, heading(group_name));

                if let Some(cleaner) = cleaner {
                    form.layout_mut()
                        .push(cancel_link(&urls::affiliation_list(cleaner.cleaner.id)));
                }
            }
            None => form.disable("end"),
        }

        // A group that got disabled must stay selectable on its own affiliations.
        if let Some(group) = instance
            .and_then(|aff| aff.group)
            .and_then(|id| groups.iter().find(|group| group.id == id && group.disabled))
        {
            if let Some(field) = form.field_mut("group") {
                let mut choices = field.choices().to_vec();
                choices.push(Choice::new(group.id, group.name.as_str()));
                field.set_choices(choices);
            }
        }

        AffiliationForm {
            form,
            cleaner: cleaner.cloned(),
            instance: instance.map(|aff| aff.id),
            today,
        }
    }

    fn clean(
        &self,
        group: Option<i32>,
        beginning: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(), ValidationError> {
        if let (Some(beginning), Some(end)) = (beginning, end) {
            if beginning > end {
                return Err(ValidationError::new(
                    "Das Ende darf nicht vor dem Beginn liegen!",
                    "end_before_beginning",
                ));
            }
        }

        let cleaner = match self.cleaner {
            Some(ref cleaner) => cleaner,
            None => return Ok(()),
        };

        let changes_group = cleaner
            .current_affiliation(self.today)
            .filter(|_| cleaner.is_active(self.today))
            .map(|current| current.group != group)
            .unwrap_or(false);
        let beginning = match beginning {
            Some(beginning) => beginning,
            None if changes_group => {
                return Err(ValidationError::new(
                    "Zur neuen Zugehörigkeit muss auch ein Datum angegeben werden!",
                    "new_aff_no_date",
                ))
            }
            None => return Ok(()),
        };

        let edited = self
            .instance
            .and_then(|id| cleaner.affiliations.iter().find(|aff| aff.id == id));
        let edited = match edited {
            Some(edited) => edited,
            None => {
                let precedes_old = cleaner
                    .affiliations
                    .iter()
                    .any(|aff| aff.beginning >= beginning);
                return if precedes_old {
                    Err(before_previous())
                } else {
                    Ok(())
                };
            }
        };

        // An edited affiliation stays between its neighbours.
        let others = || {
            cleaner
                .affiliations
                .iter()
                .filter(move |aff| aff.id != edited.id)
        };
        let previous = others()
            .filter(|aff| aff.beginning < edited.beginning)
            .map(|aff| aff.beginning)
            .max();
        let next = others()
            .filter(|aff| aff.beginning >= edited.beginning)
            .map(|aff| aff.beginning)
            .min();

        if previous.map_or(false, |previous| beginning <= previous) {
            return Err(before_previous());
        }
        if let Some(next) = next {
            if beginning >= next || end.map_or(false, |end| end >= next) {
                return Err(ValidationError::new(
                    "Die Zugehörigkeit darf nicht in die folgende Zugehörigkeit hineinreichen!",
                    "aff_overlaps_next_aff",
                ));
            }
        }

        Ok(())
    }
}

fn before_previous() -> ValidationError {
    ValidationError::new(
        "Der Beginn der neuen Zugehörigkeit kann nicht vor dem Beginn einer alten Zugehörigkeit \
         liegen!",
        "new_aff_before_old_aff",
    )
}

impl InputForm for AffiliationForm {
    type Cleaned = AffiliationInput;

    fn form(&self) -> &Form {
        &self.form
    }

    fn validate(&self, data: &FormData) -> Result<AffiliationInput, FormErrors> {
        let mut bound = self.form.bind(data);
        let group = bound.choice_id("group");
        let beginning = bound.date("beginning");
        let end = bound.date("end");
        bound.check(self.clean(group, beginning, end));
        bound.finish(|| {
            Some(AffiliationInput {
                group,
                beginning: beginning?,
                end: end?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{forms::LayoutItem, schema::Cleaner};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        day(2019, 3, 10)
    }

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
            ScheduleGroup {
                id: 3,
                name: "Altbau".to_string(),
                disabled: true,
            },
        ]
    }

    fn affiliation(id: i32, group: Option<i32>, beginning: NaiveDate, end: NaiveDate) -> Affiliation {
        Affiliation {
            id,
            cleaner: 4,
            group,
            beginning,
            end,
        }
    }

    fn anna(affiliations: Vec<Affiliation>) -> CleanerAffiliations {
        CleanerAffiliations {
            cleaner: Cleaner {
                id: 4,
                name: "Anna".to_string(),
                slug: "anna".to_string(),
                preference: 2,
                slack_id: None,
                email: "anna.schmidt@pvka.de".to_string(),
            },
            affiliations,
        }
    }

    fn living_in_eg() -> CleanerAffiliations {
        anna(vec![affiliation(10, Some(1), day(2018, 1, 1), open_end())])
    }

    #[test]
    fn creating() {
        let cleaner = living_in_eg();
        let form = AffiliationForm::new(Some(&cleaner), None, &groups(), today());
        assert_eq!(form.form().layout().field_names(), vec!["beginning", "group"]);
        assert_eq!(form.form().field("group").unwrap().initial, vec!["1"]);
        assert_eq!(form.form().field("group").unwrap().choices().len(), 2);
        let end = form.form().field("end").unwrap();
        assert!(end.disabled);
        assert_eq!(end.initial, vec!["31.12.9999"]);

        let data = FormData::from_pairs(vec![
            ("beginning", "01.04.2019"),
            ("group", "2"),
            ("end", "01.05.2019"),
        ]);
        assert_eq!(
            form.validate(&data),
            Ok(AffiliationInput {
                group: Some(2),
                beginning: day(2019, 4, 1),
                end: open_end(),
            })
        );
    }

    #[test]
    fn moving_out() {
        let cleaner = living_in_eg();
        let form = AffiliationForm::new(Some(&cleaner), None, &groups(), today());
        let data = FormData::from_pairs(vec![("beginning", "01.04.2019"), ("group", "")]);
        assert_eq!(form.validate(&data).unwrap().group, None);
    }

    #[test]
    fn new_affiliation_must_not_precede_an_old_one() {
        let cleaner = living_in_eg();
        let form = AffiliationForm::new(Some(&cleaner), None, &groups(), today());
        for beginning in &["31.12.2017", "01.01.2018"] {
            let data = FormData::from_pairs(vec![("beginning", *beginning), ("group", "2")]);
            let errs = form.validate(&data).unwrap_err();
            assert_eq!(errs.non_field[0].code, "new_aff_before_old_aff");
        }
    }

    #[test]
    fn change_of_group_needs_a_date() {
        let cleaner = living_in_eg();
        let form = AffiliationForm::new(Some(&cleaner), None, &groups(), today());
        let data = FormData::from_pairs(vec![("group", "2")]);
        let errs = form.validate(&data).unwrap_err();
        assert_eq!(errs.for_field("beginning")[0].code, "required");
        assert_eq!(errs.non_field[0].code, "new_aff_no_date");
    }

    #[test]
    fn editing_layout() {
        let old = affiliation(10, Some(3), day(2017, 1, 1), day(2018, 12, 31));
        let current = affiliation(11, Some(1), day(2019, 1, 1), open_end());
        let cleaner = anna(vec![old.clone(), current]);

        let form = AffiliationForm::new(Some(&cleaner), Some(&old), &groups(), today());
        assert_eq!(
            form.form().layout().field_names(),
            vec!["beginning", "end", "group"]
        );
        let items = form.form().layout().items();
        assert_eq!(items[0], heading("Altbau"));
        assert_eq!(items.last(), Some(&cancel_link("/cleaner/4/affiliations")));
        assert!(form.form().field("beginning").unwrap().disabled);
        assert!(form.form().field("end").unwrap().disabled);
        assert_eq!(form.form().field("group").unwrap().initial, vec!["3"]);
        assert_eq!(form.form().field("group").unwrap().choices().len(), 3);
        match &items[1] {
            LayoutItem::Field { name } => assert_eq!(*name, "beginning"),
            item => panic!("not a field: {:?}", item),
        }
    }

    #[test]
    fn editing_an_affiliation_followed_by_another() {
        let current = affiliation(11, Some(1), day(2019, 3, 1), day(2019, 5, 31));
        let next = affiliation(12, Some(2), day(2019, 6, 1), open_end());
        let cleaner = anna(vec![
            affiliation(10, Some(2), day(2018, 1, 1), day(2019, 2, 28)),
            current.clone(),
            next,
        ]);
        let form = AffiliationForm::new(Some(&cleaner), Some(&current), &groups(), today());
        assert!(form.form().field("beginning").unwrap().disabled);
        assert!(!form.form().field("end").unwrap().disabled);

        let unchanged = FormData::from_pairs(vec![("end", "31.05.2019"), ("group", "1")]);
        assert_eq!(
            form.validate(&unchanged),
            Ok(AffiliationInput {
                group: Some(1),
                beginning: day(2019, 3, 1),
                end: day(2019, 5, 31),
            })
        );

        let overlapping = FormData::from_pairs(vec![("end", "15.06.2019"), ("group", "1")]);
        let errs = form.validate(&overlapping).unwrap_err();
        assert_eq!(errs.non_field[0].code, "aff_overlaps_next_aff");
    }

    #[test]
    fn edited_beginning_stays_after_the_previous_one() {
        let current = affiliation(11, Some(1), day(2019, 4, 1), open_end());
        let cleaner = anna(vec![
            affiliation(10, Some(2), day(2018, 1, 1), day(2019, 3, 31)),
            current.clone(),
        ]);
        let form = AffiliationForm::new(Some(&cleaner), Some(&current), &groups(), today());
        let data = FormData::from_pairs(vec![
            ("beginning", "01.01.2018"),
            ("end", "31.12.2019"),
            ("group", "1"),
        ]);
        let errs = form.validate(&data).unwrap_err();
        assert_eq!(errs.non_field[0].code, "new_aff_before_old_aff");
    }

    #[test]
    fn end_must_not_precede_beginning() {
        let current = affiliation(11, Some(1), day(2019, 4, 1), open_end());
        let cleaner = anna(vec![
            affiliation(10, Some(2), day(2018, 1, 1), day(2019, 3, 31)),
            current.clone(),
        ]);
        let form = AffiliationForm::new(Some(&cleaner), Some(&current), &groups(), today());
        assert!(!form.form().field("beginning").unwrap().disabled);
        assert!(!form.form().field("end").unwrap().disabled);

        let data = FormData::from_pairs(vec![
            ("beginning", "01.05.2019"),
            ("end", "30.04.2019"),
            ("group", "1"),
        ]);
        let errs = form.validate(&data).unwrap_err();
        assert_eq!(errs.non_field[0].code, "end_before_beginning");

        let data = FormData::from_pairs(vec![
            ("beginning", "01.05.2019"),
            ("end", "31.12.2019"),
            ("group", "1"),
        ]);
        assert_eq!(
            form.validate(&data),
            Ok(AffiliationInput {
                group: Some(1),
                beginning: day(2019, 5, 1),
                end: day(2019, 12, 31),
            })
        );
    }
}
