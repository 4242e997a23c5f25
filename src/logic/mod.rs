//! Business logic.
//!
//! > **Logic** is the "business (or domain) logic" of the application. The router will pull the
//! > necessary information out of the HTTP request, and call into this module as quickly as
//! > possible to do all the actual work.
//!
//! The forms have already checked their inputs by the time they get here; what is left is
//! deriving the values nobody types in (slugs) and keeping affiliations gapless.

use crate::{
    dal::DB,
    schema::{
        Affiliation, AffiliationInput, CleanerAffiliations, CleanerInput, ScheduleGroupInput,
        ScheduleInput, TaskTemplateInput,
    },
    util::slugify,
};
use chrono::{Duration, NaiveDate};
use failure::{bail, Fallible};
use log::info;

/// Creates or updates a schedule, returning its ID.
pub async fn save_schedule(db: &DB, id: Option<i32>, input: ScheduleInput) -> Fallible<i32> {
    match id {
        Some(id) => {
            db.update_schedule(id, input).await?;
            Ok(id)
        }
        None => {
            let slug = unique_slug(&input.name, db.schedules().await?.iter().map(|s| &s.slug))?;
            let id = db.create_schedule(input, slug).await?;
            info!("Created schedule {}", id);
            Ok(id)
        }
    }
}

/// Creates or updates a schedule group, returning its ID.
pub async fn save_group(db: &DB, id: Option<i32>, input: ScheduleGroupInput) -> Fallible<i32> {
    match id {
        Some(id) => {
            db.update_group(id, input).await?;
            Ok(id)
        }
        None => {
            let id = db.create_group(input).await?;
            info!("Created schedule group {}", id);
            Ok(id)
        }
    }
}

/// Creates or updates a cleaner, returning their ID.
pub async fn save_cleaner(db: &DB, id: Option<i32>, input: CleanerInput) -> Fallible<i32> {
    match id {
        Some(id) => {
            db.update_cleaner(id, input).await?;
            Ok(id)
        }
        None => {
            let slug = unique_slug(&input.name, db.cleaners().await?.iter().map(|c| &c.slug))?;
            let id = db.create_cleaner(input, slug).await?;
            info!("Created cleaner {}", id);
            Ok(id)
        }
    }
}

/// Deletes a cleaner.
pub async fn delete_cleaner(db: &DB, id: i32) -> Fallible<()> {
    db.delete_cleaner(id).await?;
    info!("Deleted cleaner {}", id);
    Ok(())
}

/// Creates or updates a task template, returning its ID.
pub async fn save_task_template(
    db: &DB,
    schedule: i32,
    id: Option<i32>,
    input: TaskTemplateInput,
) -> Fallible<i32> {
    match id {
        Some(id) => {
            db.update_task_template(id, input).await?;
            Ok(id)
        }
        None => db.create_task_template(schedule, input).await,
    }
}

/// Adds an affiliation to a cleaner, ending the one the new one replaces.
pub async fn add_affiliation(
    db: &DB,
    cleaner: &CleanerAffiliations,
    input: AffiliationInput,
) -> Fallible<i32> {
    let end_previous = previous_to_end(&cleaner.affiliations, input.beginning)?;
    let id = db
        .create_affiliation(cleaner.cleaner.id, input, end_previous)
        .await?;
    info!("Cleaner {} got affiliation {}", cleaner.cleaner.id, id);
    Ok(id)
}

/// Updates an affiliation in place. Unlike adding one, this doesn't touch the others.
pub async fn update_affiliation(db: &DB, id: i32, input: AffiliationInput) -> Fallible<()> {
    db.update_affiliation(id, input).await?;
    info!("Updated affiliation {}", id);
    Ok(())
}

/// Loads a cleaner together with their affiliations.
pub async fn cleaner_affiliations(db: &DB, cleaner: i32) -> Fallible<CleanerAffiliations> {
    Ok(CleanerAffiliations {
        cleaner: db.cleaner(cleaner).await?,
        affiliations: db.affiliations(cleaner).await?,
    })
}

/// Replaces the cleaner's comment on an assignment.
pub async fn comment_assignment(db: &DB, assignment: i32, comment: String) -> Fallible<()> {
    db.set_assignment_comment(assignment, comment).await
}

/// Which affiliation to end, and on which day, when a new one begins on `beginning`: the one
/// running on that day ends the day before.
pub fn previous_to_end(
    affiliations: &[Affiliation],
    beginning: NaiveDate,
) -> Fallible<Option<(i32, NaiveDate)>> {
    if affiliations.iter().any(|aff| aff.beginning >= beginning) {
        bail!("A new affiliation must begin after all others.");
    }
    Ok(affiliations
        .iter()
        .find(|aff| aff.covers(beginning))
        .map(|aff| (aff.id, beginning - Duration::days(1))))
}

/// Turns a name into a slug no one else has yet, by appending a number if needed.
pub fn unique_slug<'a, I>(name: &str, taken: I) -> Fallible<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let taken = taken.into_iter().collect::<Vec<_>>();
    let base = match slugify(name) {
        ref slug if slug.is_empty() => "x".to_string(),
        slug => slug,
    };
    if !taken.contains(&&base) {
        return Ok(base);
    }
    for n in 2..=taken.len() + 1 {
        let slug = format!("{}-{}", base, n);
        if !taken.contains(&&slug) {
            return Ok(slug);
        }
    }
    bail!("No free slug for {:?}", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::open_end;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ends_the_running_affiliation() {
        let affiliations = vec![
            Affiliation {
                id: 1,
                cleaner: 4,
                group: Some(1),
                beginning: day(2017, 1, 1),
                end: day(2017, 12, 31),
            },
            Affiliation {
                id: 2,
                cleaner: 4,
                group: Some(2),
                beginning: day(2018, 1, 1),
                end: open_end(),
            },
        ];
        assert_eq!(
            previous_to_end(&affiliations, day(2019, 4, 1)).unwrap(),
            Some((2, day(2019, 3, 31)))
        );
        assert!(previous_to_end(&affiliations, day(2018, 1, 1)).is_err());
        assert_eq!(previous_to_end(&[], day(2019, 4, 1)).unwrap(), None);
    }

    #[test]
    fn nothing_to_end_after_a_gap() {
        let affiliations = vec![Affiliation {
            id: 1,
            cleaner: 4,
            group: Some(1),
            beginning: day(2017, 1, 1),
            end: day(2017, 12, 31),
        }];
        assert_eq!(previous_to_end(&affiliations, day(2019, 1, 1)).unwrap(), None);
    }

    #[test]
    fn slugs_are_unique() {
        let taken = vec!["bad".to_string(), "bad-2".to_string(), "kueche".to_string()];
        assert_eq!(unique_slug("Bad", &taken).unwrap(), "bad-3");
        assert_eq!(unique_slug("Küche", &[]).unwrap(), "kueche");
        assert_eq!(unique_slug("Bar", &taken).unwrap(), "bar");
        assert_eq!(unique_slug("!!!", &taken).unwrap(), "x");
    }
}
