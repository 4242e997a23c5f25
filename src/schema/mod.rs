//! Types used throughout.
//!
//! > Schema defines the plain old data types that views operate on. Notably, the schema module has
//! > no knowledge of the database, nor any dependencies on any of the rest of the system.

use chrono::NaiveDate;
use diesel::Queryable;
use serde_derive::Serialize;

/// The choices for how many cleaners a schedule needs per date.
pub const CLEANERS_PER_DATE_CHOICES: &[(i32, &str)] =
    &[(1, "Einen"), (2, "Zwei"), (3, "Drei"), (4, "Vier")];

/// The choices for how often a schedule is due.
pub const FREQUENCY_CHOICES: &[(i32, &str)] = &[
    (1, "Jede Woche"),
    (2, "Gerade Wochen"),
    (3, "Ungerade Wochen"),
];

/// The choices for how a cleaner likes their duties to be spread out.
pub const PREFERENCE_CHOICES: &[(i32, &str)] = &[
    (1, "Ich möchte immer mehrere Putzdienste auf einmal machen"),
    (2, "Ich möchte höchstens zwei Putzdienste auf einmal machen"),
    (3, "Ich möchte keine Putzdienste gleichzeitig machen"),
];

/// The end date of an affiliation that has no known end.
pub fn open_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// A cleaning schedule.
#[derive(Clone, Debug, PartialEq, Queryable, Serialize)]
pub struct Schedule {
    /// The schedule's database ID.
    pub id: i32,

    /// The schedule's name.
    pub name: String,

    /// The URL-safe form of the name.
    pub slug: String,

    /// How many cleaners are needed per cleaning day.
    pub cleaners_per_date: i32,

    /// How often the schedule is due; one of `FREQUENCY_CHOICES`.
    pub frequency: i32,

    /// Whether the schedule is switched off.
    pub disabled: bool,
}

/// A group of schedules, usually a floor of the house.
#[derive(Clone, Debug, PartialEq, Queryable, Serialize)]
pub struct ScheduleGroup {
    /// The group's database ID.
    pub id: i32,

    /// The group's name.
    pub name: String,

    /// Whether the group is switched off.
    pub disabled: bool,
}

/// A cleaner, along with the email of the user account linked to them.
#[derive(Clone, Debug, PartialEq, Queryable, Serialize)]
pub struct Cleaner {
    /// The cleaner's database ID.
    pub id: i32,

    /// The cleaner's name.
    pub name: String,

    /// The URL-safe form of the name.
    pub slug: String,

    /// One of `PREFERENCE_CHOICES`.
    pub preference: i32,

    /// The cleaner's ID in the chat integration, if any.
    pub slack_id: Option<String>,

    /// The email address of the linked user.
    pub email: String,
}

/// A time-bounded membership of a cleaner in a group. An affiliation without a group means the
/// cleaner moved out.
#[derive(Clone, Debug, PartialEq, Queryable, Serialize)]
pub struct Affiliation {
    /// The affiliation's database ID.
    pub id: i32,

    /// The database ID of the cleaner.
    pub cleaner: i32,

    /// The database ID of the group.
    pub group: Option<i32>,

    /// The first day of the membership.
    pub beginning: NaiveDate,

    /// The last day of the membership.
    pub end: NaiveDate,
}

impl Affiliation {
    /// Whether the affiliation covers the given day.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.beginning <= day && day <= self.end
    }
}

/// A cleaner together with all their affiliations, as the affiliation form needs it.
#[derive(Clone, Debug, Serialize)]
pub struct CleanerAffiliations {
    /// The cleaner.
    pub cleaner: Cleaner,

    /// All affiliations of the cleaner, ordered by beginning.
    pub affiliations: Vec<Affiliation>,
}

impl CleanerAffiliations {
    /// The affiliation covering the given day, if any.
    pub fn current_affiliation(&self, today: NaiveDate) -> Option<&Affiliation> {
        self.affiliations.iter().find(|aff| aff.covers(today))
    }

    /// Whether the cleaner is currently a member of some group.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.current_affiliation(today)
            .map(|aff| aff.group.is_some())
            .unwrap_or(false)
    }
}

/// A sub-task of a schedule, with the window in which it may be done.
#[derive(Clone, Debug, PartialEq, Queryable, Serialize)]
pub struct TaskTemplate {
    /// The template's database ID.
    pub id: i32,

    /// The database ID of the schedule.
    pub schedule: i32,

    /// The task's name.
    pub task_name: String,

    /// How many days before the listed day the task may be done.
    pub start_days_before: i32,

    /// How many days after the listed day the task may be done.
    pub end_days_after: i32,

    /// Tips for the cleaner.
    pub task_help_text: String,

    /// Whether the task is switched off.
    pub task_disabled: bool,
}

/// A cleaner's duty on a given day.
#[derive(Clone, Debug, PartialEq, Queryable, Serialize)]
pub struct Assignment {
    /// The assignment's database ID.
    pub id: i32,

    /// The database ID of the cleaner.
    pub cleaner: i32,

    /// The database ID of the schedule.
    pub schedule: i32,

    /// The day the duty is listed for.
    pub cleaning_day: NaiveDate,

    /// What the cleaner noted about the duty.
    pub cleaners_comment: String,
}

/// An assignment with the names of its cleaner and schedule, for listings.
#[derive(Clone, Debug, Queryable, Serialize)]
pub struct AssignmentRow {
    /// The day the duty is listed for.
    pub cleaning_day: NaiveDate,

    /// The name of the schedule.
    pub schedule: String,

    /// The name of the cleaner.
    pub cleaner: String,

    /// What the cleaner noted about the duty.
    pub cleaners_comment: String,
}

/// The cleaned input of the schedule form.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleInput {
    pub name: String,
    pub cleaners_per_date: i32,
    pub frequency: i32,
    pub groups: Vec<i32>,
    pub disabled: bool,
}

/// The cleaned input of the schedule group form.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleGroupInput {
    pub name: String,
    pub schedules: Vec<i32>,
    pub disabled: bool,
}

/// The cleaned input of the cleaner form.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanerInput {
    pub name: String,
    pub email: String,
    pub preference: i32,
    pub slack_id: Option<String>,
}

/// The cleaned input of the affiliation form. No group means the cleaner moves out.
#[derive(Clone, Debug, PartialEq)]
pub struct AffiliationInput {
    pub group: Option<i32>,
    pub beginning: NaiveDate,
    pub end: NaiveDate,
}

/// The cleaned input of the task template form.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskTemplateInput {
    pub task_name: String,
    pub start_days_before: i32,
    pub end_days_after: i32,
    pub task_help_text: String,
    pub task_disabled: bool,
}

/// The date range chosen in the results form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResultsRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// The cleaned input of the login form.
#[derive(Clone, Debug, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
