//! The paths of the pages, shared by the form layouts, the templates and the router.

use chrono::NaiveDate;

/// The date format used in URLs.
pub const URL_DATE_FORMAT: &str = "%Y-%m-%d";

/// The configuration overview.
pub fn config() -> String {
    "/config".to_string()
}

/// Creating a schedule.
pub fn schedule_new() -> String {
    "/config/schedule/new".to_string()
}

/// Editing a schedule.
pub fn schedule_edit(schedule: i32) -> String {
    format!("/config/schedule/{}", schedule)
}

/// Creating a schedule group.
pub fn group_new() -> String {
    "/config/group/new".to_string()
}

/// Editing a schedule group.
pub fn group_edit(group: i32) -> String {
    format!("/config/group/{}", group)
}

/// Creating a cleaner.
pub fn cleaner_new() -> String {
    "/config/cleaner/new".to_string()
}

/// Editing a cleaner.
pub fn cleaner_edit(cleaner: i32) -> String {
    format!("/config/cleaner/{}", cleaner)
}

/// Deleting a cleaner.
pub fn cleaner_delete(cleaner: i32) -> String {
    format!("/config/cleaner/{}/delete", cleaner)
}

/// The affiliations of a cleaner.
pub fn affiliation_list(cleaner: i32) -> String {
    format!("/cleaner/{}/affiliations", cleaner)
}

/// Adding an affiliation to a cleaner.
pub fn affiliation_new(cleaner: i32) -> String {
    format!("/cleaner/{}/affiliation/new", cleaner)
}

/// Editing an affiliation.
pub fn affiliation_edit(affiliation: i32) -> String {
    format!("/affiliation/{}", affiliation)
}

/// The task templates of a schedule.
pub fn task_list(schedule: i32) -> String {
    format!("/schedule/{}/tasks", schedule)
}

/// Adding a task template to a schedule.
pub fn task_new(schedule: i32) -> String {
    format!("/schedule/{}/task/new", schedule)
}

/// Editing a task template.
pub fn task_edit(task: i32) -> String {
    format!("/task/{}", task)
}

/// Commenting on an assignment.
pub fn assignment_comment(assignment: i32) -> String {
    format!("/assignment/{}/comment", assignment)
}

/// Choosing the range of the results report.
pub fn results() -> String {
    "/results".to_string()
}

/// The results report for a range.
pub fn results_range(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "/results/{}/{}",
        start.format(URL_DATE_FORMAT),
        end.format(URL_DATE_FORMAT)
    )
}
