//! Bindings to the database.
//!
//! > **DAL**, for lack of a better term (borrowing this one from "data access layer" since I don't
//! > want to use "model"), is the only module that does any talking to the database, or any other
//! > IO or interaction with other kinds of externalized state for that matter.

#[allow(unused_import_braces)]
mod schema;

use crate::{
    dal::schema::{
        affiliations, assignments, cleaners, schedule_group_schedules, schedule_groups,
        schedules, task_templates, users,
    },
    schema::{
        Affiliation, AffiliationInput, Assignment, AssignmentRow, Cleaner, CleanerInput,
        Schedule, ScheduleGroup, ScheduleGroupInput, ScheduleInput, TaskTemplate,
        TaskTemplateInput,
    },
};
use chrono::NaiveDate;
use diesel::{
    dsl::{delete, insert_into, update},
    prelude::*,
    r2d2::{ConnectionManager, Pool},
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use failure::{format_err, Error, Fallible};
use log::info;
use std::sync::Arc;
use tokio::task::spawn_blocking;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// A pool of connections to the database.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct DB {
    pool: Arc<Pool<ConnectionManager<PgConnection>>>,
}

impl DB {
    /// Connects to the database with at the given URL, bringing its tables up to date.
    pub fn connect(database_url: &str) -> Fallible<DB> {
        let pool = Arc::new(Pool::new(ConnectionManager::<PgConnection>::new(
            database_url,
        ))?);
        {
            let mut conn = pool.get()?;
            let applied = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(|err| format_err!("Couldn't run the migrations: {}", err))?;
            for version in applied {
                info!("Applied migration {}", version);
            }
        }
        Ok(DB { pool })
    }

    /// Gets all schedule groups, by name.
    pub async fn groups(&self) -> Fallible<Vec<ScheduleGroup>> {
        self.async_query(|conn| {
            schedule_groups::table
                .order(schedule_groups::name)
                .load::<ScheduleGroup>(conn)
        })
        .await
    }

    /// Gets a schedule group by ID.
    pub async fn group(&self, group: i32) -> Fallible<ScheduleGroup> {
        self.async_query(move |conn| {
            schedule_groups::table
                .find(group)
                .get_result::<ScheduleGroup>(conn)
        })
        .await
    }

    /// Gets the IDs of the schedules in a group.
    pub async fn group_schedule_ids(&self, group: i32) -> Fallible<Vec<i32>> {
        self.async_query(move |conn| {
            schedule_group_schedules::table
                .filter(schedule_group_schedules::group_id.eq(group))
                .select(schedule_group_schedules::schedule_id)
                .order(schedule_group_schedules::schedule_id)
                .load::<i32>(conn)
        })
        .await
    }

    /// Creates a schedule group with the given schedules in it, returning its ID.
    pub async fn create_group(&self, input: ScheduleGroupInput) -> Fallible<i32> {
        self.async_query(move |conn| {
            conn.transaction::<_, Error, _>(|conn| {
                let id = insert_into(schedule_groups::table)
                    .values((
                        schedule_groups::name.eq(&input.name),
                        schedule_groups::disabled.eq(input.disabled),
                    ))
                    .returning(schedule_groups::id)
                    .get_result(conn)?;
                set_memberships(conn, &[id], &input.schedules, Side::Group)?;
                Ok(id)
            })
        })
        .await
    }

    /// Updates a schedule group, replacing the schedules in it.
    pub async fn update_group(&self, group: i32, input: ScheduleGroupInput) -> Fallible<()> {
        self.async_query(move |conn| {
            conn.transaction::<_, Error, _>(|conn| {
                let _ = update(schedule_groups::table.find(group))
                    .set((
                        schedule_groups::name.eq(&input.name),
                        schedule_groups::disabled.eq(input.disabled),
                    ))
                    .execute(conn)?;
                set_memberships(conn, &[group], &input.schedules, Side::Group)
            })
        })
        .await
    }

    /// Gets all schedules, by name.
    pub async fn schedules(&self) -> Fallible<Vec<Schedule>> {
        self.async_query(|conn| {
            schedules::table
                .order(schedules::name)
                .load::<Schedule>(conn)
        })
        .await
    }

    /// Gets a schedule by ID.
    pub async fn schedule(&self, schedule: i32) -> Fallible<Schedule> {
        self.async_query(move |conn| schedules::table.find(schedule).get_result::<Schedule>(conn))
            .await
    }

    /// Gets the IDs of the groups a schedule is in.
    pub async fn schedule_group_ids(&self, schedule: i32) -> Fallible<Vec<i32>> {
        self.async_query(move |conn| {
            schedule_group_schedules::table
                .filter(schedule_group_schedules::schedule_id.eq(schedule))
                .select(schedule_group_schedules::group_id)
                .order(schedule_group_schedules::group_id)
                .load::<i32>(conn)
        })
        .await
    }

    /// Creates a schedule in the given groups, returning its ID.
    pub async fn create_schedule(&self, input: ScheduleInput, slug: String) -> Fallible<i32> {
        self.async_query(move |conn| {
            conn.transaction::<_, Error, _>(|conn| {
                let id = insert_into(schedules::table)
                    .values((
                        schedules::name.eq(&input.name),
                        schedules::slug.eq(&slug),
                        schedules::cleaners_per_date.eq(input.cleaners_per_date),
                        schedules::frequency.eq(input.frequency),
                        schedules::disabled.eq(input.disabled),
                    ))
                    .returning(schedules::id)
                    .get_result(conn)?;
                set_memberships(conn, &input.groups, &[id], Side::Schedule)?;
                Ok(id)
            })
        })
        .await
    }

    /// Updates a schedule, replacing the groups it is in. Its cleaner count and frequency stay.
    pub async fn update_schedule(&self, schedule: i32, input: ScheduleInput) -> Fallible<()> {
        self.async_query(move |conn| {
            conn.transaction::<_, Error, _>(|conn| {
                let _ = update(schedules::table.find(schedule))
                    .set((
                        schedules::name.eq(&input.name),
                        schedules::disabled.eq(input.disabled),
                    ))
                    .execute(conn)?;
                set_memberships(conn, &input.groups, &[schedule], Side::Schedule)
            })
        })
        .await
    }

    /// Gets all cleaners, by name.
    pub async fn cleaners(&self) -> Fallible<Vec<Cleaner>> {
        self.async_query(|conn| {
            cleaners::table
                .inner_join(users::table)
                .select(CLEANER_COLUMNS)
                .order(cleaners::name)
                .load::<Cleaner>(conn)
        })
        .await
    }

    /// Gets a cleaner by ID.
    pub async fn cleaner(&self, cleaner: i32) -> Fallible<Cleaner> {
        self.async_query(move |conn| {
            cleaners::table
                .inner_join(users::table)
                .filter(cleaners::id.eq(cleaner))
                .select(CLEANER_COLUMNS)
                .get_result::<Cleaner>(conn)
        })
        .await
    }

    /// Creates a cleaner and the user linked to them, returning the cleaner's ID. The user is
    /// named like the slug.
    pub async fn create_cleaner(&self, input: CleanerInput, slug: String) -> Fallible<i32> {
        self.async_query(move |conn| {
            conn.transaction::<_, Error, _>(|conn| {
                let user: i32 = insert_into(users::table)
                    .values((users::username.eq(&slug), users::email.eq(&input.email)))
                    .returning(users::id)
                    .get_result(conn)?;
                let id = insert_into(cleaners::table)
                    .values((
                        cleaners::name.eq(&input.name),
                        cleaners::slug.eq(&slug),
                        cleaners::user_id.eq(user),
                        cleaners::preference.eq(input.preference),
                        cleaners::slack_id.eq(&input.slack_id),
                    ))
                    .returning(cleaners::id)
                    .get_result(conn)?;
                Ok(id)
            })
        })
        .await
    }

    /// Updates a cleaner and the email of the user linked to them.
    pub async fn update_cleaner(&self, cleaner: i32, input: CleanerInput) -> Fallible<()> {
        self.async_query(move |conn| {
            conn.transaction::<_, Error, _>(|conn| {
                let user: i32 = update(cleaners::table.find(cleaner))
                    .set((
                        cleaners::name.eq(&input.name),
                        cleaners::preference.eq(input.preference),
                        cleaners::slack_id.eq(&input.slack_id),
                    ))
                    .returning(cleaners::user_id)
                    .get_result(conn)?;
                let _ = update(users::table.find(user))
                    .set(users::email.eq(&input.email))
                    .execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    /// Deletes a cleaner along with their user, affiliations and assignments.
    pub async fn delete_cleaner(&self, cleaner: i32) -> Fallible<()> {
        self.async_query(move |conn| {
            conn.transaction::<_, Error, _>(|conn| {
                let user: i32 = cleaners::table
                    .find(cleaner)
                    .select(cleaners::user_id)
                    .get_result(conn)?;
                let _ = delete(users::table.find(user)).execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    /// Gets the affiliations of a cleaner, oldest first.
    pub async fn affiliations(&self, cleaner: i32) -> Fallible<Vec<Affiliation>> {
        self.async_query(move |conn| {
            affiliations::table
                .filter(affiliations::cleaner_id.eq(cleaner))
                .order(affiliations::beginning)
                .load::<Affiliation>(conn)
        })
        .await
    }

    /// Gets an affiliation by ID.
    pub async fn affiliation(&self, affiliation: i32) -> Fallible<Affiliation> {
        self.async_query(move |conn| {
            affiliations::table
                .find(affiliation)
                .get_result::<Affiliation>(conn)
        })
        .await
    }

    /// Adds an affiliation to a cleaner, returning its ID. If `end_previous` is given, that
    /// affiliation is ended on the given day first.
    pub async fn create_affiliation(
        &self,
        cleaner: i32,
        input: AffiliationInput,
        end_previous: Option<(i32, NaiveDate)>,
    ) -> Fallible<i32> {
        self.async_query(move |conn| {
            conn.transaction::<_, Error, _>(|conn| {
                if let Some((previous, ending)) = end_previous {
                    let _ = update(affiliations::table.find(previous))
                        .set(affiliations::ending.eq(ending))
                        .execute(conn)?;
                }
                let id = insert_into(affiliations::table)
                    .values((
                        affiliations::cleaner_id.eq(cleaner),
                        affiliations::group_id.eq(input.group),
                        affiliations::beginning.eq(input.beginning),
                        affiliations::ending.eq(input.end),
                    ))
                    .returning(affiliations::id)
                    .get_result(conn)?;
                Ok(id)
            })
        })
        .await
    }

    /// Updates an affiliation.
    pub async fn update_affiliation(
        &self,
        affiliation: i32,
        input: AffiliationInput,
    ) -> Fallible<()> {
        self.async_query(move |conn| {
            update(affiliations::table.find(affiliation))
                .set((
                    affiliations::group_id.eq(input.group),
                    affiliations::beginning.eq(input.beginning),
                    affiliations::ending.eq(input.end),
                ))
                .execute(conn)
                .map(|_| ())
        })
        .await
    }

    /// Gets the task templates of a schedule, by name.
    pub async fn task_templates(&self, schedule: i32) -> Fallible<Vec<TaskTemplate>> {
        self.async_query(move |conn| {
            task_templates::table
                .filter(task_templates::schedule_id.eq(schedule))
                .order(task_templates::task_name)
                .load::<TaskTemplate>(conn)
        })
        .await
    }

    /// Gets a task template by ID.
    pub async fn task_template(&self, task: i32) -> Fallible<TaskTemplate> {
        self.async_query(move |conn| {
            task_templates::table
                .find(task)
                .get_result::<TaskTemplate>(conn)
        })
        .await
    }

    /// Adds a task template to a schedule, returning its ID.
    pub async fn create_task_template(
        &self,
        schedule: i32,
        input: TaskTemplateInput,
    ) -> Fallible<i32> {
        self.async_query(move |conn| {
            insert_into(task_templates::table)
                .values((
                    task_templates::schedule_id.eq(schedule),
                    task_templates::task_name.eq(&input.task_name),
                    task_templates::start_days_before.eq(input.start_days_before),
                    task_templates::end_days_after.eq(input.end_days_after),
                    task_templates::task_help_text.eq(&input.task_help_text),
                    task_templates::task_disabled.eq(input.task_disabled),
                ))
                .returning(task_templates::id)
                .get_result::<i32>(conn)
        })
        .await
    }

    /// Updates a task template.
    pub async fn update_task_template(&self, task: i32, input: TaskTemplateInput) -> Fallible<()> {
        self.async_query(move |conn| {
            update(task_templates::table.find(task))
                .set((
                    task_templates::task_name.eq(&input.task_name),
                    task_templates::start_days_before.eq(input.start_days_before),
                    task_templates::end_days_after.eq(input.end_days_after),
                    task_templates::task_help_text.eq(&input.task_help_text),
                    task_templates::task_disabled.eq(input.task_disabled),
                ))
                .execute(conn)
                .map(|_| ())
        })
        .await
    }

    /// Gets an assignment by ID.
    pub async fn assignment(&self, assignment: i32) -> Fallible<Assignment> {
        self.async_query(move |conn| {
            assignments::table
                .find(assignment)
                .get_result::<Assignment>(conn)
        })
        .await
    }

    /// Replaces the cleaner's comment on an assignment.
    pub async fn set_assignment_comment(&self, assignment: i32, comment: String) -> Fallible<()> {
        self.async_query(move |conn| {
            update(assignments::table.find(assignment))
                .set(assignments::cleaners_comment.eq(&comment))
                .execute(conn)
                .map(|_| ())
        })
        .await
    }

    /// Gets the assignments listed between two days (inclusive), by day.
    pub async fn assignments_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Fallible<Vec<AssignmentRow>> {
        self.async_query(move |conn| {
            assignments::table
                .inner_join(cleaners::table)
                .inner_join(schedules::table)
                .filter(assignments::cleaning_day.between(start, end))
                .order((assignments::cleaning_day, schedules::name, cleaners::name))
                .select((
                    assignments::cleaning_day,
                    schedules::name,
                    cleaners::name,
                    assignments::cleaners_comment,
                ))
                .load::<AssignmentRow>(conn)
        })
        .await
    }

    /// Performs a query on the blocking thread pool. Diesel's connections are synchronous, so
    /// this keeps them from stalling the threads that serve requests.
    ///
    /// NOTE: The number of concurrent queries is bounded by the connection pool's size, not by
    /// tokio's blocking pool; callers past that wait in `Pool::get`.
    async fn async_query<E, F, T>(&self, func: F) -> Fallible<T>
    where
        E: Into<Error>,
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        spawn_blocking(move || {
            let mut conn = pool.get()?;
            func(&mut conn).map_err(Into::into)
        })
        .await?
    }
}

/// The columns a `Cleaner` is loaded from; `cleaners` must be joined with `users`.
const CLEANER_COLUMNS: (
    cleaners::id,
    cleaners::name,
    cleaners::slug,
    cleaners::preference,
    cleaners::slack_id,
    users::email,
) = (
    cleaners::id,
    cleaners::name,
    cleaners::slug,
    cleaners::preference,
    cleaners::slack_id,
    users::email,
);

/// Which side of the group/schedule relation is being edited.
#[derive(Clone, Copy, Debug)]
enum Side {
    Group,
    Schedule,
}

/// Replaces the memberships of the edited side (whose IDs must be a single element slice) with
/// every pairing of `groups` and `schedules`.
fn set_memberships(
    conn: &mut PgConnection,
    groups: &[i32],
    schedules: &[i32],
    side: Side,
) -> Fallible<()> {
    let _ = match side {
        Side::Group => delete(
            schedule_group_schedules::table
                .filter(schedule_group_schedules::group_id.eq_any(groups)),
        )
        .execute(conn)?,
        Side::Schedule => delete(
            schedule_group_schedules::table
                .filter(schedule_group_schedules::schedule_id.eq_any(schedules)),
        )
        .execute(conn)?,
    };

    let rows = groups
        .iter()
        .flat_map(|&group| {
            schedules.iter().map(move |&schedule| {
                (
                    schedule_group_schedules::group_id.eq(group),
                    schedule_group_schedules::schedule_id.eq(schedule),
                )
            })
        })
        .collect::<Vec<_>>();
    if !rows.is_empty() {
        let _ = insert_into(schedule_group_schedules::table)
            .values(&rows)
            .execute(conn)?;
    }
    Ok(())
}
