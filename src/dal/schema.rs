table! {
    affiliations (id) {
        id -> Int4,
        cleaner_id -> Int4,
        group_id -> Nullable<Int4>,
        beginning -> Date,
        ending -> Date,
    }
}

table! {
    assignments (id) {
        id -> Int4,
        cleaner_id -> Int4,
        schedule_id -> Int4,
        cleaning_day -> Date,
        cleaners_comment -> Varchar,
    }
}

table! {
    cleaners (id) {
        id -> Int4,
        name -> Varchar,
        slug -> Varchar,
        user_id -> Int4,
        preference -> Int4,
        slack_id -> Nullable<Varchar>,
    }
}

table! {
    schedule_group_schedules (group_id, schedule_id) {
        group_id -> Int4,
        schedule_id -> Int4,
    }
}

table! {
    schedule_groups (id) {
        id -> Int4,
        name -> Varchar,
        disabled -> Bool,
    }
}

table! {
    schedules (id) {
        id -> Int4,
        name -> Varchar,
        slug -> Varchar,
        cleaners_per_date -> Int4,
        frequency -> Int4,
        disabled -> Bool,
    }
}

table! {
    task_templates (id) {
        id -> Int4,
        schedule_id -> Int4,
        task_name -> Varchar,
        start_days_before -> Int4,
        end_days_after -> Int4,
        task_help_text -> Text,
        task_disabled -> Bool,
    }
}

table! {
    users (id) {
        id -> Int4,
        username -> Varchar,
        email -> Varchar,
    }
}

joinable!(affiliations -> cleaners (cleaner_id));
joinable!(affiliations -> schedule_groups (group_id));
joinable!(assignments -> cleaners (cleaner_id));
joinable!(assignments -> schedules (schedule_id));
joinable!(cleaners -> users (user_id));
joinable!(schedule_group_schedules -> schedule_groups (group_id));
joinable!(schedule_group_schedules -> schedules (schedule_id));
joinable!(task_templates -> schedules (schedule_id));

allow_tables_to_appear_in_same_query!(
    affiliations,
    assignments,
    cleaners,
    schedule_group_schedules,
    schedule_groups,
    schedules,
    task_templates,
    users,
);
