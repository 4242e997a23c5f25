//! putzplan
//! ========
//!
//! The forms and pages of the cleaning roster of a shared house: schedules, schedule groups,
//! cleaners, their affiliations with groups, task templates, assignment comments and the
//! results report.
//!
//! Hacking
//! -------
//!
//! This follows the approach laid out in
//! ["Stateless MVC"](https://www.tedinski.com/2018/09/11/stateless-mvc.html). The forms are the
//! interesting part: they live in `forms`, know nothing of HTTP or the database, and are handed
//! everything they depend on (the current date, the chat directory, the records being edited).
#![deny(
    nonstandard_style,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    while_true
)]

#[macro_use]
extern crate diesel;

#[macro_use]
pub mod util;

pub mod chat;
pub mod dal;
pub mod forms;
pub mod logic;
pub mod router;
pub mod schema;
pub mod urls;
pub mod view;
