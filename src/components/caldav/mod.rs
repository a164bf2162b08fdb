mod client;
mod ical;
pub mod models;
pub mod multistatus;
mod submission;

pub use client::{CalDavClient, CalDavCredentials, CalendarService};
pub use ical::{escape_text, fold_line};
pub use models::{CalendarEvent, CalendarInfo, Confirmation};
pub use submission::{select_calendar, SubmissionAdapter, SubmissionSettings};
