pub mod agent;
pub mod caldav;
pub mod event_request;
pub mod extraction;
pub mod sentiment;

pub use agent::CalendarAgent;
