//! Validation and normalization of event requests before they reach the
//! calendar. Pure functions only; nothing here touches the network.

pub mod models;
mod normalize;
mod validation;

pub use models::{EventRequest, ExtractedEvent, DEFAULT_DURATION_MINUTES};
pub use normalize::normalize;
pub use validation::{FieldIssue, ValidationError};
