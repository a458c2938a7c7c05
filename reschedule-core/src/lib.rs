//! Core types for reschedule.
//!
//! - `validate` decides whether a proposed move satisfies the business rules
//! - `proposal` turns form inputs into a candidate window
//! - `gateway` is the contract a calendar backend implements
//! - `assess` combines validation with the backend's conflict check

pub mod assess;
pub mod error;
pub mod event;
pub mod gateway;
pub mod proposal;
pub mod rules;
pub mod validate;
pub mod window;

pub use assess::{Assessment, assess, commit};
pub use error::{RemoteCall, RescheduleError, RescheduleResult};
pub use event::{Event, EventTime};
pub use gateway::{CalendarGateway, EventQuery};
pub use proposal::{EndChoice, Proposal};
pub use rules::{BusinessRules, ConflictPolicy};
pub use validate::{ValidationResult, Violation, validate, validate_raw};
pub use window::TimeWindow;
