//! Shared types for the Quran Voice catalog bot

pub mod catalog;
pub mod gate;
pub mod page;
pub mod payload;
pub mod screen;

pub use catalog::{AudioItem, Category, LectureEntry};
pub use gate::{GateDecision, MemberRole};
pub use page::{paginate, Page};
pub use payload::{CallbackPayload, MAX_CALLBACK_BYTES};
pub use screen::{Action, Button, Screen};
