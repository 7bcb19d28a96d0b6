//! Core message types shared by every stage of validation.
//!
//! ## Overview
//!
//! - **[`Level`]**: Severity of a message (Error, Warning, Info)
//! - **[`MessageTag`]**: Stable identifier of a fault, with a fixed level and category
//! - **[`Category`]**: What a fault describes (structure, schema, content, context)
//! - **[`Message`]**: One recorded finding with its position and offending content
//! - **[`ValidationReport`]**: Serializable snapshot of a finished run
//!
//! Only error-level messages affect validity.
//!
//! ```rust
//! use term_csv::core::{Category, Level, Message, MessageTag};
//!
//! let msg = Message::new(MessageTag::StrayQuote).at_row(2);
//! assert_eq!(msg.level, Level::Error);
//! assert_eq!(msg.category, Category::Content);
//! ```

mod level;
mod message;
mod report;

pub use level::Level;
pub use message::{Category, Message, MessageTag};
pub use report::ValidationReport;
