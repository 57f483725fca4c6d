//! Domain models returned to callers

mod draft;
mod label;
mod message;
mod thread;

pub use draft::{BodyFormat, DraftReplyResult};
pub use label::Label;
pub use message::{EmailCollection, EmailMessage, MessageId};
pub use thread::ThreadId;
