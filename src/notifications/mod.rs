pub mod models;
pub mod senders;

pub use models::{EmailAttachment, ReleaseEmail};
pub use senders::{ReleaseMailer, SenderError, email::EmailApiSender};
