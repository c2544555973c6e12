//! External provider clients
//!
//! Thin delegating clients over SMTP and provider REST APIs. None of them
//! retry; upstream failures map to a 502 for direct calls and are
//! swallowed (logged) for fire-and-forget notification dispatch.

pub mod mailer;
pub mod paystack;
pub mod whatsapp;

pub use mailer::{MailError, MailerService};
pub use paystack::{InitializedTransaction, PaystackService};
pub use whatsapp::WhatsappService;
