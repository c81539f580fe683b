//! Mail relay — the endpoint that records a lead and emails both parties,
//! plus the client-side capability the dialogue uses to reach it.

pub mod client;
pub mod mailer;
pub mod routes;
pub mod service;
pub mod store;
pub mod validate;

pub use client::{HttpRelay, LeadRelay, RelayResponse};
pub use mailer::{LogMailer, Mailer, OutgoingMail, SmtpMailer};
pub use routes::{RelayRouteState, relay_routes};
pub use service::LeadDesk;
pub use store::{LeadRecord, LeadStore};
pub use validate::LeadSubmission;
