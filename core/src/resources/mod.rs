//! Resource clients, one per URL segment of the API.
//!
//! Every client owns `base_url + resource name` and a clone of the shared
//! `Backend`; sub-paths and identifiers are appended per call. Identifiers
//! are not validated: a malformed one simply yields a URL the service
//! rejects with a non-2xx `Response`.

mod account;
mod input;
mod job;
mod output;
mod report;

pub use account::Account;
pub use input::Input;
pub use job::Job;
pub use output::Output;
pub use report::Report;
