//! Domain models for Ticketsmith

mod issue;
mod project;
mod ticket;

pub use issue::*;
pub use project::*;
pub use ticket::*;
