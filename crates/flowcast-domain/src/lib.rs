//! flowcast-domain
//!
//! Pure domain models (Book, Account, Envelope, ScheduledPayment, Scenario,
//! projection results, etc.). No I/O, no CLI, no storage. Only data types,
//! core enums, and calendar arithmetic.

pub mod account;
pub mod book;
pub mod common;
pub mod envelope;
pub mod projection;
pub mod scenario;
pub mod schedule;

pub use account::*;
pub use book::*;
pub use common::*;
pub use envelope::*;
pub use projection::*;
pub use scenario::*;
pub use schedule::*;
