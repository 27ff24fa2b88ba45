//! Types shared between the TicketPro backend and its API clients.
//!
//! Everything in this crate is part of the wire contract: status enums,
//! the role/permission tables, request/response DTOs and the response
//! envelope. The backend re-exports nothing of its own on the wire that
//! is not defined here.

pub mod constants;
pub mod dto;
pub mod types;

pub use constants::*;
pub use dto::*;
pub use types::*;
