//! Account use cases
//!
//! Orchestrates the registration engine for the transport layer.

mod register_account;

pub use register_account::{RegisterAccountCommand, RegisterAccountResponse, RegisterAccountUseCase};
