//! Command handlers, one module per command group.

pub mod envelope;
pub mod history;
pub mod init;
pub mod session;
