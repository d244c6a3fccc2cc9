pub mod adapter;
pub mod error;
pub mod retry;
pub mod session_adapter;
