pub mod check_model;
pub mod context;
pub mod runner;
