pub mod model;
pub mod traverser;
