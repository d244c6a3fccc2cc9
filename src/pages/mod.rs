pub mod compliance;
pub mod documents;
pub mod download;
pub mod home;
pub mod login;
pub mod profile;
pub mod reports;
