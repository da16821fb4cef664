pub mod job;
pub mod user;
pub mod validation;
