pub mod account;
pub mod attendance;
pub mod class;
pub mod code;
pub mod dashboard;
