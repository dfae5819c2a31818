pub mod session;
pub mod transition;
pub mod views;
