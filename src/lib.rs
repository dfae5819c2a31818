pub mod app;
pub mod cli;
pub mod gateway;
pub mod io;
pub mod model;
pub mod ops;
pub mod store;
pub mod util;
