pub mod config_io;
pub mod data_io;
pub mod local_state;
