pub mod cli;
pub mod file_io;
pub mod freq_count;
