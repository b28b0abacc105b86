pub mod cli;
pub mod config;
pub mod extract;
pub mod pipeline;
pub mod probe;
pub mod record;
pub mod report;
pub mod util;
