pub mod cli;
pub mod conf;
pub mod excerpt;
pub mod keys;
pub mod logging;
pub mod report;
pub mod scan;
pub mod stats;
