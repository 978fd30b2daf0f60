pub mod clean;
pub mod serve;
