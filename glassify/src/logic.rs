pub mod remove;
pub mod serve;
