pub mod common;
pub mod fees;
