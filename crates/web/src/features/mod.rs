pub mod entries;
pub mod events;
pub mod fees;
