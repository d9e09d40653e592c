pub mod entry;
pub mod event;
