//! Entry fee engine.
//!
//! Pricing is a pure fold over an event's entries in submission order:
//! [`identity`] decides which entries belong to the same dancer,
//! [`sequence`] places an entry among that dancer's earlier entries,
//! [`calculator`] turns the placement into a fee breakdown and
//! [`reconciler`] replays a whole event against its current schedule.

pub mod calculator;
pub mod identity;
pub mod reconciler;
pub mod sequence;
pub mod store;

pub use calculator::{FeeBreakdown, compute_fee, quote_entry};
pub use identity::is_same_dancer;
pub use reconciler::{FEE_EPSILON, reconcile_event};
pub use sequence::{is_first_entry_for_dancer, solo_position};
pub use store::{EntryStore, PgEntryStore};
