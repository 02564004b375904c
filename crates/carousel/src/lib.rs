use thiserror::Error;

pub mod controller;
pub mod histogram;
pub mod slots;

pub use controller::{Anchor, Controller, Direction, Frame, Settle};
pub use histogram::Histogram;
pub use slots::SlotWindow;

/// Configuration problems are rejected up front; nothing in here recovers
/// from a bad setup mid-flight.
#[derive(Debug, Error, PartialEq)]
pub enum SetupError {
    #[error("carousel needs at least one item")]
    NoItems,
    #[error("container width must be finite and positive (got {0})")]
    BadWidth(f64),
    #[error("carousel needs at least one slot")]
    NoSlots,
    #[error("initial slot {initial_slot} is outside the {num_slots} slot window")]
    InitialSlotOutOfRange {
        initial_slot: usize,
        num_slots: usize,
    },
}
