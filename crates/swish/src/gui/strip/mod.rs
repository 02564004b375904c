pub mod model;
pub mod view;

pub use model::{Animation, Item, SlotGeometry, State};
pub use view::draw;

pub const REFERENCE_HEIGHT: f64 = 1440.0;
pub const ICON_SIZE: i32 = 256;
pub const SLOT_SIZE: f64 = 96.0; // tile edge length
pub const SLOT_GAP: f64 = 18.0;
pub const SLOT_PITCH: f64 = SLOT_SIZE + SLOT_GAP;
pub const STRIP_MARGIN: f64 = 48.0; // distance from the anchored screen edge
pub const STRIP_PADDING: f64 = 16.0; // backdrop padding around the tiles
pub const TILE_RADIUS: f64 = 14.0;
pub const ICON_INACTIVE_ALPHA: f64 = 0.6;
pub const INDICATOR_RADIUS: f64 = 3.5;
pub const INDICATOR_GAP: f64 = 12.0;

// A release this far into a transition snaps through; anything less
// springs back to start.
pub const SNAP_THRESHOLD: f64 = 0.35;
pub const SETTLE_STEP: f64 = 0.12; // progress per animation tick
pub const TICK_MS: u64 = 16;
