use crate::SetupError;
use strum::Display;

/// Forward is the canonical rest direction: every settle resets to it,
/// regardless of which way the finished transition went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Named rest positions for the drag. `Start` is the only stable one;
/// `Forward`/`Backward` are the targets of an in-flight transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Anchor {
    #[default]
    Start,
    Forward,
    Backward,
}

impl Anchor {
    pub fn is_rest(self) -> bool {
        self == Anchor::Start
    }
}

/// What the renderer consumes each time the drag offset changes.
///
/// `progress` is the offset normalized by container width. For backward
/// drags the sign is flipped so the magnitude can drive forward-style
/// interpolation; it only stays negative when a leftward pull at index 0
/// has nowhere to go (rubber-band territory, renderer's call).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub anchor: Anchor,
    pub direction: Direction,
    pub progress: f64,
}

/// Outcome of a settle. `moved` is false both for a repeated delivery of
/// the same settle and for a boundary clamp (settling forward on the last
/// item, backward on the first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settle {
    pub index: usize,
    pub moved: bool,
}

/// The slot-index state machine. Single writer, no sharing: the owner
/// feeds it offset updates, resizes and settle notifications one at a
/// time and reads the resulting frame back out.
#[derive(Debug, PartialEq)]
pub struct Controller {
    index: usize,
    item_count: usize,
    width: f64,
    direction: Direction,
    anchor: Anchor,
    progress: f64,
    settle_handled: bool,
}

impl Controller {
    pub fn new(item_count: usize, width: f64) -> Result<Self, SetupError> {
        if item_count == 0 {
            return Err(SetupError::NoItems);
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(SetupError::BadWidth(width));
        }

        Ok(Self {
            index: 0,
            item_count,
            width,
            direction: Direction::Forward,
            anchor: Anchor::Start,
            progress: 0.0,
            settle_handled: false,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn frame(&self) -> Frame {
        Frame {
            anchor: self.anchor,
            direction: self.direction,
            progress: self.progress,
        }
    }

    /// Ingest a raw drag offset from the gesture driver. A negative offset
    /// pulls toward the previous item when there is one; anything else is a
    /// forward pull. Supersedes any prior progress computation and re-arms
    /// settle handling.
    pub fn drag(&mut self, offset: f64) -> Frame {
        self.settle_handled = false;

        let raw = (offset / self.width).clamp(-1.0, 1.0);
        if raw < 0.0 && self.index > 0 {
            self.direction = Direction::Backward;
            self.anchor = Anchor::Backward;
            self.progress = -raw;
        } else {
            self.direction = Direction::Forward;
            self.anchor = Anchor::Forward;
            self.progress = raw;
        }

        self.frame()
    }

    /// Anchors the gesture driver may settle at from the current index.
    /// The missing neighbor at either boundary has no anchor to land on.
    pub fn available_anchors(&self) -> &'static [Anchor] {
        match (self.index, self.item_count) {
            (_, 1) => &[Anchor::Start],
            (0, _) => &[Anchor::Start, Anchor::Forward],
            (i, n) if i + 1 == n => &[Anchor::Backward, Anchor::Start],
            _ => &[Anchor::Backward, Anchor::Start, Anchor::Forward],
        }
    }

    /// The driver reports the gesture has come to rest at `anchor`. Shifts
    /// the index by one when the completed transition allows it, then snaps
    /// back to the start anchor with the canonical rest direction.
    ///
    /// Drivers may deliver the same settle more than once; only the first
    /// delivery after a drag does anything.
    pub fn settle(&mut self, anchor: Anchor) -> Settle {
        if self.settle_handled {
            return Settle {
                index: self.index,
                moved: false,
            };
        }
        self.settle_handled = true;

        let moved = match (anchor, self.direction) {
            (Anchor::Forward, Direction::Forward) if self.index + 1 < self.item_count => {
                self.index += 1;
                true
            }
            (Anchor::Backward, Direction::Backward) if self.index > 0 => {
                self.index -= 1;
                true
            }
            _ => false,
        };

        self.anchor = Anchor::Start;
        self.direction = Direction::Forward;
        self.progress = 0.0;

        Settle {
            index: self.index,
            moved,
        }
    }

    /// Container resize from the layout driver. A bogus width is ignored
    /// rather than poisoning every later normalization.
    pub fn resize(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.width = width;
        } else {
            log::debug!("ignoring resize to width {width}");
        }
    }

    /// Item provider changed underneath us (config reload). Clamps the
    /// index into the new range and drops any in-flight transition.
    pub fn set_item_count(&mut self, item_count: usize) -> Result<(), SetupError> {
        if item_count == 0 {
            return Err(SetupError::NoItems);
        }

        self.item_count = item_count;
        self.index = self.index.min(item_count - 1);
        self.anchor = Anchor::Start;
        self.direction = Direction::Forward;
        self.progress = 0.0;
        self.settle_handled = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(item_count: usize) -> Controller {
        Controller::new(item_count, 100.0).unwrap()
    }

    fn mid_controller() -> Controller {
        let mut c = controller(5);
        c.drag(60.0);
        c.settle(Anchor::Forward);
        c.drag(60.0);
        c.settle(Anchor::Forward);
        assert_eq!(c.index(), 2);
        c
    }

    #[test]
    fn rejects_empty_setup() {
        assert_eq!(Controller::new(0, 100.0), Err(SetupError::NoItems));
        assert_eq!(Controller::new(3, 0.0), Err(SetupError::BadWidth(0.0)));
        assert!(Controller::new(3, f64::NAN).is_err());
    }

    #[test]
    fn forward_drag_reports_forward_frame() {
        let mut c = mid_controller();
        let frame = c.drag(40.0);
        assert_eq!(frame.direction, Direction::Forward);
        assert_eq!(frame.anchor, Anchor::Forward);
        assert!((frame.progress - 0.4).abs() < 1e-9);
    }

    #[test]
    fn backward_drag_reports_positive_magnitude() {
        let mut c = mid_controller();
        let frame = c.drag(-40.0);
        assert_eq!(frame.direction, Direction::Backward);
        assert_eq!(frame.anchor, Anchor::Backward);
        assert!((frame.progress - 0.4).abs() < 1e-9);
    }

    #[test]
    fn forward_settle_advances_and_rests() {
        let mut c = mid_controller();
        c.drag(80.0);
        let settle = c.settle(Anchor::Forward);
        assert_eq!(settle, Settle { index: 3, moved: true });
        assert_eq!(c.anchor(), Anchor::Start);
        assert_eq!(c.direction(), Direction::Forward);
        assert_eq!(c.progress(), 0.0);
    }

    #[test]
    fn backward_settle_retreats_and_rests_forward() {
        let mut c = mid_controller();
        c.drag(-80.0);
        let settle = c.settle(Anchor::Backward);
        assert_eq!(settle, Settle { index: 1, moved: true });
        // rest direction is always Forward, even after a backward move
        assert_eq!(c.direction(), Direction::Forward);
        assert_eq!(c.anchor(), Anchor::Start);
    }

    #[test]
    fn backward_settle_at_first_item_is_a_clamp() {
        let mut c = controller(5);
        c.drag(-80.0);
        let settle = c.settle(Anchor::Backward);
        assert_eq!(settle, Settle { index: 0, moved: false });
        assert_eq!(c.anchor(), Anchor::Start);
    }

    #[test]
    fn forward_settle_at_last_item_is_a_clamp() {
        let mut c = controller(2);
        c.drag(80.0);
        assert_eq!(c.settle(Anchor::Forward).index, 1);
        c.drag(80.0);
        let settle = c.settle(Anchor::Forward);
        assert_eq!(settle, Settle { index: 1, moved: false });
    }

    #[test]
    fn repeated_settle_is_ignored() {
        let mut c = mid_controller();
        c.drag(80.0);
        assert_eq!(c.settle(Anchor::Forward).index, 3);
        let again = c.settle(Anchor::Forward);
        assert_eq!(again, Settle { index: 3, moved: false });
    }

    #[test]
    fn drag_rearms_settle_handling() {
        let mut c = mid_controller();
        c.drag(80.0);
        c.settle(Anchor::Forward);
        c.drag(80.0);
        assert_eq!(c.settle(Anchor::Forward).index, 4);
    }

    #[test]
    fn negative_drag_at_first_item_stays_forward() {
        let mut c = controller(5);
        let frame = c.drag(-40.0);
        assert_eq!(frame.direction, Direction::Forward);
        assert_eq!(frame.anchor, Anchor::Forward);
        assert!(frame.progress < 0.0);
    }

    #[test]
    fn progress_is_clamped_to_unit_range() {
        let mut c = mid_controller();
        assert_eq!(c.drag(1e6).progress, 1.0);
        assert_eq!(c.drag(-1e6).progress, 1.0);
    }

    #[test]
    fn boundary_policy_limits_anchors() {
        let mut c = controller(3);
        assert_eq!(c.available_anchors(), &[Anchor::Start, Anchor::Forward]);
        c.drag(80.0);
        c.settle(Anchor::Forward);
        assert_eq!(
            c.available_anchors(),
            &[Anchor::Backward, Anchor::Start, Anchor::Forward]
        );
        c.drag(80.0);
        c.settle(Anchor::Forward);
        assert_eq!(c.available_anchors(), &[Anchor::Backward, Anchor::Start]);

        assert_eq!(controller(1).available_anchors(), &[Anchor::Start]);
    }

    #[test]
    fn index_stays_in_range_across_arbitrary_sequences() {
        let mut c = controller(4);
        let offsets = [120.0, -30.0, -500.0, 80.0, 80.0, 80.0, 80.0, -80.0];
        for (i, &offset) in offsets.iter().enumerate() {
            let frame = c.drag(offset);
            let anchor = if i % 3 == 0 { Anchor::Start } else { frame.anchor };
            c.settle(anchor);
            assert!(c.index() < c.item_count());
        }
    }

    #[test]
    fn shrinking_item_count_clamps_index() {
        let mut c = mid_controller();
        c.set_item_count(2).unwrap();
        assert_eq!(c.index(), 1);
        assert_eq!(c.anchor(), Anchor::Start);
        assert_eq!(c.set_item_count(0), Err(SetupError::NoItems));
    }

    #[test]
    fn resize_changes_normalization() {
        let mut c = mid_controller();
        c.resize(200.0);
        assert!((c.drag(50.0).progress - 0.25).abs() < 1e-9);
        c.resize(f64::NAN);
        assert!((c.drag(50.0).progress - 0.25).abs() < 1e-9);
    }
}
