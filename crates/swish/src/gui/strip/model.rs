use crate::config::{Config, Edge, ItemConfig};
use crate::desktop::AppInfo;
use crate::gui::strip::{
    ICON_SIZE, REFERENCE_HEIGHT, SETTLE_STEP, SLOT_PITCH, SLOT_SIZE, SNAP_THRESHOLD, STRIP_MARGIN,
};
use crate::sys::wm::{Point, WindowClass};
use carousel::{Anchor, Controller, Direction, Frame, Histogram, SetupError, Settle, SlotWindow};
use gdk_pixbuf::Pixbuf;

#[derive(Clone)]
pub struct Item {
    pub app: AppInfo,
    pub pixbuf: Option<Pixbuf>,
}

impl Item {
    pub fn from_config(cfg: &ItemConfig) -> Self {
        let app = AppInfo::new(&cfg.app, cfg.class.clone(), cfg.exec.clone());
        let pixbuf = Self::load_icon(&app);
        Self { app, pixbuf }
    }

    fn load_icon(app: &AppInfo) -> Option<Pixbuf> {
        (!app.icon.as_os_str().is_empty())
            .then(|| Pixbuf::from_file_at_scale(&app.icon, ICON_SIZE, ICON_SIZE, true).ok())?
    }

    pub fn is_running(&self, active_classes: &[WindowClass]) -> bool {
        active_classes
            .iter()
            .any(|c| c.to_lowercase() == self.app.class.to_lowercase())
    }

    pub fn is_broken(&self) -> bool {
        self.app.exec.is_empty()
    }
}

/// On-screen placement of one slot tile for the current frame.
#[derive(Debug, Clone, Copy)]
pub struct SlotGeometry {
    pub center: Point,
    pub size: f64,
}

/// An in-flight settle: the displayed progress walks toward the target
/// anchor; reaching it is what delivers the settle to the controller.
#[derive(Debug, Clone, Copy)]
pub struct Animation {
    target: Anchor,
    shown: f64,
}

pub struct State {
    pub controller: Controller,
    pub window: SlotWindow,
    pub items: Vec<Item>,
    pub active_classes: Vec<WindowClass>,
    pub hover_slot: Option<usize>,
    pub scale_factor: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub edge: Edge,
    pub activations: Histogram,
    pub animation: Option<Animation>,
}

impl State {
    pub fn new(config: &Config) -> Result<Self, SetupError> {
        let items: Vec<Item> = config.items.iter().map(Item::from_config).collect();
        if items.is_empty() {
            return Err(SetupError::NoItems);
        }

        let window = SlotWindow::new(config.strip.slots, config.strip.initial_slot())?;
        let controller = Controller::new(items.len(), window.num_slots() as f64 * SLOT_PITCH)?;

        Ok(Self {
            controller,
            window,
            items,
            active_classes: Vec::new(),
            hover_slot: None,
            scale_factor: 1.0,
            canvas_width: 0.0,
            canvas_height: 0.0,
            edge: config.strip.edge,
            activations: Histogram::new("activations"),
            animation: None,
        })
    }

    /// Re-arm for a fresh showing: new monitor dimensions, new set of
    /// running window classes, everything back at rest.
    pub fn refresh(&mut self, canvas_width: f64, canvas_height: f64, classes: Vec<WindowClass>) {
        self.active_classes = classes;
        self.hover_slot = None;
        self.canvas_width = canvas_width;
        self.canvas_height = canvas_height;
        self.scale_factor = canvas_height / REFERENCE_HEIGHT;
        self.animation = None;
        self.controller.resize(self.strip_width());
    }

    /// Swap in a reloaded config. The controller keeps its position as far
    /// as the new item list allows.
    pub fn reload(&mut self, config: &Config) -> Result<(), SetupError> {
        let items: Vec<Item> = config.items.iter().map(Item::from_config).collect();
        if items.is_empty() {
            return Err(SetupError::NoItems);
        }

        self.window = SlotWindow::new(config.strip.slots, config.strip.initial_slot())?;
        self.controller.set_item_count(items.len())?;
        self.items = items;
        self.edge = config.strip.edge;
        self.hover_slot = None;
        self.animation = None;
        self.controller.resize(self.strip_width());
        Ok(())
    }

    /// The carousel container the drag offset is normalized by.
    pub fn strip_width(&self) -> f64 {
        self.window.num_slots() as f64 * SLOT_PITCH * self.scale_factor
    }

    pub fn strip_center(&self) -> Point {
        let half = (SLOT_SIZE / 2.0 + STRIP_MARGIN) * self.scale_factor;
        let y = match self.edge {
            Edge::Top => half,
            Edge::Center => self.canvas_height / 2.0,
            Edge::Bottom => self.canvas_height - half,
        };
        Point::new(self.canvas_width / 2.0, y)
    }

    /// Progress as currently displayed: the settle animation takes over
    /// from the raw drag progress while it runs.
    pub fn shown_progress(&self) -> f64 {
        self.animation
            .map(|a| a.shown)
            .unwrap_or_else(|| self.controller.progress())
    }

    /// Horizontal displacement of the whole tile row. A forward transition
    /// slides the row left so the next item approaches the initial slot.
    fn shift(&self) -> f64 {
        let signed = match self.controller.direction() {
            Direction::Forward => -self.shown_progress(),
            Direction::Backward => self.shown_progress(),
        };
        signed * SLOT_PITCH * self.scale_factor
    }

    pub fn geometry(&self, slot: usize) -> SlotGeometry {
        let center = self.strip_center();
        let pitch = SLOT_PITCH * self.scale_factor;
        let x =
            center.x + (slot as f64 - self.window.initial_slot() as f64) * pitch + self.shift();

        SlotGeometry {
            center: Point::new(x, center.y),
            size: SLOT_SIZE * self.scale_factor,
        }
    }

    pub fn item_in_slot(&self, slot: usize) -> Option<(usize, &Item)> {
        let index = self
            .window
            .item(slot, self.controller.index(), self.items.len())?;
        Some((index, &self.items[index]))
    }

    pub fn hovered(&self) -> Option<(usize, &Item)> {
        self.item_in_slot(self.hover_slot?)
    }

    /// Item a primary click should launch: the hovered one, or whatever
    /// currently sits on the initial slot.
    pub fn activation_target(&self) -> Option<(usize, &Item)> {
        self.hovered()
            .or_else(|| self.item_in_slot(self.window.initial_slot()))
    }

    pub fn update_cursor(&mut self, cursor: Point) -> bool {
        let new_slot = self.slot_at(cursor);
        let changed = self.hover_slot != new_slot;
        self.hover_slot = new_slot;
        changed
    }

    fn slot_at(&self, cursor: Point) -> Option<usize> {
        (0..self.window.num_slots()).find(|&slot| {
            let g = self.geometry(slot);
            (cursor.x - g.center.x).abs() <= g.size / 2.0
                && (cursor.y - g.center.y).abs() <= g.size / 2.0
        })
    }

    pub fn begin_drag(&mut self) {
        // a fresh gesture supersedes whatever was still settling
        self.animation = None;
    }

    /// Cumulative gesture offset, in canvas pixels. A leftward pull
    /// advances the carousel, so the sign flips on the way in.
    pub fn drag(&mut self, dx: f64) -> Frame {
        self.animation = None;
        self.controller.drag(-dx)
    }

    /// Where a release right now should settle.
    pub fn snap_target(&self) -> Anchor {
        let anchor = self.controller.anchor();
        if self.controller.progress() >= SNAP_THRESHOLD
            && self.controller.available_anchors().contains(&anchor)
        {
            anchor
        } else {
            Anchor::Start
        }
    }

    pub fn release(&mut self) {
        self.animation = Some(Animation {
            target: self.snap_target(),
            shown: self.controller.progress(),
        });
    }

    /// Programmatic step (socket `next`/`prev`): synthesize a full-width
    /// drag and animate the transition from rest.
    pub fn nudge(&mut self, direction: Direction) -> bool {
        let can_move = match direction {
            Direction::Forward => self.controller.index() + 1 < self.controller.item_count(),
            Direction::Backward => self.controller.index() > 0,
        };
        if !can_move || self.is_animating() {
            return false;
        }

        let offset = match direction {
            Direction::Forward => self.strip_width(),
            Direction::Backward => -self.strip_width(),
        };
        let frame = self.controller.drag(offset);
        self.animation = Some(Animation {
            target: frame.anchor,
            shown: 0.0,
        });
        true
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Advance the settle animation one tick. Returns the settle outcome
    /// on the tick that reaches the target anchor.
    pub fn step_animation(&mut self) -> Option<Settle> {
        let anim = self.animation.as_mut()?;
        let goal = if anim.target.is_rest() { 0.0 } else { 1.0 };

        anim.shown = if anim.shown < goal {
            (anim.shown + SETTLE_STEP).min(goal)
        } else {
            (anim.shown - SETTLE_STEP).max(goal)
        };
        if anim.shown != goal {
            return None;
        }

        let target = anim.target;
        self.animation = None;
        Some(self.controller.settle(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop::{AppName, AppQuery, ExecCommand};
    use std::path::PathBuf;

    fn item(name: &str) -> Item {
        Item {
            app: AppInfo {
                name: AppName::new(name),
                icon: PathBuf::new(),
                class: WindowClass::new(name),
                exec: ExecCommand::new(name),
            },
            pixbuf: None,
        }
    }

    fn state(item_count: usize) -> State {
        let items: Vec<Item> = (0..item_count).map(|i| item(&format!("app{i}"))).collect();
        let window = SlotWindow::new(5, 2).unwrap();
        let controller =
            Controller::new(items.len(), window.num_slots() as f64 * SLOT_PITCH).unwrap();
        let mut state = State {
            controller,
            window,
            items,
            active_classes: Vec::new(),
            hover_slot: None,
            scale_factor: 1.0,
            canvas_width: 0.0,
            canvas_height: 0.0,
            edge: Edge::Bottom,
            activations: Histogram::new("activations"),
            animation: None,
        };
        state.refresh(2560.0, 1440.0, Vec::new());
        state
    }

    #[test]
    fn leftward_drag_advances_forward() {
        let mut s = state(5);
        let frame = s.drag(-100.0);
        assert_eq!(frame.direction, Direction::Forward);
        assert!(frame.progress > 0.0);
        // tiles slide left with the pull
        assert!(s.shift() < 0.0);
    }

    #[test]
    fn rightward_drag_at_first_item_rubber_bands() {
        let mut s = state(5);
        s.drag(500.0);
        assert_eq!(s.snap_target(), Anchor::Start);
        // the row still follows the pull to the right
        assert!(s.shift() > 0.0);
    }

    #[test]
    fn release_past_threshold_settles_through() {
        let mut s = state(5);
        let past = s.strip_width() * (SNAP_THRESHOLD + 0.1);
        s.drag(-past);
        assert_eq!(s.snap_target(), Anchor::Forward);

        s.release();
        let settle = loop {
            if let Some(settle) = s.step_animation() {
                break settle;
            }
        };
        assert_eq!(settle.index, 1);
        assert!(settle.moved);
        assert!(!s.is_animating());
        assert_eq!(s.shown_progress(), 0.0);
    }

    #[test]
    fn release_short_of_threshold_springs_back() {
        let mut s = state(5);
        let short = s.strip_width() * (SNAP_THRESHOLD - 0.1);
        s.drag(-short);
        assert_eq!(s.snap_target(), Anchor::Start);

        s.release();
        let settle = loop {
            if let Some(settle) = s.step_animation() {
                break settle;
            }
        };
        assert_eq!(settle.index, 0);
        assert!(!settle.moved);
    }

    #[test]
    fn nudge_respects_boundaries() {
        let mut s = state(2);
        assert!(!s.nudge(Direction::Backward));
        assert!(s.nudge(Direction::Forward));
        while s.step_animation().is_none() {}
        assert_eq!(s.controller.index(), 1);
        assert!(!s.nudge(Direction::Forward));
        assert!(s.nudge(Direction::Backward));
    }

    #[test]
    fn new_drag_supersedes_running_animation() {
        let mut s = state(5);
        let offset = s.strip_width() * 0.6;
        s.drag(-offset);
        s.release();
        s.step_animation();
        assert!(s.is_animating());
        s.begin_drag();
        assert!(!s.is_animating());
    }

    #[test]
    fn geometry_centers_current_item_on_initial_slot() {
        let s = state(5);
        let g = s.geometry(2);
        assert_eq!(g.center.x, s.strip_center().x);
        let left = s.geometry(1);
        assert!(left.center.x < g.center.x);
    }

    #[test]
    fn cursor_hits_tiles_and_misses_gaps() {
        let mut s = state(5);
        let g = s.geometry(2);
        assert!(s.update_cursor(g.center));
        assert_eq!(s.hover_slot, Some(2));
        assert_eq!(s.hovered().map(|(i, _)| i), Some(0));

        let far = Point::new(g.center.x, g.center.y - 10.0 * g.size);
        assert!(s.update_cursor(far));
        assert_eq!(s.hover_slot, None);
    }

    #[test]
    fn click_without_hover_targets_the_centered_item() {
        let mut s = state(5);
        assert_eq!(s.hover_slot, None);
        assert_eq!(s.activation_target().map(|(i, _)| i), Some(0));

        // an actual hover wins over the centered fallback
        let g = s.geometry(3);
        s.update_cursor(g.center);
        assert_eq!(s.activation_target().map(|(i, _)| i), Some(1));
    }

    #[test]
    fn refresh_clears_hover_until_reseeded() {
        let mut s = state(5);
        let g = s.geometry(2);
        s.update_cursor(g.center);
        assert!(s.hover_slot.is_some());

        s.refresh(2560.0, 1440.0, Vec::new());
        assert_eq!(s.hover_slot, None);
        // showing seeds the hover from the live cursor position
        assert!(s.update_cursor(g.center));
        assert_eq!(s.hover_slot, Some(2));
    }

    #[test]
    fn reload_clamps_position_into_new_item_list() {
        let mut s = state(5);
        for _ in 0..4 {
            s.drag(-s.strip_width());
            s.release();
            while s.step_animation().is_none() {}
        }
        assert_eq!(s.controller.index(), 4);

        let config = Config {
            items: (0..2)
                .map(|i| ItemConfig {
                    app: AppQuery::new(format!("app{i}")),
                    class: None,
                    exec: None,
                })
                .collect(),
            strip: Default::default(),
        };
        s.reload(&config).unwrap();
        assert_eq!(s.controller.index(), 1);
        assert_eq!(s.items.len(), 2);
    }
}
