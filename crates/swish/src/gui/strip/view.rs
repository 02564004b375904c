use super::model::{Item, SlotGeometry, State};
use super::{
    ICON_INACTIVE_ALPHA, ICON_SIZE, INDICATOR_GAP, INDICATOR_RADIUS, SLOT_SIZE, STRIP_PADDING,
    TILE_RADIUS,
};
use crate::gui::theme::ThemeColors;
use crate::sys::wm::WindowClass;
use cairo::Context;
use gdk4::prelude::*;
use gdk_pixbuf::Pixbuf;
use palette::Srgba;
use std::f64::consts::PI;

struct TileRenderer<'a> {
    item: &'a Item,
    geometry: SlotGeometry,
    hovered: bool,
    active_classes: &'a [WindowClass],
    scale_factor: f64,
}

impl<'a> TileRenderer<'a> {
    fn new(
        item: &'a Item,
        geometry: SlotGeometry,
        hovered: bool,
        active_classes: &'a [WindowClass],
        scale_factor: f64,
    ) -> Self {
        Self {
            item,
            geometry,
            hovered,
            active_classes,
            scale_factor,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_tile(cr, colors)?;
        self.draw_content(cr)?;
        Ok(())
    }

    fn draw_tile(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let state = TileState::resolve(self.item, self.hovered, self.active_classes);
        let (r, g, b, a) = state.color(colors).into_components();
        cr.set_source_rgba(r, g, b, a);

        let size = self.geometry.size;
        rounded_rect(
            cr,
            self.geometry.center.x - size / 2.0,
            self.geometry.center.y - size / 2.0,
            size,
            size,
            TILE_RADIUS * self.scale_factor,
        );
        cr.fill()
    }

    fn draw_content(&self, cr: &Context) -> Result<(), cairo::Error> {
        if let Some(pixbuf) = &self.item.pixbuf {
            self.draw_icon(cr, pixbuf)
        } else {
            self.draw_text(cr, self.item.app.name.as_ref())
        }
    }

    fn draw_icon(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        // fit icon into the tile
        let icon_scale = (self.geometry.size * 0.75) / ICON_SIZE as f64;
        let (iw, ih) = (
            pixbuf.width() as f64 * icon_scale,
            pixbuf.height() as f64 * icon_scale,
        );
        // center icon in the tile
        let (ix, iy) = (
            self.geometry.center.x - iw / 2.0,
            self.geometry.center.y - ih / 2.0,
        );

        cr.save()?;
        cr.translate(ix, iy);
        cr.scale(icon_scale, icon_scale);

        let running = self.item.is_running(self.active_classes);

        // dim icon if app not running and not hovered
        if !running && !self.hovered {
            cr.push_group();
            cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
            cr.paint()?;
            cr.pop_group_to_source()?;
            cr.paint_with_alpha(ICON_INACTIVE_ALPHA)?;
        } else {
            cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
            cr.paint()?;
        }
        cr.restore()
    }

    fn draw_text(&self, cr: &Context, text: &str) -> Result<(), cairo::Error> {
        cr.set_source_rgb(1.0, 1.0, 1.0);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(12.0 * self.scale_factor);
        if let Ok(ext) = cr.text_extents(text) {
            cr.move_to(
                self.geometry.center.x - ext.width() / 2.0,
                self.geometry.center.y + ext.height() / 2.0,
            );
            cr.show_text(text)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TileState {
    Broken,
    Hovered,
    Running,
    Idle,
}

impl TileState {
    /// Determines the visual state of a tile based on priority:
    /// 1. Broken (Config error)
    /// 2. Hovered
    /// 3. Running
    /// 4. Idle (Default)
    fn resolve(item: &Item, hovered: bool, active_classes: &[WindowClass]) -> Self {
        if item.is_broken() {
            Self::Broken
        } else if hovered {
            Self::Hovered
        } else if item.is_running(active_classes) {
            Self::Running
        } else {
            Self::Idle
        }
    }

    fn color(&self, colors: &ThemeColors) -> Srgba<f64> {
        match self {
            Self::Broken => colors.broken,
            Self::Hovered => colors.hovered,
            Self::Running => colors.running,
            Self::Idle => colors.default,
        }
    }
}

pub fn draw(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let backdrop = backdrop_rect(state);
    draw_backdrop(cr, backdrop, state, colors)?;

    // tiles sliding out of the window get cut off at the backdrop
    cr.save()?;
    rounded_rect(
        cr,
        backdrop.0,
        backdrop.1,
        backdrop.2,
        backdrop.3,
        TILE_RADIUS * state.scale_factor,
    );
    cr.clip();

    for slot in 0..state.window.num_slots() {
        if let Some((_, item)) = state.item_in_slot(slot) {
            TileRenderer::new(
                item,
                state.geometry(slot),
                state.hover_slot == Some(slot),
                &state.active_classes,
                state.scale_factor,
            )
            .draw(cr, colors)?;
        }
    }
    cr.restore()?;

    draw_indicator(cr, state, colors)
}

/// `(x, y, width, height)` of the strip backdrop.
fn backdrop_rect(state: &State) -> (f64, f64, f64, f64) {
    let center = state.strip_center();
    let width = state.strip_width() + 2.0 * STRIP_PADDING * state.scale_factor;
    let height = (SLOT_SIZE + 2.0 * STRIP_PADDING) * state.scale_factor;
    (
        center.x - width / 2.0,
        center.y - height / 2.0,
        width,
        height,
    )
}

fn draw_backdrop(
    cr: &Context,
    rect: (f64, f64, f64, f64),
    state: &State,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let (r, g, b, a) = colors.backdrop.into_components();
    cr.set_source_rgba(r, g, b, a);
    rounded_rect(
        cr,
        rect.0,
        rect.1,
        rect.2,
        rect.3,
        TILE_RADIUS * state.scale_factor,
    );
    cr.fill()
}

/// One dot per logical item under the strip, the current one filled solid.
fn draw_indicator(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let item_count = state.controller.item_count();
    let center = state.strip_center();
    let gap = INDICATOR_GAP * state.scale_factor;
    let radius = INDICATOR_RADIUS * state.scale_factor;
    let y = center.y + (SLOT_SIZE / 2.0 + STRIP_PADDING * 2.0) * state.scale_factor;
    let x0 = center.x - (item_count.saturating_sub(1)) as f64 * gap / 2.0;

    let (r, g, b, a) = colors.indicator.into_components();
    for i in 0..item_count {
        let alpha = if i == state.controller.index() { a } else { a * 0.35 };
        cr.set_source_rgba(r, g, b, alpha);
        cr.arc(x0 + i as f64 * gap, y, radius, 0.0, 2.0 * PI);
        cr.fill()?;
    }
    Ok(())
}

fn rounded_rect(cr: &Context, x: f64, y: f64, w: f64, h: f64, r: f64) {
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
    cr.arc(x + r, y + r, r, PI, 3.0 * PI / 2.0);
    cr.close_path();
}
