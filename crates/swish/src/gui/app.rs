use crate::config;
use crate::events::AppEvent;
use crate::gui::strip::{self, State, TICK_MS};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use crate::sys::wm::{self, Point, ShellCommand};
use carousel::Direction;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

pub struct AppModel {
    pub state: Rc<RefCell<State>>,
    pub visible: bool,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
    ticking: Rc<Cell<bool>>,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    Next,
    Prev,
    Click(u32),
    CursorMove(Point),
    DragBegin,
    DragUpdate(f64),
    DragEnd(f64),
    Tick,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::Next => AppMsg::Next,
            AppEvent::Prev => AppMsg::Prev,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (State, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Swish"),
            #[watch]
            set_visible: model.visible,
            #[watch]
            set_opacity: if model.visible { 1.0 } else { 0.0 },
            add_css_class: "swish-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Hide);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "swish-drawing-area",

                    add_controller = gtk::EventControllerMotion {
                        connect_motion[sender] => move |_, x, y| {
                            sender.input(AppMsg::CursorMove(Point::new(x, y)));
                        }
                    },

                    add_controller = gtk::GestureClick {
                        set_button: 0, // Listen to all buttons
                        connect_released[sender] => move |gesture, _, _, _| {
                            sender.input(AppMsg::Click(gesture.current_button()));
                        }
                    },

                    add_controller = gtk::GestureDrag {
                        connect_drag_begin[sender] => move |_, _, _| {
                            sender.input(AppMsg::DragBegin);
                        },
                        connect_drag_update[sender] => move |gesture, dx, _| {
                            // claim the sequence so the release is not
                            // also delivered as a click
                            gesture.set_state(gtk::EventSequenceState::Claimed);
                            sender.input(AppMsg::DragUpdate(dx));
                        },
                        connect_drag_end[sender] => move |_, dx, _| {
                            sender.input(AppMsg::DragEnd(dx));
                        }
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (state, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let state = Rc::new(RefCell::new(state));

        let model = AppModel {
            state: state.clone(),
            visible: false,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
            ticking: Rc::new(Cell::new(false)),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let state_draw = model.state.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = strip::draw(cr, &state_draw.borrow(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                let monitor_name = wm::get_active_monitor();
                let mut monitor_size = (2560.0, 1440.0);
                if let Some(name) = &monitor_name {
                    window::set_window_monitor(&self.root, name);
                    if let Some(m) = window::get_monitor_by_name(name) {
                        let geometry = m.geometry();
                        monitor_size = (geometry.width() as f64, geometry.height() as f64);
                    }
                }

                self.visible = true;

                let cursor_pos = window::get_cursor_position(&self.root)
                    .or_else(wm::get_cursor_pos_on_active_monitor)
                    .unwrap_or_default();

                let classes = wm::get_active_classes();
                {
                    let mut state = self.state.borrow_mut();
                    state.refresh(monitor_size.0, monitor_size.1, classes);
                    state.update_cursor(cursor_pos);
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::Hide => {
                self.visible = false;
                self.flush_activations();
            }
            AppMsg::Next => {
                if self.visible && self.state.borrow_mut().nudge(Direction::Forward) {
                    self.start_ticker(&sender);
                }
            }
            AppMsg::Prev => {
                if self.visible && self.state.borrow_mut().nudge(Direction::Backward) {
                    self.start_ticker(&sender);
                }
            }
            AppMsg::Click(btn) => {
                if !self.visible {
                    return;
                }
                if btn == 3 {
                    let state = self.state.borrow();

                    let _ = state
                        .hovered()
                        .filter(|(_, item)| item.is_running(&state.active_classes))
                        .map(|(_, item)| {
                            if let Err(e) = wm::close_window(&item.app.class) {
                                log::error!("Failed to close window: {}", e);
                            }
                        });
                } else {
                    self.activate_selection();
                }
                self.visible = false;
                self.flush_activations();
            }
            AppMsg::CursorMove(point) => {
                if !self.visible {
                    return;
                }
                if self.state.borrow_mut().update_cursor(point) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::DragBegin => {
                if !self.visible {
                    return;
                }
                self.state.borrow_mut().begin_drag();
            }
            AppMsg::DragUpdate(dx) => {
                if !self.visible {
                    return;
                }
                self.state.borrow_mut().drag(dx);
                self.drawing_area.queue_draw();
            }
            AppMsg::DragEnd(dx) => {
                if !self.visible {
                    return;
                }
                {
                    let mut state = self.state.borrow_mut();
                    state.drag(dx);
                    state.release();
                }
                self.start_ticker(&sender);
            }
            AppMsg::Tick => {
                if let Some(settle) = self.state.borrow_mut().step_animation()
                    && settle.moved
                {
                    log::debug!("settled at index {}", settle.index);
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => {
                crate::desktop::refresh_cache();
                match config::load_config() {
                    Ok(new_config) if !new_config.items.is_empty() => {
                        match self.state.borrow_mut().reload(&new_config) {
                            Ok(()) => {
                                self.drawing_area.queue_draw();
                                log::info!("Configuration reloaded");
                            }
                            Err(e) => log::error!("Rejected reloaded config: {}", e),
                        }
                    }
                    Ok(_) => log::warn!("Reloaded config has no items, keeping previous"),
                    Err(e) => log::error!("Failed to reload config: {}", e),
                }
            }
        }
    }
}

impl AppModel {
    fn activate_selection(&self) {
        let activated = {
            let state = self.state.borrow();
            state
                .activation_target()
                .map(|(index, item)| (index, item.app.clone()))
        };

        let Some((index, app)) = activated else {
            return;
        };
        self.state.borrow_mut().activations.inc(index);

        if app.exec.as_str() == "SWISH_SETUP" {
            if let Ok(path) = config::write_default_config() {
                let _ = std::process::Command::new("xdg-open").arg(&path).spawn();
            }
        } else if let Err(e) =
            wm::run_or_raise(&app.class, &ShellCommand::from(app.exec.to_string()))
        {
            log::error!("Failed to run or raise '{}': {}", app.name, e);
        }
    }

    fn flush_activations(&self) {
        let mut state = self.state.borrow_mut();
        if state.activations.total() > 0 {
            log::debug!("{}", state.activations);
            state.activations.reset();
        }
    }

    /// Drive the settle animation with input messages until it finishes.
    /// Only one ticker runs at a time; it stops itself once the model has
    /// nothing left to animate.
    fn start_ticker(&self, sender: &ComponentSender<Self>) {
        if self.ticking.get() {
            return;
        }
        self.ticking.set(true);

        let ticking = self.ticking.clone();
        let state = self.state.clone();
        let sender = sender.clone();
        glib::timeout_add_local(Duration::from_millis(TICK_MS), move || {
            if !state.borrow().is_animating() {
                ticking.set(false);
                return glib::ControlFlow::Break;
            }
            sender.input(AppMsg::Tick);
            glib::ControlFlow::Continue
        });
    }
}
