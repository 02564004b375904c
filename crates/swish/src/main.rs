use relm4::prelude::*;
use swish::config;
use swish::gui::app::AppModel;
use swish::gui::strip::State;
use swish::sys::runtime;

fn main() {
    env_logger::init();

    let config = config::load_or_setup();
    let state = match State::new(&config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid carousel setup: {}", e);
            std::process::exit(1);
        }
    };

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx.clone());

    let app = RelmApp::new("org.swish.swish");

    app.run::<AppModel>((state, rx));
}
