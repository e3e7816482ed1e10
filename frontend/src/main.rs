mod components;
mod controllers;
mod hooks;
mod services;

use std::rc::Rc;

use services::dom;
use services::logging::Logger;
use services::notifications::NotificationCenter;

// Behavior layer for the server-rendered expense dashboard. Every feature
// looks up its own elements and quietly stays off when they are missing.
fn main() {
    let config = dom::load_page_config();
    Logger::set_level(config.log_level);
    Logger::info_with_component("app", "Starting expense page behaviors");

    controllers::theme::install(&config);

    let notifications = Rc::new(NotificationCenter::mount(
        &config.toast_container_id,
        config.toast_delay_ms,
    ));
    if !notifications.is_mounted() {
        Logger::info_with_component("app", "No notification container, status messages disabled");
    }

    components::table_controls::install(&config);
    components::charts::render_from_page(&config);
    controllers::form_submission::install(&config, notifications);
}
