use gloo::events::EventListener;
use shared::{PageConfig, Theme};
use std::rc::Rc;
use web_sys::HtmlElement;

use crate::services::dom;
use crate::services::logging::Logger;
use crate::services::storage::{BrowserStorage, DocumentTheme, PreferenceStore, ThemeSurface};

const COMPONENT: &str = "theme";

/// Light/dark preference, persisted when storage allows it
pub struct ThemeController<S, D> {
    store: S,
    surface: D,
    storage_key: String,
}

impl<S: PreferenceStore, D: ThemeSurface> ThemeController<S, D> {
    pub fn new(store: S, surface: D, storage_key: &str) -> Self {
        Self {
            store,
            surface,
            storage_key: storage_key.to_string(),
        }
    }

    /// Reapplies a persisted dark preference; anything else leaves the page as rendered
    pub fn restore(&self) -> Theme {
        let stored = match self.store.get(&self.storage_key) {
            Ok(value) => value,
            Err(e) => {
                Logger::debug_with_component(COMPONENT, &format!("Not restoring theme: {}", e));
                None
            }
        };

        let theme = Theme::from_stored(stored.as_deref());
        if theme == Theme::Dark {
            self.surface.apply(theme);
        }
        theme
    }

    pub fn toggle(&self) -> Theme {
        let theme = self.surface.current().toggled();
        self.surface.apply(theme);
        if let Err(e) = self.store.set(&self.storage_key, theme.storage_value()) {
            Logger::debug_with_component(COMPONENT, &format!("Theme not persisted: {}", e));
        }
        theme
    }
}

/// Restores the stored theme and wires the toggle button when present
pub fn install(config: &PageConfig) {
    let controller = Rc::new(ThemeController::new(BrowserStorage, DocumentTheme, &config.theme_storage_key));
    controller.restore();

    let Some(toggle) = dom::optional_element::<HtmlElement>(COMPONENT, &config.theme_toggle_id) else {
        return;
    };
    EventListener::new(&toggle, "click", move |_| {
        let theme = controller.toggle();
        Logger::debug_with_component(COMPONENT, &format!("Switched to {}", theme.storage_value()));
    })
    .forget();
}
