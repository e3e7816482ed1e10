use shared::Theme;

use super::errors::{describe_js, BehaviorError};
use super::logging::Logger;

/// Client-local key/value persistence
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, BehaviorError>;

    fn set(&self, key: &str, value: &str) -> Result<(), BehaviorError>;
}

/// Where the active theme is rendered
pub trait ThemeSurface {
    fn current(&self) -> Theme;

    fn apply(&self, theme: Theme);
}

/// `window.localStorage`; private browsing modes may refuse access entirely
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Result<web_sys::Storage, BehaviorError> {
        match web_sys::window().map(|window| window.local_storage()) {
            Some(Ok(Some(storage))) => Ok(storage),
            _ => Err(BehaviorError::StorageUnavailable),
        }
    }
}

impl PreferenceStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, BehaviorError> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| BehaviorError::StorageUnavailable)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BehaviorError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| {
                // Quota errors land here as well
                Logger::debug_with_component("theme", &describe_js(&e));
                BehaviorError::StorageUnavailable
            })
    }
}

/// The `data-theme` attribute on the document element
pub struct DocumentTheme;

pub const THEME_ATTRIBUTE: &str = "data-theme";

impl DocumentTheme {
    fn root() -> Option<web_sys::Element> {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
    }
}

impl ThemeSurface for DocumentTheme {
    fn current(&self) -> Theme {
        let value = Self::root().and_then(|root| root.get_attribute(THEME_ATTRIBUTE));
        Theme::from_attribute(value.as_deref())
    }

    fn apply(&self, theme: Theme) {
        if let Some(root) = Self::root() {
            let _ = root.set_attribute(THEME_ATTRIBUTE, theme.attribute_value());
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_storage_round_trip() {
        let store = BrowserStorage;
        store.set("theme-test", "dark").unwrap();
        assert_eq!(store.get("theme-test").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get("theme-test-unset").unwrap(), None);
    }

    #[wasm_bindgen_test]
    fn test_document_theme_attribute() {
        let surface = DocumentTheme;
        surface.apply(Theme::Dark);
        let root = DocumentTheme::root().unwrap();
        assert_eq!(root.get_attribute(THEME_ATTRIBUTE).as_deref(), Some("dark"));
        assert_eq!(surface.current(), Theme::Dark);

        surface.apply(Theme::Light);
        assert_eq!(root.get_attribute(THEME_ATTRIBUTE).as_deref(), Some(""));
        assert_eq!(surface.current(), Theme::Light);
    }
}
