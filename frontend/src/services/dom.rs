use serde::de::DeserializeOwned;
use shared::{PageConfig, SubmissionRequest};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlFormElement};

use super::errors::{describe_js, BehaviorError};
use super::logging::Logger;

/// Id of the optional JSON block that overrides `PageConfig` defaults
pub const CONFIG_ELEMENT_ID: &str = "behavior-config";

pub fn document() -> Result<Document, BehaviorError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| BehaviorError::MissingElement("document".to_string()))
}

/// Looks up an element by id and casts it to the expected type
pub fn element_by_id<T: JsCast>(id: &str) -> Result<T, BehaviorError> {
    document()?
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<T>().ok())
        .ok_or_else(|| BehaviorError::MissingElement(id.to_string()))
}

/// Like `element_by_id` but treats absence as a disabled feature
pub fn optional_element<T: JsCast>(component: &str, id: &str) -> Option<T> {
    match element_by_id::<T>(id) {
        Ok(element) => Some(element),
        Err(e) => {
            Logger::debug_with_component(component, &format!("{}, feature skipped", e));
            None
        }
    }
}

/// Parses the JSON text content of a `<script type="application/json">` block
pub fn json_block<T: DeserializeOwned>(id: &str) -> Result<T, BehaviorError> {
    let element: Element = element_by_id(id)?;
    let raw = element.text_content().unwrap_or_default();
    serde_json::from_str(&raw).map_err(|e| BehaviorError::InvalidPageData(format!("#{}: {}", id, e)))
}

/// Reads the page configuration, falling back to defaults
pub fn load_page_config() -> PageConfig {
    let element: Element = match element_by_id(CONFIG_ELEMENT_ID) {
        Ok(element) => element,
        Err(_) => return PageConfig::default(),
    };
    let raw = element.text_content().unwrap_or_default();
    match PageConfig::from_json(&raw) {
        Ok(config) => config,
        Err(e) => {
            Logger::warn_with_component("config", &format!("Ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, e));
            PageConfig::default()
        }
    }
}

/// Snapshot of the form's current values, in declaration order.
///
/// Non-text entries (file inputs) are skipped.
pub fn submission_request(form: &HtmlFormElement) -> Result<SubmissionRequest, BehaviorError> {
    let form_data = web_sys::FormData::new_with_form(form)
        .map_err(|e| BehaviorError::InvalidPageData(describe_js(&e)))?;
    let mut request = SubmissionRequest::new(&form.action());

    let entries = js_sys::try_iter(&form_data)
        .map_err(|e| BehaviorError::InvalidPageData(describe_js(&e)))?
        .ok_or_else(|| BehaviorError::InvalidPageData("form data is not iterable".to_string()))?;

    for entry in entries {
        let entry = entry.map_err(|e| BehaviorError::InvalidPageData(describe_js(&e)))?;
        let pair = js_sys::Array::from(&entry);
        if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
            request.push_field(&name, &value);
        }
    }

    Ok(request)
}
