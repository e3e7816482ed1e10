use web_sys::Element;

use super::dom;
use super::errors::{describe_js, BehaviorError};

/// Browser navigation as seen by the form controller
pub trait PageNavigator {
    /// Hands navigation to the browser; the current page is about to go away
    fn assign(&self, url: &str) -> Result<(), BehaviorError>;

    fn reload(&self) -> Result<(), BehaviorError>;
}

/// Something that can be made (non-)actionable while a request is in flight
pub trait SubmitControl {
    fn set_disabled(&self, disabled: bool);
}

pub struct BrowserLocation;

impl BrowserLocation {
    fn location() -> Result<web_sys::Location, BehaviorError> {
        web_sys::window()
            .map(|window| window.location())
            .ok_or_else(|| BehaviorError::Navigation("no window".to_string()))
    }
}

impl PageNavigator for BrowserLocation {
    fn assign(&self, url: &str) -> Result<(), BehaviorError> {
        Self::location()?
            .set_href(url)
            .map_err(|e| BehaviorError::Navigation(describe_js(&e)))
    }

    fn reload(&self) -> Result<(), BehaviorError> {
        Self::location()?
            .reload()
            .map_err(|e| BehaviorError::Navigation(describe_js(&e)))
    }
}

/// The form's submit button, if the page has one
pub struct DomSubmitButton {
    element: Option<Element>,
}

impl DomSubmitButton {
    pub fn find(id: &str) -> Self {
        Self {
            element: dom::optional_element("form-submission", id),
        }
    }
}

impl SubmitControl for DomSubmitButton {
    fn set_disabled(&self, disabled: bool) {
        let Some(element) = self.element.as_ref() else {
            return;
        };
        // `disabled` is a boolean attribute on both <button> and <input>
        let _ = if disabled {
            element.set_attribute("disabled", "")
        } else {
            element.remove_attribute("disabled")
        };
    }
}
