use shared::{Notification, NotificationId, NotificationIdSource, Severity};
use std::cell::RefCell;
use web_sys::Element;
use yew::AppHandle;

use super::dom;
use super::logging::Logger;
use crate::components::toast::{ToastMsg, ToastStack};

/// Anything that can surface a transient status message
pub trait Notifier {
    fn notify(&self, title: &str, message: &str, severity: Severity);
}

/// Transient notifications rendered into the page's toast container.
///
/// Best-effort: without a container every call is a silent no-op.
pub struct NotificationCenter {
    stack: Option<AppHandle<ToastStack>>,
    ids: RefCell<NotificationIdSource>,
    auto_dismiss_ms: u32,
}

impl NotificationCenter {
    /// Mounts the toast stack into the element with `container_id`, if present
    pub fn mount(container_id: &str, auto_dismiss_ms: u32) -> Self {
        let stack = dom::optional_element::<Element>("notifications", container_id)
            .map(|container| yew::Renderer::<ToastStack>::with_root(container).render());
        Self {
            stack,
            ids: RefCell::new(NotificationIdSource::new()),
            auto_dismiss_ms,
        }
    }

    /// A center with nowhere to render
    #[cfg(test)]
    pub fn detached() -> Self {
        Self {
            stack: None,
            ids: RefCell::new(NotificationIdSource::new()),
            auto_dismiss_ms: shared::DEFAULT_AUTO_DISMISS_MS,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.stack.is_some()
    }

    /// Shows a notification with an explicit dismiss delay
    pub fn notify_for(
        &self,
        title: &str,
        message: &str,
        severity: Severity,
        auto_dismiss_ms: u32,
    ) -> Option<NotificationId> {
        let stack = self.stack.as_ref()?;

        let id = self.ids.borrow_mut().next_id(js_sys::Date::now() as u64);
        let notification = Notification::new(id.clone(), title, message, severity)
            .with_auto_dismiss(auto_dismiss_ms);

        Logger::debug_with_component(
            "notifications",
            &format!("{} {} ({}): {}", id, severity, title, message),
        );
        stack.send_message(ToastMsg::Push(notification));
        Some(id)
    }

    /// Removes a notification before its timer runs out
    #[cfg(test)]
    pub fn dismiss(&self, id: &NotificationId) {
        if let Some(stack) = self.stack.as_ref() {
            stack.send_message(ToastMsg::Dismiss(id.clone()));
        }
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        let _ = self.notify_for(title, message, severity, self.auto_dismiss_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_center_is_a_silent_no_op() {
        let center = NotificationCenter::detached();
        assert!(!center.is_mounted());
        assert_eq!(center.notify_for("Saved", "Expense saved successfully", Severity::Success, 3500), None);
        center.notify("Error", "Could not save expense", Severity::Danger);
        center.dismiss(&NotificationIdSource::new().next_id(1));
        assert_eq!(center.auto_dismiss_ms, 3500);
    }
}
