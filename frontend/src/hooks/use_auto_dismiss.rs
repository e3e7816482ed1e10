use gloo::timers::callback::Timeout;
use yew::prelude::*;

/// Fires `on_expire` once, `delay_ms` after the calling component mounts.
///
/// The timer belongs to the component: unmounting (e.g. a manual dismissal)
/// drops it before it fires, and sibling components each own their own.
#[hook]
pub fn use_auto_dismiss(delay_ms: u32, on_expire: Callback<()>) {
    use_effect_with(delay_ms, move |delay_ms| {
        let timeout = Timeout::new(*delay_ms, move || on_expire.emit(()));
        move || drop(timeout)
    });
}
