use shared::{Notification, NotificationId, NotificationStack};
use yew::prelude::*;

use crate::hooks::use_auto_dismiss::use_auto_dismiss;

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub notification: Notification,
    pub on_dismiss: Callback<NotificationId>,
}

/// A single Bootstrap-style toast with its own dismiss timer
#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    let notification = &props.notification;

    let dismiss = {
        let on_dismiss = props.on_dismiss.clone();
        let id = notification.id.clone();
        Callback::from(move |_: ()| on_dismiss.emit(id.clone()))
    };

    use_auto_dismiss(notification.auto_dismiss_ms, dismiss.clone());

    let on_close = dismiss.reform(|_: MouseEvent| ());

    html! {
        <div
            id={notification.id.to_string()}
            class={notification.severity.toast_class()}
            role="alert"
            aria-live="assertive"
            aria-atomic="true"
        >
            <div class="d-flex">
                <div class="toast-body">
                    <strong>{format!("{}:", notification.title)}</strong>
                    {" "}
                    {&notification.message}
                </div>
                <button
                    type="button"
                    class="btn-close btn-close-white me-2 m-auto"
                    aria-label="Close"
                    onclick={on_close}
                ></button>
            </div>
        </div>
    }
}

pub enum ToastMsg {
    Push(Notification),
    Dismiss(NotificationId),
}

/// Root of the notification container; one per page.
///
/// Children are keyed by notification id so removing one toast leaves the
/// others (and their running timers) mounted.
pub struct ToastStack {
    stack: NotificationStack,
}

impl Component for ToastStack {
    type Message = ToastMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            stack: NotificationStack::new(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ToastMsg::Push(notification) => {
                self.stack.push(notification);
                true
            }
            ToastMsg::Dismiss(id) => self.stack.dismiss(&id),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let on_dismiss = ctx.link().callback(ToastMsg::Dismiss);

        html! {
            <>
                {for self.stack.iter().map(|notification| {
                    html! {
                        <Toast
                            key={notification.id.to_string()}
                            notification={notification.clone()}
                            on_dismiss={on_dismiss.clone()}
                        />
                    }
                })}
            </>
        }
    }
}
