use gloo::events::{EventListener, EventListenerOptions};
use shared::{PageConfig, ResponseKind, Severity, SubmissionOutcome, SubmissionRequest};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlFormElement;

use crate::services::api::{ApiClient, FormResponse, FormTransport};
use crate::services::dom;
use crate::services::errors::BehaviorError;
use crate::services::logging::Logger;
use crate::services::notifications::{NotificationCenter, Notifier};
use crate::services::page::{BrowserLocation, DomSubmitButton, PageNavigator, SubmitControl};

const COMPONENT: &str = "form-submission";

pub const SAVED_TITLE: &str = "Saved";
pub const SAVED_MESSAGE: &str = "Expense saved successfully";
pub const ERROR_TITLE: &str = "Error";
pub const ERROR_MESSAGE: &str = "Could not save expense";

/// Owns one form's submit lifecycle: post without navigating, then redirect,
/// reload, or report the failure.
///
/// At most one submission is in flight per controller; the submit control is
/// disabled before the request goes out and re-enabled on every path that
/// does not hand the page over to a navigation.
pub struct FormSubmissionController<T, P, B, N> {
    transport: T,
    page: P,
    button: B,
    notifier: Rc<N>,
    in_flight: Cell<bool>,
}

impl<T, P, B, N> FormSubmissionController<T, P, B, N>
where
    T: FormTransport,
    P: PageNavigator,
    B: SubmitControl,
    N: Notifier,
{
    pub fn new(transport: T, page: P, button: B, notifier: Rc<N>) -> Self {
        Self {
            transport,
            page,
            button,
            notifier,
            in_flight: Cell::new(false),
        }
    }

    #[cfg(test)]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Runs one submission to completion.
    ///
    /// Returns `None` when another submission from this form is still pending.
    pub async fn submit(&self, request: SubmissionRequest) -> Option<SubmissionOutcome> {
        if self.in_flight.replace(true) {
            Logger::debug_with_component(COMPONENT, "Submission already in flight, ignoring");
            return None;
        }
        self.button.set_disabled(true);

        let mut outcome = self.resolve(&request).await;
        if let SubmissionOutcome::Redirected(url) = &outcome {
            if let Err(e) = self.page.assign(url) {
                outcome = SubmissionOutcome::Failed(format!("redirect to {} failed: {}", url, e));
            }
        }
        Logger::info_with_component(
            COMPONENT,
            &format!("POST {} -> {}", request.action, outcome.label()),
        );

        match &outcome {
            // The browser owns the page from here on
            SubmissionOutcome::Redirected(_) => {}
            SubmissionOutcome::InlineSuccess(_) => {
                self.notifier.notify(SAVED_TITLE, SAVED_MESSAGE, Severity::Success);
                if let Err(e) = self.page.reload() {
                    Logger::warn_with_component(COMPONENT, &format!("Reload failed: {}", e));
                }
                self.button.set_disabled(false);
            }
            SubmissionOutcome::Failed(reason) => {
                Logger::warn_with_component(COMPONENT, &format!("Save failed: {}", reason));
                self.notifier.notify(ERROR_TITLE, ERROR_MESSAGE, Severity::Danger);
                self.button.set_disabled(false);
            }
        }
        self.in_flight.set(false);
        Some(outcome)
    }

    async fn resolve(&self, request: &SubmissionRequest) -> SubmissionOutcome {
        let response = match self.transport.post_form(request).await {
            Ok(response) => response,
            Err(e) => return SubmissionOutcome::Failed(e.to_string()),
        };

        match response.summary().classify() {
            ResponseKind::Redirect(url) => SubmissionOutcome::Redirected(url),
            ResponseKind::Rejected(status) => SubmissionOutcome::Failed(BehaviorError::Rejected(status).to_string()),
            ResponseKind::Inline => match response.read_body().await {
                Ok(body) => SubmissionOutcome::InlineSuccess(body),
                Err(e) => SubmissionOutcome::Failed(e.to_string()),
            },
        }
    }
}

pub type PageFormController = FormSubmissionController<ApiClient, BrowserLocation, DomSubmitButton, NotificationCenter>;

/// Intercepts the form's submit event for the lifetime of the page
pub fn attach(form: &HtmlFormElement, controller: Rc<PageFormController>) -> EventListener {
    let target = form.clone();
    // Non-passive so prevent_default takes effect
    EventListener::new_with_options(form, "submit", EventListenerOptions::enable_prevent_default(), move |event| {
        event.prevent_default();

        match dom::submission_request(&target) {
            Ok(request) => {
                let controller = controller.clone();
                spawn_local(async move {
                    let _ = controller.submit(request).await;
                });
            }
            Err(e) => {
                Logger::error_with_component(COMPONENT, &format!("Could not read form: {}", e));
                controller.notifier.notify(ERROR_TITLE, ERROR_MESSAGE, Severity::Danger);
            }
        }
    })
}

/// Wires the expense form if the page has one
pub fn install(config: &PageConfig, notifications: Rc<NotificationCenter>) {
    let Some(form) = dom::optional_element::<HtmlFormElement>(COMPONENT, &config.form_id) else {
        return;
    };

    let controller = Rc::new(FormSubmissionController::new(
        ApiClient::new(),
        BrowserLocation,
        DomSubmitButton::find(&config.submit_id),
        notifications,
    ));
    attach(&form, controller).forget();
    Logger::debug_with_component(COMPONENT, &format!("Attached to #{}", config.form_id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use shared::ResponseSummary;
    use std::cell::RefCell;
    use std::future::Future;
    use std::task::{Context, Poll};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Disabled,
        Enabled,
        Notified(String, Severity),
        Assigned(String),
        Reloaded,
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    #[derive(Debug, Clone)]
    struct FakeResponse {
        status: u16,
        redirected: bool,
        url: String,
        body: Result<String, BehaviorError>,
    }

    impl FakeResponse {
        fn ok(body: &str) -> Self {
            Self { status: 200, redirected: false, url: "/expenses/create".into(), body: Ok(body.into()) }
        }

        fn redirect(url: &str) -> Self {
            Self { status: 200, redirected: true, url: url.into(), body: Ok(String::new()) }
        }

        fn status(status: u16) -> Self {
            Self { status, redirected: false, url: "/expenses/create".into(), body: Ok("nope".into()) }
        }
    }

    impl FormResponse for FakeResponse {
        fn summary(&self) -> ResponseSummary {
            ResponseSummary { status: self.status, redirected: self.redirected, url: self.url.clone() }
        }

        async fn read_body(self) -> Result<String, BehaviorError> {
            self.body
        }
    }

    /// Replays one scripted result per call, or waits on a gate when given one
    struct FakeTransport {
        result: Result<FakeResponse, BehaviorError>,
        gate: RefCell<Option<oneshot::Receiver<Result<FakeResponse, BehaviorError>>>>,
        requests: RefCell<Vec<SubmissionRequest>>,
    }

    impl FakeTransport {
        fn replying(result: Result<FakeResponse, BehaviorError>) -> Self {
            Self { result, gate: RefCell::new(None), requests: RefCell::new(Vec::new()) }
        }

        fn gated(gate: oneshot::Receiver<Result<FakeResponse, BehaviorError>>) -> Self {
            Self {
                result: Err(BehaviorError::Transport("ungated".into())),
                gate: RefCell::new(Some(gate)),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl FormTransport for FakeTransport {
        type Response = FakeResponse;

        async fn post_form(&self, request: &SubmissionRequest) -> Result<FakeResponse, BehaviorError> {
            self.requests.borrow_mut().push(request.clone());
            let gate = self.gate.borrow_mut().take();
            match gate {
                Some(gate) => gate.await.expect("gate dropped"),
                None => self.result.clone(),
            }
        }
    }

    struct FakePage {
        log: Log,
        assign_fails: bool,
    }

    impl PageNavigator for FakePage {
        fn assign(&self, url: &str) -> Result<(), BehaviorError> {
            if self.assign_fails {
                return Err(BehaviorError::Navigation("blocked".into()));
            }
            self.log.borrow_mut().push(Event::Assigned(url.to_string()));
            Ok(())
        }

        fn reload(&self) -> Result<(), BehaviorError> {
            self.log.borrow_mut().push(Event::Reloaded);
            Ok(())
        }
    }

    struct FakeButton {
        log: Log,
    }

    impl SubmitControl for FakeButton {
        fn set_disabled(&self, disabled: bool) {
            self.log
                .borrow_mut()
                .push(if disabled { Event::Disabled } else { Event::Enabled });
        }
    }

    struct FakeNotifier {
        log: Log,
    }

    impl Notifier for FakeNotifier {
        fn notify(&self, title: &str, _message: &str, severity: Severity) {
            self.log.borrow_mut().push(Event::Notified(title.to_string(), severity));
        }
    }

    fn controller(
        transport: FakeTransport,
        assign_fails: bool,
    ) -> (FormSubmissionController<FakeTransport, FakePage, FakeButton, FakeNotifier>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let controller = FormSubmissionController::new(
            transport,
            FakePage { log: log.clone(), assign_fails },
            FakeButton { log: log.clone() },
            Rc::new(FakeNotifier { log: log.clone() }),
        );
        (controller, log)
    }

    fn expense() -> SubmissionRequest {
        SubmissionRequest::new("/expenses/create")
            .with_field("title", "Lunch")
            .with_field("category", "Food")
            .with_field("amount", "12.50")
            .with_field("date", "2025-01-03")
    }

    fn events(log: &Log) -> Vec<Event> {
        log.borrow().clone()
    }

    #[test]
    fn test_inline_success_notifies_then_reloads() {
        let (controller, log) = controller(FakeTransport::replying(Ok(FakeResponse::ok("OK"))), false);

        let outcome = block_on(controller.submit(expense()));

        assert_eq!(outcome, Some(SubmissionOutcome::InlineSuccess("OK".into())));
        assert_eq!(
            events(&log),
            vec![
                Event::Disabled,
                Event::Notified("Saved".into(), Severity::Success),
                Event::Reloaded,
                Event::Enabled,
            ]
        );
        assert!(!controller.is_in_flight());
    }

    #[test]
    fn test_redirect_hands_over_to_the_browser() {
        let (controller, log) = controller(FakeTransport::replying(Ok(FakeResponse::redirect("/expenses"))), false);

        let outcome = block_on(controller.submit(expense()));

        assert_eq!(outcome, Some(SubmissionOutcome::Redirected("/expenses".into())));
        // No reload, no notification, button left for the navigation to tear down
        assert_eq!(events(&log), vec![Event::Disabled, Event::Assigned("/expenses".into())]);
    }

    #[test]
    fn test_network_failure_reports_and_reenables() {
        let (controller, log) = controller(
            FakeTransport::replying(Err(BehaviorError::Transport("offline".into()))),
            false,
        );

        let outcome = block_on(controller.submit(expense()));

        assert!(matches!(outcome, Some(SubmissionOutcome::Failed(_))));
        assert_eq!(
            events(&log),
            vec![
                Event::Disabled,
                Event::Notified("Error".into(), Severity::Danger),
                Event::Enabled,
            ]
        );
    }

    #[test]
    fn test_error_status_is_a_failure() {
        let (controller, log) = controller(FakeTransport::replying(Ok(FakeResponse::status(500))), false);

        let outcome = block_on(controller.submit(expense()));

        assert_eq!(
            outcome,
            Some(SubmissionOutcome::Failed("server responded with status 500".into()))
        );
        assert!(!events(&log).contains(&Event::Reloaded));
        assert_eq!(events(&log).last(), Some(&Event::Enabled));
    }

    #[test]
    fn test_unreadable_body_is_a_failure() {
        let response = FakeResponse {
            body: Err(BehaviorError::Transport("stream aborted".into())),
            ..FakeResponse::ok("")
        };
        let (controller, log) = controller(FakeTransport::replying(Ok(response)), false);

        let outcome = block_on(controller.submit(expense()));

        assert!(matches!(outcome, Some(SubmissionOutcome::Failed(_))));
        let danger = events(&log)
            .iter()
            .filter(|e| matches!(e, Event::Notified(_, Severity::Danger)))
            .count();
        assert_eq!(danger, 1);
        assert!(!events(&log).contains(&Event::Reloaded));
    }

    #[test]
    fn test_failed_redirect_reenables_for_retry() {
        let (controller, log) = controller(FakeTransport::replying(Ok(FakeResponse::redirect("/expenses"))), true);

        let outcome = block_on(controller.submit(expense()));

        match outcome {
            Some(SubmissionOutcome::Failed(reason)) => assert!(reason.contains("/expenses")),
            other => panic!("expected a failed outcome, got {:?}", other),
        }
        assert_eq!(
            events(&log),
            vec![
                Event::Disabled,
                Event::Notified("Error".into(), Severity::Danger),
                Event::Enabled,
            ]
        );
    }

    #[test]
    fn test_request_is_forwarded_unchanged() {
        let (controller, _log) = controller(FakeTransport::replying(Ok(FakeResponse::ok("OK"))), false);

        block_on(controller.submit(expense()));

        let requests = controller.transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0], expense());
    }

    #[test]
    fn test_second_submit_while_in_flight_is_ignored() {
        let (release, gate) = oneshot::channel();
        let (controller, log) = controller(FakeTransport::gated(gate), false);

        let mut first = Box::pin(controller.submit(expense()));
        let waker = futures::task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        assert!(matches!(first.as_mut().poll(&mut cx), Poll::Pending));
        assert!(controller.is_in_flight());

        // A double click while the first request is outstanding
        assert_eq!(block_on(controller.submit(expense())), None);
        assert_eq!(controller.transport.requests.borrow().len(), 1);

        release.send(Ok(FakeResponse::ok("OK"))).unwrap();
        assert_eq!(block_on(first), Some(SubmissionOutcome::InlineSuccess("OK".into())));

        let toggles: Vec<Event> = events(&log)
            .into_iter()
            .filter(|e| matches!(e, Event::Disabled | Event::Enabled))
            .collect();
        assert_eq!(toggles, vec![Event::Disabled, Event::Enabled]);
    }

    #[test]
    fn test_retry_after_failure_is_a_fresh_submission() {
        let (controller, log) = controller(
            FakeTransport::replying(Err(BehaviorError::Transport("offline".into()))),
            false,
        );

        block_on(controller.submit(expense()));
        block_on(controller.submit(expense()));

        assert_eq!(controller.transport.requests.borrow().len(), 2);
        let danger = events(&log)
            .iter()
            .filter(|e| matches!(e, Event::Notified(_, Severity::Danger)))
            .count();
        assert_eq!(danger, 2);
    }
}
