//! Ingress Integration Tests
//!
//! Event delivery through the shared ingress, including events raised by
//! the platform while a dispatch is still running.

mod common;

use std::rc::Rc;

use common::{controller, FakeDocument};
use pretty_assertions::assert_eq;
use velvet_core::{
    AppEvent, Capability, Dispatch, Ingress, Key, KeyPress, SurfaceError, VelvetError,
};

fn synchronous_ingress(doc: FakeDocument, capability: Capability) -> Rc<Ingress<FakeDocument>> {
    Rc::new_cyclic(|weak| {
        let mut doc = doc;
        doc.sync_host = Some(weak.clone());
        Ingress::new(controller(doc, capability))
    })
}

#[test]
fn test_start_renders_through_ingress() {
    let ingress = Ingress::new(controller(FakeDocument::new(), Capability::Supported));

    ingress.start().expect("start");

    let controller = ingress.controller();
    assert_eq!(controller.platform().mounted.as_deref(), Some("tpl-home"));
    assert_eq!(
        controller.current_path().map(|p| p.as_str()),
        Some("/home")
    );
}

#[test]
fn test_send_reports_prevent_default() {
    let ingress = Ingress::new(controller(FakeDocument::new(), Capability::Supported));
    ingress.start().expect("start");

    let dispatch = ingress
        .send(AppEvent::LinkActivated {
            href: "#/work".into(),
            no_animate: false,
        })
        .expect("send");

    assert_eq!(dispatch, Dispatch::PreventDefault);
    assert_eq!(ingress.queued(), 0);
}

#[test]
fn test_reentrant_events_are_queued_then_handled() {
    let ingress = synchronous_ingress(FakeDocument::new(), Capability::Supported);
    ingress.start().expect("start");

    let dispatch = ingress
        .send(AppEvent::HashChanged {
            hash: "#/about".into(),
        })
        .expect("send");

    assert_eq!(dispatch, Dispatch::Continue);
    assert_eq!(ingress.queued(), 0);
    let controller = ingress.controller();
    assert_eq!(controller.pending_transitions(), 0);
    assert_eq!(controller.platform().mounted.as_deref(), Some("tpl-about"));
    assert_eq!(controller.platform().transitions_started.len(), 1);
}

#[test]
fn test_reentrant_modal_open_commits_once() {
    let mut doc = FakeDocument::new();
    doc.focus_on("open-modal");
    let ingress = synchronous_ingress(doc, Capability::Supported);
    ingress.start().expect("start");

    let _dispatch = ingress.send(AppEvent::OpenModal).expect("open");

    let controller = ingress.controller();
    assert!(controller.platform().modal_visible);
    assert!(controller.is_trapping_focus());
    assert_eq!(controller.pending_transitions(), 0);
}

#[test]
fn test_reentrant_tab_still_wraps_but_reports_continue() {
    let mut doc = FakeDocument::new();
    doc.focus_on("open-modal");
    let ingress = synchronous_ingress(doc, Capability::Supported);
    ingress.start().expect("start");
    let _dispatch = ingress.send(AppEvent::OpenModal).expect("open");

    let tab = AppEvent::KeyPressed(KeyPress::new(Key::Tab, false).in_modal());
    {
        let mut controller = ingress.controller_mut();
        let doc = controller.platform_mut();
        doc.focus_on("close-modal");
        doc.interleaved = Some(tab.clone());
    }
    let _dispatch = ingress
        .send(AppEvent::HashChanged {
            hash: "#/work".into(),
        })
        .expect("navigate");

    {
        let controller = ingress.controller();
        let doc = controller.platform();
        assert_eq!(doc.interleaved_dispatches, vec![Dispatch::Continue]);
        assert_eq!(doc.focused_name(), Some("modal-name"));
    }

    ingress.controller_mut().platform_mut().focus_on("close-modal");
    let dispatch = ingress.send(tab).expect("direct tab");
    assert_eq!(dispatch, Dispatch::PreventDefault);
}

#[test]
fn test_direct_errors_are_returned() {
    let mut doc = FakeDocument::new();
    doc.mount_error = Some(SurfaceError::Mount("detached stage".into()));
    let ingress = Ingress::new(controller(doc, Capability::Unsupported));

    let err = ingress
        .send(AppEvent::HashChanged {
            hash: "#/work".into(),
        })
        .unwrap_err();

    assert!(matches!(err, VelvetError::Surface(SurfaceError::Mount(_))));
}

#[test]
fn test_queued_errors_are_logged_not_returned() {
    let mut doc = FakeDocument::new();
    doc.mount_error = Some(SurfaceError::Mount("detached stage".into()));
    let ingress = synchronous_ingress(doc, Capability::Supported);

    let dispatch = ingress
        .send(AppEvent::HashChanged {
            hash: "#/work".into(),
        })
        .expect("the swap itself fails inside the queued event");

    assert_eq!(dispatch, Dispatch::Continue);
    assert_eq!(ingress.queued(), 0);
    assert!(!ingress.controller().platform().busy);
}
