use super::*;

#[test]
fn toast_fades_then_disappears() {
    let mut surface = ToastSurface::new();
    let id = surface.show_at(1_000, "Saved", Severity::Success, 2_000);

    assert!(!surface.tick(2_999));
    assert_eq!(surface.toasts()[0].phase, ToastPhase::Visible);

    assert!(surface.tick(3_000));
    assert_eq!(surface.toasts()[0].id, id);
    assert_eq!(surface.toasts()[0].phase, ToastPhase::Fading);

    assert!(!surface.tick(3_000 + FADE_MS - 1));
    assert!(surface.tick(3_000 + FADE_MS));
    assert!(surface.is_empty());
}

#[test]
fn concurrent_toasts_are_timed_independently() {
    let mut surface = ToastSurface::new();
    let short = surface.show_at(0, "one", Severity::Info, 500);
    let long = surface.show_at(100, "two", Severity::Error, 5_000);
    assert_ne!(short, long);
    assert_eq!(surface.toasts().len(), 2);

    surface.tick(500 + FADE_MS);
    let left: Vec<_> = surface.toasts().iter().map(|t| t.id).collect();
    assert_eq!(left, vec![long]);
    assert_eq!(surface.toasts()[0].phase, ToastPhase::Visible);
}

#[test]
fn identical_messages_are_not_coalesced() {
    let mut surface = ToastSurface::new();
    surface.show_at(0, "Copied", Severity::Info, 1_000);
    surface.show_at(0, "Copied", Severity::Info, 1_000);
    assert_eq!(surface.toasts().len(), 2);
}

#[test]
fn dismiss_removes_only_that_toast() {
    let mut surface = ToastSurface::new();
    let first = surface.show_at(0, "a", Severity::Warn, 1_000);
    surface.show_at(0, "b", Severity::Warn, 1_000);
    surface.dismiss(first);
    assert_eq!(surface.toasts().len(), 1);
    assert_eq!(surface.toasts()[0].message, "b");
}

#[test]
fn zero_timeout_goes_straight_to_fading() {
    let mut surface = ToastSurface::new();
    surface.show_at(10, "blink", Severity::Info, 0);
    assert!(surface.tick(10));
    assert_eq!(surface.toasts()[0].phase, ToastPhase::Fading);
}

#[test]
fn severity_classes_are_distinct() {
    let classes = [Severity::Info, Severity::Success, Severity::Error, Severity::Warn].map(Severity::class);
    assert_eq!(classes, ["toast--info", "toast--success", "toast--error", "toast--warn"]);
}
