use std::time::Duration;

use lms_core::model::ContentKind;
use tokio::time::sleep;

use super::test_harness::{ViewHarness, ViewKind, lesson, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn file_video_renders_without_native_controls() {
    let mut harness = setup_view_harness(
        ViewKind::Lesson,
        lesson(ContentKind::Video, "https://cdn.example.com/conduct.mp4"),
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("<video"), "missing video in {html}");
    assert!(html.contains("nodownload"), "missing controlslist in {html}");
    assert!(html.contains("disablepictureinpicture"), "missing pip flag in {html}");
    assert!(!html.contains(" controls="), "native controls rendered in {html}");
    assert!(html.contains("Restart"), "missing restart in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn next_stays_locked_until_ninety_five_percent() {
    let mut harness = setup_view_harness(
        ViewKind::Lesson,
        lesson(ContentKind::Video, "https://cdn.example.com/conduct.mp4"),
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("disabled"), "next should be disabled in {html}");
    assert!(html.contains("Watch at least 95%"), "missing gate hint in {html}");

    let tracker = harness.tracker();
    tracker.0.set_duration(600.0);
    tracker.0.set_position(570.0);
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("09:30"), "missing elapsed in {html}");
    assert!(html.contains("00:30 left"), "missing remaining in {html}");
    assert!(html.contains("You can continue."), "missing unlocked status in {html}");
    assert!(tracker.0.can_advance());
}

#[tokio::test(flavor = "current_thread")]
async fn youtube_lesson_embeds_without_controls() {
    let mut harness = setup_view_harness(
        ViewKind::Lesson,
        lesson(ContentKind::Video, "https://www.youtube.com/watch?v=abc123XYZ"),
    );
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("https://www.youtube.com/embed/abc123XYZ?controls=0&amp;disablekb=1")
            || html.contains("https://www.youtube.com/embed/abc123XYZ?controls=0&disablekb=1"),
        "missing embed url in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn pdf_lesson_is_unlocked_and_hides_toolbar() {
    let mut harness = setup_view_harness(
        ViewKind::Lesson,
        lesson(ContentKind::Pdf, "https://cdn.example.com/policy.pdf"),
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("#toolbar=0"), "missing viewer flags in {html}");
    assert!(html.contains("Review the material"), "missing status in {html}");
    assert!(!html.contains("disabled"), "next should be enabled in {html}");
    assert!(harness.tracker().0.can_advance());
}

#[tokio::test(flavor = "current_thread")]
async fn text_lesson_renders_sanitized_markdown() {
    let mut harness = setup_view_harness(
        ViewKind::Lesson,
        lesson(ContentKind::Text, "# Gifts policy\n\n<script>alert(1)</script>Declare gifts."),
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("<h1>Gifts policy</h1>"), "missing heading in {html}");
    assert!(!html.contains("<script"), "script leaked into {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn scorm_lesson_waits_for_api_before_loading_package() {
    let mut harness = setup_view_harness(
        ViewKind::Lesson,
        lesson(ContentKind::Scorm, "https://cdn.example.com/pkg/index.html"),
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Preparing course package"), "missing placeholder in {html}");
    assert!(html.contains("Complete the course package"), "missing gate hint in {html}");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn unmounting_lesson_view_stops_heartbeat() {
    let mut harness = setup_view_harness(
        ViewKind::Lesson,
        lesson(ContentKind::Video, "https://cdn.example.com/conduct.mp4"),
    );
    harness.rebuild();
    sleep(Duration::from_secs(31)).await;
    assert_eq!(harness.transport.attempts(), 1, "heartbeat runs while mounted");

    let ViewHarness { dom, transport, .. } = harness;
    drop(dom);
    sleep(Duration::from_secs(90)).await;
    assert_eq!(transport.attempts(), 1, "report after unmount");
}

#[tokio::test(flavor = "current_thread")]
async fn scorm_api_is_withdrawn_when_lesson_unmounts() {
    let mut harness = setup_view_harness(
        ViewKind::Lesson,
        lesson(ContentKind::Scorm, "https://cdn.example.com/pkg/index.html"),
    );
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;

    assert!(harness.services.scorm_registry().is_mounted());
    let html = harness.render();
    assert!(html.contains("lesson-scorm"), "package frame not rendered in {html}");
    assert!(!html.contains("Preparing course package"), "placeholder left in {html}");

    let ViewHarness { dom, services, .. } = harness;
    drop(dom);
    assert!(!services.scorm_registry().is_mounted());
}

#[tokio::test(flavor = "current_thread")]
async fn complete_view_names_the_lesson() {
    let mut harness = setup_view_harness(
        ViewKind::Complete,
        lesson(ContentKind::Text, "Done."),
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Lesson complete"), "missing heading in {html}");
    assert!(html.contains("Workplace Conduct"), "missing title in {html}");
    assert_eq!(harness.transport.attempts(), 0);
    assert!(!harness.services.scorm_registry().is_mounted());
}
