use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::player::{LessonPlayer, TrackerHandle};
use crate::routes::Route;
use crate::vm::PlayerVm;

/// Lets smoke tests reach the tracker a mounted view created.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct LessonTestHandles {
    pub tracker: Rc<RefCell<Option<TrackerHandle>>>,
}

#[component]
pub fn LessonView() -> Element {
    let ctx = use_context::<AppContext>();
    let lesson = ctx.lesson();
    let navigator = use_navigator();

    // One tracker per mount; a remount starts from zero.
    let tracker = use_hook(|| {
        TrackerHandle(ctx.player_services().tracker(
            lesson.reference.clone(),
            &lesson.content,
            ctx.on_lesson_complete(),
        ))
    });

    #[cfg(test)]
    {
        if let Some(handles) = try_use_context::<LessonTestHandles>() {
            handles.tracker.borrow_mut().get_or_insert_with(|| tracker.clone());
        }
    }

    let heartbeat = use_hook(|| {
        Rc::new(RefCell::new(
            tracker.0.start_heartbeat(ctx.player_services().heartbeat()),
        ))
    });
    use_drop(move || {
        if let Some(handle) = heartbeat.borrow_mut().take() {
            handle.stop();
        }
    });

    let mut snapshot = use_signal(|| tracker.0.snapshot());
    use_future({
        let tracker = tracker.clone();
        move || {
            let mut updates = tracker.0.subscribe();
            async move {
                snapshot.set(updates.borrow_and_update().clone());
                while updates.changed().await.is_ok() {
                    let next = updates.borrow_and_update().clone();
                    snapshot.set(next);
                }
            }
        }
    });

    let vm = PlayerVm::from_snapshot(
        &snapshot.read(),
        lesson.content.kind(),
        tracker.0.tracking(),
    );
    let can_advance = vm.can_advance;

    rsx! {
        section { class: "page page--lesson",
            LessonPlayer { content: lesson.content.clone(), tracker: tracker.clone() }
            if vm.show_progress {
                div { class: "lesson-progress",
                    span { id: "lesson-elapsed", class: "lesson-progress__time", "{vm.elapsed}" }
                    progress {
                        class: "lesson-progress__bar",
                        max: "100",
                        value: "{vm.percent_watched}",
                    }
                    span { id: "lesson-remaining", class: "lesson-progress__time", "{vm.remaining}" }
                }
            }
            footer { class: "lesson-footer",
                p { id: "lesson-status", class: "lesson-footer__status", "{vm.status}" }
                button {
                    id: "lesson-next",
                    class: "btn btn-primary",
                    disabled: !can_advance,
                    onclick: move |_| {
                        if can_advance {
                            navigator.push(Route::Complete {});
                        }
                    },
                    "Next"
                }
            }
        }
    }
}
