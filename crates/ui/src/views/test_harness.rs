use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use lms_core::model::{ContentKind, CourseId, Lesson, LessonContent, LessonId, LessonRef};
use lms_core::time::fixed_clock;
use services::PlayerServices;
use transport::InMemoryTransport;

use crate::context::{UiApp, build_app_context};
use crate::player::TrackerHandle;
use crate::views::lesson::LessonTestHandles;
use crate::views::{CompleteView, LessonView};

#[derive(Clone)]
struct TestApp {
    lesson: Lesson,
    player_services: Arc<PlayerServices>,
}

impl UiApp for TestApp {
    fn lesson(&self) -> Lesson {
        self.lesson.clone()
    }

    fn player_services(&self) -> Arc<PlayerServices> {
        Arc::clone(&self.player_services)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Lesson,
    Complete,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    handles: LessonTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| props.handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Lesson => rsx! { LessonView {} },
        ViewKind::Complete => rsx! { CompleteView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub transport: InMemoryTransport,
    pub services: Arc<PlayerServices>,
    pub handles: LessonTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn tracker(&self) -> TrackerHandle {
        self.handles
            .tracker
            .borrow()
            .clone()
            .expect("lesson view mounted")
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn lesson(kind: ContentKind, payload: &str) -> Lesson {
    Lesson {
        reference: LessonRef::new(
            CourseId::new("ethics-101").expect("course id"),
            LessonId::new("lesson-1").expect("lesson id"),
        ),
        title: "Workplace Conduct".to_owned(),
        content: LessonContent::from_parts(kind, payload).expect("lesson content"),
    }
}

pub fn setup_view_harness(view: ViewKind, lesson: Lesson) -> ViewHarness {
    let transport = InMemoryTransport::new();
    let services = Arc::new(PlayerServices::new(
        fixed_clock(),
        Arc::new(transport.clone()),
    ));
    let handles = LessonTestHandles::default();

    let app = Arc::new(TestApp {
        lesson,
        player_services: Arc::clone(&services),
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            handles: handles.clone(),
        },
    );

    ViewHarness {
        dom,
        transport,
        services,
        handles,
    }
}
