use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::context::AppContext;
use crate::views::{CompleteView, LessonView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", LessonView)] Lesson {},
        #[route("/complete", CompleteView)] Complete {},
}

#[component]
fn Layout() -> Element {
    let lesson = use_context::<AppContext>().lesson();
    rsx! {
        div { class: "app",
            header { class: "lesson-header",
                p { class: "lesson-header__course", "{lesson.reference.course_id}" }
                h1 { "{lesson.title}" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
