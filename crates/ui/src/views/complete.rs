use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn CompleteView() -> Element {
    let lesson = use_context::<AppContext>().lesson();
    rsx! {
        section { class: "page page--complete",
            h2 { "Lesson complete" }
            p { "You have finished \"{lesson.title}\"." }
            Link { class: "btn", to: Route::Lesson {}, "Review again" }
        }
    }
}
