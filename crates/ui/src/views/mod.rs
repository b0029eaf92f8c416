mod complete;
mod lesson;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use complete::CompleteView;
pub use lesson::LessonView;
