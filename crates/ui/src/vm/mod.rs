mod markdown_vm;
mod player_vm;

pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use player_vm::PlayerVm;
