mod attempt_vm;
mod quiz_form_vm;
mod time_fmt;

pub use attempt_vm::{AttemptVm, start_attempt};
pub use quiz_form_vm::QuizFormVm;
pub use time_fmt::format_timer;
