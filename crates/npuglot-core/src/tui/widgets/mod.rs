//! TUI widgets.

mod confirm;
mod cpu;
mod flows;
mod header;
mod npu;

pub use confirm::{render_overclock_confirm, render_quit_confirm};
pub use cpu::{cpu_height, render_cpu};
pub use flows::render_flows;
pub use header::render_header;
pub use npu::{NPU_HEIGHT, render_npu};
