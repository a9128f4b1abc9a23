//! Console output and progress rendering.

pub mod console;
pub mod progress;

pub use console::{print_banner, print_error, print_info, print_resource_list, print_success, print_warning};
pub use progress::ConsoleReporter;
