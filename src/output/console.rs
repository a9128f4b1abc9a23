//! Console output utilities.

use console::style;

use crate::api::Resource;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Resource Downloader                               ║
║     Community library ebook and audio downloads       ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print the library resource listing.
pub fn print_resource_list(resources: &[Resource]) {
    println!();
    println!("{}", style("Available resources:").bold());
    for resource in resources {
        let author = resource.author.as_deref().unwrap_or("unknown");
        println!(
            "  {:>6}  [{}]  {} — {}",
            style(resource.id).bold(),
            resource.kind.label(),
            resource.title,
            author
        );
    }
    println!();
}
