pub mod banner;
pub mod markdown;
pub mod web;

/// Prints the welcome banner with the UI address.
/// Call once at startup (e.g. in main after tracing init).
pub fn init_ui(url: &str) {
    banner::print_welcome(url);
}
