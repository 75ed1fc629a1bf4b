//! Display utilities for the CLI

use colored::*;
use firewall_types::FirewallError;

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!(" {}", title.bright_white().bold());
    println!("{}", "━".repeat(60).bright_black());
}

/// Print a success message
pub fn success(message: &str) {
    println!("  {} {}", "✓".bright_green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    println!("  {} {}", "✗".bright_red(), message.bright_red());
}

/// Print an info message
pub fn info(message: &str) {
    println!("  {} {}", "→".bright_blue(), message);
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("      {}: {}", key, value.bright_cyan());
}

/// Print an engine denial with its firewall abort code when it has one,
/// or its stable error-code string otherwise.
pub fn denial(err: &FirewallError) {
    match err.abort_code() {
        Some(code) => error(&format!("[abort code {code}] {err}")),
        None => error(&format!("[{}] {}", err.error_code(), err)),
    }
}
