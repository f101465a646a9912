/// ANSI color helper utilities for roster listings.
use crate::models::shift_entry::ShiftState;

pub const RESET: &str = "\x1b[0m";
pub const GREY: &str = "\x1b[90m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Active shifts in green, shifts waiting for the ledger in yellow.
pub fn color_for_state(state: ShiftState) -> &'static str {
    match state {
        ShiftState::Active => GREEN,
        ShiftState::PendingSync => YELLOW,
    }
}

/// Grey out placeholders such as `--:--`.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--:--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

pub fn colorize_state(state: ShiftState) -> String {
    format!("{}{}{}", color_for_state(state), state.label(), RESET)
}
