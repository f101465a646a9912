//! Operator-facing notifications.
//!
//! Colours follow the persisted dark-mode flag: the dark palette uses the
//! bright ANSI variants so messages stay readable on dark terminals.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

struct Palette {
    info: &'static str,
    ok: &'static str,
    warn: &'static str,
    err: &'static str,
}

const LIGHT: Palette = Palette {
    info: "\x1b[34m",
    ok: "\x1b[32m",
    warn: "\x1b[33m",
    err: "\x1b[31m",
};

const DARK: Palette = Palette {
    info: "\x1b[94m",
    ok: "\x1b[92m",
    warn: "\x1b[93m",
    err: "\x1b[91m",
};

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

static DARK_MODE: AtomicBool = AtomicBool::new(false);

/// Switch the palette used by every subsequent message.
pub fn set_dark_mode(dark: bool) {
    DARK_MODE.store(dark, Ordering::Relaxed);
}

pub fn is_dark_mode() -> bool {
    DARK_MODE.load(Ordering::Relaxed)
}

fn palette() -> &'static Palette {
    if is_dark_mode() { &DARK } else { &LIGHT }
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", palette().info, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", palette().ok, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", palette().warn, BOLD, ICON_WARN, RESET, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", palette().err, BOLD, ICON_ERR, RESET, msg);
}

pub fn header<T: fmt::Display>(msg: T) {
    println!(
        "{}{}====================== {}\n{}",
        palette().info,
        BOLD,
        msg,
        RESET
    );
}
