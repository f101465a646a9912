use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::table::{strip_ansi, visible_width};
use ansi_term::Colour;

const OP_MAX: usize = 60;

/// Colour for each audited operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "clock_in" => Colour::Green,
        "clock_out" => Colour::Cyan,
        "cancel" => Colour::Red,
        "sync_delivered" => Colour::Blue,
        "sync_failed" | "persist_failed" | "snapshot_parse_failed" | "snapshot_read_failed" => {
            Colour::RGB(255, 153, 51)
        }
        "sync_skipped" | "sync_detached" | "stale_reference" | "snapshot_entry_dropped" => {
            Colour::Yellow
        }
        "migration_applied" => Colour::Purple,
        other if other.starts_with("spreadsheet_") || other == "theme" => Colour::RGB(102, 178, 255),
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);
        let op_w = entries
            .iter()
            .map(|e| op_target(&e.operation, &e.target).len())
            .max()
            .unwrap_or(10)
            .min(OP_MAX);

        println!("📜 Internal log:\n");

        for e in entries {
            let color = color_for_operation(&e.operation);
            let visible = op_target(&e.operation, &e.target);

            let truncated = if visible.chars().count() > OP_MAX {
                let mut s = visible.chars().take(OP_MAX - 3).collect::<String>();
                s.push_str("...");
                s
            } else {
                visible
            };

            // only the operation word is coloured
            let painted = match truncated.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(truncated.as_str()).to_string(),
            };
            let padding = " ".repeat(op_w.saturating_sub(visible_width(&painted)));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                painted,
                padding,
                strip_ansi(&e.message),
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

fn op_target(operation: &str, target: &str) -> String {
    if target.is_empty() {
        operation.to_string()
    } else {
        format!("{operation} ({target})")
    }
}
