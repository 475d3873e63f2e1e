use crate::db::log::{LogRow, read_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

const OP_TARGET_MAX: usize = 60;

static ANSI_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok());

fn strip_ansi(s: &str) -> String {
    match ANSI_RE.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// ANSI colour per operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "import_roster" | "import_schedule" => Colour::Green,
        "attendance" => Colour::Cyan,
        "summary" => Colour::Yellow,
        "summary_failed" => Colour::Red,
        "alerts_scan" => Colour::RGB(255, 153, 51), // orange
        "export" => Colour::Blue,
        "backup" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        other if other.starts_with("refs_") => Colour::Green,
        _ => Colour::White,
    }
}

/// Print the audit log, optionally only operations starting with `filter`.
pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool, filter: Option<&str>) -> AppResult<()> {
        let rows = read_log(&pool.conn, filter)?;

        if rows.is_empty() {
            match filter {
                Some(f) => info(format!("No log lines for operation '{f}*'.")),
                None => info("Internal log is empty."),
            }
            return Ok(());
        }

        let lines: Vec<(LogRow, String, String)> = rows
            .into_iter()
            .map(|r| {
                let date = chrono::DateTime::parse_from_rfc3339(&r.date)
                    .map(|dt| dt.format("%F %T").to_string())
                    .unwrap_or_else(|_| r.date.clone());
                let label = shorten(&if r.target.is_empty() {
                    r.operation.clone()
                } else {
                    format!("{} ({})", r.operation, r.target)
                });
                (r, date, label)
            })
            .collect();

        let id_w = lines.iter().map(|(r, _, _)| r.id.to_string().len()).max().unwrap_or(1);
        let date_w = lines.iter().map(|(_, d, _)| d.len()).max().unwrap_or(10);
        let label_w = lines
            .iter()
            .map(|(_, _, l)| l.chars().count())
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for (row, date, label) in &lines {
            // colour only the operation word; pad on the visible width
            let painted = match label.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color_for_operation(&row.operation).paint(op), rest),
                None => color_for_operation(&row.operation).paint(label.as_str()).to_string(),
            };
            let pad = " ".repeat(label_w.saturating_sub(strip_ansi(&painted).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                row.id, date, painted, pad, row.message
            );
        }

        Ok(())
    }
}

fn shorten(label: &str) -> String {
    if label.chars().count() <= OP_TARGET_MAX {
        return label.to_string();
    }
    let mut s: String = label.chars().take(OP_TARGET_MAX - 3).collect();
    s.push_str("...");
    s
}
