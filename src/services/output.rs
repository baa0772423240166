use crate::domain::models::JsonOut;
use colored::Colorize;
use serde::Serialize;

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

/// JSON envelope for a command that ran but did not succeed.
pub fn print_json_failure<T: Serialize>(data: T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&JsonOut { ok: false, data })?
    );
    Ok(())
}

pub fn success(msg: &str) {
    println!("✅ {}", msg.green());
}

/// Headline for a failed step; the individual causes follow on stderr.
pub fn failure(msg: &str) {
    println!("🚫 {}", msg.red().bold());
}

pub fn error(msg: &str) {
    eprintln!("❌ {} {}", "error:".red().bold(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("⚠️  {} {}", "warning:".yellow().bold(), msg);
}

pub fn detail(msg: &str) {
    eprintln!("   ↳ {}", msg.dimmed());
}
