use crate::domain::constants::HISTORY_FILE;
use crate::domain::models::HistoryEvent;
use log::warn;
use std::path::PathBuf;

fn history_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .ok_or_else(|| anyhow::anyhow!("HOME is not set; cannot locate the history file"))?;
    Ok(PathBuf::from(home).join(HISTORY_FILE))
}

pub fn now_ts() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .to_string()
}

/// Best effort: a history write failure never fails the device operation.
pub fn record(event: &HistoryEvent) {
    let path = match history_path() {
        Ok(p) => p,
        Err(_) => return,
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let line = match serde_json::to_string(event) {
        Ok(l) => format!("{}\n", l),
        Err(_) => return,
    };
    let written = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
    if let Err(e) = written {
        warn!("could not append to {}: {}", path.display(), e);
    }
}

/// Most recent events last. Unparseable lines are skipped.
pub fn load(limit: Option<usize>) -> anyhow::Result<Vec<HistoryEvent>> {
    let path = history_path()?;
    if !path.exists() {
        return Ok(vec![]);
    }
    let events: Vec<HistoryEvent> = std::fs::read_to_string(path)?
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| serde_json::from_str(l).ok())
        .collect();
    let skip = limit.map(|n| events.len().saturating_sub(n)).unwrap_or(0);
    Ok(events.into_iter().skip(skip).collect())
}
