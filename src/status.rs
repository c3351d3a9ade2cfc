// System status display — ledger stats and last-run info.

use crate::ledger::ProcessedLedger;

/// Display system status to the terminal.
pub fn show(ledger: &ProcessedLedger) {
    let path = ledger.path();
    if !path.exists() {
        println!("Ledger: not created yet ({})", path.display());
        println!("\nRun `magpie run` to process your first bookmarks.");
        return;
    }

    let file_size = std::fs::metadata(path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Ledger: {} ({})", path.display(), file_size);

    println!(
        "Entries: {} total, {} with errors",
        ledger.len(),
        ledger.error_count()
    );

    match ledger.last_run() {
        Some(at) => println!("Last run: {}", at.to_rfc3339()),
        None => println!("Last run: never"),
    }

    let recent = ledger.recent_entries(5);
    if recent.is_empty() {
        println!("Recent entries: none");
    } else {
        println!("Recent entries:");
        for entry in recent {
            let outcome = match (&entry.error, &entry.action) {
                (Some(e), _) => format!("error: {e}"),
                (None, Some(action)) => action.clone(),
                (None, None) => "processed".to_string(),
            };
            println!(
                "  {} by @{} ({}) — {}",
                entry.id,
                entry.author.as_deref().unwrap_or("unknown"),
                entry.processed_at.format("%Y-%m-%d %H:%M"),
                outcome
            );
        }
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
