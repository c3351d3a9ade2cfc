// The triage run: fetch bookmarks, filter against the ledger, then for
// each pending bookmark enrich -> describe -> decide -> route -> record.
//
// Strictly sequential: each bookmark is fully handled (including the
// ledger save) before the next begins. An item-level failure is recorded
// via mark_error and the run continues; only a bulk-fetch or ledger-save
// failure aborts the run.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use crate::agent::describe::{build_description, SYSTEM_PROMPT};
use crate::agent::{AgentStatus, Decider};
use crate::enrich::models::EnrichedBookmark;
use crate::enrich::Enricher;
use crate::ledger::{EntryFields, ProcessedLedger};
use crate::routing::Gateway;
use crate::source::models::Bookmark;
use crate::source::BookmarkSource;

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub fetched: usize,
    pub already_processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Outcome of one bookmark, for terminal reporting. The ledger write has
/// already happened by the time this is returned.
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub id: String,
    pub author: String,
    pub success: bool,
    pub message: String,
}

/// Run the triage pipeline over the most recent bookmarks.
pub async fn run(
    source: &dyn BookmarkSource,
    enricher: &Enricher,
    decider: &dyn Decider,
    gateway: &Gateway,
    ledger: &mut ProcessedLedger,
    limit: usize,
) -> Result<(RunSummary, Vec<ItemOutcome>)> {
    // Bulk fetch failure is fatal — there is nothing to process.
    let bookmarks = source
        .fetch_recent(limit)
        .await
        .context("Bulk bookmark fetch failed")?;

    let mut summary = RunSummary {
        fetched: bookmarks.len(),
        ..Default::default()
    };

    let done = ledger.processed_ids();
    let pending: Vec<Bookmark> = bookmarks
        .into_iter()
        .filter(|b| !done.contains(&b.id))
        .collect();
    summary.already_processed = summary.fetched - pending.len();

    if pending.is_empty() {
        return Ok((summary, Vec::new()));
    }

    let pb = ProgressBar::new(pending.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Triage [{bar:30}] {pos}/{len} ({eta})")
            .unwrap(),
    );

    let mut outcomes = Vec::with_capacity(pending.len());
    for bookmark in pending {
        let outcome = process_bookmark(source, enricher, decider, gateway, ledger, bookmark).await;

        // Persist only once the bookmark's outcome is fully determined, so
        // an interrupted run leaves the ledger consistent through the last
        // completed bookmark.
        ledger.save().context("Failed to persist ledger")?;

        if outcome.success {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
        }
        outcomes.push(outcome);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok((summary, outcomes))
}

/// Handle one bookmark end to end and record its outcome in the ledger.
pub async fn process_bookmark(
    source: &dyn BookmarkSource,
    enricher: &Enricher,
    decider: &dyn Decider,
    gateway: &Gateway,
    ledger: &mut ProcessedLedger,
    bookmark: Bookmark,
) -> ItemOutcome {
    let id = bookmark.id.clone();
    let author = bookmark.author.username.clone();

    // Enrichment failure degrades to the bare bookmark — never drop it.
    let enriched = match enricher.enrich(source, bookmark.clone()).await {
        Ok(enriched) => enriched,
        Err(e) => {
            warn!(id = id, error = %e, "Enrichment failed, using minimal form");
            EnrichedBookmark::minimal(bookmark.clone())
        }
    };

    let description = build_description(&enriched);
    let base_fields = EntryFields {
        author: Some(author.clone()),
        bookmark: Some(bookmark),
        ..Default::default()
    };

    let outcome = match decider.decide(SYSTEM_PROMPT, &description).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let message = format!("agent call failed: {e:#}");
            ledger.mark_error(&id, &message, base_fields);
            return ItemOutcome {
                id,
                author,
                success: false,
                message,
            };
        }
    };

    if let AgentStatus::Error(e) = outcome.status {
        let message = format!("agent error: {e}");
        ledger.mark_error(&id, &message, base_fields);
        return ItemOutcome {
            id,
            author,
            success: false,
            message,
        };
    }

    // Policy: honor the first invocation; anything further is logged and
    // ignored. No invocation at all is an item-level error.
    let mut invocations = outcome.invocations.into_iter();
    let Some(invocation) = invocations.next() else {
        let message = "agent emitted no action".to_string();
        ledger.mark_error(&id, &message, base_fields);
        return ItemOutcome {
            id,
            author,
            success: false,
            message,
        };
    };
    for extra in invocations {
        debug!(id = id, action = extra.name, "Ignoring extra invocation");
    }

    let result = gateway.route(&invocation.name, &invocation.input).await;

    let fields = EntryFields {
        destination: gateway.destination_name(&invocation.name).map(String::from),
        action: Some(invocation.name.clone()),
        ..base_fields
    };

    if result.success {
        ledger.mark_processed(&id, fields);
    } else {
        let error = result
            .error
            .clone()
            .unwrap_or_else(|| result.message.clone());
        ledger.mark_error(&id, &error, fields);
    }

    ItemOutcome {
        id,
        author,
        success: result.success,
        message: result.message,
    }
}

/// Reprocess a single already-handled bookmark.
///
/// `target` is either a recency index (0 = most recent entry) or a raw
/// bookmark id. The entry is removed, then the bookmark is run through the
/// normal flow using the cached snapshot — or a best-effort re-read from
/// the source when no snapshot was kept.
pub async fn reprocess(
    source: &dyn BookmarkSource,
    enricher: &Enricher,
    decider: &dyn Decider,
    gateway: &Gateway,
    ledger: &mut ProcessedLedger,
    target: &str,
) -> Result<ItemOutcome> {
    // Bookmark ids are all-numeric too, so an index-looking target that
    // matches no entry falls back to an id lookup.
    let entry = target
        .parse::<usize>()
        .ok()
        .and_then(|index| ledger.entry_by_index(index))
        .or_else(|| ledger.get_entry(target))
        .with_context(|| format!("No ledger entry matching `{target}`"))?;
    let id = entry.id.clone();
    let cached = entry.bookmark.clone();

    let bookmark = match cached {
        Some(bookmark) => bookmark,
        None => source
            .read_bookmark(&id)
            .await?
            .with_context(|| format!("Bookmark {id} has no cached snapshot and the source no longer has it"))?,
    };

    ledger.remove_entry(&id);

    let outcome = process_bookmark(source, enricher, decider, gateway, ledger, bookmark).await;
    ledger.save().context("Failed to persist ledger")?;
    Ok(outcome)
}
