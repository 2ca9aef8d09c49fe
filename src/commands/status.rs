use std::collections::BTreeMap;
use std::path::Path;

use projspec_capture::config::CaptureConfig;
use projspec_capture::error::{CaptureError, Result};
use projspec_capture::session::CaptureContext;
use projspec_capture::store::{Phase, SessionStore};

use crate::commands::project_root;

pub fn run(root_hint: Option<&Path>) -> Result<()> {
    run_status_in_dir(&project_root(root_hint))
}

fn run_status_in_dir(root: &Path) -> Result<()> {
    let config = CaptureConfig {
        enabled: true,
        ..CaptureConfig::load(root)
    };
    let ctx = CaptureContext::discover(root, config).ok_or(CaptureError::NoSession)?;
    let store = ctx.store();

    println!("Capture Status");
    println!("──────────────");
    println!("Root:     {}", root.display());
    println!("Session:  {}", ctx.session_id());
    println!("Dir:      {}", ctx.session_dir().display());

    if let Ok(meta) = store.read_meta() {
        println!(
            "Started:  {} ({})",
            meta.started_at.format("%Y-%m-%dT%H:%M:%SZ"),
            meta.source
        );
    }

    println!();

    let counts = get_event_counts(&store)?;
    println!(
        "Events:   {} pre, {} post ({} correlated, {} missed)",
        counts.pre, counts.post, counts.correlated, counts.missed
    );

    let corrections = get_correction_counts(&store)?;
    if corrections.is_empty() {
        println!("Corrections: none");
    } else {
        println!("Corrections:");
        for (label, n) in &corrections {
            println!("  {:<20} {}", label, n);
        }
    }

    Ok(())
}

#[derive(Debug, Default, PartialEq)]
struct EventCounts {
    pre: usize,
    post: usize,
    correlated: usize,
    missed: usize,
}

fn get_event_counts(store: &SessionStore) -> Result<EventCounts> {
    let mut counts = EventCounts::default();
    for event in store.read_tool_events()? {
        match event.phase {
            Phase::Pre => counts.pre += 1,
            Phase::Post if event.is_correlated() => {
                counts.post += 1;
                counts.correlated += 1;
            }
            Phase::Post => {
                counts.post += 1;
                counts.missed += 1;
            }
        }
    }
    Ok(counts)
}

fn get_correction_counts(store: &SessionStore) -> Result<BTreeMap<String, usize>> {
    let mut counts = BTreeMap::new();
    for record in store.read_corrections()? {
        *counts.entry(record.kind.to_string()).or_insert(0) += 1;
    }
    Ok(counts)
}
