use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use super::{build_service, ensure_analyzable, load_settings, resolve_language};
use crate::cli::AnalysisArgs;
use crate::events::{ChannelEventSource, DocumentEvent, DocumentSnapshot};
use crate::io::output::create_writer;

/// Poll `args.path` and print a report after every change, until Ctrl-C.
///
/// Changes go through the debounced scheduler, so a burst of saves yields a
/// single report once the file has been quiet for `analysis_delay_ms`.
pub async fn watch_file(args: AnalysisArgs, poll_interval: Duration) -> Result<()> {
    let config = load_settings(&args)?;
    let language = resolve_language(&args)?;
    ensure_analyzable(&config, &language)?;

    let service = build_service(config, &args)?;
    service.set_real_time(true);

    let source = ChannelEventSource::new();
    let subscription = service.subscribe(&source);
    let mut results = service.results();
    let mut writer = create_writer(args.format.into(), std::io::stdout());

    let key = args.path.display().to_string();
    let mut last_text: Option<String> = None;
    let mut ticker = tokio::time::interval(poll_period(poll_interval));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let Some(text) = read_if_changed(&args.path, last_text.as_deref()).await else {
                    continue;
                };
                let document = DocumentSnapshot::new(key.clone(), language.clone(), text.clone());
                let event = if last_text.is_none() {
                    DocumentEvent::Activated(document)
                } else {
                    DocumentEvent::Changed(document)
                };
                debug!(key = %key, "file changed");
                source.emit(event);
                last_text = Some(text);
            }
            received = results.recv() => match received {
                Ok(event) => writer.write_report(&event.document_key, &event.report)?,
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "reports dropped"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    subscription.unsubscribe();
    service.shutdown();
    Ok(())
}

/// Shortest allowed polling period.
const MIN_POLL_PERIOD: Duration = Duration::from_millis(1);

fn poll_period(requested: Duration) -> Duration {
    requested.max(MIN_POLL_PERIOD)
}

async fn read_if_changed(path: &Path, previous: Option<&str>) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) if previous != Some(text.as_str()) => Some(text),
        Ok(_) => None,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}
