use anyhow::{Context, Result};

use super::{build_service, ensure_analyzable, load_settings, resolve_language};
use crate::cli::AnalysisArgs;
use crate::events::DocumentSnapshot;
use crate::io::{self, output::create_writer};

pub async fn analyze_file(args: AnalysisArgs) -> Result<()> {
    let config = load_settings(&args)?;
    let language = resolve_language(&args)?;
    ensure_analyzable(&config, &language)?;

    let text = io::read_source(&args.path)?;
    let document = DocumentSnapshot::new(args.path.display().to_string(), language, text);

    let service = build_service(config, &args)?;
    let report = service
        .analyze_now(&document)
        .await
        .context("No analysis available for this document")?;

    let mut writer = create_writer(args.format.into(), std::io::stdout());
    writer.write_report(&document.key, &report)?;
    Ok(())
}
