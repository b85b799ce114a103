use std::path::Path;

use anyhow::{Result, bail};
use chrono::Utc;

use blueline_core::session::Session;

use crate::search_cmd::{SearchBy, build_query, notify};

/// Export a plan (and optionally a fresh analysis) as JSON.
///
/// Writes into `output_dir`, or prints the document to stdout when no
/// directory is given.
pub async fn run_export(
    session: &mut Session,
    term: &str,
    by: Option<SearchBy>,
    analyze: bool,
    output_dir: Option<&Path>,
) -> Result<()> {
    session
        .search(build_query(term, by))
        .await
        .map_err(notify)?;
    if session.current_plan().is_none() {
        bail!("no plan found for {:?}; nothing to export", term.trim());
    }

    if analyze {
        session.analyze().await.map_err(notify)?;
    }

    let doc = session.export(Utc::now())?;

    match output_dir {
        Some(dir) => {
            let path = doc.write_to_dir(dir)?;
            println!("Exported {} to {}", doc.plan_data.plan_number, path.display());
        }
        None => println!("{}", doc.to_json_pretty()?),
    }

    Ok(())
}
