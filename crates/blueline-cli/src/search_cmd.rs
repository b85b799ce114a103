//! `blueline search`, `area`, `analyze` and `recent` commands.

use anyhow::{Result, bail};
use clap::ValueEnum;
use serde::Deserialize;

use blueline_core::SessionError;
use blueline_core::plan::{Bounds, PlanRecord};
use blueline_core::session::{SearchQuery, Session};

use crate::display;

/// How to interpret a search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBy {
    Number,
    Address,
}

/// Build the query for `term`, inferring its kind unless `by` is given.
pub fn build_query(term: &str, by: Option<SearchBy>) -> SearchQuery {
    match by {
        Some(SearchBy::Number) => SearchQuery::Number(term.trim().to_owned()),
        Some(SearchBy::Address) => SearchQuery::Address(term.trim().to_owned()),
        None => SearchQuery::infer(term),
    }
}

/// Turn a session failure into a one-line notification.
pub fn notify(err: SessionError) -> anyhow::Error {
    if err.is_retryable() {
        anyhow::anyhow!("{err} (try again)")
    } else {
        anyhow::Error::new(err)
    }
}

/// Run a search and return the selected plan, if any.
async fn search_and_select<'a>(
    session: &'a mut Session,
    term: &str,
    by: Option<SearchBy>,
) -> Result<Option<&'a PlanRecord>> {
    let query = build_query(term, by);
    let hits = session.search(query).await.map_err(notify)?;
    if hits.len() > 1 {
        println!("{} plans matched; using the first.", hits.len());
        println!();
    }
    Ok(session.current_plan())
}

/// Run the search command.
pub async fn run_search(session: &mut Session, term: &str, by: Option<SearchBy>) -> Result<()> {
    let query = build_query(term, by);
    let hits = session.search(query).await.map_err(notify)?;

    match hits {
        [] => println!("No plans found for {:?}.", term.trim()),
        [plan] => print!("{}", display::render_plan(plan)),
        many => {
            print!("{}", display::render_plan_table(many));
            println!();
            if let Some(plan) = many.first() {
                print!("{}", display::render_plan(plan));
            }
        }
    }
    Ok(())
}

/// Run the area command.
pub async fn run_area(session: &mut Session, bounds: Option<Bounds>) -> Result<()> {
    let hits = session
        .search(SearchQuery::Area(bounds))
        .await
        .map_err(notify)?;
    print!("{}", display::render_plan_table(hits));
    Ok(())
}

/// Run the analyze command: search for `term`, then analyze the first hit.
pub async fn run_analyze(session: &mut Session, term: &str, by: Option<SearchBy>) -> Result<()> {
    let Some(plan) = search_and_select(session, term, by).await? else {
        bail!("no plan found for {:?}; nothing to analyze", term.trim());
    };
    print!("{}", display::render_plan(plan));
    println!();

    let analysis = session.analyze().await.map_err(notify)?;
    print!("{}", display::render_analysis(analysis));
    Ok(())
}

/// Run the recent command.
pub fn run_recent(session: &mut Session, clear: bool) -> Result<()> {
    if clear {
        session.clear_recent_searches().map_err(notify)?;
        println!("Recent searches cleared.");
        return Ok(());
    }

    let recent = session.recent_searches();
    if recent.is_empty() {
        println!("No recent searches.");
    } else {
        for (i, term) in recent.iter().enumerate() {
            println!("{}. {term}", i + 1);
        }
    }
    Ok(())
}
