//! Interactive session state: the selected plan, its analysis, and the
//! user's settings.
//!
//! All mutations follow one rule: in-memory state changes only after the
//! service call behind it fully succeeds. A failed search leaves the
//! previous plan and analysis in place; a failed analysis leaves the
//! previous analysis in place.
//!
//! ```text
//! search(query) --validate--> [recent searches saved] --lookup--> plan
//!                                                                  |
//! analyze() --validate plan + credential--> analyzer ----------> analysis
//!                                                                  |
//! export(now) <----------------------------------------------------+
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisResult, PlanAnalyzer};
use crate::error::{ServiceError, SessionError, ValidationError};
use crate::export::ExportDocument;
use crate::lookup::PlanLookup;
use crate::plan::{Bounds, PlanCategory, PlanRecord, classify};
use crate::settings::{RecentSearches, Settings, SettingsError, SettingsStore};

/// Tunables for a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Upper bound on any single lookup or analysis call.
    pub request_timeout: Duration,
}

impl SessionOptions {
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// What to search for.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchQuery {
    Number(String),
    Address(String),
    /// `None` searches the backend's default scope.
    Area(Option<Bounds>),
}

impl SearchQuery {
    /// Guess the query kind from a single free-text box.
    ///
    /// Anything the classifier recognises by marker or leading digit, or
    /// anything containing a `/`, is treated as a plan number. Everything
    /// else (including plain Hebrew words) is an address.
    pub fn infer(term: &str) -> Self {
        let trimmed = term.trim();
        let looks_like_number = trimmed.contains('/')
            || !matches!(
                classify(trimmed),
                PlanCategory::Unclassified | PlanCategory::Offline
            );
        if looks_like_number {
            Self::Number(trimmed.to_owned())
        } else {
            Self::Address(trimmed.to_owned())
        }
    }

    /// The free-text term, for text queries.
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::Number(t) | Self::Address(t) => Some(t),
            Self::Area(_) => None,
        }
    }
}

/// One user's working state over the lookup and analysis backends.
pub struct Session {
    lookup: Arc<dyn PlanLookup>,
    analyzer: Arc<dyn PlanAnalyzer>,
    store: Box<dyn SettingsStore>,
    settings: Settings,
    credential_override: Option<String>,
    options: SessionOptions,
    results: Vec<PlanRecord>,
    current_plan: Option<PlanRecord>,
    current_analysis: Option<AnalysisResult>,
}

impl Session {
    /// Open a session, loading settings from `store`.
    pub fn open(
        lookup: Arc<dyn PlanLookup>,
        analyzer: Arc<dyn PlanAnalyzer>,
        store: Box<dyn SettingsStore>,
        options: SessionOptions,
    ) -> Result<Self, SettingsError> {
        let settings = store.load()?;
        debug!(
            lookup = lookup.name(),
            analyzer = analyzer.name(),
            recent = settings.recent_searches.len(),
            "session opened"
        );
        Ok(Self {
            lookup,
            analyzer,
            store,
            settings,
            credential_override: None,
            options,
            results: Vec::new(),
            current_plan: None,
            current_analysis: None,
        })
    }

    /// Use `credential` for analysis without persisting it. A blank value
    /// clears the override.
    pub fn with_credential_override(mut self, credential: Option<String>) -> Self {
        self.credential_override = credential
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty());
        self
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    pub fn current_plan(&self) -> Option<&PlanRecord> {
        self.current_plan.as_ref()
    }

    pub fn current_analysis(&self) -> Option<&AnalysisResult> {
        self.current_analysis.as_ref()
    }

    /// Results of the last successful search.
    pub fn results(&self) -> &[PlanRecord] {
        &self.results
    }

    pub fn recent_searches(&self) -> &RecentSearches {
        &self.settings.recent_searches
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Effective credential: the override if set, else the stored key.
    pub fn credential(&self) -> Option<&str> {
        self.credential_override
            .as_deref()
            .or_else(|| self.settings.credential())
    }

    // -------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------

    /// Run a search. The first hit becomes the current plan; an empty
    /// result clears it. Either way the current analysis is dropped.
    pub async fn search(&mut self, query: SearchQuery) -> Result<&[PlanRecord], SessionError> {
        if let Some(term) = query.term() {
            if term.trim().is_empty() {
                return Err(ValidationError::EmptySearchTerm.into());
            }
            // History is best-effort; a read-only config dir must not
            // block searching.
            if self.settings.recent_searches.push(term) {
                if let Err(e) = self.store.save(&self.settings) {
                    warn!(error = %e, "failed to save recent searches");
                }
            }
        }

        let timeout = self.options.request_timeout;
        let lookup = Arc::clone(&self.lookup);
        let outcome = match &query {
            SearchQuery::Number(number) => {
                with_timeout(timeout, lookup.find_by_number(number))
                    .await
                    .map(|found| found.into_iter().collect::<Vec<_>>())
            }
            SearchQuery::Address(address) => {
                with_timeout(timeout, lookup.find_by_address(address)).await
            }
            SearchQuery::Area(bounds) => with_timeout(timeout, lookup.find_in_area(*bounds)).await,
        };

        let results = match outcome {
            Ok(results) => results,
            Err(e) => {
                warn!(?query, error = %e, "search failed");
                return Err(e.into());
            }
        };

        info!(?query, hits = results.len(), "search complete");
        self.current_plan = results.first().cloned();
        self.current_analysis = None;
        self.results = results;
        Ok(&self.results)
    }

    /// Make `index` in the last results the current plan. Switching to a
    /// different plan drops the current analysis.
    pub fn select(&mut self, index: usize) -> Option<&PlanRecord> {
        let chosen = self.results.get(index)?.clone();
        if self.current_plan.as_ref() != Some(&chosen) {
            self.current_analysis = None;
        }
        self.current_plan = Some(chosen);
        self.current_plan.as_ref()
    }

    /// Analyze the current plan.
    ///
    /// Fails with a [`ValidationError`] before contacting the analyzer when
    /// there is no current plan or no credential.
    pub async fn analyze(&mut self) -> Result<&AnalysisResult, SessionError> {
        let plan = self
            .current_plan
            .as_ref()
            .ok_or(ValidationError::NoPlanSelected)?;
        let credential = self.credential().ok_or(ValidationError::MissingCredential)?;

        let outcome = with_timeout(
            self.options.request_timeout,
            self.analyzer.analyze(plan, credential),
        )
        .await;

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!(plan_number = %plan.plan_number, error = %e, "analysis failed");
                return Err(e.into());
            }
        };

        info!(
            plan_number = %plan.plan_number,
            risk = %result.risk_level,
            confidence = result.confidence,
            "analysis complete"
        );
        Ok(self.current_analysis.insert(result))
    }

    /// Store (or with `None`/blank, forget) the API key.
    pub fn set_api_key(&mut self, api_key: Option<String>) -> Result<(), SessionError> {
        let mut next = self.settings.clone();
        next.api_key = api_key
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty());
        self.store.save(&next)?;
        self.settings = next;
        info!(configured = self.settings.api_key.is_some(), "API key updated");
        Ok(())
    }

    pub fn clear_recent_searches(&mut self) -> Result<(), SessionError> {
        let mut next = self.settings.clone();
        next.recent_searches.clear();
        self.store.save(&next)?;
        self.settings = next;
        Ok(())
    }

    /// Build the export artifact for the current plan and analysis.
    pub fn export(&self, now: DateTime<Utc>) -> Result<ExportDocument, ValidationError> {
        let plan = self
            .current_plan
            .clone()
            .ok_or(ValidationError::NoPlanSelected)?;
        Ok(ExportDocument::new(plan, self.current_analysis.clone(), now))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("lookup", &self.lookup.name())
            .field("analyzer", &self.analyzer.name())
            .field("current_plan", &self.current_plan.as_ref().map(|p| &p.plan_number))
            .field("has_analysis", &self.current_analysis.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Bound a service call; expiry maps to [`ServiceError::Timeout`].
async fn with_timeout<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, ServiceError>>,
) -> Result<T, ServiceError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_elapsed) => Err(ServiceError::Timeout(limit)),
    }
}
