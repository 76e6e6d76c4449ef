//! List state machine: `Idle -> Loading -> Loaded | Failed`, plus a
//! side-table of rows with a delete in flight.
//!
//! Every fetch is issued with a [`FetchTicket`] carrying a monotonically
//! increasing generation. A response is committed only if its ticket is the
//! most recently issued one; anything older is discarded.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use super::search::search_brands;
use crate::display::shown_count_label;
use crate::errors::ServiceError;
use crate::models::{Brand, BrandId, ChainId, Company};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<Brand>),
    Failed,
}

impl ListPhase {
    pub fn status(&self) -> ListStatus {
        match self {
            ListPhase::Idle => ListStatus::Idle,
            ListPhase::Loading => ListStatus::Loading,
            ListPhase::Loaded(_) => ListStatus::Loaded,
            ListPhase::Failed => ListStatus::Failed,
        }
    }
}

/// Payload-free view of [`ListPhase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Identity of an issued list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FetchGeneration(u64);

impl FetchGeneration {
    fn next(self) -> Self {
        FetchGeneration(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Issued by [`BrandListState::begin_fetch`]; must be handed back with the
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: FetchGeneration,
    chain_id: Option<ChainId>,
}

impl FetchTicket {
    pub fn generation(&self) -> FetchGeneration {
        self.generation
    }

    /// Company filter the request was issued with.
    pub fn chain_id(&self) -> Option<ChainId> {
        self.chain_id
    }
}

/// What happened to a list response.
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded { count: usize },
    Failed(ServiceError),
    /// A newer request was issued before this one resolved.
    Discarded,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandRow {
    /// 1-based position in the filtered list
    pub position: usize,
    pub brand: Brand,
    pub deleting: bool,
}

/// Everything a view needs to render the list screen.
#[derive(Debug, Clone, Serialize)]
pub struct BrandListView {
    pub status: ListStatus,
    pub rows: Vec<BrandRow>,
    pub companies: Vec<Company>,
    pub company_filter: Option<ChainId>,
    pub search: String,
    pub has_active_filters: bool,
    /// `None` until a fetch has settled
    pub shown_label: Option<String>,
}

#[derive(Debug, Default)]
pub struct BrandListState {
    phase: ListPhase,
    latest: FetchGeneration,
    company_filter: Option<ChainId>,
    search: String,
    deleting: BTreeSet<BrandId>,
    companies: Vec<Company>,
}

impl BrandListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &ListPhase {
        &self.phase
    }

    pub fn company_filter(&self) -> Option<ChainId> {
        self.company_filter
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// Enters `Loading` and supersedes every earlier request.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest = self.latest.next();
        self.phase = ListPhase::Loading;
        debug!(generation = self.latest.value(), chain_id = ?self.company_filter, "brand fetch issued");
        FetchTicket {
            generation: self.latest,
            chain_id: self.company_filter,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.latest
    }

    /// Commits a response if `ticket` is still the latest request.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Brand>, ServiceError>,
    ) -> FetchOutcome {
        if !self.is_current(&ticket) {
            debug!(
                generation = ticket.generation.value(),
                latest = self.latest.value(),
                "discarding stale brand list response"
            );
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(brands) => {
                let count = brands.len();
                self.phase = ListPhase::Loaded(brands);
                FetchOutcome::Loaded { count }
            }
            Err(err) => {
                self.phase = ListPhase::Failed;
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Returns `true` when the filter actually changed and a fetch is due.
    pub fn set_company_filter(&mut self, chain_id: Option<ChainId>) -> bool {
        if self.company_filter == chain_id {
            return false;
        }
        self.company_filter = chain_id;
        true
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Clears search and company filter together. Returns `true` when the
    /// company filter was set, i.e. a fetch is due.
    pub fn clear_filters(&mut self) -> bool {
        self.search.clear();
        self.set_company_filter(None)
    }

    pub fn has_active_filters(&self) -> bool {
        self.company_filter.is_some() || !self.search.is_empty()
    }

    pub fn set_companies(&mut self, companies: Vec<Company>) {
        self.companies = companies;
    }

    /// Returns `false` if a delete is already in flight for this row.
    pub fn mark_deleting(&mut self, brand_id: BrandId) -> bool {
        self.deleting.insert(brand_id)
    }

    pub fn clear_deleting(&mut self, brand_id: BrandId) {
        self.deleting.remove(&brand_id);
    }

    pub fn is_deleting(&self, brand_id: BrandId) -> bool {
        self.deleting.contains(&brand_id)
    }

    pub fn loaded_brands(&self) -> &[Brand] {
        match &self.phase {
            ListPhase::Loaded(brands) => brands,
            _ => &[],
        }
    }

    pub fn find_brand(&self, brand_id: BrandId) -> Option<&Brand> {
        self.loaded_brands().iter().find(|b| b.brand_id == brand_id)
    }

    /// Loaded brands narrowed by the current search text.
    pub fn visible_brands(&self) -> Vec<&Brand> {
        search_brands(self.loaded_brands(), &self.search)
    }

    pub fn view(&self) -> BrandListView {
        let rows: Vec<BrandRow> = self
            .visible_brands()
            .into_iter()
            .enumerate()
            .map(|(idx, brand)| BrandRow {
                position: idx + 1,
                brand: brand.clone(),
                deleting: self.is_deleting(brand.brand_id),
            })
            .collect();

        let shown_label = match self.phase {
            ListPhase::Idle | ListPhase::Loading => None,
            ListPhase::Loaded(_) | ListPhase::Failed => Some(shown_count_label(rows.len())),
        };

        BrandListView {
            status: self.phase.status(),
            rows,
            companies: self.companies.clone(),
            company_filter: self.company_filter,
            search: self.search.clone(),
            has_active_filters: self.has_active_filters(),
            shown_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn brand(id: i64, name: &str, chain_id: i64, chain: &str) -> Brand {
        Brand {
            brand_id: id,
            brand_name: name.to_string(),
            chain_id,
            chain_name: chain.to_string(),
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn starts_idle_without_filters() {
        let state = BrandListState::new();
        assert_eq!(state.phase(), &ListPhase::Idle);
        assert!(!state.has_active_filters());
        assert!(state.view().shown_label.is_none());
    }

    #[test]
    fn newer_ticket_wins_regardless_of_arrival_order() {
        let mut state = BrandListState::new();

        state.set_company_filter(Some(1));
        let first = state.begin_fetch();
        state.set_company_filter(Some(2));
        let second = state.begin_fetch();
        assert_eq!(second.chain_id(), Some(2));
        assert!(second.generation() > first.generation());

        let fresh = vec![brand(2, "Beta", 2, "Globex")];
        assert_matches!(
            state.complete_fetch(second, Ok(fresh.clone())),
            FetchOutcome::Loaded { count: 1 }
        );

        let stale = vec![brand(1, "Alpha", 1, "Acme")];
        assert_matches!(state.complete_fetch(first, Ok(stale)), FetchOutcome::Discarded);
        assert_eq!(state.phase(), &ListPhase::Loaded(fresh));
    }

    #[test]
    fn stale_failure_does_not_clobber_loaded_list() {
        let mut state = BrandListState::new();
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        state.complete_fetch(second, Ok(vec![brand(1, "Alpha", 1, "Acme")]));
        let outcome = state.complete_fetch(
            first,
            Err(ServiceError::NetworkFailure("reset".into())),
        );

        assert_matches!(outcome, FetchOutcome::Discarded);
        assert_eq!(state.loaded_brands().len(), 1);
    }

    #[test]
    fn failure_drops_previous_rows() {
        let mut state = BrandListState::new();
        let ticket = state.begin_fetch();
        state.complete_fetch(ticket, Ok(vec![brand(1, "Alpha", 1, "Acme")]));

        let ticket = state.begin_fetch();
        let outcome = state.complete_fetch(ticket, Err(ServiceError::NetworkFailure("down".into())));

        assert_matches!(outcome, FetchOutcome::Failed(ServiceError::NetworkFailure(_)));
        assert_eq!(state.phase(), &ListPhase::Failed);
        assert!(state.view().rows.is_empty());
        assert_eq!(state.view().shown_label.as_deref(), Some("0 brands shown"));
    }

    #[test]
    fn empty_success_is_loaded() {
        let mut state = BrandListState::new();
        let ticket = state.begin_fetch();
        state.complete_fetch(ticket, Ok(vec![]));
        assert_eq!(state.phase(), &ListPhase::Loaded(vec![]));
    }

    #[test]
    fn company_filter_changes_only_when_different() {
        let mut state = BrandListState::new();
        assert!(state.set_company_filter(Some(3)));
        assert!(!state.set_company_filter(Some(3)));
        assert!(state.set_company_filter(None));
    }

    #[test]
    fn clear_filters_resets_both() {
        let mut state = BrandListState::new();
        state.set_search("alp");
        assert!(state.has_active_filters());
        assert!(!state.clear_filters());

        state.set_search("alp");
        state.set_company_filter(Some(2));
        assert!(state.clear_filters());
        assert_eq!(state.search(), "");
        assert_eq!(state.company_filter(), None);
        assert!(!state.has_active_filters());
    }

    #[test]
    fn view_numbers_filtered_rows_and_flags_deleting() {
        let mut state = BrandListState::new();
        let ticket = state.begin_fetch();
        state.complete_fetch(
            ticket,
            Ok(vec![
                brand(1, "Alpha", 1, "Acme"),
                brand(2, "Beta", 2, "Globex"),
                brand(3, "Alpine", 2, "Globex"),
            ]),
        );
        state.set_search("ALP");
        assert!(state.mark_deleting(3));
        assert!(!state.mark_deleting(3));

        let view = state.view();
        let rows: Vec<(usize, i64, bool)> = view
            .rows
            .iter()
            .map(|row| (row.position, row.brand.brand_id, row.deleting))
            .collect();
        assert_eq!(rows, vec![(1, 1, false), (2, 3, true)]);
        assert_eq!(view.shown_label.as_deref(), Some("2 brands shown"));

        state.clear_deleting(3);
        assert!(!state.is_deleting(3));
    }
}
