//! Brand list screen: loads brands (optionally by company), narrows them by
//! search text on the client, and deletes brands after confirmation.
//!
//! The pure state lives in [`BrandListState`]; [`BrandListController`]
//! drives it against a [`BrandApi`] and reports to a [`Notifier`]. Fetches run
//! on spawned tasks so a slow response never blocks newer user input, and
//! only the response to the most recently issued request is committed.

mod search;
mod state;

pub use search::search_brands;
pub use state::{
    BrandListState, BrandListView, BrandRow, FetchGeneration, FetchOutcome, FetchTicket,
    ListPhase, ListStatus,
};

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::api::BrandApi;
use crate::errors::ServiceError;
use crate::models::{BrandId, ChainId};
use crate::notifier::Notifier;

pub const LOAD_BRANDS_FAILED: &str = "Failed to load brands";
pub const LOAD_COMPANIES_FAILED: &str = "Failed to load companies";
pub const DELETE_FAILED: &str = "Failed to delete brand";

/// Asks the operator to confirm a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub fn delete_prompt(brand_name: &str) -> String {
    format!("Delete brand \"{}\"? This cannot be undone.", brand_name)
}

pub fn deleted_message(brand_name: &str) -> String {
    format!("Brand \"{}\" deleted successfully", brand_name)
}

/// A list fetch running in the background.
#[derive(Debug)]
pub struct FetchHandle {
    generation: FetchGeneration,
    task: JoinHandle<FetchOutcome>,
}

impl FetchHandle {
    pub fn generation(&self) -> FetchGeneration {
        self.generation
    }

    /// Waits for the response to be committed or discarded.
    pub async fn wait(self) -> Result<FetchOutcome, ServiceError> {
        Ok(self.task.await?)
    }
}

#[derive(Debug)]
pub enum DeleteOutcome {
    /// Deleted on the server; `refresh` reloads the list.
    Deleted { refresh: FetchHandle },
    /// The operator declined; nothing was sent.
    Cancelled,
    /// A delete for this row is already in flight.
    AlreadyInProgress,
    /// The id is not in the loaded list.
    UnknownBrand,
    /// The server rejected the delete; the row stays.
    Failed(ServiceError),
}

#[derive(Clone)]
pub struct BrandListController {
    api: Arc<dyn BrandApi>,
    notifier: Arc<dyn Notifier>,
    state: Arc<Mutex<BrandListState>>,
}

impl BrandListController {
    pub fn new(api: Arc<dyn BrandApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: Arc::new(Mutex::new(BrandListState::new())),
        }
    }

    /// Starts the first brand fetch and loads the company dropdown.
    ///
    /// A company failure is reported but leaves the list usable with an
    /// empty dropdown.
    pub async fn mount(&self) -> FetchHandle {
        let handle = self.refresh().await;
        self.load_companies().await;
        handle
    }

    #[instrument(skip(self))]
    pub async fn load_companies(&self) {
        match self.api.list_companies().await {
            Ok(companies) => {
                self.state.lock().await.set_companies(companies);
            }
            Err(err) => {
                warn!(error = %err, "company list unavailable");
                self.state.lock().await.set_companies(Vec::new());
                self.notifier.error(LOAD_COMPANIES_FAILED);
            }
        }
    }

    /// Issues a fetch for the current company filter, superseding any fetch
    /// still in flight.
    pub async fn refresh(&self) -> FetchHandle {
        let ticket = self.state.lock().await.begin_fetch();
        self.spawn_fetch(ticket)
    }

    fn spawn_fetch(&self, ticket: FetchTicket) -> FetchHandle {
        let api = Arc::clone(&self.api);
        let notifier = Arc::clone(&self.notifier);
        let state = Arc::clone(&self.state);

        let task = tokio::spawn(async move {
            let result = api.list_brands(ticket.chain_id()).await;
            let outcome = state.lock().await.complete_fetch(ticket, result);
            if let FetchOutcome::Failed(err) = &outcome {
                warn!(error = %err, "brand list fetch failed");
                notifier.error(LOAD_BRANDS_FAILED);
            }
            outcome
        });

        FetchHandle {
            generation: ticket.generation(),
            task,
        }
    }

    /// Returns a handle when the filter changed and a refetch was issued.
    pub async fn set_company_filter(&self, chain_id: Option<ChainId>) -> Option<FetchHandle> {
        let changed = self.state.lock().await.set_company_filter(chain_id);
        if changed {
            Some(self.refresh().await)
        } else {
            None
        }
    }

    /// Search is applied locally; no request is made.
    pub async fn set_search(&self, text: impl Into<String>) {
        self.state.lock().await.set_search(text);
    }

    pub async fn clear_filters(&self) -> Option<FetchHandle> {
        let changed = self.state.lock().await.clear_filters();
        if changed {
            Some(self.refresh().await)
        } else {
            None
        }
    }

    #[instrument(skip(self, confirm))]
    pub async fn delete_brand(&self, brand_id: BrandId, confirm: &dyn Confirm) -> DeleteOutcome {
        let brand_name = {
            let state = self.state.lock().await;
            if state.is_deleting(brand_id) {
                return DeleteOutcome::AlreadyInProgress;
            }
            match state.find_brand(brand_id) {
                Some(brand) => brand.brand_name.clone(),
                None => return DeleteOutcome::UnknownBrand,
            }
        };

        if !confirm.confirm(&delete_prompt(&brand_name)) {
            return DeleteOutcome::Cancelled;
        }

        if !self.state.lock().await.mark_deleting(brand_id) {
            return DeleteOutcome::AlreadyInProgress;
        }

        match self.api.delete_brand(brand_id).await {
            Ok(()) => {
                info!(brand_id, brand_name = %brand_name, "brand deleted");
                // Refetch under the same guard: the deleted row must not be deletable again.
                let ticket = {
                    let mut state = self.state.lock().await;
                    state.clear_deleting(brand_id);
                    state.begin_fetch()
                };
                self.notifier.success(&deleted_message(&brand_name));
                DeleteOutcome::Deleted {
                    refresh: self.spawn_fetch(ticket),
                }
            }
            Err(err) => {
                self.state.lock().await.clear_deleting(brand_id);
                warn!(brand_id, error = %err, "brand delete failed");
                self.notifier.error(&err.notification(DELETE_FAILED));
                DeleteOutcome::Failed(err)
            }
        }
    }

    pub async fn is_deleting(&self, brand_id: BrandId) -> bool {
        self.state.lock().await.is_deleting(brand_id)
    }

    pub async fn snapshot(&self) -> BrandListView {
        self.state.lock().await.view()
    }
}
