//! Brand form shared by the create and edit flows.
//!
//! A form is opened against a [`BrandApi`]: create needs the company list,
//! edit needs the company list and the target brand. If any of those loads
//! fails the form is never produced. Submission validates locally first and
//! only calls the API with valid, trimmed values.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::api::BrandApi;
use crate::controller::LOAD_COMPANIES_FAILED;
use crate::display::name_counter;
use crate::errors::ServiceError;
use crate::models::{Brand, BrandId, ChainId, Company, CreateBrandRequest, UpdateBrandRequest};
use crate::notifier::Notifier;
use crate::validation::{BrandFormValues, FormErrors, FormField};

pub const LOAD_BRAND_FAILED: &str = "Failed to load brand details";
pub const CREATED: &str = "Brand created successfully!";
pub const UPDATED: &str = "Brand updated successfully!";
pub const CREATE_FAILED: &str = "Failed to create brand";
pub const UPDATE_FAILED: &str = "Failed to update brand";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Edit { brand_id: BrandId },
}

impl FormMode {
    pub fn submit_label(&self, submitting: bool) -> &'static str {
        match (self, submitting) {
            (FormMode::Create, false) => "Create Brand",
            (FormMode::Create, true) => "Creating…",
            (FormMode::Edit { .. }, false) => "Save Changes",
            (FormMode::Edit { .. }, true) => "Saving…",
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            FormMode::Create => CREATED,
            FormMode::Edit { .. } => UPDATED,
        }
    }

    fn failure_fallback(&self) -> &'static str {
        match self {
            FormMode::Create => CREATE_FAILED,
            FormMode::Edit { .. } => UPDATE_FAILED,
        }
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Local validation failed; no request was sent.
    Invalid(FormErrors),
    /// A submission is already in flight.
    Busy,
    Saved(Brand),
    /// The server or transport rejected the request. Inputs are kept.
    Failed(ServiceError),
}

#[derive(Debug, Clone, Default)]
struct FormState {
    values: BrandFormValues,
    is_active: bool,
    errors: FormErrors,
    submitting: bool,
}

/// Rendering snapshot of a form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandFormView {
    pub mode: FormMode,
    pub brand_name: String,
    pub chain_id: Option<ChainId>,
    pub is_active: bool,
    pub errors: FormErrors,
    pub submitting: bool,
    pub submit_label: &'static str,
    pub name_counter: String,
    pub companies: Vec<Company>,
}

#[derive(Clone)]
pub struct BrandForm {
    mode: FormMode,
    api: Arc<dyn BrandApi>,
    notifier: Arc<dyn Notifier>,
    companies: Arc<Vec<Company>>,
    loaded: Option<Brand>,
    state: Arc<Mutex<FormState>>,
}

impl fmt::Debug for BrandForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrandForm")
            .field("mode", &self.mode)
            .field("companies", &self.companies.len())
            .finish_non_exhaustive()
    }
}

impl BrandForm {
    /// Opens an empty create form.
    #[instrument(skip_all)]
    pub async fn open_create(
        api: Arc<dyn BrandApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ServiceError> {
        let companies = match api.list_companies().await {
            Ok(companies) => companies,
            Err(err) => {
                warn!(error = %err, "create form aborted: company list unavailable");
                notifier.error(LOAD_COMPANIES_FAILED);
                return Err(err);
            }
        };

        Ok(Self {
            mode: FormMode::Create,
            api,
            notifier,
            companies: Arc::new(companies),
            loaded: None,
            state: Arc::new(Mutex::new(FormState {
                is_active: true,
                ..FormState::default()
            })),
        })
    }

    /// Opens an edit form pre-filled from the server. The brand and the
    /// company list are fetched concurrently and both must succeed.
    #[instrument(skip(api, notifier))]
    pub async fn open_edit(
        api: Arc<dyn BrandApi>,
        notifier: Arc<dyn Notifier>,
        brand_id: BrandId,
    ) -> Result<Self, ServiceError> {
        let loaded = tokio::try_join!(api.get_brand(brand_id), api.list_companies());
        let (brand, companies) = match loaded {
            Ok(pair) => pair,
            Err(err) => {
                warn!(brand_id, error = %err, "edit form aborted");
                notifier.error(LOAD_BRAND_FAILED);
                return Err(err);
            }
        };

        let state = FormState {
            values: BrandFormValues::new(brand.brand_name.clone(), Some(brand.chain_id)),
            is_active: brand.is_active,
            errors: FormErrors::new(),
            submitting: false,
        };

        Ok(Self {
            mode: FormMode::Edit { brand_id },
            api,
            notifier,
            companies: Arc::new(companies),
            loaded: Some(brand),
            state: Arc::new(Mutex::new(state)),
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// The brand an edit form was opened with.
    pub fn original(&self) -> Option<&Brand> {
        self.loaded.as_ref()
    }

    pub async fn set_brand_name(&self, brand_name: impl Into<String>) {
        let mut state = self.state.lock().await;
        state.values.brand_name = brand_name.into();
        state.errors.clear(FormField::BrandName);
    }

    pub async fn set_company(&self, chain_id: Option<ChainId>) {
        let mut state = self.state.lock().await;
        state.values.chain_id = chain_id;
        state.errors.clear(FormField::ChainId);
    }

    /// Only sent by the edit flow; create leaves it to the server default.
    pub async fn set_active(&self, is_active: bool) {
        self.state.lock().await.is_active = is_active;
    }

    pub async fn values(&self) -> BrandFormValues {
        self.state.lock().await.values.clone()
    }

    pub async fn errors(&self) -> FormErrors {
        self.state.lock().await.errors.clone()
    }

    pub async fn is_submitting(&self) -> bool {
        self.state.lock().await.submitting
    }

    pub async fn submit_label(&self) -> &'static str {
        let submitting = self.is_submitting().await;
        self.mode.submit_label(submitting)
    }

    pub async fn name_counter(&self) -> String {
        name_counter(&self.state.lock().await.values.brand_name)
    }

    pub async fn view(&self) -> BrandFormView {
        let state = self.state.lock().await;
        BrandFormView {
            mode: self.mode,
            brand_name: state.values.brand_name.clone(),
            chain_id: state.values.chain_id,
            is_active: state.is_active,
            errors: state.errors.clone(),
            submitting: state.submitting,
            submit_label: self.mode.submit_label(state.submitting),
            name_counter: name_counter(&state.values.brand_name),
            companies: self.companies.as_ref().clone(),
        }
    }

    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn submit(&self) -> SubmitOutcome {
        let (brand_name, chain_id, is_active) = {
            let mut state = self.state.lock().await;
            if state.submitting {
                return SubmitOutcome::Busy;
            }

            let errors = state.values.check();
            let chain_id = match state.values.chain_id {
                Some(chain_id) if errors.is_empty() => chain_id,
                _ => {
                    state.errors = errors.clone();
                    return SubmitOutcome::Invalid(errors);
                }
            };

            state.errors = FormErrors::new();
            state.submitting = true;
            (
                state.values.trimmed_name().to_string(),
                chain_id,
                state.is_active,
            )
        };

        let result = match self.mode {
            FormMode::Create => {
                let request = CreateBrandRequest {
                    brand_name,
                    chain_id,
                };
                self.api.create_brand(&request).await
            }
            FormMode::Edit { brand_id } => {
                let request = UpdateBrandRequest {
                    brand_name,
                    chain_id,
                    is_active,
                };
                self.api.update_brand(brand_id, &request).await
            }
        };

        let mut state = self.state.lock().await;
        state.submitting = false;

        match result {
            Ok(brand) => {
                info!(brand_id = brand.brand_id, "brand saved");
                self.notifier.success(self.mode.success_message());
                SubmitOutcome::Saved(brand)
            }
            Err(err) => {
                warn!(error = %err, "brand save failed");
                if let Some(field_errors) = err.field_errors() {
                    state.errors.merge(field_errors);
                }
                self.notifier
                    .error(&err.notification(self.mode.failure_fallback()));
                SubmitOutcome::Failed(err)
            }
        }
    }
}
