#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use brand_console::{
    api::BrandApi,
    errors::ServiceError,
    models::{Brand, BrandId, ChainId, Company, CreateBrandRequest, UpdateBrandRequest},
    notifier::MemoryNotifier,
};
use tokio::sync::oneshot;

pub fn brand(id: BrandId, name: &str, chain_id: ChainId, chain_name: &str) -> Brand {
    Brand {
        brand_id: id,
        brand_name: name.to_string(),
        chain_id,
        chain_name: chain_name.to_string(),
        is_active: true,
        created_at: None,
        updated_at: None,
    }
}

pub fn company(id: ChainId, name: &str) -> Company {
    Company {
        chain_id: id,
        chain_name: name.to_string(),
        is_active: Some(true),
    }
}

/// Acme (1) owns Alpha, Globex (2) owns Beta.
pub fn seeded_api() -> Arc<FakeBrandApi> {
    Arc::new(FakeBrandApi::new(
        vec![brand(1, "Alpha", 1, "Acme"), brand(2, "Beta", 2, "Globex")],
        vec![company(1, "Acme"), company(2, "Globex")],
    ))
}

pub fn notifier() -> Arc<MemoryNotifier> {
    Arc::new(MemoryNotifier::new())
}

/// In-memory [`BrandApi`] with scriptable failures and gates that hold a
/// response until the test releases it.
#[derive(Default)]
pub struct FakeBrandApi {
    brands: Mutex<Vec<Brand>>,
    companies: Mutex<Vec<Company>>,
    next_id: Mutex<BrandId>,
    fail_lists: AtomicBool,
    fail_companies: AtomicBool,
    list_gates: Mutex<HashMap<Option<ChainId>, oneshot::Receiver<()>>>,
    delete_gates: Mutex<HashMap<BrandId, oneshot::Receiver<()>>>,
    create_gate: Mutex<Option<oneshot::Receiver<()>>>,
    next_failure: Mutex<Option<ServiceError>>,
    list_calls: Mutex<Vec<Option<ChainId>>>,
    created: Mutex<Vec<CreateBrandRequest>>,
    updated: Mutex<Vec<(BrandId, UpdateBrandRequest)>>,
    deleted: Mutex<Vec<BrandId>>,
}

impl FakeBrandApi {
    pub fn new(brands: Vec<Brand>, companies: Vec<Company>) -> Self {
        let next_id = brands.iter().map(|b| b.brand_id).max().unwrap_or(0) + 1;
        Self {
            brands: Mutex::new(brands),
            companies: Mutex::new(companies),
            next_id: Mutex::new(next_id),
            ..Self::default()
        }
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn fail_companies(&self, fail: bool) {
        self.fail_companies.store(fail, Ordering::SeqCst);
    }

    /// The next create, update, get or delete returns `err`.
    pub fn fail_next(&self, err: ServiceError) {
        *self.next_failure.lock().unwrap() = Some(err);
    }

    /// Holds the next list request for `chain_id` until the sender fires.
    pub fn hold_list(&self, chain_id: Option<ChainId>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.list_gates.lock().unwrap().insert(chain_id, rx);
        tx
    }

    pub fn hold_delete(&self, brand_id: BrandId) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.delete_gates.lock().unwrap().insert(brand_id, rx);
        tx
    }

    pub fn hold_create(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.create_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn list_calls(&self) -> Vec<Option<ChainId>> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<CreateBrandRequest> {
        self.created.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<(BrandId, UpdateBrandRequest)> {
        self.updated.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<BrandId> {
        self.deleted.lock().unwrap().clone()
    }

    fn take_failure(&self) -> Result<(), ServiceError> {
        match self.next_failure.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn chain_name(&self, chain_id: ChainId) -> String {
        self.companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.chain_id == chain_id)
            .map(|c| c.chain_name.clone())
            .unwrap_or_default()
    }

    fn not_found() -> ServiceError {
        ServiceError::NotFound {
            message: Some("Brand not found".to_string()),
        }
    }
}

async fn pass(gate: Option<oneshot::Receiver<()>>) {
    if let Some(gate) = gate {
        let _ = gate.await;
    }
}

#[async_trait]
impl BrandApi for FakeBrandApi {
    async fn list_brands(&self, chain_id: Option<ChainId>) -> Result<Vec<Brand>, ServiceError> {
        self.list_calls.lock().unwrap().push(chain_id);
        let gate = self.list_gates.lock().unwrap().remove(&chain_id);
        pass(gate).await;

        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(ServiceError::ServerRejected {
                status: 500,
                message: None,
            });
        }
        Ok(self
            .brands
            .lock()
            .unwrap()
            .iter()
            .filter(|b| chain_id.map_or(true, |id| b.chain_id == id))
            .cloned()
            .collect())
    }

    async fn get_brand(&self, brand_id: BrandId) -> Result<Brand, ServiceError> {
        self.take_failure()?;
        self.brands
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.brand_id == brand_id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_brand(&self, request: &CreateBrandRequest) -> Result<Brand, ServiceError> {
        let gate = self.create_gate.lock().unwrap().take();
        pass(gate).await;
        self.take_failure()?;

        self.created.lock().unwrap().push(request.clone());
        let brand_id = {
            let mut next_id = self.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;
            id
        };
        let created = brand(
            brand_id,
            &request.brand_name,
            request.chain_id,
            &self.chain_name(request.chain_id),
        );
        self.brands.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_brand(
        &self,
        brand_id: BrandId,
        request: &UpdateBrandRequest,
    ) -> Result<Brand, ServiceError> {
        self.take_failure()?;
        self.updated.lock().unwrap().push((brand_id, request.clone()));

        let chain_name = self.chain_name(request.chain_id);
        let mut brands = self.brands.lock().unwrap();
        let existing = brands
            .iter_mut()
            .find(|b| b.brand_id == brand_id)
            .ok_or_else(Self::not_found)?;
        existing.brand_name = request.brand_name.clone();
        existing.chain_id = request.chain_id;
        existing.chain_name = chain_name;
        existing.is_active = request.is_active;
        Ok(existing.clone())
    }

    async fn delete_brand(&self, brand_id: BrandId) -> Result<(), ServiceError> {
        let gate = self.delete_gates.lock().unwrap().remove(&brand_id);
        pass(gate).await;
        self.take_failure()?;

        let mut brands = self.brands.lock().unwrap();
        let before = brands.len();
        brands.retain(|b| b.brand_id != brand_id);
        if brands.len() == before {
            return Err(Self::not_found());
        }
        self.deleted.lock().unwrap().push(brand_id);
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, ServiceError> {
        if self.fail_companies.load(Ordering::SeqCst) {
            return Err(ServiceError::NetworkFailure("connection refused".to_string()));
        }
        Ok(self.companies.lock().unwrap().clone())
    }
}
