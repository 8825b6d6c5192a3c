use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::pet::model::{NewPet, Pet, PetChanges};
use crate::domain::pet::repository::PetRepository;
use crate::utils::errors::ApiError;

#[derive(Default)]
struct Table {
    rows: BTreeMap<i64, Pet>,
    last_id: i64,
}

/// Process-local pet store with the same id and ordering rules as the
/// MongoDB one. Used by the endpoint tests.
#[derive(Default)]
pub struct InMemoryPetRepository {
    table: Mutex<Table>,
}

impl InMemoryPetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, ApiError> {
        self.table
            .lock()
            .map_err(|_| ApiError::InternalServerError("Pet table lock poisoned".to_string()))
    }
}

#[async_trait]
impl PetRepository for InMemoryPetRepository {
    async fn get_all_pets(&self) -> Result<Vec<Pet>, ApiError> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    async fn get_pet_by_id(&self, id: i64) -> Result<Option<Pet>, ApiError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn update_pet(&self, id: i64, changes: PetChanges) -> Result<Option<Pet>, ApiError> {
        let mut table = self.lock()?;
        Ok(table.rows.get_mut(&id).map(|pet| {
            changes.apply_to(pet);
            pet.clone()
        }))
    }

    async fn insert_pet(&self, pet: NewPet) -> Result<Pet, ApiError> {
        let mut table = self.lock()?;
        table.last_id += 1;
        let pet = pet.with_id(table.last_id);
        table.rows.insert(pet.id, pet.clone());
        Ok(pet)
    }
}
