use async_trait::async_trait;
use crate::{domain::pet::model::{NewPet, Pet, PetChanges}, utils::errors::ApiError};

#[async_trait]
pub trait PetRepository: Send + Sync {
    /// All pets in ascending id order.
    async fn get_all_pets(&self) -> Result<Vec<Pet>, ApiError>;
    async fn get_pet_by_id(&self, id: i64) -> Result<Option<Pet>, ApiError>;
    /// Applies `changes` atomically and returns the updated pet, or `None`
    /// when no pet has that id.
    async fn update_pet(&self, id: i64, changes: PetChanges) -> Result<Option<Pet>, ApiError>;
    /// Stores a new pet under a freshly assigned id.
    async fn insert_pet(&self, pet: NewPet) -> Result<Pet, ApiError>;
}
