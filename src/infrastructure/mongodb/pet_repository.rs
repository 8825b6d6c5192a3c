use async_trait::async_trait;
use futures::StreamExt;
use mongodb::bson::{self, doc, Document};
use mongodb::options::ReturnDocument;

use crate::infrastructure::database::mongo_context::{MongoContext, COUNTERS_COLLECTION, PETS_COLLECTION};
use crate::domain::pet::repository::PetRepository;
use crate::domain::pet::model::{NewPet, Pet, PetChanges};
use crate::utils::errors::ApiError;

pub struct MongoPetRepository {
    pets: mongodb::Collection<Pet>,
    counters: mongodb::Collection<Document>,
}

impl MongoPetRepository {
    pub fn new(context: &MongoContext) -> Self {
        Self {
            pets: context.collection(PETS_COLLECTION),
            counters: context.collection(COUNTERS_COLLECTION),
        }
    }

    async fn next_id(&self) -> Result<i64, ApiError> {
        let counter = self.counters
            .find_one_and_update(
                doc! { "_id": PETS_COLLECTION },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| ApiError::InternalServerError("Pet id counter missing".to_string()))?;

        counter
            .get_i64("seq")
            .map_err(|e| ApiError::InternalServerError(format!("Pet id counter malformed: {}", e)))
    }
}

#[async_trait]
impl PetRepository for MongoPetRepository {

    async fn get_all_pets(&self) -> Result<Vec<Pet>, ApiError> {
        let mut cursor = self.pets.find(doc! {}).sort(doc! { "_id": 1 }).await?;
        let mut pets = Vec::new();

        while let Some(doc) = cursor.next().await {
            match doc {
                Ok(pet) => pets.push(pet),
                Err(e) => return Err(ApiError::MongoError(e)),
            }
        }
        Ok(pets)
    }

    async fn get_pet_by_id(&self, id: i64) -> Result<Option<Pet>, ApiError> {
        match self.pets.find_one(doc! { "_id": id }).await {
            Ok(pet) => Ok(pet),
            Err(e) => Err(ApiError::MongoError(e))
        }
    }

    async fn update_pet(&self, id: i64, changes: PetChanges) -> Result<Option<Pet>, ApiError> {
        if changes.is_empty() {
            return self.get_pet_by_id(id).await;
        }

        let set = bson::to_document(&changes)?;
        let updated = self.pets
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }

    async fn insert_pet(&self, pet: NewPet) -> Result<Pet, ApiError> {
        let pet = pet.with_id(self.next_id().await?);
        self.pets.insert_one(&pet).await?;
        Ok(pet)
    }
}
