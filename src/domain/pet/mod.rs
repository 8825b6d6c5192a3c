pub mod model;
pub mod repository;

pub use model::{Gender, NewPet, Pet, PetChanges};
pub use repository::PetRepository;
