pub mod pet_serializer;

pub use pet_serializer::{PetSend, PetSerializer};
