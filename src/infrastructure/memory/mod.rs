pub mod pet_repository;
