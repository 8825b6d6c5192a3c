use actix_web::web;

use crate::api::handlers::pet_handlers::{list_pets, partial_update_pet, retrieve_pet, update_pet};

/// Registers the pet resource relative to the enclosing scope.
pub fn pet_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .name("pets-list")
            .route(web::get().to(list_pets))
    );

    cfg.service(
        web::resource("/{id}/")
            .name("pets-detail")
            .route(web::get().to(retrieve_pet))
            .route(web::patch().to(partial_update_pet))
            .route(web::put().to(update_pet))
    );
}

/// Mounts [`pet_routes`] under `mount_path` (empty for the root).
pub fn mounted_pet_routes(mount_path: &str) -> impl FnOnce(&mut web::ServiceConfig) + '_ {
    move |cfg| {
        cfg.service(web::scope(mount_path).configure(pet_routes));
    }
}
