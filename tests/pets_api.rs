use std::sync::Arc;

use actix_web::{dev::{Service, ServiceResponse}, http::StatusCode, test, web, App, Error};
use actix_http::Request;
use chrono::NaiveDate;
use serde_json::{json, Value};

use pet_api::api::state::AppState;
use pet_api::domain::pet::{Gender, NewPet, Pet, PetRepository};
use pet_api::infrastructure::InMemoryPetRepository;
use pet_api::routes::mounted_pet_routes;

const PETS_URL: &str = "/api/pets/";

fn detail_url(pet_id: impl std::fmt::Display) -> String {
    format!("{}{}/", PETS_URL, pet_id)
}

fn sample_pet() -> NewPet {
    NewPet::new("Rex", "dog", Gender::Male, NaiveDate::from_ymd_opt(2019, 5, 17).unwrap())
}

async fn setup(pets: Vec<NewPet>) -> (
    Arc<InMemoryPetRepository>,
    Vec<Pet>,
    impl Service<Request, Response = ServiceResponse, Error = Error>,
) {
    let repo = Arc::new(InMemoryPetRepository::new());
    let mut stored = Vec::new();
    for pet in pets {
        stored.push(repo.insert_pet(pet).await.unwrap());
    }

    let state = AppState::new(repo.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(mounted_pet_routes("/api/pets"))
    ).await;

    (repo, stored, app)
}

#[actix_web::test]
async fn test_listing_pets() {
    let (_, _, app) = setup(vec![sample_pet()]).await;

    let req = test::TestRequest::get().uri(PETS_URL).to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_listing_is_ordered_and_complete() {
    let second = NewPet::new("Mia", "cat", Gender::Female, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
    let (_, _, app) = setup(vec![sample_pet(), second]).await;

    let req = test::TestRequest::get().uri(PETS_URL).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!([
        { "id": 1, "name": "Rex", "species": "dog", "gender": "m", "birthday": "2019-05-17" },
        { "id": 2, "name": "Mia", "species": "cat", "gender": "w", "birthday": "2020-01-02" }
    ]));
}

#[actix_web::test]
async fn test_listing_empty_collection() {
    let (_, _, app) = setup(vec![]).await;

    let req = test::TestRequest::get().uri(PETS_URL).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn test_retrieve_pet() {
    let (_, stored, app) = setup(vec![sample_pet()]).await;

    let req = test::TestRequest::get().uri(&detail_url(stored[0].id)).to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["id"], stored[0].id);
    assert_eq!(body["name"], "Rex");
}

#[actix_web::test]
async fn test_retrieve_unknown_pet_is_not_found() {
    let (_, _, app) = setup(vec![sample_pet()]).await;

    for url in [detail_url(99), detail_url("rex")] {
        let req = test::TestRequest::get().uri(&url).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_web::test]
async fn test_partial_update_pets() {
    let (repo, stored, app) = setup(vec![sample_pet()]).await;
    let pet = &stored[0];

    let payload = json!({ "name": "Fox", "gender": "w" });
    let req = test::TestRequest::patch().uri(&detail_url(pet.id)).set_json(&payload).to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "Fox");
    assert_eq!(body["gender"], "w");
    assert_eq!(body["species"], "dog");
    assert_eq!(body["birthday"], "2019-05-17");

    let refreshed = repo.get_pet_by_id(pet.id).await.unwrap().unwrap();
    assert_eq!(refreshed.name, "Fox");
    assert_eq!(refreshed.gender, Gender::Female);
    assert_eq!(refreshed.species, pet.species);
    assert_eq!(refreshed.birthday, pet.birthday);
}

#[actix_web::test]
async fn test_partial_update_is_visible_on_refetch() {
    let (_, stored, app) = setup(vec![sample_pet()]).await;
    let url = detail_url(stored[0].id);

    let req = test::TestRequest::patch().uri(&url).set_json(json!({ "species": "wolf" })).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&url).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["species"], "wolf");
    assert_eq!(body["name"], "Rex");
}

#[actix_web::test]
async fn test_invalid_gender_is_rejected_and_record_unchanged() {
    let (repo, stored, app) = setup(vec![sample_pet()]).await;
    let pet = &stored[0];

    let payload = json!({ "name": "Fox", "gender": "x" });
    let req = test::TestRequest::patch().uri(&detail_url(pet.id)).set_json(&payload).to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["gender"][0], "\"x\" is not a valid choice.");

    assert_eq!(repo.get_pet_by_id(pet.id).await.unwrap().as_ref(), Some(pet));
}

#[actix_web::test]
async fn test_malformed_birthday_is_rejected() {
    let (_, stored, app) = setup(vec![sample_pet()]).await;

    let req = test::TestRequest::patch()
        .uri(&detail_url(stored[0].id))
        .set_json(json!({ "birthday": "17.05.2019" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_id_in_payload_is_ignored() {
    let (repo, stored, app) = setup(vec![sample_pet()]).await;
    let pet = &stored[0];

    let req = test::TestRequest::patch()
        .uri(&detail_url(pet.id))
        .set_json(json!({ "id": 42, "name": "Fox" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], pet.id);
    assert!(repo.get_pet_by_id(42).await.unwrap().is_none());
    assert_eq!(repo.get_pet_by_id(pet.id).await.unwrap().unwrap().name, "Fox");
}

#[actix_web::test]
async fn test_partial_update_unknown_pet_is_not_found() {
    let (_, _, app) = setup(vec![sample_pet()]).await;

    let req = test::TestRequest::patch().uri(&detail_url(5)).set_json(json!({ "name": "Fox" })).to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let (_, stored, app) = setup(vec![sample_pet()]).await;

    let req = test::TestRequest::patch()
        .uri(&detail_url(stored[0].id))
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_non_object_payload_is_bad_request() {
    let (_, stored, app) = setup(vec![sample_pet()]).await;

    let req = test::TestRequest::patch().uri(&detail_url(stored[0].id)).set_json(json!([1, 2])).to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["non_field_errors"][0], "Invalid data. Expected a dictionary, but got list.");
}

#[actix_web::test]
async fn test_full_update_requires_birthday() {
    let (_, stored, app) = setup(vec![sample_pet()]).await;
    let url = detail_url(stored[0].id);

    let req = test::TestRequest::put().uri(&url).set_json(json!({ "name": "Fox" })).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["birthday"][0], "This field is required.");

    let payload = json!({ "name": "Fox", "birthday": "2018-03-04" });
    let req = test::TestRequest::put().uri(&url).set_json(&payload).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "Fox");
    assert_eq!(body["birthday"], "2018-03-04");
    assert_eq!(body["species"], "dog");
}

#[actix_web::test]
async fn test_create_and_delete_are_not_exposed() {
    let (_, stored, app) = setup(vec![sample_pet()]).await;

    let req = test::TestRequest::post().uri(PETS_URL).set_json(json!({ "name": "New" })).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::METHOD_NOT_ALLOWED);

    let req = test::TestRequest::delete().uri(&detail_url(stored[0].id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::METHOD_NOT_ALLOWED);
}
