use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::domain::pet::model::{Gender, Pet, PetChanges, NAME_MAX_LENGTH, SPECIES_MAX_LENGTH};
use crate::utils::errors::ValidationErrors;

const NULL_NOT_ALLOWED: &str = "This field may not be null.";
const REQUIRED: &str = "This field is required.";
const NOT_A_STRING: &str = "Not a valid string.";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The wire shape of a pet. Every key is always present.
#[derive(Serialize, Debug, PartialEq)]
pub struct PetSend {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub gender: Gender,
    pub birthday: NaiveDate,
}

impl From<Pet> for PetSend {
    fn from(pet: Pet) -> Self {
        PetSend {
            id: pet.id,
            name: pet.name,
            species: pet.species,
            gender: pet.gender,
            birthday: pet.birthday,
        }
    }
}

pub struct PetSerializer;

impl PetSerializer {
    pub fn to_representation(pet: Pet) -> PetSend {
        PetSend::from(pet)
    }

    pub fn to_representation_many(pets: Vec<Pet>) -> Vec<PetSend> {
        pets.into_iter().map(PetSend::from).collect()
    }

    /// Validates an update payload. With `partial` unset, required fields
    /// must be present. Read-only and unknown keys are dropped.
    pub fn to_internal_value(data: &Value, partial: bool) -> Result<PetChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let object = match data {
            Value::Object(object) => object,
            other => {
                errors.add(
                    ValidationErrors::NON_FIELD,
                    format!("Invalid data. Expected a dictionary, but got {}.", type_name(other)),
                );
                return Err(errors);
            }
        };

        let changes = PetChanges {
            name: object
                .get("name")
                .and_then(|value| collect(&mut errors, "name", char_field(value, NAME_MAX_LENGTH))),
            species: object
                .get("species")
                .and_then(|value| collect(&mut errors, "species", char_field(value, SPECIES_MAX_LENGTH))),
            gender: object
                .get("gender")
                .and_then(|value| collect(&mut errors, "gender", choice_field(value))),
            birthday: match object.get("birthday") {
                Some(value) => collect(&mut errors, "birthday", date_field(value)),
                None if !partial => {
                    errors.add("birthday", REQUIRED);
                    None
                }
                None => None,
            },
        };

        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }
}

fn collect<T>(errors: &mut ValidationErrors, field: &str, result: Result<T, String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

fn char_field(value: &Value, max_length: usize) -> Result<String, String> {
    let text = match value {
        Value::Null => return Err(NULL_NOT_ALLOWED.to_string()),
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return Err(NOT_A_STRING.to_string()),
    };

    if text.chars().count() > max_length {
        return Err(format!("Ensure this field has no more than {} characters.", max_length));
    }
    Ok(text)
}

fn choice_field(value: &Value) -> Result<Gender, String> {
    match value {
        Value::Null => Err(NULL_NOT_ALLOWED.to_string()),
        Value::String(code) => code.parse::<Gender>(),
        other => Err(format!("\"{}\" is not a valid choice.", other)),
    }
}

fn date_field(value: &Value) -> Result<NaiveDate, String> {
    let wrong_format = || "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.".to_string();
    match value {
        Value::Null => Err(NULL_NOT_ALLOWED.to_string()),
        Value::String(text) => NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|_| wrong_format()),
        _ => Err(wrong_format()),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
