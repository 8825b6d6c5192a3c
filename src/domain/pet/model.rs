use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const NAME_MAX_LENGTH: usize = 45;
pub const SPECIES_MAX_LENGTH: usize = 45;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gender {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "w")]
    Female,
    #[default]
    #[serde(rename = "")]
    Unspecified,
}

impl Gender {
    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "m",
            Gender::Female => "w",
            Gender::Unspecified => "",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(Gender::Male),
            "w" => Ok(Gender::Female),
            "" => Ok(Gender::Unspecified),
            other => Err(format!("\"{}\" is not a valid choice.", other)),
        }
    }
}

/// A stored pet. Field names match the `pets` collection; `id` is `_id`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Pet {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub gender: Gender,
    pub birthday: NaiveDate,
}

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A pet without an id, for direct insertion into the store.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub gender: Gender,
    pub birthday: NaiveDate,
}

impl NewPet {
    pub fn new(name: &str, species: &str, gender: Gender, birthday: NaiveDate) -> Self {
        NewPet {
            name: name.to_string(),
            species: species.to_string(),
            gender,
            birthday,
        }
    }

    pub fn with_id(self, id: i64) -> Pet {
        Pet {
            id,
            name: self.name,
            species: self.species,
            gender: self.gender,
            birthday: self.birthday,
        }
    }
}

/// A validated set of writable fields. `None` leaves the field untouched.
///
/// Serializes to exactly the supplied fields, which is what a `$set`
/// update needs.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct PetChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
}

impl PetChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.species.is_none()
            && self.gender.is_none()
            && self.birthday.is_none()
    }

    pub fn apply_to(self, pet: &mut Pet) {
        if let Some(name) = self.name {
            pet.name = name;
        }
        if let Some(species) = self.species {
            pet.species = species;
        }
        if let Some(gender) = self.gender {
            pet.gender = gender;
        }
        if let Some(birthday) = self.birthday {
            pet.birthday = birthday;
        }
    }
}
