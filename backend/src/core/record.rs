//! Decoding of stored records into typed items.
//!
//! Each persisted record is a flat JSON object carrying a `class`
//! discriminator. Decoding dispatches on that discriminator to a dedicated
//! record shape per variant, validated strictly: a missing field, an extra
//! field, or an unrecognized class is a malformed record.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::models::Item;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record has no 'class' discriminator")]
    MissingClass,

    #[error("unrecognized item class '{0}'")]
    UnknownClass(String),

    #[error("record does not match the field set of class '{class}': {source}")]
    FieldMismatch {
        class: &'static str,
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MovieRecord {
    title: String,
    genre: String,
    description: String,
    image_url: String,
    director: String,
    length: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GameRecord {
    title: String,
    genre: String,
    description: String,
    image_url: String,
    developer: String,
    platform: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BookRecord {
    title: String,
    genre: String,
    description: String,
    image_url: String,
    author: String,
    pages: String,
}

/// Decode one stored record into the item variant named by its `class` field.
pub fn decode_record(value: &Value) -> Result<Item, RecordError> {
    let object = value.as_object().ok_or(RecordError::NotAnObject)?;

    let class = object
        .get("class")
        .and_then(Value::as_str)
        .ok_or(RecordError::MissingClass)?
        .to_string();

    // The discriminator is not part of any variant's field set.
    let mut fields = object.clone();
    fields.remove("class");
    let fields = Value::Object(fields);

    match class.as_str() {
        "Movie" => {
            let r: MovieRecord = decode_fields(fields, "Movie")?;
            Ok(Item::Movie {
                title: r.title,
                genre: r.genre,
                description: r.description,
                image_url: r.image_url,
                director: r.director,
                length: r.length,
            })
        }
        "Game" => {
            let r: GameRecord = decode_fields(fields, "Game")?;
            Ok(Item::Game {
                title: r.title,
                genre: r.genre,
                description: r.description,
                image_url: r.image_url,
                developer: r.developer,
                platform: r.platform,
            })
        }
        "Book" => {
            let r: BookRecord = decode_fields(fields, "Book")?;
            Ok(Item::Book {
                title: r.title,
                genre: r.genre,
                description: r.description,
                image_url: r.image_url,
                author: r.author,
                pages: r.pages,
            })
        }
        _ => Err(RecordError::UnknownClass(class)),
    }
}

fn decode_fields<T: for<'de> Deserialize<'de>>(
    fields: Value,
    class: &'static str,
) -> Result<T, RecordError> {
    serde_json::from_value(fields).map_err(|source| RecordError::FieldMismatch { class, source })
}
