//! Raw response completion and typed conversion

use super::records::{Episode, Movie, QueueItem};
use crate::error::{Error, Result};
use crate::types::{ApiVersion, JsonObject, JsonValue};
use serde::de::DeserializeOwned;
use tracing::error;

/// A record type the adapter can produce from raw service JSON
pub trait Normalize: DeserializeOwned {
    /// Entity name used in errors and logs
    const ENTITY: &'static str;

    /// Fill in keys the other API generation names differently.
    ///
    /// Only adds absent keys; existing values are left untouched.
    fn complete(raw: &mut JsonObject, version: ApiVersion);
}

impl Normalize for Episode {
    const ENTITY: &'static str = "episode";

    fn complete(raw: &mut JsonObject, _version: ApiVersion) {
        let Some(episode_file) = raw.get("episodeFile").cloned() else {
            return;
        };
        if !raw.contains_key("hasFile") {
            raw.insert("hasFile".into(), JsonValue::Bool(!episode_file.is_null()));
        }
        if !raw.contains_key("episodeFileId") {
            if let Some(id) = episode_file.get("id").filter(|id| !id.is_null()) {
                raw.insert("episodeFileId".into(), id.clone());
            }
        }
    }
}

impl Normalize for Movie {
    const ENTITY: &'static str = "movie";

    fn complete(raw: &mut JsonObject, version: ApiVersion) {
        if raw.contains_key("hasFile") {
            return;
        }
        if let Some(movie_file) = raw.get("movieFile") {
            let has_file = !movie_file.is_null();
            raw.insert("hasFile".into(), JsonValue::Bool(has_file));
        } else if version == ApiVersion::LegacyV1 {
            if let Some(downloaded) = raw.get("downloaded").and_then(JsonValue::as_bool) {
                raw.insert("hasFile".into(), JsonValue::Bool(downloaded));
            }
        }
    }
}

impl Normalize for QueueItem {
    const ENTITY: &'static str = "queue item";

    fn complete(raw: &mut JsonObject, _version: ApiVersion) {
        if raw.contains_key("protocol") {
            return;
        }
        if let Some(client) = raw.get("downloadClient").and_then(JsonValue::as_str) {
            let protocol = guess_protocol(client);
            raw.insert("protocol".into(), JsonValue::String(protocol.to_string()));
        }
    }
}

/// Guess the download protocol from a download client name
pub fn guess_protocol(download_client: &str) -> &'static str {
    let client = download_client.to_ascii_lowercase();
    if ["nzb", "sab", "usenet"].iter().any(|hint| client.contains(hint)) {
        "usenet"
    } else {
        "torrent"
    }
}

/// Complete and convert one raw record
pub fn adapt<T: Normalize>(raw: JsonValue, version: ApiVersion) -> Result<T> {
    let JsonValue::Object(mut object) = raw else {
        return Err(Error::schema(T::ENTITY, "record is not a JSON object"));
    };
    T::complete(&mut object, version);
    let label = record_label(&object);
    serde_json::from_value(JsonValue::Object(object))
        .map_err(|e| Error::schema(T::ENTITY, format!("{label}: {e}")))
}

/// Adapt every record, logging and skipping the ones that fail
pub fn adapt_all<T: Normalize>(records: Vec<JsonValue>, version: ApiVersion) -> Vec<T> {
    let total = records.len();
    let adapted: Vec<T> = records
        .into_iter()
        .filter_map(|raw| match adapt::<T>(raw, version) {
            Ok(record) => Some(record),
            Err(e) => {
                error!("Skipping {}", e);
                None
            }
        })
        .collect();

    if adapted.len() < total {
        error!(
            "{} of {} {} records could not be adapted",
            total - adapted.len(),
            total,
            T::ENTITY
        );
    }
    adapted
}

/// Extract the record list from a response body.
///
/// Arrays are returned as is, objects are unwrapped through `records`.
pub fn records_from_body(body: JsonValue, entity: &str) -> Result<Vec<JsonValue>> {
    match body {
        JsonValue::Array(records) => Ok(records),
        JsonValue::Object(mut object) => match object.remove("records") {
            Some(JsonValue::Array(records)) => Ok(records),
            Some(_) => Err(Error::schema(entity, "`records` is not an array")),
            None => Err(Error::schema(entity, "response holds no record list")),
        },
        other => Err(Error::schema(
            entity,
            format!("unexpected response body: {}", json_kind(&other)),
        )),
    }
}

fn record_label(object: &JsonObject) -> String {
    let title = object.get("title").and_then(JsonValue::as_str);
    let id = object.get("id").and_then(JsonValue::as_i64);
    match (title, id) {
        (Some(title), Some(id)) => format!("{title:?} (id {id})"),
        (Some(title), None) => format!("{title:?}"),
        (None, Some(id)) => format!("id {id}"),
        (None, None) => "record".to_string(),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
