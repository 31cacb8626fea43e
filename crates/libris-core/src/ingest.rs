//! Seed ingestion: validation, normalization and deterministic ordering.
//!
//! A seed file is a JSON array of objects. Each object must carry a
//! non-empty `title`; `file_name` maps to [`CatalogItem::source`]. Records
//! without an `item_type` become books and records without `attributes` get
//! `{"format": "pdf"}`. An optional `topics` array attaches topic names.
//!
//! Ingestion of a batch is all-or-nothing: the first invalid record fails the
//! batch with [`Error::Validation`] naming its index.
//!
//! After validation the batch is stably sorted by lowercased title and
//! numbered 1..N. Sequence numbers belong to the batch, so they are recomputed
//! on every run and never carried over from earlier ingestions.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::defaults::TOPIC_NAME_MAX_LEN;
use crate::error::{Error, Result};
use crate::models::{CatalogItem, ItemType};

/// Item type given to seed records that do not name one.
pub const SEED_ITEM_TYPE: ItemType = ItemType::Book;

/// Attributes given to seed records that do not carry any.
pub fn seed_attributes() -> JsonValue {
    serde_json::json!({ "format": "pdf" })
}

/// How strictly records are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// In-memory catalog: an unrecognized `item_type` becomes
    /// [`ItemType::Uncategorized`].
    Lenient,
    /// Durable catalog: an unrecognized `item_type` fails validation because
    /// the stored enum cannot hold it.
    Strict,
}

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("required field is missing")]
    Missing,
    #[error("must not be empty")]
    Empty,
    #[error("expected {expected}")]
    WrongType { expected: &'static str },
    #[error("unknown variant `{value}`")]
    UnknownVariant { value: String },
    #[error("longer than {max} characters")]
    TooLong { max: usize },
}

/// A single field of a raw record failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}`: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

/// Validate one raw record and normalize it into a [`CatalogItem`].
///
/// The returned item has a fresh identity, no sequence number and no
/// creation timestamp. Unknown fields are ignored.
pub fn validate_record(
    raw: &JsonValue,
    mode: ValidationMode,
) -> std::result::Result<CatalogItem, ValidationError> {
    let obj = raw.as_object().ok_or_else(|| {
        ValidationError::new("record", ValidationReason::WrongType { expected: "object" })
    })?;

    let title = match obj.get("title") {
        None | Some(JsonValue::Null) => {
            return Err(ValidationError::new("title", ValidationReason::Missing))
        }
        Some(JsonValue::String(s)) if s.trim().is_empty() => {
            return Err(ValidationError::new("title", ValidationReason::Empty))
        }
        Some(JsonValue::String(s)) => s.clone(),
        Some(_) => {
            return Err(ValidationError::new(
                "title",
                ValidationReason::WrongType { expected: "string" },
            ))
        }
    };

    let source = optional_string(obj, "file_name")?;
    let item_type = parse_item_type(obj, mode)?;

    let attributes = match obj.get("attributes") {
        None | Some(JsonValue::Null) => seed_attributes(),
        Some(value @ JsonValue::Object(_)) => value.clone(),
        Some(_) => {
            return Err(ValidationError::new(
                "attributes",
                ValidationReason::WrongType { expected: "object" },
            ))
        }
    };

    let topics = parse_topics(obj)?;

    Ok(CatalogItem {
        id: Uuid::new_v4(),
        sequence_number: None,
        title,
        source,
        item_type,
        attributes: Some(attributes),
        created_at: None,
        topics,
    })
}

fn optional_string(
    obj: &Map<String, JsonValue>,
    field: &'static str,
) -> std::result::Result<Option<String>, ValidationError> {
    match obj.get(field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::new(
            field,
            ValidationReason::WrongType { expected: "string" },
        )),
    }
}

fn parse_item_type(
    obj: &Map<String, JsonValue>,
    mode: ValidationMode,
) -> std::result::Result<ItemType, ValidationError> {
    let raw = match optional_string(obj, "item_type")? {
        Some(raw) => raw,
        None => return Ok(SEED_ITEM_TYPE),
    };

    match (raw.parse::<ItemType>(), mode) {
        (Ok(item_type), _) => Ok(item_type),
        (Err(_), ValidationMode::Lenient) => {
            warn!(
                subsystem = "ingest",
                component = "validate",
                item_type = %raw,
                "Unknown item type, treating as uncategorized"
            );
            Ok(ItemType::Uncategorized)
        }
        (Err(_), ValidationMode::Strict) => Err(ValidationError::new(
            "item_type",
            ValidationReason::UnknownVariant { value: raw },
        )),
    }
}

fn parse_topics(
    obj: &Map<String, JsonValue>,
) -> std::result::Result<Vec<String>, ValidationError> {
    let values = match obj.get("topics") {
        None | Some(JsonValue::Null) => return Ok(Vec::new()),
        Some(JsonValue::Array(values)) => values,
        Some(_) => {
            return Err(ValidationError::new(
                "topics",
                ValidationReason::WrongType {
                    expected: "array of strings",
                },
            ))
        }
    };

    let mut seen = HashSet::new();
    let mut topics = Vec::with_capacity(values.len());
    for value in values {
        let name = value.as_str().map(str::trim).ok_or_else(|| {
            ValidationError::new(
                "topics",
                ValidationReason::WrongType {
                    expected: "array of strings",
                },
            )
        })?;
        validate_topic_name(name)?;
        if seen.insert(name.to_string()) {
            topics.push(name.to_string());
        }
    }
    topics.sort();
    Ok(topics)
}

/// Validate a topic name: non-blank and at most 100 characters.
pub fn validate_topic_name(name: &str) -> std::result::Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("topics", ValidationReason::Empty));
    }
    if name.chars().count() > TOPIC_NAME_MAX_LEN {
        return Err(ValidationError::new(
            "topics",
            ValidationReason::TooLong {
                max: TOPIC_NAME_MAX_LEN,
            },
        ));
    }
    Ok(())
}

/// Validate every record of a batch, stopping at the first failure.
pub fn validate_batch(records: &[JsonValue], mode: ValidationMode) -> Result<Vec<CatalogItem>> {
    records
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            validate_record(raw, mode).map_err(|source| Error::Validation { index, source })
        })
        .collect()
}

/// Sort key for an item title. An empty title sorts first.
pub fn sort_key(title: &str) -> String {
    title.to_lowercase()
}

/// Stable sort by case-insensitive title. Equal keys keep their input order.
pub fn sort_items(items: &mut [CatalogItem]) {
    items.sort_by_key(|item| sort_key(&item.title));
}

/// Number a sorted batch 1..N, overwriting any previous numbering.
pub fn assign_sequence_numbers(items: &mut [CatalogItem]) {
    for (position, item) in items.iter_mut().enumerate() {
        item.sequence_number = Some(position as i64 + 1);
    }
}

/// Parse the raw bytes of a seed file into its record list.
pub fn parse_seed(bytes: &[u8]) -> Result<Vec<JsonValue>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Read and parse a seed file.
///
/// A missing or unreadable file is [`Error::SourceUnavailable`]; malformed
/// JSON (including a top level that is not an array) is
/// [`Error::Serialization`].
pub async fn read_seed_file(path: &Path) -> Result<Vec<JsonValue>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| Error::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
    let records = parse_seed(&bytes)?;
    debug!(
        subsystem = "ingest",
        component = "seed",
        seed_path = %path.display(),
        record_count = records.len(),
        "Seed file parsed"
    );
    Ok(records)
}

/// Validate, sort and number a batch of raw records.
pub fn ingest(records: &[JsonValue], mode: ValidationMode) -> Result<Vec<CatalogItem>> {
    let mut items = validate_batch(records, mode)?;
    sort_items(&mut items);
    assign_sequence_numbers(&mut items);
    Ok(items)
}

/// Read a seed file and run it through [`ingest`].
pub async fn ingest_file(path: &Path, mode: ValidationMode) -> Result<Vec<CatalogItem>> {
    let start = Instant::now();
    let records = read_seed_file(path).await?;
    let items = ingest(&records, mode)?;

    info!(
        subsystem = "ingest",
        component = "seed",
        op = "ingest_file",
        seed_path = %path.display(),
        record_count = items.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Seed file ingested"
    );
    Ok(items)
}
