// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structural validation of schedule and news documents.
//
// Validation runs on the raw JSON value, before typed deserialisation, so the
// first violation can be reported with its field name and 1-based record
// index. It is fail-fast: the first problem aborts the whole batch.

use kliros_core::dates::parse_calendar_date;
use kliros_core::error::{ValidationError, Violation};
use serde_json::{Map, Value};

type Object = Map<String, Value>;
type Outcome = Result<(), ValidationError>;

const SCHEDULE_REQUIRED: [&str; 7] = ["id", "date", "dayNumber", "month", "weekday", "title", "times"];
const NEWS_REQUIRED: [&str; 6] = ["id", "title", "slug", "description", "content", "date"];

/// Keys an image block may use for its source, in order of preference.
pub const IMAGE_SOURCE_KEYS: [&str; 4] = ["src", "url", "image", "path"];

/// Validate a schedule document (`{ services: [...] }`).
pub fn validate_schedule(doc: &Value) -> Outcome {
    let services = records(doc, "services")?;
    validate_metadata(doc)?;

    for (i, service) in services.iter().enumerate() {
        let index = i + 1;
        let obj = as_record(service, "service", index)?;
        require_present(obj, &SCHEDULE_REQUIRED, index)?;

        for field in ["id", "month", "weekday", "title"] {
            require_string(obj, field, index)?;
        }
        require_date(obj, "date", index)?;

        let day = obj
            .get("dayNumber")
            .and_then(Value::as_u64)
            .ok_or_else(|| wrong_type("dayNumber", index, "an integer"))?;
        if !(1..=31).contains(&day) {
            return Err(ValidationError::in_record(
                "dayNumber",
                index,
                Violation::Invalid(format!("{day} is not a day of the month")),
            ));
        }

        let times = obj
            .get("times")
            .and_then(Value::as_array)
            .ok_or_else(|| wrong_type("times", index, "an array"))?;
        if times.is_empty() {
            return Err(ValidationError::in_record("times", index, Violation::Empty));
        }
        for (t, slot) in times.iter().enumerate() {
            let prefix = format!("times[{}]", t + 1);
            let slot = slot
                .as_object()
                .ok_or_else(|| wrong_type(&prefix, index, "an object"))?;
            for field in ["time", "type"] {
                let name = format!("{prefix}.{field}");
                match slot.get(field) {
                    Some(Value::String(s)) if !s.is_empty() => {}
                    v if is_missing(v) => {
                        return Err(ValidationError::in_record(name, index, Violation::Missing));
                    }
                    _ => return Err(wrong_type(&name, index, "a string")),
                }
            }
            optional_string(slot, "icon", &format!("{prefix}.icon"), index)?;
        }

        optional_string(obj, "note", "note", index)?;
        match obj.get("priority") {
            None | Some(Value::Null) => {}
            Some(Value::String(p)) if kliros_core::Priority::from_keyword(p).is_some() => {}
            Some(other) => {
                return Err(ValidationError::in_record(
                    "priority",
                    index,
                    Violation::Invalid(format!("{other} is not one of low, medium, high")),
                ));
            }
        }
    }

    Ok(())
}

/// `metadata` is optional; when present its known keys must be strings.
fn validate_metadata(doc: &Value) -> Outcome {
    let metadata = match doc.get("metadata") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Object(metadata)) => metadata,
        Some(_) => {
            return Err(ValidationError::root(
                "metadata",
                Violation::WrongType { expected: "an object" },
            ));
        }
    };
    for field in ["lastUpdated", "version", "weekPeriod"] {
        match metadata.get(field) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => {
                return Err(ValidationError::root(
                    format!("metadata.{field}"),
                    Violation::WrongType { expected: "a string" },
                ));
            }
        }
    }
    Ok(())
}

/// Validate a news document (`{ news: [...] }`).
pub fn validate_news(doc: &Value) -> Outcome {
    let items = records(doc, "news")?;

    for (i, item) in items.iter().enumerate() {
        let index = i + 1;
        let obj = as_record(item, "news item", index)?;
        require_present(obj, &NEWS_REQUIRED, index)?;

        for field in ["id", "title", "slug", "description"] {
            require_string(obj, field, index)?;
        }
        require_date(obj, "date", index)?;
        optional_string(obj, "author", "author", index)?;
        optional_string(obj, "category", "category", index)?;
        optional_string(obj, "categoryName", "categoryName", index)?;
        optional_string(obj, "image", "image", index)?;

        if let Some(tags) = obj.get("tags").filter(|v| !v.is_null()) {
            let all_strings = tags
                .as_array()
                .is_some_and(|a| a.iter().all(Value::is_string));
            if !all_strings {
                return Err(wrong_type("tags", index, "an array of strings"));
            }
        }

        let content = obj
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| wrong_type("content", index, "an array"))?;
        for (b, block) in content.iter().enumerate() {
            validate_block(block, &format!("content[{}]", b + 1), index)?;
        }
    }

    Ok(())
}

fn validate_block(block: &Value, prefix: &str, index: usize) -> Outcome {
    let obj = block
        .as_object()
        .ok_or_else(|| wrong_type(prefix, index, "an object"))?;
    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::in_record(format!("{prefix}.type"), index, Violation::Missing))?;

    match kind {
        "heading" | "paragraph" => {
            let name = format!("{prefix}.text");
            if !obj.get("text").is_some_and(Value::is_string) {
                return Err(ValidationError::in_record(name, index, Violation::Missing));
            }
            if kind == "heading"
                && let Some(level) = obj.get("level").filter(|v| !v.is_null())
                && !level.as_u64().is_some_and(|l| (1..=6).contains(&l))
            {
                return Err(ValidationError::in_record(
                    format!("{prefix}.level"),
                    index,
                    Violation::Invalid("heading level must be 1 to 6".into()),
                ));
            }
        }
        "image" => {
            let has_source = IMAGE_SOURCE_KEYS
                .iter()
                .any(|k| obj.get(*k).and_then(Value::as_str).is_some_and(|s| !s.is_empty()));
            if !has_source {
                return Err(ValidationError::in_record(
                    format!("{prefix}.src"),
                    index,
                    Violation::Missing,
                ));
            }
            optional_string(obj, "caption", &format!("{prefix}.caption"), index)?;
        }
        "list" => {
            let all_strings = obj
                .get("items")
                .and_then(Value::as_array)
                .is_some_and(|a| a.iter().all(Value::is_string));
            if !all_strings {
                return Err(wrong_type(&format!("{prefix}.items"), index, "an array of strings"));
            }
        }
        other => {
            return Err(ValidationError::in_record(
                format!("{prefix}.type"),
                index,
                Violation::Invalid(format!("unknown block type '{other}'")),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Absent, null, empty string, zero, or `false`.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !b,
        Some(_) => false,
    }
}

fn records<'a>(doc: &'a Value, field: &str) -> Result<&'a Vec<Value>, ValidationError> {
    let root = doc.as_object().ok_or_else(|| {
        ValidationError::root("document", Violation::WrongType { expected: "an object" })
    })?;
    match root.get(field) {
        Some(Value::Array(items)) => Ok(items),
        v if is_missing(v) => Err(ValidationError::root(field, Violation::Missing)),
        _ => Err(ValidationError::root(field, Violation::WrongType { expected: "an array" })),
    }
}

fn as_record<'a>(value: &'a Value, what: &str, index: usize) -> Result<&'a Object, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| wrong_type(what, index, "an object"))
}

fn require_present(obj: &Object, fields: &[&str], index: usize) -> Outcome {
    match fields.iter().find(|f| is_missing(obj.get(**f))) {
        Some(field) => Err(ValidationError::in_record(*field, index, Violation::Missing)),
        None => Ok(()),
    }
}

fn require_string(obj: &Object, field: &str, index: usize) -> Outcome {
    if obj.get(field).is_some_and(Value::is_string) {
        Ok(())
    } else {
        Err(wrong_type(field, index, "a string"))
    }
}

fn optional_string(obj: &Object, field: &str, name: &str, index: usize) -> Outcome {
    match obj.get(field) {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(()),
        Some(_) => Err(wrong_type(name, index, "a string")),
    }
}

fn require_date(obj: &Object, field: &str, index: usize) -> Outcome {
    let raw = obj
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| wrong_type(field, index, "a string"))?;
    if parse_calendar_date(raw).is_none() {
        return Err(ValidationError::in_record(
            field,
            index,
            Violation::Invalid(format!("'{raw}' is not a date")),
        ));
    }
    Ok(())
}

fn wrong_type(field: &str, index: usize, expected: &'static str) -> ValidationError {
    ValidationError::in_record(field, index, Violation::WrongType { expected })
}
