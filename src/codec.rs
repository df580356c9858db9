//! JSON persistence for [`SettingsDocument`].
//!
//! Layout: one top-level object keyed by category name, each holding the
//! category's fields under their registry keys. Decoding is a partial merge
//! onto a defaults document: absent or mistyped fields keep the default,
//! unknown keys are ignored and the result is clamped like any setter input.

use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::{Result, TuneForgeError};
use crate::fields::{self, SettingValue};
use crate::settings::{Category, SettingsDocument};

pub fn to_value(document: &SettingsDocument) -> Value {
    let mut root = Map::new();
    for category in Category::ALL {
        root.insert(category.key().to_string(), category_value(document, category));
    }
    Value::Object(root)
}

pub fn category_value(document: &SettingsDocument, category: Category) -> Value {
    let mut object = Map::new();
    for spec in fields::fields_of(category) {
        object.insert(spec.key.to_string(), spec.read(document).to_json());
    }
    Value::Object(object)
}

pub fn encode(document: &SettingsDocument) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(&to_value(document))?)
}

pub fn decode(bytes: &[u8], defaults: &SettingsDocument) -> Result<SettingsDocument> {
    let root: Value =
        serde_json::from_slice(bytes).map_err(|err| TuneForgeError::ParseError(err.to_string()))?;
    from_value(&root, defaults)
}

pub fn from_value(root: &Value, defaults: &SettingsDocument) -> Result<SettingsDocument> {
    let root = root
        .as_object()
        .ok_or_else(|| TuneForgeError::ParseError("settings root must be an object".to_string()))?;

    let mut document = defaults.clone();
    for category in Category::ALL {
        let Some(object) = root.get(category.key()).and_then(Value::as_object) else {
            debug!(category = %category, "Category missing from settings document, using defaults");
            continue;
        };
        for spec in fields::fields_of(category) {
            let Some(raw) = object.get(spec.key) else {
                continue;
            };
            let stored = SettingValue::from_json(raw).and_then(|value| spec.write(&mut document, &value));
            if stored.is_none() {
                debug!(field = %spec, "Ignoring mistyped value in settings document");
            }
        }
    }
    document.sanitize();
    Ok(document)
}

impl SettingValue {
    pub fn to_json(&self) -> Value {
        match self {
            SettingValue::Int(v) => Value::from(*v),
            // Stored floats are always finite, so `from_f64` only fails on
            // values that never reach a document.
            SettingValue::Float(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
            SettingValue::Bool(v) => Value::Bool(*v),
            SettingValue::Text(v) => Value::String(v.clone()),
        }
    }

    /// Numbers come back as `Int` when integral, `Float` otherwise. Arrays,
    /// objects and null have no setting equivalent.
    pub fn from_json(value: &Value) -> Option<SettingValue> {
        match value {
            Value::Bool(v) => Some(SettingValue::Bool(*v)),
            Value::String(v) => Some(SettingValue::Text(v.clone())),
            Value::Number(n) => n
                .as_i64()
                .map(SettingValue::Int)
                .or_else(|| n.as_f64().map(SettingValue::Float)),
            _ => None,
        }
    }
}
