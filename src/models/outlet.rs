use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One record of the outlet-details fixture.
///
/// The record is kept exactly as loaded (key order included) and is what gets
/// serialized back out. The three fields the filter looks at are pulled out as
/// text: strings as-is, numbers and booleans in their JSON spelling, anything
/// else as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Outlet {
    outlet_code: Option<String>,
    outlet_type: Option<String>,
    channel: Option<String>,
    record: Map<String, Value>,
}

impl Outlet {
    pub fn from_record(record: Map<String, Value>) -> Self {
        let text = |field: OutletField| record.get(field.key()).and_then(scalar_text);
        let outlet_code = text(OutletField::OutletCode);
        let outlet_type = text(OutletField::OutletType);
        let channel = text(OutletField::Channel);

        Self {
            outlet_code,
            outlet_type,
            channel,
            record,
        }
    }

    pub fn field(&self, field: OutletField) -> Option<&str> {
        match field {
            OutletField::OutletCode => self.outlet_code.as_deref(),
            OutletField::OutletType => self.outlet_type.as_deref(),
            OutletField::Channel => self.channel.as_deref(),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl Serialize for Outlet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Outlet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Outlet::from_record)
    }
}

/// The outlet attributes that can be filtered on or projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutletField {
    OutletCode,
    OutletType,
    Channel,
}

impl OutletField {
    pub const ALL: [OutletField; 3] = [
        OutletField::OutletCode,
        OutletField::OutletType,
        OutletField::Channel,
    ];

    /// JSON key as it appears in the fixture.
    pub fn key(self) -> &'static str {
        match self {
            OutletField::OutletCode => "outletCode",
            OutletField::OutletType => "outletType",
            OutletField::Channel => "channel",
        }
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Body of `POST /api/outlets/filter`. Every field is optional; an empty list
/// or a missing field places no constraint on that dimension.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default, deserialize_with = "one_or_many")]
    pub outlet_code: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub outlet_type: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub channel: Vec<String>,
    /// Case-insensitive pattern tested against code, type and channel.
    #[serde(default)]
    pub regex: Option<String>,
}

impl FilterCriteria {
    pub fn values(&self, field: OutletField) -> &[String] {
        match field {
            OutletField::OutletCode => &self.outlet_code,
            OutletField::OutletType => &self.outlet_type,
            OutletField::Channel => &self.channel,
        }
    }
}

/// Accepts `"X"`, `["X", "Y"]` or `null`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) if s.is_empty() => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

// ── Query parameters ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ProjectionParams {
    /// Drop repeated values, keeping first-seen order.
    pub distinct: Option<bool>,
}
