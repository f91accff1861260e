//! Agent record: the data collected by the onboarding form.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::schema::{
    fields, schema_field, Activity, AgeGroup, Education, FactCheck, Gender, Goal, Platform,
    Region, Role,
};

/// Schema ids backed by a text slot on [`AgentRecord`], in stored key order.
const TEXT_FIELDS: [&str; 11] = [
    fields::CALLSIGN,
    fields::GENDER,
    fields::GENDER_OTHER,
    fields::AGE,
    fields::REGION,
    fields::EDUCATION,
    fields::ACTIVITY,
    fields::PLATFORM,
    fields::FACTCHECK,
    fields::ROLE,
    fields::GOAL,
];

/// Agent passport filled in by the onboarding form.
///
/// Enum-typed answers are kept as raw strings so a value outside the declared
/// set survives a load/save cycle untouched; use the `*_kind()` accessors for
/// the typed view. A schema key holding a non-string JSON value reads as
/// absent but is kept aside and written back as-is until the field is set.
/// Keys this struct does not know are kept in `extra` and written back;
/// entries in `extra` named after a schema field are never written.
///
/// Stored as JSON under the `"agentData"` key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentRecord {
    pub callsign: Option<String>,
    pub gender: Option<String>,
    pub gender_other: Option<String>,
    pub age: Option<String>,
    pub region: Option<String>,
    pub education: Option<String>,
    pub activity: Option<String>,
    pub platform: Option<String>,
    pub factcheck: Option<String>,
    pub role: Option<String>,
    pub goal: Option<String>,
    /// Set by `AgentStore::save`; whatever the caller put here is replaced.
    pub completed_at: Option<DateTime<Utc>>,
    pub extra: Map<String, Value>,
    mistyped: Map<String, Value>,
}

impl AgentRecord {
    /// Build a record from untyped JSON. Never fails: anything that is not an
    /// object yields an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let mut record = Self::default();
        for (key, value) in map {
            if key == fields::COMPLETED_AT {
                match value.as_str().and_then(parse_timestamp) {
                    Some(at) => record.completed_at = Some(at),
                    None => {
                        record.mistyped.insert(key, value);
                    }
                }
            } else if TEXT_FIELDS.contains(&key.as_str()) {
                match value {
                    Value::String(text) => record.set_field(&key, Some(text)),
                    other => {
                        record.mistyped.insert(key, other);
                    }
                }
            } else {
                record.extra.insert(key, value);
            }
        }
        record
    }

    /// Schema keys that were read with a non-string value, as they were read.
    pub fn mistyped(&self) -> &Map<String, Value> {
        &self.mistyped
    }

    /// Set `completedAt` and drop anything that could shadow a schema key in
    /// the stored form.
    pub(crate) fn stamp(&mut self, at: DateTime<Utc>) {
        self.completed_at = Some(at);
        self.mistyped.remove(fields::COMPLETED_AT);
        self.extra.retain(|key, _| schema_field(key).is_none());
    }

    /// Text value of a field by its schema id.
    ///
    /// `completedAt` and unknown ids return `None`; extra keys are only
    /// returned when they hold a string.
    pub fn field(&self, id: &str) -> Option<&str> {
        let slot = match id {
            fields::CALLSIGN => &self.callsign,
            fields::GENDER => &self.gender,
            fields::GENDER_OTHER => &self.gender_other,
            fields::AGE => &self.age,
            fields::REGION => &self.region,
            fields::EDUCATION => &self.education,
            fields::ACTIVITY => &self.activity,
            fields::PLATFORM => &self.platform,
            fields::FACTCHECK => &self.factcheck,
            fields::ROLE => &self.role,
            fields::GOAL => &self.goal,
            fields::COMPLETED_AT => return None,
            other => return self.extra.get(other).and_then(Value::as_str),
        };
        slot.as_deref()
    }

    /// Set (or unset with `None`) a field by its schema id. Unknown ids land
    /// in `extra`. `completedAt` is ignored; only the store stamps it.
    pub fn set_field(&mut self, id: &str, value: Option<String>) {
        let slot = match id {
            fields::CALLSIGN => &mut self.callsign,
            fields::GENDER => &mut self.gender,
            fields::GENDER_OTHER => &mut self.gender_other,
            fields::AGE => &mut self.age,
            fields::REGION => &mut self.region,
            fields::EDUCATION => &mut self.education,
            fields::ACTIVITY => &mut self.activity,
            fields::PLATFORM => &mut self.platform,
            fields::FACTCHECK => &mut self.factcheck,
            fields::ROLE => &mut self.role,
            fields::GOAL => &mut self.goal,
            fields::COMPLETED_AT => return,
            other => {
                match value {
                    Some(v) => self.extra.insert(other.to_string(), Value::String(v)),
                    None => self.extra.remove(other),
                };
                return;
            }
        };
        *slot = value;
        self.mistyped.remove(id);
    }

    /// Builder-style `set_field`.
    pub fn with(mut self, id: &str, value: impl Into<String>) -> Self {
        self.set_field(id, Some(value.into()));
        self
    }

    pub fn gender_kind(&self) -> Option<Gender> {
        parse_kind(&self.gender)
    }

    pub fn age_kind(&self) -> Option<AgeGroup> {
        parse_kind(&self.age)
    }

    pub fn region_kind(&self) -> Option<Region> {
        parse_kind(&self.region)
    }

    pub fn education_kind(&self) -> Option<Education> {
        parse_kind(&self.education)
    }

    pub fn activity_kind(&self) -> Option<Activity> {
        parse_kind(&self.activity)
    }

    pub fn platform_kind(&self) -> Option<Platform> {
        parse_kind(&self.platform)
    }

    pub fn factcheck_kind(&self) -> Option<FactCheck> {
        parse_kind(&self.factcheck)
    }

    pub fn role_kind(&self) -> Option<Role> {
        parse_kind(&self.role)
    }

    pub fn goal_kind(&self) -> Option<Goal> {
        parse_kind(&self.goal)
    }
}

fn parse_kind<T: std::str::FromStr>(raw: &Option<String>) -> Option<T> {
    raw.as_deref().and_then(|v| v.parse().ok())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `2024-05-01T12:30:00.123Z`: fixed width, so text order is time order.
fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Serialize for AgentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for id in TEXT_FIELDS {
            if let Some(text) = self.field(id) {
                map.serialize_entry(id, text)?;
            } else if let Some(raw) = self.mistyped.get(id) {
                map.serialize_entry(id, raw)?;
            }
        }
        match &self.completed_at {
            Some(at) => map.serialize_entry(fields::COMPLETED_AT, &format_timestamp(at))?,
            None => {
                if let Some(raw) = self.mistyped.get(fields::COMPLETED_AT) {
                    map.serialize_entry(fields::COMPLETED_AT, raw)?;
                }
            }
        }
        for (key, value) in &self.extra {
            if schema_field(key).is_none() {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AgentRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_map)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn default_record_is_empty() {
        let r = AgentRecord::default();
        assert!(r.callsign.is_none());
        assert!(r.gender.is_none());
        assert!(r.completed_at.is_none());
        assert!(r.extra.is_empty());
        assert_eq!(serde_json::to_value(&r).unwrap(), json!({}));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut r = AgentRecord::default()
            .with("callsign", "Nova")
            .with("gender", "other")
            .with("genderOther", "agender");
        r.completed_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(
            json,
            json!({
                "callsign": "Nova",
                "gender": "other",
                "genderOther": "agender",
                "completedAt": "2024-05-01T12:30:00.000Z"
            })
        );
    }

    #[test]
    fn wrong_typed_fields_read_as_absent() {
        let r = AgentRecord::from_value(json!({
            "callsign": 42,
            "gender": null,
            "age": ["18-25"],
            "region": "europe",
            "completedAt": "not a date"
        }));
        assert!(r.callsign.is_none());
        assert!(r.gender.is_none());
        assert!(r.age.is_none());
        assert_eq!(r.region.as_deref(), Some("europe"));
        assert!(r.completed_at.is_none());
        assert_eq!(r.mistyped().len(), 4);
        assert!(r.extra.is_empty());
    }

    #[test]
    fn wrong_typed_fields_are_written_back_unchanged() {
        let input = json!({
            "callsign": 42,
            "gender": 3,
            "age": ["18-25"],
            "region": "europe",
            "completedAt": false
        });
        let r = AgentRecord::from_value(input.clone());
        assert_eq!(serde_json::to_value(&r).unwrap(), input);

        let again: AgentRecord = serde_json::from_value(input).unwrap();
        assert_eq!(again, r);
    }

    #[test]
    fn setting_a_field_replaces_its_wrong_typed_value() {
        let mut r = AgentRecord::from_value(json!({ "gender": 3, "age": 7 }));
        r.set_field("gender", Some("male".into()));
        r.set_field("age", None);

        assert!(r.mistyped().is_empty());
        assert_eq!(serde_json::to_value(&r).unwrap(), json!({ "gender": "male" }));
    }

    #[test]
    fn extra_entries_never_shadow_schema_keys() {
        let mut r = AgentRecord::default().with("callsign", "Nova");
        r.completed_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
        r.extra.insert("completedAt".into(), json!("1999-01-01T00:00:00.000Z"));
        r.extra.insert("callsign".into(), json!("Impostor"));
        r.extra.insert("gender".into(), json!("female"));

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(
            json,
            json!({
                "callsign": "Nova",
                "completedAt": "2024-05-01T12:30:00.000Z"
            })
        );
    }

    #[test]
    fn stamp_drops_shadowing_entries() {
        let mut r = AgentRecord::from_value(json!({ "completedAt": 12, "theme": "dark" }));
        r.extra.insert("region".into(), json!("europe"));
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        r.stamp(at);

        assert_eq!(r.completed_at, Some(at));
        assert!(r.mistyped().is_empty());
        assert!(!r.extra.contains_key("region"));
        assert_eq!(r.extra["theme"], "dark");
    }

    #[test]
    fn non_object_json_fails_typed_deserialize() {
        assert!(serde_json::from_str::<AgentRecord>("[1,2,3]").is_err());
        assert!(serde_json::from_str::<AgentRecord>("\"nope\"").is_err());
    }

    #[test]
    fn non_object_input_is_empty_record() {
        assert_eq!(AgentRecord::from_value(json!("nope")), AgentRecord::default());
        assert_eq!(AgentRecord::from_value(json!(null)), AgentRecord::default());
        assert_eq!(AgentRecord::from_value(json!([1, 2])), AgentRecord::default());
    }

    #[test]
    fn unknown_keys_survive_roundtrip() {
        let r = AgentRecord::from_value(json!({
            "callsign": "Nova",
            "consentData": true,
            "theme": "dark"
        }));
        assert_eq!(r.extra["consentData"], json!(true));
        assert_eq!(r.field("theme"), Some("dark"));

        let back = serde_json::to_value(&r).unwrap();
        assert_eq!(back["consentData"], json!(true));
        assert_eq!(back["theme"], "dark");
    }

    #[test]
    fn out_of_set_values_are_kept_raw() {
        let r = AgentRecord::from_value(json!({ "gender": "dragon", "age": "18-25" }));
        assert_eq!(r.gender.as_deref(), Some("dragon"));
        assert!(r.gender_kind().is_none());
        assert_eq!(r.age_kind(), Some(AgeGroup::From18To25));
    }

    #[test]
    fn field_accessors_by_id() {
        let mut r = AgentRecord::default().with("factcheck", "rarely");
        assert_eq!(r.field("factcheck"), Some("rarely"));
        assert_eq!(r.factcheck_kind(), Some(FactCheck::Rarely));

        r.set_field("factcheck", None);
        assert!(r.field("factcheck").is_none());

        // completedAt cannot be set through the form path
        r.set_field("completedAt", Some("2024-01-01T00:00:00.000Z".into()));
        assert!(r.completed_at.is_none());
        assert!(r.field("completedAt").is_none());
    }

    #[test]
    fn timestamp_parses_offsets_to_utc() {
        let r = AgentRecord::from_value(json!({ "completedAt": "2024-05-01T15:30:00+03:00" }));
        assert_eq!(
            r.completed_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap())
        );
    }
}
