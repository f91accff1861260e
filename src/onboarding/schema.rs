//! Agent record schema: field types, allowed enum values, conditions.

use serde::{Deserialize, Serialize};

use super::model::AgentRecord;

/// Field ids as they appear in the record JSON and the form descriptors.
pub mod fields {
    pub const CALLSIGN: &str = "callsign";
    pub const GENDER: &str = "gender";
    pub const GENDER_OTHER: &str = "genderOther";
    pub const AGE: &str = "age";
    pub const REGION: &str = "region";
    pub const EDUCATION: &str = "education";
    pub const ACTIVITY: &str = "activity";
    pub const PLATFORM: &str = "platform";
    pub const FACTCHECK: &str = "factcheck";
    pub const ROLE: &str = "role";
    pub const GOAL: &str = "goal";
    pub const COMPLETED_AT: &str = "completedAt";
}

pub const CALLSIGN_MAX_LEN: usize = 32;
pub const GENDER_OTHER_MAX_LEN: usize = 20;

/// A string that is not one of an enum's declared values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed set of string values with serde, `Display` and `FromStr`.
macro_rules! value_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(UnknownValue {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

value_enum! {
    /// Self-reported gender. `Other` unlocks the `genderOther` text field.
    Gender {
        Female => "female",
        Male => "male",
        Nonbinary => "nonbinary",
        Skip => "skip",
        Other => "other",
    }
}

value_enum! {
    /// Age bracket.
    AgeGroup {
        Under18 => "under18",
        From18To25 => "18-25",
        From26To35 => "26-35",
        From36To45 => "36-45",
        From46 => "46plus",
    }
}

value_enum! {
    Region {
        Russia => "russia",
        Ukraine => "ukraine",
        Belarus => "belarus",
        Kazakhstan => "kazakhstan",
        OtherCis => "other-cis",
        Europe => "europe",
        Americas => "americas",
        Asia => "asia",
        Africa => "africa",
        Other => "other",
    }
}

value_enum! {
    Education {
        Secondary => "secondary",
        Vocational => "vocational",
        Student => "student",
        Bachelor => "bachelor",
        Master => "master",
        Other => "other",
    }
}

value_enum! {
    /// Time spent online per day.
    Activity {
        Under2h => "under2h",
        From2To5h => "2-5h",
        From5To8h => "5-8h",
        Over8h => "8plus",
    }
}

value_enum! {
    Platform {
        Instagram => "instagram",
        Tiktok => "tiktok",
        Telegram => "telegram",
        Youtube => "youtube",
        X => "x",
        Vk => "vk",
        Other => "other",
    }
}

value_enum! {
    /// How often the agent checks facts.
    FactCheck {
        Always => "always",
        Sometimes => "sometimes",
        Rarely => "rarely",
        Never => "never",
    }
}

value_enum! {
    Role {
        Observer => "observer",
        Active => "active",
        Creator => "creator",
        Analyst => "analyst",
        Anon => "anon",
    }
}

value_enum! {
    Goal {
        Play => "play",
        Challenge => "challenge",
        Fakes => "fakes",
        Research => "research",
    }
}

/// Semantic type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum FieldType {
    #[serde(rename = "string")]
    Text {
        #[serde(rename = "maxLength")]
        max_len: usize,
    },
    #[serde(rename = "enum")]
    Enum { values: &'static [&'static str] },
    #[serde(rename = "ISO8601")]
    Timestamp,
}

/// Display condition: the field is relevant only while `field` holds `equals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleWhen {
    pub field: &'static str,
    pub equals: &'static str,
}

impl VisibleWhen {
    pub fn is_satisfied(&self, record: &AgentRecord) -> bool {
        record.field(self.field) == Some(self.equals)
    }
}

/// One entry of the record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub name: &'static str,
    #[serde(flatten)]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<VisibleWhen>,
}

impl SchemaField {
    const fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            visible_when: None,
        }
    }

    const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
            visible_when: None,
        }
    }

    /// Maximum text length, for text fields.
    pub fn max_len(&self) -> Option<usize> {
        match self.field_type {
            FieldType::Text { max_len } => Some(max_len),
            _ => None,
        }
    }

    /// Declared value set, for enum fields.
    pub fn allowed_values(&self) -> Option<&'static [&'static str]> {
        match self.field_type {
            FieldType::Enum { values } => Some(values),
            _ => None,
        }
    }
}

/// The `AgentRecord` shape, in declaration order.
pub const AGENT_SCHEMA: &[SchemaField] = &[
    SchemaField::required(
        fields::CALLSIGN,
        FieldType::Text {
            max_len: CALLSIGN_MAX_LEN,
        },
    ),
    SchemaField::required(fields::GENDER, FieldType::Enum { values: Gender::VALUES }),
    SchemaField {
        name: fields::GENDER_OTHER,
        field_type: FieldType::Text {
            max_len: GENDER_OTHER_MAX_LEN,
        },
        required: false,
        visible_when: Some(VisibleWhen {
            field: fields::GENDER,
            equals: "other",
        }),
    },
    SchemaField::required(fields::AGE, FieldType::Enum { values: AgeGroup::VALUES }),
    SchemaField::required(fields::REGION, FieldType::Enum { values: Region::VALUES }),
    SchemaField::optional(
        fields::EDUCATION,
        FieldType::Enum {
            values: Education::VALUES,
        },
    ),
    SchemaField::optional(
        fields::ACTIVITY,
        FieldType::Enum {
            values: Activity::VALUES,
        },
    ),
    SchemaField::optional(
        fields::PLATFORM,
        FieldType::Enum {
            values: Platform::VALUES,
        },
    ),
    SchemaField::optional(
        fields::FACTCHECK,
        FieldType::Enum {
            values: FactCheck::VALUES,
        },
    ),
    SchemaField::optional(fields::ROLE, FieldType::Enum { values: Role::VALUES }),
    SchemaField::optional(fields::GOAL, FieldType::Enum { values: Goal::VALUES }),
    SchemaField::optional(fields::COMPLETED_AT, FieldType::Timestamp),
];

/// Look up a schema entry by field id.
pub fn schema_field(name: &str) -> Option<&'static SchemaField> {
    AGENT_SCHEMA.iter().find(|f| f.name == name)
}
