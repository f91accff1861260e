//! Display labels for stored enum values and the completion message.

use super::schema::{AgeGroup, Gender};

/// Gender value → label shown on the agent card.
pub const GENDER_LABELS: &[(Gender, &str)] = &[
    (Gender::Female, "Женский"),
    (Gender::Male, "Мужской"),
    (Gender::Nonbinary, "Небинарный"),
    (Gender::Skip, "Не указан"),
    (Gender::Other, "Другое"),
];

/// Age bracket value → short label.
pub const AGE_LABELS: &[(AgeGroup, &str)] = &[
    (AgeGroup::Under18, "<18"),
    (AgeGroup::From18To25, "18–25"),
    (AgeGroup::From26To35, "26–35"),
    (AgeGroup::From36To45, "36–45"),
    (AgeGroup::From46, "46+"),
];

/// Label for a raw gender value, if it is one of the declared values.
pub fn gender_label(value: &str) -> Option<&'static str> {
    let gender: Gender = value.parse().ok()?;
    lookup(GENDER_LABELS, gender)
}

/// Label for a raw age value, if it is one of the declared values.
pub fn age_label(value: &str) -> Option<&'static str> {
    let age: AgeGroup = value.parse().ok()?;
    lookup(AGE_LABELS, age)
}

fn lookup<K: PartialEq>(table: &[(K, &'static str)], key: K) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, label)| *label)
}

/// Congratulation shown after the profile is saved. The callsign is embedded
/// verbatim; escape it before putting it into markup.
pub fn success_message(callsign: &str) -> String {
    format!("Идентификация завершена. Добро пожаловать в миссию, {callsign}!")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_gender_has_a_label() {
        for gender in Gender::ALL {
            assert!(gender_label(gender.as_str()).is_some(), "{gender} missing");
        }
        assert_eq!(gender_label("skip"), Some("Не указан"));
        assert_eq!(gender_label("female"), Some("Женский"));
    }

    #[test]
    fn every_age_has_a_label() {
        for age in AgeGroup::ALL {
            assert!(age_label(age.as_str()).is_some(), "{age} missing");
        }
        assert_eq!(age_label("18-25"), Some("18–25"));
        assert_eq!(age_label("46plus"), Some("46+"));
    }

    #[test]
    fn unknown_values_have_no_label() {
        assert!(gender_label("dragon").is_none());
        assert!(age_label("").is_none());
    }

    #[test]
    fn success_message_embeds_callsign_verbatim() {
        assert_eq!(
            success_message("Nova"),
            "Идентификация завершена. Добро пожаловать в миссию, Nova!"
        );
        assert!(success_message("<b>x</b>").contains("<b>x</b>"));
    }
}
