//! Static screen descriptors for the onboarding UI.
//!
//! Screens run linearly: Splash → Welcome → Form → Consent. The privacy
//! policy is a standalone document linked from the consent screen. All
//! descriptors serialize to JSON so any host UI can render them.

use serde::Serialize;

use super::model::AgentRecord;
use super::schema::{fields, VisibleWhen, AGENT_SCHEMA};

/// The screens of the onboarding flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScreenId {
    #[serde(rename = "splash")]
    Splash,
    #[serde(rename = "onboard-welcome")]
    Welcome,
    #[serde(rename = "onboard-form")]
    Form,
    #[serde(rename = "onboard-consent")]
    Consent,
}

impl ScreenId {
    pub const ALL: [ScreenId; 4] = [Self::Splash, Self::Welcome, Self::Form, Self::Consent];

    /// Get the next screen in the linear progression, if any.
    pub fn next(&self) -> Option<ScreenId> {
        match self {
            Self::Splash => Some(Self::Welcome),
            Self::Welcome => Some(Self::Form),
            Self::Form => Some(Self::Consent),
            Self::Consent => None,
        }
    }

    /// Whether this is the last screen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Consent)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Splash => SPLASH.id,
            Self::Welcome => WELCOME.id,
            Self::Form => FORM.id,
            Self::Consent => CONSENT.id,
        }
    }
}

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SplashScreen {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub button: &'static str,
    pub style: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct WelcomeScreen {
    pub id: &'static str,
    pub title: &'static str,
    pub points: &'static [&'static str],
    pub button: &'static str,
}

/// How a form field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Radio,
    Select,
}

/// Free-text input attached to one option, shown while its condition holds.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subfield {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: InputKind,
    pub placeholder: &'static str,
    pub visible_when: VisibleWhen,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldOption {
    pub value: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subfield: Option<Subfield>,
}

/// One question on the form.
///
/// `required` here drives the UI marker and is independent of the schema's
/// own flag; the validator only looks at the four core fields.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormField {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: InputKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [FieldOption],
}

fn no_options(options: &&'static [FieldOption]) -> bool {
    options.is_empty()
}

impl FormField {
    /// Find an option by its stored value.
    pub fn option(&self, value: &str) -> Option<&'static FieldOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// The subfield that should be shown for the current record state.
    pub fn active_subfield(&self, record: &AgentRecord) -> Option<&'static Subfield> {
        self.options
            .iter()
            .filter_map(|o| o.subfield.as_ref())
            .find(|s| s.visible_when.is_satisfied(record))
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormScreen {
    pub id: &'static str,
    pub title: &'static str,
    pub progress: &'static str,
    pub fields: &'static [FormField],
}

impl FormScreen {
    pub fn field(&self, id: &str) -> Option<&'static FormField> {
        self.fields.iter().find(|f| f.id == id)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Summary {
    pub title: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConsentItem {
    pub id: &'static str,
    pub text: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentScreen {
    pub id: &'static str,
    pub title: &'static str,
    pub progress: &'static str,
    pub summary: Summary,
    pub consents: &'static [ConsentItem],
    pub more_info_link: &'static str,
    pub button: &'static str,
}

impl ConsentScreen {
    /// Whether every required consent id appears in `accepted`.
    pub fn all_required_accepted<S: AsRef<str>>(&self, accepted: &[S]) -> bool {
        self.consents
            .iter()
            .filter(|c| c.required)
            .all(|c| accepted.iter().any(|a| a.as_ref() == c.id))
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PolicySection {
    pub label: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PrivacyPolicy {
    pub title: &'static str,
    pub sections: &'static [PolicySection],
}

pub const SPLASH: SplashScreen = SplashScreen {
    id: "splash",
    title: "Digital Truth: Идентификация агента",
    subtitle: "Доступ к базе \"Digital Shield\" возможен только после регистрации агента.",
    button: "Начать идентификацию",
    style: "hero-centered",
};

pub const WELCOME: WelcomeScreen = WelcomeScreen {
    id: "onboard-welcome",
    title: "Добро пожаловать, Агент",
    points: &[
        "Мы тестируем вашу цифровую интуицию и навык факт-чека.",
        "Регистрация нужна, чтобы настроить миссии и собрать анонимную статистику.",
        "Это займёт < 1 минуты.",
    ],
    button: "Заполнить паспортичку",
};

const fn opt(value: &'static str, label: &'static str) -> FieldOption {
    FieldOption {
        value,
        label,
        subfield: None,
    }
}

const fn choice(
    id: &'static str,
    label: &'static str,
    kind: InputKind,
    required: bool,
    options: &'static [FieldOption],
) -> FormField {
    FormField {
        id,
        label,
        kind,
        required,
        placeholder: None,
        help: None,
        options,
    }
}

pub const FORM: FormScreen = FormScreen {
    id: "onboard-form",
    title: "Паспорт агента",
    progress: "Шаг 2 из 3",
    fields: &[
        FormField {
            id: fields::CALLSIGN,
            label: "Позывной агента",
            kind: InputKind::Text,
            required: true,
            placeholder: Some("Пример: Agent Nova"),
            help: Some("Это ваш публичный ник; личных данных не просим."),
            options: &[],
        },
        FormField {
            id: fields::GENDER,
            label: "Пол",
            kind: InputKind::Radio,
            required: true,
            placeholder: None,
            help: Some("(для анализа восприятия)"),
            options: &[
                opt("female", "Женский"),
                opt("male", "Мужской"),
                opt("nonbinary", "Небинарный"),
                opt("skip", "Не указывать"),
                FieldOption {
                    value: "other",
                    label: "Другое",
                    subfield: Some(Subfield {
                        id: fields::GENDER_OTHER,
                        kind: InputKind::Text,
                        placeholder: "Укажите",
                        visible_when: VisibleWhen {
                            field: fields::GENDER,
                            equals: "other",
                        },
                    }),
                },
            ],
        },
        choice(
            fields::AGE,
            "Возрастная группа",
            InputKind::Radio,
            true,
            &[
                opt("under18", "<18 лет"),
                opt("18-25", "18–25 лет"),
                opt("26-35", "26–35 лет"),
                opt("36-45", "36–45 лет"),
                opt("46plus", "46+ лет"),
            ],
        ),
        choice(
            fields::REGION,
            "Регион / Город",
            InputKind::Select,
            true,
            &[
                opt("russia", "Россия"),
                opt("ukraine", "Украина"),
                opt("belarus", "Беларусь"),
                opt("kazakhstan", "Казахстан"),
                opt("other-cis", "Другие страны СНГ"),
                opt("europe", "Европа"),
                opt("americas", "Америки"),
                opt("asia", "Азия"),
                opt("africa", "Африка"),
                opt("other", "Другое"),
            ],
        ),
        choice(
            fields::EDUCATION,
            "Уровень образования",
            InputKind::Select,
            false,
            &[
                opt("secondary", "Среднее"),
                opt("vocational", "Среднее специальное"),
                opt("student", "Студент"),
                opt("bachelor", "Высшее (бакалавр)"),
                opt("master", "Высшее (магистр, PhD)"),
                opt("other", "Другое"),
            ],
        ),
        choice(
            fields::ACTIVITY,
            "Онлайн-активность в день",
            InputKind::Radio,
            false,
            &[
                opt("under2h", "<2ч"),
                opt("2-5h", "2–5ч"),
                opt("5-8h", "5–8ч"),
                opt("8plus", "8+ часов"),
            ],
        ),
        choice(
            fields::PLATFORM,
            "Любимая платформа",
            InputKind::Radio,
            false,
            &[
                opt("instagram", "Instagram"),
                opt("tiktok", "TikTok"),
                opt("telegram", "Telegram"),
                opt("youtube", "YouTube"),
                opt("x", "X (Twitter)"),
                opt("vk", "VK"),
                opt("other", "Другое"),
            ],
        ),
        choice(
            fields::FACTCHECK,
            "Как часто ты проверяешь факты?",
            InputKind::Radio,
            false,
            &[
                opt("always", "Всегда"),
                opt("sometimes", "Иногда"),
                opt("rarely", "Редко"),
                opt("never", "Никогда"),
            ],
        ),
        choice(
            fields::ROLE,
            "Твоя роль в сети",
            InputKind::Radio,
            false,
            &[
                opt("observer", "Наблюдатель"),
                opt("active", "Активный"),
                opt("creator", "Создатель"),
                opt("analyst", "Аналитик"),
                opt("anon", "Аноним"),
            ],
        ),
        choice(
            fields::GOAL,
            "Цель участия",
            InputKind::Radio,
            false,
            &[
                opt("play", "Играю"),
                opt("challenge", "Проверить себя"),
                opt("fakes", "Тема фейков интересует"),
                opt("research", "Участвую в исследовании"),
            ],
        ),
    ],
};

pub const CONSENT: ConsentScreen = ConsentScreen {
    id: "onboard-consent",
    title: "Проверка данных агента",
    progress: "Шаг 3 из 3",
    summary: Summary {
        title: "О данных простыми словами",
        text: "Мы собираем только анонимные ответы и игровые действия (выборы, время реакции, ошибки/успехи). Личных данных (ФИО, телефон и т.п.) — нет.",
    },
    consents: &[
        ConsentItem {
            id: "consentData",
            text: "Я согласен(сна) на обработку моих анонимных данных для исследовательских целей и улучшения игры.",
            required: true,
        },
        ConsentItem {
            id: "consentAge",
            text: "Мне 16 лет и больше.",
            required: true,
        },
    ],
    more_info_link: "Подробнее о защите данных",
    button: "Активировать профиль агента",
};

pub const PRIVACY_POLICY: PrivacyPolicy = PrivacyPolicy {
    title: "Как мы обрабатываем ваши данные",
    sections: &[
        PolicySection {
            label: "Кто обрабатывает данные",
            text: "команда проекта \"Digital Truth\".",
        },
        PolicySection {
            label: "Что собираем",
            text: "пол, возрастной диапазон, регион, ответы на вопросы и игровые действия (время реакции, решения, успех/ошибка).",
        },
        PolicySection {
            label: "Цель",
            text: "исследование восприятия цифровой информации и улучшение механик игры.",
        },
        PolicySection {
            label: "Правовая основа",
            text: "добровольное согласие участника.",
        },
        PolicySection {
            label: "Срок хранения",
            text: "до окончания исследования (не более 24 месяцев), затем данные удаляются или остаются только в полностью агрегированном виде.",
        },
        PolicySection {
            label: "Передача третьим лицам",
            text: "только в виде обезличенной статистики.",
        },
        PolicySection {
            label: "Контакты",
            text: "support@digitaltruth.game для вопросов или отзыва согласия.",
        },
    ],
};

/// Schema plus every descriptor as one JSON document for host UIs.
pub fn catalog() -> serde_json::Value {
    serde_json::json!({
        "schema": AGENT_SCHEMA,
        "screens": {
            "splash": SPLASH,
            "welcome": WELCOME,
            "form": FORM,
            "consent": CONSENT,
            "privacyPolicy": PRIVACY_POLICY,
        }
    })
}
