//! Terminal host: renders the onboarding screens on stdin/stdout.
//!
//! Walks Splash → Welcome → Form → Consent, collecting answers line by line.
//! Radio and select fields accept either the option number or its value.

use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

use crate::onboarding::schema::schema_field;
use crate::onboarding::screens::{
    FormField, InputKind, ScreenId, CONSENT, FORM, PRIVACY_POLICY, SPLASH, WELCOME,
};
use crate::onboarding::{
    age_label, gender_label, success_message, validate, AgentRecord, AgentStore,
};

/// Run the whole flow. Returns the saved record, or `None` if input ended
/// before the profile was activated.
pub async fn run_flow<R, W>(
    input: R,
    output: W,
    store: &AgentStore,
) -> io::Result<Option<AgentRecord>>
where
    R: AsyncRead + Unpin,
    W: Write,
{
    let mut prompter = Prompter {
        lines: BufReader::new(input).lines(),
        out: output,
    };
    let mut record = AgentRecord::default();

    let mut screen = Some(ScreenId::Splash);
    while let Some(current) = screen {
        tracing::debug!(screen = %current, "Showing screen");
        let finished = match current {
            ScreenId::Splash => prompter.splash().await?,
            ScreenId::Welcome => prompter.welcome().await?,
            ScreenId::Form => prompter.form(&mut record).await?,
            ScreenId::Consent => prompter.consent().await?,
        };
        if !finished {
            tracing::info!(screen = %current, "Input ended, onboarding aborted");
            return Ok(None);
        }
        screen = current.next();
    }

    let saved = store.save(&record);
    let callsign = saved.callsign.as_deref().unwrap_or_default().trim();
    writeln!(prompter.out, "\n{}", success_message(callsign))?;
    Ok(Some(saved))
}

/// Short human-readable summary of a stored record.
pub fn describe(record: &AgentRecord) -> String {
    let mut parts = Vec::new();

    parts.push(format!(
        "Позывной: {}",
        record.callsign.as_deref().unwrap_or("—")
    ));

    if let Some(gender) = record.gender.as_deref() {
        let label = gender_label(gender).unwrap_or(gender);
        match record.gender_other.as_deref() {
            Some(other) if gender == "other" && !other.is_empty() => {
                parts.push(format!("Пол: {label} ({other})"))
            }
            _ => parts.push(format!("Пол: {label}")),
        }
    }
    if let Some(age) = record.age.as_deref() {
        parts.push(format!("Возраст: {}", age_label(age).unwrap_or(age)));
    }
    if let Some(region) = record.region.as_deref() {
        let label = FORM
            .field("region")
            .and_then(|f| f.option(region))
            .map(|o| o.label)
            .unwrap_or(region);
        parts.push(format!("Регион: {label}"));
    }
    if let Some(at) = record.completed_at {
        parts.push(format!("Зарегистрирован: {}", at.format("%Y-%m-%d %H:%M UTC")));
    }

    parts.join("\n")
}

fn clamp_chars(text: &str, max: Option<usize>) -> String {
    match max {
        Some(max) => text.chars().take(max).collect(),
        None => text.to_string(),
    }
}

/// Line-oriented question/answer loop over an async reader.
struct Prompter<R, W> {
    lines: Lines<BufReader<R>>,
    out: W,
}

impl<R, W> Prompter<R, W>
where
    R: AsyncRead + Unpin,
    W: Write,
{
    /// Print `prompt` and read one trimmed line. `None` on EOF.
    async fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt}> ")?;
        self.out.flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    async fn press_enter(&mut self, button: &str) -> io::Result<bool> {
        Ok(self.ask(&format!("[Enter] {button} ")).await?.is_some())
    }

    async fn splash(&mut self) -> io::Result<bool> {
        writeln!(self.out, "\n=== {} ===\n{}\n", SPLASH.title, SPLASH.subtitle)?;
        self.press_enter(SPLASH.button).await
    }

    async fn welcome(&mut self) -> io::Result<bool> {
        writeln!(self.out, "\n{}", WELCOME.title)?;
        for point in WELCOME.points {
            writeln!(self.out, "  • {point}")?;
        }
        self.press_enter(WELCOME.button).await
    }

    async fn form(&mut self, record: &mut AgentRecord) -> io::Result<bool> {
        writeln!(self.out, "\n{} ({})", FORM.title, FORM.progress)?;
        for field in FORM.fields {
            if !self.field(field, record).await? {
                return Ok(false);
            }
        }

        loop {
            let result = validate(record);
            if result.valid {
                return Ok(true);
            }
            for error in &result.errors {
                writeln!(self.out, "! {error}")?;
            }
            for id in result.failed_fields() {
                let Some(field) = FORM.field(id) else {
                    continue;
                };
                if !self.field(field, record).await? {
                    return Ok(false);
                }
            }
        }
    }

    /// Ask one form field (and its subfield, if the answer unlocks one).
    async fn field(&mut self, field: &FormField, record: &mut AgentRecord) -> io::Result<bool> {
        let marker = if field.required { " *" } else { "" };
        writeln!(self.out, "\n{}{marker}", field.label)?;
        if let Some(help) = field.help {
            writeln!(self.out, "  {help}")?;
        }

        let value = match field.kind {
            InputKind::Text => {
                let prompt = field.placeholder.unwrap_or_default();
                let Some(answer) = self.ask(prompt).await? else {
                    return Ok(false);
                };
                let max = schema_field(field.id).and_then(|s| s.max_len());
                Some(clamp_chars(&answer, max))
            }
            InputKind::Radio | InputKind::Select => {
                for (i, option) in field.options.iter().enumerate() {
                    writeln!(self.out, "  {}) {}", i + 1, option.label)?;
                }
                match self.choose(field).await? {
                    Some(choice) => choice,
                    None => return Ok(false),
                }
            }
        };
        record.set_field(field.id, value.filter(|v| !v.is_empty()));

        for sub in field.options.iter().filter_map(|o| o.subfield.as_ref()) {
            if !sub.visible_when.is_satisfied(record) {
                record.set_field(sub.id, None);
            }
        }
        if let Some(sub) = field.active_subfield(record) {
            let Some(answer) = self.ask(sub.placeholder).await? else {
                return Ok(false);
            };
            let max = schema_field(sub.id).and_then(|s| s.max_len());
            let answer = clamp_chars(&answer, max);
            record.set_field(sub.id, Some(answer).filter(|v| !v.is_empty()));
        }
        Ok(true)
    }

    /// Read until the answer names an option. Outer `None` is EOF; inner
    /// `None` is a skipped (blank) answer.
    async fn choose(&mut self, field: &FormField) -> io::Result<Option<Option<String>>> {
        loop {
            let Some(answer) = self.ask("").await? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(None));
            }
            let by_number = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| field.options.get(i));
            if let Some(option) = by_number.or_else(|| field.option(&answer)) {
                return Ok(Some(Some(option.value.to_string())));
            }
            writeln!(
                self.out,
                "  Unknown option {answer:?}, enter 1-{}",
                field.options.len()
            )?;
        }
    }

    async fn consent(&mut self) -> io::Result<bool> {
        writeln!(self.out, "\n{} ({})", CONSENT.title, CONSENT.progress)?;
        writeln!(self.out, "{}\n{}", CONSENT.summary.title, CONSENT.summary.text)?;
        writeln!(self.out, "(? — {})", CONSENT.more_info_link)?;

        loop {
            let mut accepted: Vec<&str> = Vec::new();
            for item in CONSENT.consents {
                loop {
                    let Some(answer) = self.ask(&format!("{} [y/n] ", item.text)).await? else {
                        return Ok(false);
                    };
                    match answer.to_lowercase().as_str() {
                        "?" => self.privacy_policy()?,
                        "y" | "yes" | "д" | "да" => {
                            accepted.push(item.id);
                            break;
                        }
                        _ => break,
                    }
                }
            }
            if CONSENT.all_required_accepted(&accepted) {
                break;
            }
            writeln!(self.out, "  All required consents must be accepted.")?;
        }

        self.press_enter(CONSENT.button).await
    }

    fn privacy_policy(&mut self) -> io::Result<()> {
        writeln!(self.out, "\n{}", PRIVACY_POLICY.title)?;
        for section in PRIVACY_POLICY.sections {
            writeln!(self.out, "  {}: {}", section.label, section.text)?;
        }
        writeln!(self.out)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryStore;

    fn store() -> AgentStore {
        AgentStore::new(Arc::new(MemoryStore::new()))
    }

    async fn run(input: &str, store: &AgentStore) -> (Option<AgentRecord>, String) {
        let mut out = Vec::new();
        let saved = run_flow(input.as_bytes(), &mut out, store).await.unwrap();
        (saved, String::from_utf8(out).unwrap())
    }

    // splash, welcome, then the ten form fields in order
    const HAPPY_PATH: &str = "\n\nNova\n5\nagender\n2\nrussia\n\n\n3\n\n\n4\n?\ny\ny\n\n";

    #[tokio::test]
    async fn happy_path_saves_record() {
        let store = store();
        let (saved, out) = run(HAPPY_PATH, &store).await;
        let saved = saved.unwrap();

        assert_eq!(saved.callsign.as_deref(), Some("Nova"));
        assert_eq!(saved.gender.as_deref(), Some("other"));
        assert_eq!(saved.gender_other.as_deref(), Some("agender"));
        assert_eq!(saved.age.as_deref(), Some("18-25"));
        assert_eq!(saved.region.as_deref(), Some("russia"));
        assert!(saved.education.is_none());
        assert_eq!(saved.platform.as_deref(), Some("telegram"));
        assert_eq!(saved.goal.as_deref(), Some("research"));
        assert!(saved.completed_at.is_some());

        assert_eq!(store.load(), Some(saved));
        assert!(out.contains("Digital Truth: Идентификация агента"));
        assert!(out.contains(PRIVACY_POLICY.title));
        assert!(out.contains("Добро пожаловать в миссию, Nova!"));
    }

    #[tokio::test]
    async fn blank_callsign_is_asked_again() {
        let store = store();
        let input = "\n\n   \n1\n1\n1\n\n\n\n\n\n\nVega\ny\ny\n\n";
        let (saved, out) = run(input, &store).await;
        assert!(out.contains("! callsign: required"));
        let saved = saved.unwrap();
        assert_eq!(saved.callsign.as_deref(), Some("Vega"));
        assert_eq!(saved.gender.as_deref(), Some("female"));
        assert!(saved.gender_other.is_none());
    }

    #[tokio::test]
    async fn unknown_option_is_rejected() {
        let store = store();
        let input = "\n\nNova\n9\nmale\n46plus\n10\n\n\n\n\n\n\ny\ny\n\n";
        let (saved, out) = run(input, &store).await;
        assert!(out.contains("Unknown option \"9\""));
        let saved = saved.unwrap();
        assert_eq!(saved.gender.as_deref(), Some("male"));
        assert_eq!(saved.region.as_deref(), Some("other"));
    }

    #[tokio::test]
    async fn declined_consent_repeats_consent_screen() {
        let store = store();
        let input = "\n\nNova\n2\n3\n4\n\n\n\n\n\n\nn\ny\ny\ny\n\n";
        let (saved, out) = run(input, &store).await;
        assert!(out.contains("All required consents must be accepted."));
        assert!(saved.is_some());
    }

    #[tokio::test]
    async fn long_callsign_is_clamped() {
        let store = store();
        let long = "x".repeat(40);
        let input = format!("\n\n{long}\n1\n1\n1\n\n\n\n\n\n\ny\ny\n\n");
        let (saved, _) = run(&input, &store).await;
        assert_eq!(saved.unwrap().callsign.unwrap().chars().count(), 32);
    }

    #[tokio::test]
    async fn eof_aborts_without_saving() {
        let store = store();
        let (saved, _) = run("\n\nNova\n", &store).await;
        assert!(saved.is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn describe_uses_labels() {
        let record = AgentRecord::default()
            .with("callsign", "Nova")
            .with("gender", "other")
            .with("genderOther", "agender")
            .with("age", "46plus")
            .with("region", "other-cis");
        let text = describe(&record);
        assert!(text.contains("Позывной: Nova"));
        assert!(text.contains("Пол: Другое (agender)"));
        assert!(text.contains("Возраст: 46+"));
        assert!(text.contains("Регион: Другие страны СНГ"));
    }

    #[test]
    fn clamp_counts_chars_not_bytes() {
        assert_eq!(clamp_chars("Агент Нова", Some(5)), "Агент");
        assert_eq!(clamp_chars("abc", None), "abc");
    }
}
