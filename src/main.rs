use agent_onboarding::cli::{describe, run_flow};
use agent_onboarding::config::OnboardingConfig;
use agent_onboarding::onboarding::catalog;

const USAGE: &str = "usage: agent-onboarding [show | reset | screens]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = OnboardingConfig::from_env()?;

    let store = config.build_store()?;
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        persist = config.persist,
        "Storage configured"
    );

    match std::env::args().nth(1).as_deref() {
        None => {
            if let Some(existing) = store.load() {
                println!("{}", describe(&existing));
                eprintln!("\nAlready registered. Run `agent-onboarding reset` to start over.");
                return Ok(());
            }
            let stdin = tokio::io::stdin();
            if run_flow(stdin, std::io::stdout(), &store).await?.is_none() {
                eprintln!("\nOnboarding not completed.");
            }
        }
        Some("show") => match store.load() {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => eprintln!("No agent registered."),
        },
        Some("reset") => {
            store.clear();
            eprintln!("Agent data cleared.");
        }
        Some("screens") => println!("{}", serde_json::to_string_pretty(&catalog())?),
        Some(other) => {
            eprintln!("Unknown command: {other}\n{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
