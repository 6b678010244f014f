use std::time::Duration;

use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use clinicbot::config::AppConfig;
use clinicbot::services::ai::functions::system_prompt;
use clinicbot::services::ai::openai::OpenAiProvider;
use clinicbot::services::conversation::{RetryPolicy, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();

    if config.openai_api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set, requests will be unauthenticated");
    }
    tracing::info!("using completion API at {} (model: {})", config.openai_api_url, config.openai_model);

    let llm = OpenAiProvider::new(
        config.openai_api_key.clone(),
        config.openai_api_url.clone(),
        config.openai_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;

    let today = chrono::Local::now().date_naive();
    let mut session = Session::new(
        Box::new(llm),
        system_prompt(&config.clinic_name, today),
        config.clinic_name.clone(),
    )
    .with_retry(RetryPolicy {
        max_retries: config.llm_max_retries,
        ..RetryPolicy::default()
    });

    let stdin = BufReader::new(tokio::io::stdin());
    session.run(stdin, tokio::io::stdout()).await?;

    Ok(())
}
