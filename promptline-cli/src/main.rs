use std::time::Duration;

use anyhow::Context;
use promptline::{
    Cancellable, CancellationToken, Prompt, PromptSequence, Responses, serialization,
    validation::{self, Rule},
};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const TIMEOUT_ENV: &str = "PROMPTLINE_TIMEOUT_SECS";

fn banner() {
    println!("--------------------------------------------------------------",);
    println!("██████  ██████   ██████  ███    ███ ██████  ████████ ",);
    println!("██   ██ ██   ██ ██    ██ ████  ████ ██   ██    ██    ",);
    println!("██████  ██████  ██    ██ ██ ████ ██ ██████     ██    ",);
    println!("██      ██   ██ ██    ██ ██  ██  ██ ██         ██    ",);
    println!("██      ██   ██  ██████  ██      ██ ██         ██    ",);
    println!("                  VERSION:    {}", env!("CARGO_PKG_VERSION"));
    println!("--------------------------------------------------------------",);
}

fn questionnaire() -> anyhow::Result<PromptSequence> {
    let age_pattern = Regex::new(r"^[0-9]+$").context("invalid age pattern")?;

    Ok(PromptSequence::new([
        Prompt::new("Enter Name")
            .key("name")
            .validator(validation::chain([
                validation::min_len(2),
                validation::max_len(32),
            ]))
            .invalid_message("Name should be between 2 - 32 characters"),
        Prompt::new("Age")
            .key("age")
            .pattern(age_pattern)
            .validator(validation::rules(vec![Rule::IsBetween(0, 150)]))
            .serializer(serialization::unsigned())
            .invalid_message("Age should be between 0 - 150"),
        Prompt::new("Ip")
            .key("ip")
            .default_text("192.168.1.1")
            .validator(validation::ip_address())
            .serializer(serialization::ip()),
        Prompt::new("Password")
            .key("password")
            .masked(true)
            .suppress_echo(true),
    ]))
}

/// Reads the optional timeout; unset or empty means no timeout.
fn timeout_from_env() -> anyhow::Result<Option<Duration>> {
    match std::env::var(TIMEOUT_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            let secs: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("{TIMEOUT_ENV} must be a number of seconds"))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        _ => Ok(None),
    }
}

/// Token fired by ctrl-c or, when configured, by the timeout.
///
/// The password prompt reads the terminal in raw mode, where ctrl-c arrives as
/// a key press instead of a signal: there it only restarts the password prompt.
/// The timeout still applies.
fn cancellation(timeout: Option<Duration>) -> CancellationToken {
    let token = match timeout {
        Some(duration) => promptline::cancel_after(duration),
        None => CancellationToken::new(),
    };

    let on_signal = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    on_signal.cancel();
                }
            }
            _ = on_signal.cancelled() => {}
        }
    });

    token
}

fn redacted(responses: &Responses) -> anyhow::Result<Value> {
    let mut object = Map::new();
    for (key, answer) in responses.iter() {
        let value = match (key, answer) {
            ("password", Some(_)) => Value::String("********".to_string()),
            (_, answer) => serde_json::to_value(answer)?,
        };
        object.insert(key.to_string(), value);
    }
    Ok(Value::Object(object))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    banner();

    let timeout = timeout_from_env()?;
    debug!(?timeout, "starting questionnaire");

    let token = cancellation(timeout);
    let responses = match questionnaire()?.execute_with_cancellation(&token).await {
        Ok(responses) => responses,
        Err(err) if err.is_cancelled() => {
            eprintln!("\nQuestionnaire cancelled.");
            // The abandoned read still holds stdin; the runtime would wait for it.
            std::process::exit(1);
        }
        Err(err) => return Err(err).context("questionnaire failed"),
    };
    token.cancel();

    info!(answers = responses.len(), "questionnaire complete");

    if let Some(name) = responses.get("name") {
        println!("\nHello {name}!");
    }
    println!("{}", serde_json::to_string_pretty(&redacted(&responses)?)?);

    Ok(())
}
