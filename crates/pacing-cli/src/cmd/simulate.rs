//! Trace replay command

use anyhow::Result;
use owo_colors::OwoColorize;
use pacing::PacingConfig;
use pacing_cli::{replay, Mode};
use std::time::Duration;

/// Replay `offsets` and print every execution
pub async fn run(
    config: &PacingConfig,
    mode: Mode,
    delay_ms: Option<i64>,
    offsets: &[u64],
) -> Result<()> {
    let mut effective = config.clone();
    if let Some(delay_ms) = delay_ms {
        match mode {
            Mode::Debounce => effective.debounce.delay_ms = delay_ms,
            Mode::Throttle => effective.throttle.window_ms = delay_ms,
        }
    }
    effective.validate()?;

    let delay = match mode {
        Mode::Debounce => effective.debounce.delay(),
        Mode::Throttle => effective.throttle.window(),
    };

    let label = match mode {
        Mode::Debounce => "debounce",
        Mode::Throttle => "throttle",
    };
    println!(
        "{} {} ({} calls, {} ms)",
        "Replaying".bold(),
        label.cyan(),
        offsets.len(),
        delay.as_millis()
    );

    let executions = replay(mode, delay, offsets).await?;

    for execution in &executions {
        println!(
            "  call #{} at {} ms {} executed at {} ms",
            execution.call_index,
            millis(execution.requested_at),
            "->".dimmed(),
            millis(execution.executed_at).green()
        );
    }

    let dropped = offsets.len() - executions.len();
    println!(
        "\n{} executed, {} {}",
        executions.len().to_string().green(),
        dropped.to_string().yellow(),
        if mode == Mode::Debounce { "superseded" } else { "dropped" }
    );

    Ok(())
}

fn millis(duration: Duration) -> u128 {
    duration.as_millis()
}
