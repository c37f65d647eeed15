//! A terminal shopping guide built on the `shopping-guide` library.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::pin::pin;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use shopping_guide::SessionBuilder;
use shopping_guide::core::{InputType, NextTurn, Validation};
use shopping_guide::prompt::{Command, apply_input, parse_command};
use shopping_guide_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use shopping_guide_proxy_model::{ProxyConfigBuilder, ProxyProvider};
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::time::sleep;

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Some(builder) = session_builder_from_env() else {
        return;
    };
    let validation = if env_flag("SHOPPING_GUIDE_STRICT") {
        Validation::Strict
    } else {
        Validation::Lenient
    };
    let mut session = builder.with_validation(validation).build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    'outer: loop {
        // Keep asking until the first round goes through.
        let mut turn = loop {
            print!("What are you looking for? ");
            std::io::stdout().flush().unwrap();

            let Some(line) = read_line().await else {
                break 'outer;
            };
            let request = match parse_command(&line) {
                Command::Quit => break 'outer,
                Command::NewRequest(request) | Command::Answer(request) => {
                    request
                }
            };
            if request.is_empty() {
                continue;
            }
            let result =
                with_spinner(&progress_style, session.submit_request(&request))
                    .await;
            match result {
                Ok(turn) => break turn,
                Err(err) => report_failure(&err),
            }
        };

        loop {
            render_turn(&turn);

            let Some(line) = read_line().await else {
                break 'outer;
            };
            match parse_command(&line) {
                Command::Quit => break 'outer,
                Command::NewRequest(request) => {
                    let result = with_spinner(
                        &progress_style,
                        session.submit_request(&request),
                    )
                    .await;
                    match result {
                        Ok(next_turn) => turn = next_turn,
                        Err(err) => report_failure(&err),
                    }
                    continue;
                }
                Command::Answer(input) => {
                    if let Err(err) =
                        apply_input(session.selection_mut(), &turn, &input)
                    {
                        println!("{} {err}", "✗".bright_yellow());
                        continue;
                    }
                }
            }

            // The pending answer survives a failed round, so retrying just
            // submits it again.
            loop {
                let result =
                    with_spinner(&progress_style, session.submit_answer())
                        .await;
                match result {
                    Ok(next_turn) => {
                        turn = next_turn;
                        break;
                    }
                    Err(err) => {
                        report_failure(&err);
                        print!("Retry? [Y/n]: ");
                        std::io::stdout().flush().unwrap();

                        let Some(line) = read_line().await else {
                            break 'outer;
                        };
                        let line = line.trim();
                        if !(line.is_empty() || line.eq_ignore_ascii_case("y"))
                        {
                            break;
                        }
                    }
                }
            }
        }
    }
}

fn session_builder_from_env() -> Option<SessionBuilder> {
    if let Ok(endpoint) = env::var("SHOPPING_GUIDE_PROXY_URL") {
        info!("using the proxy at {endpoint}");
        let config = ProxyConfigBuilder::with_endpoint(endpoint).build();
        return Some(SessionBuilder::with_model_provider(ProxyProvider::new(
            config,
        )));
    }

    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        eprintln!(
            "Either SHOPPING_GUIDE_PROXY_URL or OPENAI_API_KEY environment \
             variable must be set"
        );
        return None;
    };
    let mut config = OpenAIConfigBuilder::with_api_key(api_key)
        .with_streaming(env_flag("OPENAI_STREAM"))
        .with_json_mode(env_flag("OPENAI_JSON_MODE"));
    if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
        config = config.with_base_url(base_url);
    }
    if let Ok(model) = env::var("OPENAI_MODEL") {
        config = config.with_model(model);
    }
    let config = config.build();
    debug!("using {config:?}");
    Some(SessionBuilder::with_model_provider(OpenAIProvider::new(config)))
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn render_turn(turn: &NextTurn) {
    let bar = BAR_CHAR.bright_cyan();
    println!("\n{bar}🛍️  {}", turn.query.bright_white().bold());

    let hint = match &turn.input_type {
        InputType::Single | InputType::Multiple if turn.choices.is_empty() => {
            "Press enter to continue"
        }
        InputType::Single => "Pick one number",
        InputType::Multiple => "Pick any numbers, e.g. 1,3",
        InputType::FreeText => "Type your answer",
        InputType::Other(_) => "Press enter to continue",
    };
    if turn.input_type.is_choice() {
        for (idx, choice) in turn.choices.iter().enumerate() {
            println!("{bar}  {}. {choice}", (idx + 1).bright_white());
        }
    }
    let hint = format!(
        "{hint} (/new <request> to change the request, /quit to leave)"
    );
    println!("{}", hint.dimmed());
    print!("> ");
    std::io::stdout().flush().unwrap();
}

fn report_failure(err: &dyn std::error::Error) {
    println!("{} {err}", "✗ Round failed:".bright_red());
    println!("{}", "Nothing was recorded, you can try again.".dimmed());
}

/// Runs `fut` while showing a spinner.
async fn with_spinner<T>(
    style: &ProgressStyle,
    fut: impl Future<Output = T>,
) -> T {
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(style.clone());
    progress_bar.set_message("🤔 Thinking...");

    let mut fut = pin!(fut);
    let output = loop {
        progress_bar.inc(1);
        select! {
            output = &mut fut => break output,
            _ = sleep(Duration::from_millis(100)) => {}
        }
    };

    // Finish the progress bar before printing anything else.
    progress_bar.finish_and_clear();
    output
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
