use crate::output::print_json;
use anyhow::bail;
use clap::Args;
use jarvis_core::{
    config::Config,
    llm::{self, PromptRequest},
};
use serde_json::json;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

const TYPING_DELAY: Duration = Duration::from_millis(30);

#[derive(Args, Debug, Default, PartialEq)]
pub struct PromptArgs {
    /// Model shorthand: 4 or 3.5 (default: llm.model from config)
    #[arg(long)]
    pub model: Option<String>,
    /// Sampling temperature
    #[arg(long = "temp")]
    pub temperature: Option<f32>,
    /// Print the reply one character at a time
    #[arg(long)]
    pub slow: bool,
    /// Answer as the Jarvis persona
    #[arg(long)]
    pub persona: bool,
}

pub fn run(root: &Path, text: &str, args: &PromptArgs, json: bool) -> anyhow::Result<()> {
    let text = text.trim();
    if text.is_empty() {
        bail!("enter a prompt, e.g. jarvis run-prompt \"Give me 5 ideas for a newsletter.\"");
    }
    if let Some(t) = args.temperature {
        if !(0.0..=2.0).contains(&t) {
            bail!("--temp must be between 0 and 2, got {t}");
        }
    }

    let api_key = llm::api_key_from_env()?;
    let config = Config::load_or_default(root)?;

    let mut request = PromptRequest::new(text);
    request.model = args.model.as_deref().map(|m| llm::model_for_flag(m).to_string());
    request.temperature = args.temperature;
    request.persona = args.persona;

    let model = request.model.clone().unwrap_or_else(|| config.llm.model.clone());
    let reply = llm::complete(&config.llm, &api_key, &request)?;

    if json {
        return print_json(&json!({ "model": model, "reply": reply }));
    }

    println!("GPT ({model}) says:");
    if args.slow {
        type_out(&reply)?;
    } else {
        println!("{reply}");
    }
    Ok(())
}

/// Free text after `jarvis`: flags are picked out, the remaining words are
/// the prompt.
pub fn run_free_text(root: &Path, words: &[String], json: bool) -> anyhow::Result<()> {
    let (text, args) = parse_free_text(words)?;
    if text.is_empty() {
        bail!("enter a prompt, e.g. jarvis \"Summarize this idea in 3 lines\"");
    }
    run(root, &text, &args, json)
}

fn parse_free_text(words: &[String]) -> anyhow::Result<(String, PromptArgs)> {
    let mut args = PromptArgs::default();
    let mut text = Vec::new();
    let mut iter = words.iter();

    while let Some(word) = iter.next() {
        match word.as_str() {
            "--model" => match iter.next() {
                Some(v) => args.model = Some(v.clone()),
                None => bail!("--model needs a value"),
            },
            "--temp" => match iter.next() {
                Some(v) => {
                    args.temperature = Some(
                        v.parse()
                            .map_err(|_| anyhow::anyhow!("--temp expects a number, got '{v}'"))?,
                    )
                }
                None => bail!("--temp needs a value"),
            },
            "--slow" => args.slow = true,
            "--persona" => args.persona = true,
            _ => text.push(word.as_str()),
        }
    }

    Ok((text.join(" "), args))
}

fn type_out(text: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    for ch in text.chars() {
        write!(stdout, "{ch}")?;
        stdout.flush()?;
        std::thread::sleep(TYPING_DELAY);
    }
    writeln!(stdout)?;
    Ok(())
}
