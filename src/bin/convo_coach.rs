#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio::io::{self, AsyncBufReadExt, BufReader};

use convo_coach::{
    Difficulty, EvalMode, Evaluator, Lexicon, OllamaAdapter, Session, SessionMeta,
};

#[derive(Parser)]
#[command(name = "convo-coach", version, about = "Score conversation turns against the coaching rubric")]
struct Cli {
    /// Utterances to score, one per line. Reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Engine selection policy.
    #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
    mode: ModeArg,

    /// Ollama model to use for the model-assisted path.
    #[arg(long, default_value = "gemma3:4b")]
    model: String,

    /// Conversation difficulty.
    #[arg(long, value_enum, default_value_t = DifficultyArg::Normal)]
    difficulty: DifficultyArg,

    /// Scenario label recorded in the session metadata.
    #[arg(long, default_value = "소개팅")]
    scenario: String,

    /// Counterpart utterance given to the model as reference context.
    #[arg(long, default_value = "")]
    npc_text: String,

    /// Write the full session export JSON to this file.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Auto,
    Model,
    Heuristic,
}

impl From<ModeArg> for EvalMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Auto => EvalMode::Auto,
            ModeArg::Model => EvalMode::Model,
            ModeArg::Heuristic => EvalMode::Heuristic,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(d: DifficultyArg) -> Self {
        match d {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mode: EvalMode = cli.mode.into();
    let difficulty: Difficulty = cli.difficulty.into();
    let lexicon = Lexicon::korean();

    let evaluator = match mode {
        EvalMode::Heuristic => Evaluator::heuristic(lexicon),
        _ => {
            let gateway = OllamaAdapter::from_env()?;
            Evaluator::with_gateway(Arc::new(gateway), cli.model.clone(), mode, lexicon)
        }
    };

    let utterances = read_utterances(cli.input.as_deref()).await?;

    let meta = SessionMeta::new(
        cli.model,
        convo_coach::model_eval::MODEL_EVAL_TEMPERATURE,
        utterances.len().max(1),
        difficulty,
        cli.scenario,
        mode,
    );
    let mut session = Session::new(meta);

    // One utterance, one evaluation, in order.
    for utterance in &utterances {
        let result = evaluator.evaluate(utterance, &cli.npc_text, difficulty).await;
        println!("{}", serde_json::to_string(&result)?);
        session.record_turn(result);
    }
    session.finish();

    let export = session.export(evaluator.lexicon());
    let export_json = serde_json::to_string_pretty(&export)?;
    match &cli.out {
        Some(path) => tokio::fs::write(path, export_json).await?,
        None => eprintln!("{export_json}"),
    }

    Ok(())
}

async fn read_utterances(input: Option<&std::path::Path>) -> std::io::Result<Vec<String>> {
    let raw = match input {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut lines = BufReader::new(io::stdin()).lines();
            let mut buf = String::new();
            while let Some(line) = lines.next_line().await? {
                buf.push_str(&line);
                buf.push('\n');
            }
            buf
        }
    };
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}
