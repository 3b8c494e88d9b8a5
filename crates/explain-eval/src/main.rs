mod cli;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use evaluation::{ChatCompletionJudge, CorpusWalker, EvaluationRunner, HttpSubjectClient};
use tracing::info;

use cli::Args;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = args
        .into_config()
        .context("Failed to load credentials")?;
    config.validate()?;

    info!(
        corpus = %config.corpus_dir.display(),
        subject = %config.subject.analyze_url(),
        judge = %config.judge.completions_url(),
        model = %config.judge.model,
        "Evaluation starting"
    );

    let walker = CorpusWalker::open(&config.corpus_dir)?;
    let subject = HttpSubjectClient::new(config.subject.clone())
        .context("Failed to build analysis service client")?;
    let judge =
        ChatCompletionJudge::new(config.judge.clone()).context("Failed to build judge client")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = EvaluationRunner::new(subject, judge)
        .run(walker.descriptors(), &mut out)
        .context("Failed to write evaluation output")?;
    out.flush()?;

    info!(
        scored = summary.scored(),
        skipped = summary.skipped.total(),
        "Done"
    );
    Ok(())
}
