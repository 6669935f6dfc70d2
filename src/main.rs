use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use kibitz_core::ChessPosition;
use kibitz_engine::{EngineConfig, MAX_DEPTH, SearchEngine};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Search one position and print the chosen move.
#[derive(Debug, Parser)]
#[command(name = "kibitz", version)]
struct Args {
    /// Iterative-deepening depth limit.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_DEPTH)))]
    depth: Option<u8>,

    /// Time budget in milliseconds.
    #[arg(long, default_value_t = 1000)]
    movetime: u64,

    /// Search even when the position is in the opening book.
    #[arg(long)]
    no_book: bool,

    /// Position as FEN fields; the start position when omitted.
    fen: Vec<String>,
}

impl Args {
    fn fen(&self) -> Option<String> {
        (!self.fen.is_empty()).then(|| self.fen.join(" "))
    }

    fn movetime(&self) -> Duration {
        Duration::from_millis(self.movetime)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut pos = match args.fen() {
        Some(fen) => ChessPosition::from_fen(&fen).with_context(|| format!("invalid FEN {fen:?}"))?,
        None => ChessPosition::startpos(),
    };

    let mut config = EngineConfig::default().with_book(!args.no_book);
    if let Some(depth) = args.depth {
        config = config.with_max_depth(depth);
    }
    let mut engine = SearchEngine::new(config).context("failed to build engine")?;

    info!(fen = %pos, movetime_ms = args.movetime, "kibitz starting");
    let outcome = engine.search(&mut pos, args.movetime());

    match outcome.best_move {
        Some(mv) => {
            let pv = outcome
                .pv
                .iter()
                .map(|m| m.to_uci())
                .collect::<Vec<_>>()
                .join(" ");
            if let Some(score) = outcome.score {
                println!(
                    "info depth {} seldepth {} score cp {} nodes {} time {} pv {}",
                    outcome.depth,
                    outcome.seldepth,
                    score,
                    outcome.nodes,
                    outcome.elapsed.as_millis(),
                    pv
                );
            }
            println!("bestmove {mv}");
        }
        None => println!("bestmove (none)"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;

    use super::Args;

    fn parse(line: &str) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("kibitz").chain(line.split_whitespace()))
    }

    #[test]
    fn defaults() {
        let args = parse("").unwrap();
        assert!(args.fen().is_none());
        assert!(args.depth.is_none());
        assert!(!args.no_book);
        assert_eq!(args.movetime(), Duration::from_millis(1000));
    }

    #[test]
    fn flags_and_fen() {
        let args = parse("--depth 4 --no-book --movetime 250 8/8/4k3/8/8/4K3/8/7R w - - 0 1").unwrap();
        assert_eq!(args.depth, Some(4));
        assert!(args.no_book);
        assert_eq!(args.movetime(), Duration::from_millis(250));
        assert_eq!(args.fen().as_deref(), Some("8/8/4k3/8/8/4K3/8/7R w - - 0 1"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse("--depth").is_err());
        assert!(parse("--depth x").is_err());
        assert!(parse("--depth 40").is_err());
        assert!(parse("--frobnicate").is_err());
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
