//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::cli::{ModelArgs, OutputFormat, output};
use crate::markov::{Analysis, AnalysisOptions};
use crate::{Config, Error, Result, cli::Cli};

/// Command-line flags take precedence over the config file
fn resolve_options(model: ModelArgs, config: &Config) -> AnalysisOptions {
    AnalysisOptions {
        policy: model.policy.unwrap_or(config.analysis.policy),
        tie_break: model.tie_break.unwrap_or(config.analysis.tie_break),
    }
}

/// Analyze command implementation
pub mod analyze {
    use super::*;
    use crate::cli::Commands;
    use crate::input::{InputFormat, load_file};
    use std::path::Path;

    /// Execute the analyze command
    pub fn execute(args: Cli, config: Config) -> Result<()> {
        let (input, format, model, output_format) = match args.command {
            Commands::Analyze {
                input,
                format,
                model,
                output,
            } => (input, format, model, output),
            _ => unreachable!("analyze::execute called with wrong command"),
        };

        let options = resolve_options(model, &config);
        tracing::debug!("Analysis options: {:?}", options);

        run(&mut std::io::stdout(), &input, format, options, output_format)
    }

    /// Load, analyze and report; an empty filtered sequence is reported, not returned
    pub fn run(
        w: &mut impl std::io::Write,
        input: &Path,
        format: Option<InputFormat>,
        options: AnalysisOptions,
        output_format: OutputFormat,
    ) -> Result<()> {
        tracing::info!("Analyzing results in {:?}", input);
        let loaded = load_file(input, format)?;

        match Analysis::from_sequence(&loaded.sequence, options) {
            Ok(analysis) => {
                tracing::info!(
                    "Predicted next outcome {} with probability {:.2}",
                    analysis.prediction.next,
                    analysis.prediction.probability
                );
                match output_format {
                    OutputFormat::Json => output::output_json(w, &analysis),
                    OutputFormat::Table => output::output_table(w, &analysis),
                }
            }
            Err(Error::NoValidData) => {
                tracing::warn!("No valid results in {:?}", input);
                match output_format {
                    OutputFormat::Json => output::output_no_data_json(w, loaded.records),
                    OutputFormat::Table => output::output_no_data_table(w, loaded.records),
                }
            }
            Err(e) => Err(e),
        }
    }
}

/// Poll command implementation
pub mod poll {
    use super::*;
    use crate::cli::Commands;
    use crate::cli::output::PollRecord;
    use crate::feed::{LiveSequence, ResultFeed, create_feed, poll_once};
    use crate::input::load_file;
    use crate::markov::Sequence;
    use chrono::Utc;
    use std::time::Duration;

    /// Execute the poll command
    pub async fn execute(args: Cli, mut config: Config) -> Result<()> {
        let (source, url, mock_results, times, interval, seed, model, output_format) =
            match args.command {
                Commands::Poll {
                    source,
                    url,
                    mock_results,
                    times,
                    interval,
                    seed,
                    model,
                    output,
                } => (
                    source,
                    url,
                    mock_results,
                    times,
                    interval,
                    seed,
                    model,
                    output,
                ),
                _ => unreachable!("poll::execute called with wrong command"),
            };

        if url.is_some() {
            config.feed.url = url;
        }
        let options = resolve_options(model, &config);
        let feed = create_feed(source, &config, &mock_results)?;

        let seed_sequence = match seed {
            Some(path) => load_file(&path, None)?.sequence,
            None => Sequence::new(),
        };
        let mut live = LiveSequence::seeded(seed_sequence, options.policy);

        tracing::info!("Polling {:?} feed {} time(s)", source, times);
        let polls = run_polls(feed.as_ref(), &mut live, times, Duration::from_secs(interval)).await;

        let analysis = Analysis::from_sequence(live.sequence(), options).ok();
        let mut stdout = std::io::stdout();
        match output_format {
            OutputFormat::Json => output::output_poll_json(&mut stdout, &polls, analysis.as_ref()),
            OutputFormat::Table => {
                output::output_poll_table(&mut stdout, &polls, analysis.as_ref())
            }
        }
    }

    /// Poll `times` times, one after the other; failures are recorded, not propagated
    pub async fn run_polls(
        feed: &dyn ResultFeed,
        live: &mut LiveSequence,
        times: u32,
        interval: Duration,
    ) -> Vec<PollRecord> {
        let mut records = Vec::with_capacity(times as usize);

        for poll in 0..times {
            if poll > 0 && !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }

            let fetched_at = Utc::now();
            let result = poll_once(feed, live).await;
            if let Err(e) = &result {
                tracing::warn!("Poll {} failed: {}", poll + 1, e);
            }
            records.push(PollRecord::from_result(fetched_at, &result));
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::mock::{MockFeed, MockResponse};
    use crate::feed::{LiveSequence, PollOutcome};
    use crate::markov::{EstimationPolicy, Outcome, TieBreak};
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_cli_flags_override_config() {
        let mut config = Config::default();
        config.analysis.policy = EstimationPolicy::Laplace;
        config.analysis.tie_break = TieBreak::PreferB;

        let options = resolve_options(
            ModelArgs {
                policy: None,
                tie_break: Some(TieBreak::Repeat),
            },
            &config,
        );
        assert_eq!(options.policy, EstimationPolicy::Laplace);
        assert_eq!(options.tie_break, TieBreak::Repeat);
    }

    #[test]
    fn test_analyze_reports_prediction() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "result\nA\nB\nA\nB").unwrap();
        file.flush().unwrap();

        let mut out = Vec::new();
        analyze::run(
            &mut out,
            file.path(),
            None,
            AnalysisOptions::default(),
            OutputFormat::Json,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["prediction"]["last"], "B");
        assert_eq!(value["prediction"]["next"], "A");
        assert_eq!(value["prediction"]["probability"], 1.0);
    }

    #[test]
    fn test_analyze_without_valid_results_is_not_an_error() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "result\nX\ndraw").unwrap();
        file.flush().unwrap();

        let mut out = Vec::new();
        analyze::run(
            &mut out,
            file.path(),
            None,
            AnalysisOptions::default(),
            OutputFormat::Table,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("No valid match results"));
        assert!(text.contains("Records read: 2"));
    }

    #[test]
    fn test_analyze_missing_column_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "winner\nA").unwrap();
        file.flush().unwrap();

        let result = analyze::run(
            &mut Vec::new(),
            file.path(),
            None,
            AnalysisOptions::default(),
            OutputFormat::Table,
        );
        assert!(matches!(result, Err(Error::MissingColumn(_))));
    }

    #[tokio::test]
    async fn test_run_polls_records_every_attempt() {
        let feed = MockFeed::new([
            MockResponse::Result("A".to_string()),
            MockResponse::Result("A".to_string()),
            MockResponse::Failure("timeout".to_string()),
            MockResponse::Result("Player B".to_string()),
        ]);
        let mut live = LiveSequence::new(EstimationPolicy::default());

        let polls = poll::run_polls(&feed, &mut live, 4, Duration::ZERO).await;
        assert_eq!(polls.len(), 4);
        assert_eq!(
            polls[1].outcome,
            Some(PollOutcome::Unchanged { outcome: Outcome::A })
        );
        assert!(polls[2].error.is_some());
        assert_eq!(live.sequence().as_slice(), &[Outcome::A, Outcome::B]);
    }
}
