//! Keyword orchestration: the end-to-end download loop.
//!
//! For each keyword: search, then try candidate URLs in rank order until one
//! is saved or the list runs out. First success wins — no further candidates
//! are attempted for that keyword, and no candidate is ever retried. A
//! search failure is isolated to its keyword: the keyword is recorded as
//! failed and the run moves on.
//!
//! Everything mutable lives in the [`RunReport`] accumulator, which is built
//! here and returned; progress is streamed through an optional channel so the
//! caller owns all printing.

use crate::fetch::{self, DownloadOutcome};
use crate::format::FormatPolicy;
use crate::keyword::{self, NamingScheme};
use crate::quality::QualityTier;
use crate::search;
use crate::transport::Transport;
use rand::Rng;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings that hold for a whole run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub format: FormatPolicy,
    pub quality: QualityTier,
    pub naming: NamingScheme,
    pub dest_dir: PathBuf,
    /// Candidate URLs collected per keyword.
    pub candidate_limit: usize,
}

/// Aggregate result of a run. Built incrementally, returned once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Images saved across all keywords.
    pub downloaded: usize,
    /// Keywords for which no candidate produced a saved image.
    pub failed_keywords: Vec<String>,
    /// Non-empty keywords the loop ran, successful or not.
    pub keywords_processed: usize,
}

/// Progress events streamed to the caller during a run.
#[derive(Debug)]
pub enum RunEvent {
    KeywordStarted {
        keyword: String,
    },
    /// The search request itself failed; the keyword is recorded as failed.
    SearchFailed {
        keyword: String,
        error: String,
    },
    CandidateRejected {
        base_name: String,
        outcome: DownloadOutcome,
    },
    Saved {
        keyword: String,
        path: PathBuf,
    },
    KeywordExhausted {
        keyword: String,
        format: FormatPolicy,
        quality: QualityTier,
    },
}

/// Pauses between requests. Policy, not correctness: the jitter keeps the
/// request pattern from looking like a scraper hammering the host.
pub trait Pacer {
    /// After a failed candidate, before trying the next one.
    fn between_candidates(&self);
    /// After finishing a keyword, before starting the next.
    fn between_keywords(&self);
}

/// Production pacer: uniform random sleeps.
pub struct JitterPacer;

impl Pacer for JitterPacer {
    fn between_candidates(&self) {
        sleep_uniform(1.0, 2.0);
    }

    fn between_keywords(&self) {
        sleep_uniform(2.0, 4.0);
    }
}

fn sleep_uniform(low: f64, high: f64) {
    let secs = rand::rng().random_range(low..high);
    std::thread::sleep(std::time::Duration::from_secs_f64(secs));
}

/// Run the full keyword loop. `keywords` must already be cleaned and
/// non-empty (see [`keyword::parse_keyword_list`]).
pub fn run(
    transport: &impl Transport,
    pacer: &impl Pacer,
    keywords: &[String],
    options: &RunOptions,
    events: Option<Sender<RunEvent>>,
) -> Result<RunReport, RunError> {
    std::fs::create_dir_all(&options.dest_dir)?;

    let mut report = RunReport::default();

    for keyword in keywords {
        emit(
            &events,
            RunEvent::KeywordStarted {
                keyword: keyword.clone(),
            },
        );

        let urls = match search::search(transport, keyword, options.candidate_limit) {
            Ok(urls) => urls,
            Err(e) => {
                emit(
                    &events,
                    RunEvent::SearchFailed {
                        keyword: keyword.clone(),
                        error: e.to_string(),
                    },
                );
                report.failed_keywords.push(keyword.clone());
                report.keywords_processed += 1;
                pacer.between_keywords();
                continue;
            }
        };

        let mut saved = false;
        for (i, url) in urls.iter().enumerate() {
            let base_name =
                keyword::base_filename(options.naming, keyword, i, report.downloaded);
            let outcome = fetch::fetch(
                transport,
                url,
                &options.dest_dir,
                &base_name,
                options.format,
                options.quality,
            );
            match outcome {
                DownloadOutcome::Saved(path) => {
                    emit(
                        &events,
                        RunEvent::Saved {
                            keyword: keyword.clone(),
                            path,
                        },
                    );
                    report.downloaded += 1;
                    saved = true;
                    break;
                }
                rejected => {
                    emit(
                        &events,
                        RunEvent::CandidateRejected {
                            base_name,
                            outcome: rejected,
                        },
                    );
                    pacer.between_candidates();
                }
            }
        }

        if !saved {
            report.failed_keywords.push(keyword.clone());
            emit(
                &events,
                RunEvent::KeywordExhausted {
                    keyword: keyword.clone(),
                    format: options.format,
                    quality: options.quality,
                },
            );
        }
        report.keywords_processed += 1;
        pacer.between_keywords();
    }

    Ok(report)
}

fn emit(events: &Option<Sender<RunEvent>>, event: RunEvent) {
    if let Some(tx) = events {
        // Receiver hanging up just means nobody is listening anymore
        tx.send(event).ok();
    }
}
