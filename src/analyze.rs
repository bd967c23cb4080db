use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

use crate::grammar::TranscriptGrammar;
use crate::keywords::{KeywordSearch, KeywordTally, MatchMode};
use crate::latency::{reply_latency, ReplyLatency};
use crate::lexical::{top_words_by_sender, LexicalConfig, WordFrequency};
use crate::ordered::OrderedMap;
use crate::parser::parse_transcript;
use crate::spam::SpamFilter;
use crate::stats::{compute_statistics, AnalysisResult, Message};
use crate::summary::SummaryRequest;
use crate::timeline::{monthly_volume, MonthlyVolume};
use crate::utils::{format_number, percentage};
use crate::{patterns, transcript, Args};

/// Tables the parsing stage depends on.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub grammar: TranscriptGrammar,
    pub spam_filter: SpamFilter,
}

/// Parses, filters and counts a transcript.
pub fn analyze_transcript(content: &str, config: &AnalyzerConfig) -> AnalysisResult {
    let start_time = Instant::now();
    let parsed = parse_transcript(content, &config.grammar);
    let parsed_count = parsed.len();
    let result = compute_statistics(config.spam_filter.apply(parsed));

    info!(
        action = "complete",
        component = "analysis",
        parsed = parsed_count,
        kept = result.total_messages,
        users = result.users.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Transcript analyzed"
    );
    result
}

/// Messages matching one keyword.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordMatches<'a> {
    pub keyword: String,
    pub messages: Vec<&'a Message>,
}

/// Everything the CLI prints, borrowed from one [`AnalysisResult`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub analysis: &'a AnalysisResult,
    pub keyword_mode: MatchMode,
    pub keywords: KeywordTally,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keyword_matches: Vec<KeywordMatches<'a>>,
    pub reply_latency: OrderedMap<ReplyLatency>,
    pub top_words: OrderedMap<Vec<WordFrequency>>,
    pub monthly: Vec<MonthlyVolume>,
}

/// Runs every analyzer over the filtered messages.
pub fn build_report<'a>(
    analysis: &'a AnalysisResult,
    grammar: &TranscriptGrammar,
    search: &KeywordSearch,
    lexical: &LexicalConfig,
    matches_for: Option<Option<&str>>,
) -> Report<'a> {
    let messages = analysis.messages.as_slice();
    let keyword_matches = match matches_for {
        Some(sender) => search
            .keywords()
            .iter()
            .map(|keyword| KeywordMatches {
                keyword: keyword.clone(),
                messages: search.find(keyword, messages, sender),
            })
            .collect(),
        None => Vec::new(),
    };

    Report {
        analysis,
        keyword_mode: search.mode(),
        keywords: search.tally(messages),
        keyword_matches,
        reply_latency: reply_latency(messages, grammar),
        top_words: top_words_by_sender(messages, lexical),
        monthly: monthly_volume(messages, grammar),
    }
}

fn spam_filter_from_args(args: &Args) -> Result<SpamFilter> {
    if args.no_filter {
        info!(action = "configure", component = "spam_filter", "Spam filtering disabled");
        return Ok(SpamFilter::disabled());
    }
    Ok(SpamFilter::new(patterns::load_spam_patterns(
        args.patterns.as_deref(),
    )?))
}

fn lexical_config_from_args(args: &Args) -> Result<LexicalConfig> {
    let mut config = LexicalConfig {
        top_n: args.top,
        skip_single_chars: args.skip_single_chars,
        ..LexicalConfig::default()
    };
    if let Some(path) = args.stopwords.as_deref() {
        config.stopwords.extend(patterns::load_stopwords(path)?);
    }
    Ok(config)
}

/// Reads the inputs named in `args` and produces the filtered result.
pub fn analyze_chat(args: &Args) -> Result<(AnalysisResult, AnalyzerConfig)> {
    let total_start_time = Instant::now();
    info!(action = "start", component = "analysis", "Starting chat analysis");

    let config = AnalyzerConfig {
        grammar: TranscriptGrammar::korean(),
        spam_filter: spam_filter_from_args(args)?,
    };

    let paths = transcript::resolve_transcript_paths(&args.inputs)?;
    let content = transcript::read_transcripts(&paths)?;
    let result = analyze_transcript(&content, &config);

    if result.is_empty() {
        anyhow::bail!("No valid conversation found. Is this a KakaoTalk .txt export?");
    }

    info!(
        action = "complete",
        component = "analysis",
        duration_ms = total_start_time.elapsed().as_millis(),
        "Analysis completed successfully"
    );
    Ok((result, config))
}

/// Entry point for the analysis half of the CLI.
pub fn run(args: &Args) -> Result<()> {
    let (result, config) = analyze_chat(args)?;

    if let Some(name) = args.summary_request.as_deref() {
        let request = SummaryRequest::for_sender(&result.messages, name)
            .with_context(|| format!("'{}' has no messages in this conversation", name))?;
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let mode = if args.substring {
        MatchMode::Substring
    } else {
        MatchMode::WholeWord
    };
    let search = KeywordSearch::new(&args.keywords, mode);
    let lexical = lexical_config_from_args(args)?;
    let matches_for = args.show_matches.then_some(args.user.as_deref());
    let report = build_report(&result, &config.grammar, &search, &lexical, matches_for);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_analysis_results(&report, &search);
    }
    Ok(())
}

pub fn print_analysis_results(report: &Report, search: &KeywordSearch) {
    let analysis = report.analysis;

    println!("\n--- Chat Analysis ---");
    println!(
        "Total messages: {}",
        format_number(analysis.total_messages)
    );
    println!("Participants: {}", analysis.users.join(" & "));

    println!("\nMessages by participant:");
    for (user, count) in analysis.messages_by_user.iter() {
        println!(
            "- {}: {} ({}%)",
            user,
            format_number(*count),
            percentage(*count, analysis.total_messages)
        );
    }

    if !search.is_empty() {
        println!("\nKeywords ({:?}):", report.keyword_mode);
        for (user, counts) in report.keywords.iter() {
            let cells: Vec<String> = counts
                .iter()
                .map(|(keyword, count)| format!("{keyword} {count}회"))
                .collect();
            println!("- {}: {}", user, cells.join(", "));
        }
    }

    for found in &report.keyword_matches {
        println!(
            "\nMessages containing \"{}\" ({}):",
            found.keyword,
            found.messages.len()
        );
        for message in &found.messages {
            println!("  [{}] {}: {}", message.timestamp, message.sender, message.text);
        }
    }

    println!("\nAverage reply time:");
    for (user, latency) in report.reply_latency.iter() {
        println!("- {}: {}", user, latency);
    }

    println!("\nTop words:");
    for (user, words) in report.top_words.iter() {
        let cells: Vec<String> = words
            .iter()
            .map(|w| format!("{} ({})", w.word, w.count))
            .collect();
        println!("- {}: {}", user, cells.join(", "));
    }

    println!("\nMonthly messages:");
    for bucket in &report.monthly {
        let cells: Vec<String> = bucket
            .counts
            .iter()
            .map(|(user, count)| format!("{user} {count}"))
            .collect();
        println!("- {}: {}", bucket.month, cells.join(", "));
    }
}
