use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "talkstat",
    about = "Analyze exported KakaoTalk chats: who talks more, keywords, reply speed and favourite words",
    version,
    long_about = None
)]
pub struct Args {
    /// Transcript files or directories of .txt exports
    pub inputs: Vec<PathBuf>,

    /// Keyword to count per participant (repeatable)
    #[arg(short, long = "keyword")]
    pub keywords: Vec<String>,

    /// Count keywords as plain substrings instead of whole words
    #[arg(long)]
    pub substring: bool,

    /// Only list matching messages from this participant
    #[arg(short, long)]
    pub user: Option<String>,

    /// Print the messages that contain each keyword
    #[arg(long)]
    pub show_matches: bool,

    /// Number of top words to show per participant
    #[arg(short, long, default_value_t = 5)]
    pub top: usize,

    /// Ignore single-character words in the word ranking
    #[arg(long)]
    pub skip_single_chars: bool,

    /// Path to custom spam pattern file
    #[arg(short, long)]
    pub patterns: Option<PathBuf>,

    /// Keep link and promotional messages
    #[arg(long)]
    pub no_filter: bool,

    /// File of extra stopwords, one per line
    #[arg(long)]
    pub stopwords: Option<PathBuf>,

    /// Emit the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Emit the summarization request for this participant as JSON
    #[arg(long, value_name = "NAME")]
    pub summary_request: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Initialize spam_patterns.txt with default patterns
    #[arg(long)]
    pub init: bool,
}
