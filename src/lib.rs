pub mod analyze;
pub mod args;
pub mod grammar;
pub mod keywords;
pub mod latency;
pub mod lexical;
pub mod ordered;
pub mod parser;
pub mod patterns;
pub mod spam;
pub mod stats;
pub mod summary;
pub mod timeline;
pub mod transcript;
pub mod utils;

pub use analyze::{analyze_chat, analyze_transcript, build_report, AnalyzerConfig, Report};
pub use args::Args;
pub use grammar::{TimestampGrammar, TranscriptGrammar};
pub use keywords::{KeywordSearch, MatchMode};
pub use lexical::{LexicalConfig, Stopwords, WordFrequency};
pub use ordered::OrderedMap;
pub use patterns::init_default_patterns;
pub use spam::SpamFilter;
pub use stats::{AnalysisResult, Message};
pub use summary::{SummaryError, SummaryRequest, Summarizer};
