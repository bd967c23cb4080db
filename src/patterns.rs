use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

// Include default patterns at compile time
const DEFAULT_PATTERNS: &str = include_str!("../default_spam_patterns.txt");

pub const DEFAULT_PATTERN_FILE: &str = "spam_patterns.txt";

fn pattern_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Compiles every pattern in `content`, failing on the first invalid line.
pub fn parse_patterns_strict(content: &str) -> Result<Vec<Regex>> {
    pattern_lines(content)
        .map(|(line_num, line)| {
            compile(line).with_context(|| format!("Invalid regex pattern at line {line_num}"))
        })
        .collect()
}

/// Compiles every pattern in `content`, logging and skipping invalid lines.
pub fn parse_patterns_lenient(content: &str, source: &str) -> Vec<Regex> {
    pattern_lines(content)
        .filter_map(|(line_num, line)| match compile(line) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!(action = "parse", component = "regex_pattern", source, line_number = line_num, error = %e, "Invalid regex pattern");
                None
            }
        })
        .collect()
}

/// The embedded default signature list.
pub fn default_patterns() -> Vec<Regex> {
    parse_patterns_lenient(DEFAULT_PATTERNS, "embedded")
}

/// Resolves the spam signature list.
///
/// An explicit file must exist and every line must compile. Otherwise
/// `spam_patterns.txt` in the working directory is used when present, and the
/// embedded defaults when it is missing or yields nothing.
pub fn load_spam_patterns(pattern_file_path: Option<&Path>) -> Result<Vec<Regex>> {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "pattern_loading",
        "Starting spam pattern loading"
    );

    let patterns = if let Some(path) = pattern_file_path {
        info!(action = "load", component = "pattern_file", file_path = ?path, "Loading patterns from specified file");
        if !path.exists() {
            anyhow::bail!("Pattern file not found: {:?}", path);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pattern file {:?}", path))?;
        parse_patterns_strict(&content)?
    } else {
        let default_file = Path::new(DEFAULT_PATTERN_FILE);
        let mut patterns = Vec::new();
        if default_file.exists() {
            info!(action = "load", component = "default_pattern_file", file_path = ?default_file, "Loading patterns from default file");
            let content = fs::read_to_string(default_file)?;
            patterns = parse_patterns_lenient(&content, DEFAULT_PATTERN_FILE);
        }

        if patterns.is_empty() {
            info!(
                action = "load",
                component = "embedded_patterns",
                "Using embedded default patterns"
            );
            patterns = default_patterns();
        }
        patterns
    };

    info!(
        action = "complete",
        component = "pattern_loading",
        pattern_count = patterns.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Successfully compiled patterns"
    );
    Ok(patterns)
}

/// Writes the embedded signature list to `spam_patterns.txt` in `dir`.
pub fn init_default_patterns(dir: &Path) -> Result<()> {
    let default_file = dir.join(DEFAULT_PATTERN_FILE);

    if default_file.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first if you want to reinitialize.",
            DEFAULT_PATTERN_FILE
        );
    }

    fs::write(&default_file, DEFAULT_PATTERNS)
        .with_context(|| format!("Failed to write {:?}", default_file))?;
    println!("Created {} with default patterns", DEFAULT_PATTERN_FILE);

    Ok(())
}

/// Reads a stopword list: one word per line, `#` comments, case-folded.
pub fn load_stopwords(path: &Path) -> Result<HashSet<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read stopword file {:?}", path))?;
    let words: HashSet<String> = pattern_lines(&content)
        .map(|(_, word)| word.to_lowercase())
        .collect();
    info!(action = "loaded", component = "stopword_file", word_count = words.len(), file_path = ?path, "Loaded extra stopwords");
    Ok(words)
}
