use std::time::Instant;
use tracing::debug;

use crate::grammar::TranscriptGrammar;
use crate::stats::Message;

/// Rebuilds the message sequence from an exported transcript.
///
/// A header line opens a new message and closes the previous one. Other
/// non-empty lines are continuation lines and are appended to the open message
/// with a newline; continuation lines before the first header are dropped.
/// Blank lines are skipped without closing anything.
pub fn parse_transcript(content: &str, grammar: &TranscriptGrammar) -> Vec<Message> {
    let start_time = Instant::now();
    let mut messages = Vec::new();
    let mut current: Option<Message> = None;
    let mut orphan_lines = 0usize;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = grammar.match_header(line) {
            if let Some(done) = current.take() {
                messages.push(done);
            }
            current = Some(Message::new(header.timestamp, header.sender, header.text));
        } else if let Some(open) = current.as_mut() {
            open.text.push('\n');
            open.text.push_str(line);
        } else {
            orphan_lines += 1;
        }
    }

    if let Some(done) = current {
        messages.push(done);
    }

    debug!(
        action = "complete",
        component = "message_parser",
        message_count = messages.len(),
        orphan_lines,
        duration_ms = start_time.elapsed().as_millis(),
        "Transcript parsed"
    );
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Vec<Message> {
        parse_transcript(content, &TranscriptGrammar::korean())
    }

    #[test]
    fn parses_two_party_exchange() {
        let messages = parse("2024. 3. 5. 오후 2:10, Alice : hello\n2024. 3. 5. 오후 2:12, Bob : hi there");
        assert_eq!(
            messages,
            vec![
                Message::new("2024. 3. 5. 오후 2:10", "Alice", "hello"),
                Message::new("2024. 3. 5. 오후 2:12", "Bob", "hi there"),
            ]
        );
    }

    #[test]
    fn joins_continuation_lines_with_newlines() {
        let split = parse(
            "2024. 3. 5. 오후 2:10, Alice : first\nsecond\n   third   \n2024. 3. 5. 오후 2:11, Bob : ok",
        );
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].text, "first\nsecond\nthird");

        let single = parse("2024. 3. 5. 오후 2:10, Alice : first\nsecond\nthird");
        assert_eq!(single[0], split[0]);
    }

    #[test]
    fn blank_lines_neither_close_nor_extend() {
        let messages = parse("2024. 3. 5. 오후 2:10, Alice : a\n\n   \nb\n\n2024. 3. 5. 오후 2:11, Bob : c\n");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "a\nb");
        assert_eq!(messages[1].text, "c");
    }

    #[test]
    fn drops_lines_before_first_header() {
        let content = "Talk_2024.3.5 with Bob\n저장한 날짜 : 2024. 3. 6. 오전 1:00\n\n2024년 3월 5일 오후 2:10, Alice : 안녕";
        let messages = parse(content);
        assert_eq!(messages, vec![Message::new("2024년 3월 5일 오후 2:10", "Alice", "안녕")]);
    }

    #[test]
    fn keeps_header_order_across_formats() {
        let content = "2024-3-5 오전 9:00, B : one\r\n2024. 3. 5. 오전 9:01, A : two\r\n2024년 3월 5일 오전 9:02, B : three\r\n";
        let senders: Vec<_> = parse(content).into_iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec!["B", "A", "B"]);
    }

    #[test]
    fn empty_input_yields_no_messages() {
        assert!(parse("").is_empty());
        assert!(parse("\n\nnot a chat\n").is_empty());
    }
}
