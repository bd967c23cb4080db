use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grammar::TranscriptGrammar;
use crate::ordered::OrderedMap;
use crate::stats::Message;

/// Replies slower than this are treated as a new conversation.
pub const MAX_REPLY_MINUTES: i64 = 24 * 60;

/// Average reply latency of one sender.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyLatency {
    pub samples: usize,
    pub mean_minutes: Option<f64>,
}

impl ReplyLatency {
    fn from_samples(samples: &[i64]) -> Self {
        let mean_minutes = if samples.is_empty() {
            None
        } else {
            Some(samples.iter().sum::<i64>() as f64 / samples.len() as f64)
        };
        Self {
            samples: samples.len(),
            mean_minutes,
        }
    }
}

impl fmt::Display for ReplyLatency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mean_minutes {
            None => f.write_str("데이터 없음"),
            Some(mean) if mean < 60.0 => write!(f, "{}분", mean.round()),
            Some(mean) if mean < MAX_REPLY_MINUTES as f64 => write!(
                f,
                "{}시간 {}분",
                (mean / 60.0).floor(),
                (mean % 60.0).round()
            ),
            Some(_) => f.write_str("1일 이상"),
        }
    }
}

/// Estimates how long each sender takes to answer.
///
/// Every adjacent pair whose senders differ yields the minute delta between
/// their timestamps, attributed to the later sender. Deltas outside
/// `(0, 1440]` and pairs with an unparseable timestamp are skipped. Every
/// sender in the sequence appears in the output, in first-seen order.
pub fn reply_latency(
    messages: &[Message],
    grammar: &TranscriptGrammar,
) -> OrderedMap<ReplyLatency> {
    let mut samples: OrderedMap<Vec<i64>> = OrderedMap::new();
    for message in messages {
        samples.get_or_insert_with(&message.sender, Vec::new);
    }

    for pair in messages.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        if prev.sender == curr.sender {
            continue;
        }
        let (Some(prev_time), Some(curr_time)) = (
            grammar.parse_datetime(&prev.timestamp),
            grammar.parse_datetime(&curr.timestamp),
        ) else {
            continue;
        };

        let delta = (curr_time - prev_time).num_minutes();
        if delta > 0 && delta <= MAX_REPLY_MINUTES {
            samples
                .get_or_insert_with(&curr.sender, Vec::new)
                .push(delta);
        }
    }

    let mut latency = OrderedMap::new();
    for (sender, deltas) in samples.iter() {
        latency.insert(sender, ReplyLatency::from_samples(deltas));
    }
    latency
}
