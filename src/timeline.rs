use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

use crate::grammar::TranscriptGrammar;
use crate::ordered::OrderedMap;
use crate::stats::Message;

/// Message counts per sender for one `YYYY.MM` bucket.
///
/// Serializes flat, as `{"month": "2024.03", "<sender>": count, ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyVolume {
    pub month: String,
    pub counts: OrderedMap<usize>,
}

impl Serialize for MonthlyVolume {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len() + 1))?;
        map.serialize_entry("month", &self.month)?;
        for (sender, count) in self.counts.iter() {
            map.serialize_entry(sender, count)?;
        }
        map.end()
    }
}

/// Buckets messages by calendar month, oldest first.
///
/// Every bucket lists every sender of the sequence, with 0 where a sender was
/// silent that month. Messages with an unparseable timestamp are skipped.
pub fn monthly_volume(messages: &[Message], grammar: &TranscriptGrammar) -> Vec<MonthlyVolume> {
    let mut senders: OrderedMap<()> = OrderedMap::new();
    // zero-padded keys sort chronologically
    let mut buckets: BTreeMap<String, OrderedMap<usize>> = BTreeMap::new();

    for message in messages {
        senders.get_or_insert_with(&message.sender, || ());
        let Some(parts) = grammar.parse(&message.timestamp) else {
            continue;
        };
        let bucket = buckets.entry(parts.month_key()).or_default();
        *bucket.get_or_insert_with(&message.sender, || 0) += 1;
    }

    buckets
        .into_iter()
        .map(|(month, seen)| {
            let mut counts = OrderedMap::new();
            for sender in senders.keys() {
                counts.insert(sender, seen.get(sender).copied().unwrap_or(0));
            }
            MonthlyVolume { month, counts }
        })
        .collect()
}
