use wordfreq_logging::analytics_error;

use crate::FrequencyTable;

pub const NO_WORDS_TEXT: &str = "No words found.";

/// Every token tied at one extreme count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extreme {
    pub words: Vec<String>,
    pub count: u64,
}

/// Most/least frequent tokens plus the table sorted by descending count.
///
/// An empty table has no extremes at all rather than sentinel counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Summary {
    pub sorted_entries: Vec<(String, u64)>,
    pub most_frequent: Option<Extreme>,
    pub least_frequent: Option<Extreme>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.sorted_entries.is_empty()
    }
}

/// Finished analysis as handed to the presenter and the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub counts: FrequencyTable,
    pub summary: Summary,
    pub formatted: String,
}

impl AnalysisResult {
    pub fn from_table(counts: FrequencyTable) -> Self {
        let summary = summarize(&counts);
        let formatted = format_result(&counts, &summary);
        Self {
            counts,
            summary,
            formatted,
        }
    }
}

/// One pass over `table` collecting all ties at the maximum and minimum.
pub fn summarize(table: &FrequencyTable) -> Summary {
    let mut most: Option<Extreme> = None;
    let mut least: Option<Extreme> = None;

    for (token, count) in table.iter() {
        track(&mut most, token, count, |candidate, best| candidate > best);
        track(&mut least, token, count, |candidate, best| candidate < best);
    }

    let mut sorted_entries: Vec<(String, u64)> = table
        .iter()
        .map(|(token, count)| (token.to_owned(), count))
        .collect();
    // Stable: equal counts keep first-occurrence order.
    sorted_entries.sort_by(|a, b| b.1.cmp(&a.1));

    Summary {
        sorted_entries,
        most_frequent: most,
        least_frequent: least,
    }
}

fn track(slot: &mut Option<Extreme>, token: &str, count: u64, beats: impl Fn(u64, u64) -> bool) {
    match slot {
        Some(extreme) if extreme.count == count => extreme.words.push(token.to_owned()),
        Some(extreme) if !beats(count, extreme.count) => {}
        _ => {
            *slot = Some(Extreme {
                words: vec![token.to_owned()],
                count,
            })
        }
    }
}

/// Human-readable rendering of a finished analysis.
pub fn format_result(table: &FrequencyTable, summary: &Summary) -> String {
    let (Some(most), Some(least)) = (&summary.most_frequent, &summary.least_frequent) else {
        return NO_WORDS_TEXT.to_owned();
    };

    let json = serde_json::to_string_pretty(table).unwrap_or_else(|err| {
        analytics_error!("Failed to render frequency table: {}", err);
        String::from("{}")
    });

    format!(
        "Word Frequency:\n{json}\nMost Recurring Word(s): {} ({})\nLeast Recurring Word(s): {} ({})",
        most.words.join(", "),
        times(most.count),
        least.words.join(", "),
        times(least.count),
    )
}

fn times(count: u64) -> String {
    if count == 1 {
        "1 time".to_owned()
    } else {
        format!("{count} times")
    }
}
