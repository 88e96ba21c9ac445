use wordfreq_core::{AppViewModel, Outcome};

/// Result panel text once the latest request has finished.
pub fn outcome_text(view: &AppViewModel) -> Option<String> {
    if view.busy {
        return None;
    }
    view.outcome.as_ref().map(Outcome::display_text)
}

/// Spinner-line equivalent for a run in progress.
pub fn progress_text(view: &AppViewModel) -> String {
    let percent = if view.tokens_total > 0 {
        (view.tokens_processed as f64 / view.tokens_total as f64) * 100.0
    } else {
        0.0
    };
    let chunk = view
        .chunk_size
        .map(|size| format!(" | next chunk {}", format_with_commas(size)))
        .unwrap_or_default();
    format!(
        "Analyzing run {}: {} / {} tokens ({:.1}%) | {} chunks{}",
        view.run_id.unwrap_or_default(),
        format_with_commas(view.tokens_processed),
        format_with_commas(view.tokens_total),
        percent,
        view.chunks_completed,
        chunk
    )
}

fn format_with_commas(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
