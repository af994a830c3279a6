use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over one round of fan-out requests: total is the round's
/// pending item count, advanced as each request completes.
pub fn round_bar(total: usize, label: &str) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} ({elapsed})")
            .expect("valid progress template")
            .progress_chars("=> "),
    );
    bar.set_message(label.to_string());
    bar
}
