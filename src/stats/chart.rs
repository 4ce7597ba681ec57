//! Horizontal text bar charts.

const BAR: char = '█';

/// Renders one labelled bar per row, scaled so the largest count fills `width`.
///
/// Non-zero counts always get at least one block so small buckets stay visible.
pub fn bar_chart(rows: &[(String, usize)], width: usize) -> String {
    let Some(max) = rows.iter().map(|(_, count)| *count).max() else {
        return String::new();
    };

    let label_width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);

    rows.iter()
        .map(|(label, count)| {
            let len = if max == 0 || *count == 0 {
                0
            } else {
                ((*count * width) as f64 / max as f64).round().max(1.0) as usize
            };
            let bar: String = std::iter::repeat(BAR).take(len).collect();
            let pad = label_width - label.chars().count();
            format!("  {}{}  {} {}", label, " ".repeat(pad), bar, count)
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
