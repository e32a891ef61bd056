//! Clever line splitting: long lines are wrapped at the last space before
//! the terminal edge instead of being clipped mid-word.

fn width(s: &str) -> usize {
    s.chars().count()
}

/// Re-flow `text` so that no line reaches `columns` characters unless it is a
/// single word. Lines already within `columns` are kept unchanged.
pub fn split_lines(text: &str, columns: usize) -> String {
    let mut newlines: Vec<String> = Vec::new();

    for line in text.lines().map(|l| l.trim_end_matches(' ')) {
        if width(line) <= columns {
            newlines.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for word in line.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if width(&candidate) < columns {
                current = candidate;
            } else if current.is_empty() {
                // 單一字詞本身就超過寬度，獨立成一行
                newlines.push(candidate);
            } else {
                newlines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }

        if !current.is_empty() {
            newlines.push(current);
        }
    }

    newlines.join("\n")
}
