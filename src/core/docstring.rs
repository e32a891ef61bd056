/// Expand tabs to the next multiple of `tabs` columns.
fn expand_tabs(line: &str, tabs: usize) -> String {
    if tabs == 0 {
        return line.replace('\t', "");
    }
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = tabs - column % tabs;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

/// Tabs are already expanded, so indentation is counted in ASCII spaces.
fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Dedent a documentation block for display.
///
/// The first line is kept as is. The first non-blank line after the first
/// blank line sets the indent; it is removed from the lines that follow.
/// Leading and trailing blank lines are dropped.
pub fn dedent(text: &str, tabs: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut newlined = false;
    let mut indent: Option<usize> = None;

    for raw in text.lines() {
        let line = expand_tabs(raw, tabs);
        let blank = line.trim_start().is_empty();

        let line = match indent {
            None if !newlined && blank => {
                newlined = true;
                line
            }
            None if newlined && !blank => {
                indent = Some(leading_spaces(&line));
                line.trim_start().to_string()
            }
            None => line,
            // 縮排較多的行保留多出的部分
            Some(indent) if leading_spaces(&line) > indent => line[indent..].to_string(),
            Some(_) => line.trim_start().to_string(),
        };
        lines.push(line);
    }

    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let first = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    lines.drain(..first);

    lines
}
