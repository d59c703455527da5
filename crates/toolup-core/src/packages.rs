/// Parse a default-packages file: one package spec per line, `#` starts a
/// comment (write `\#` for a literal hash), blank lines skipped.
pub fn parse_default_packages(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(|line| {
            let stripped = strip_comment(line);
            let trimmed = stripped.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

fn strip_comment(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('#') => out.push('#'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '#' => break,
            other => out.push(other),
        }
    }
    out
}
