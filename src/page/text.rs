/// Greedy word wrap on character counts. Words longer than `max_w` are split.
pub(crate) fn wrap(s: &str, max_w: usize) -> Vec<String> {
    let mut out = Vec::new();
    if max_w == 0 {
        return out;
    }
    let mut line = String::new();
    let mut line_len = 0usize;
    for word in s.split_whitespace() {
        let wlen = word.chars().count();
        if wlen > max_w {
            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
                line_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_w) {
                out.push(chunk.iter().collect());
            }
            continue;
        }
        let need = if line.is_empty() { wlen } else { line_len + 1 + wlen };
        if need > max_w && !line.is_empty() {
            out.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if !line.is_empty() {
            line.push(' ');
            line_len += 1;
        }
        line.push_str(word);
        line_len += wlen;
    }
    if !line.is_empty() {
        out.push(line);
    }
    out
}

pub(crate) fn width(s: &str) -> usize {
    s.chars().count()
}

/// Truncates to `max_w` characters, marking the cut with an ellipsis.
pub(crate) fn clip(s: &str, max_w: usize) -> String {
    if width(s) <= max_w {
        return s.to_string();
    }
    if max_w == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max_w - 1).collect();
    out.push('…');
    out
}
