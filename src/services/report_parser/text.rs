//! Text helpers shared by the report decoders.

/// Remove the common indentation of a multi-line text block.
///
/// Leading and trailing blank lines are dropped, then the smallest run of
/// leading spaces/tabs found on a non-blank line is cut from every line that is
/// longer than it. Lines are split on `\n` only.
pub fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();

    let Some(start) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return String::new();
    };
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .unwrap_or(start);
    let lines = &lines[start..=end];

    let min_indent = lines
        .iter()
        .filter_map(|line| {
            let trimmed = line.trim_start_matches([' ', '\t']);
            (!trimmed.is_empty()).then(|| line.len() - trimmed.len())
        })
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            if line.len() > min_indent {
                line.get(min_indent..).unwrap_or(line)
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn `\r\n` and lone `\r` line breaks into `\n`, as XML end-of-line handling does.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Parse an integer attribute; empty or unparsable values become 0.
pub fn lenient_i32(raw: &str) -> i32 {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i32>() {
        return value;
    }
    // Some emitters write counts as floats ("3.0")
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => value as i32,
        _ => 0,
    }
}

/// Parse a seconds attribute; empty or unparsable values become 0.0.
pub fn lenient_f64(raw: &str) -> f64 {
    raw.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
