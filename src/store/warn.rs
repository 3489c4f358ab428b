/// Absorbed failures (thumbnail generation, cleanup, unreadable files) are
/// reported as single structured stderr lines so an operator can grep a
/// session log without the store ever surfacing them as errors.
fn sanitize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_ascii_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if ch.is_ascii_graphic() || !ch.is_ascii() {
            out.push(ch);
            prev_sep = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "na".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn emit(code: &str, op: &str, path: &str, err: &str) {
    eprintln!(
        "ALTAR_WARN code={} op={} path={} err={}",
        sanitize_value(code),
        sanitize_value(op),
        sanitize_value(path),
        sanitize_value(err),
    );
}

#[cfg(test)]
mod tests {
    use super::sanitize_value;

    #[test]
    fn sanitize_value_rewrites_whitespace() {
        assert_eq!(sanitize_value("disk full: no space"), "disk_full:_no_space");
    }

    #[test]
    fn sanitize_value_keeps_accented_names() {
        assert_eq!(sanitize_value("Família Souza"), "Família_Souza");
    }

    #[test]
    fn sanitize_value_falls_back_for_empty() {
        assert_eq!(sanitize_value("  \t "), "na");
    }
}
