#[derive(Debug, Clone, Copy)]
pub struct WarnEvent<'a> {
    pub code: &'a str,
    pub stage: &'a str,
    pub action: &'a str,
    pub category: &'a str,
    pub file: &'a str,
    pub reason: &'a str,
    pub err: &'a str,
}

fn sanitize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_ascii_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if ch.is_ascii_graphic() || (!ch.is_ascii() && !ch.is_control()) {
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

fn format_event(event: &WarnEvent<'_>) -> String {
    format!(
        "REPORTS_WARN code={} stage={} action={} category={} file={} reason={} err={}",
        sanitize_value(event.code),
        sanitize_value(event.stage),
        sanitize_value(event.action),
        sanitize_value(event.category),
        sanitize_value(event.file),
        sanitize_value(event.reason),
        sanitize_value(event.err),
    )
}

pub fn emit(event: WarnEvent<'_>) {
    eprintln!("{}", format_event(&event));
}

#[cfg(test)]
mod tests {
    use super::{WarnEvent, format_event, sanitize_value};

    #[test]
    fn sanitize_value_rewrites_whitespace() {
        assert_eq!(sanitize_value("a b\tc"), "a_b_c");
    }

    #[test]
    fn sanitize_value_falls_back_for_empty() {
        assert_eq!(sanitize_value("   "), "na");
    }

    #[test]
    fn event_renders_as_single_key_value_line() {
        let line = format_event(&WarnEvent {
            code: "W001_SOURCE_MISSING",
            stage: "relocate",
            action: "move-report",
            category: "analysis",
            file: "reports/analysis/q3 review.md",
            reason: "source-missing",
            err: "",
        });
        assert_eq!(
            line,
            "REPORTS_WARN code=W001_SOURCE_MISSING stage=relocate action=move-report \
             category=analysis file=reports/analysis/q3_review.md reason=source-missing err=na"
        );
        assert!(!line.contains('\n'));
    }
}
