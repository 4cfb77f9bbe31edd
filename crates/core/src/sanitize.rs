/// Which payload the model was asked to produce, and therefore which
/// formatting artifacts to strip from its output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SanitizeKind {
    /// Raw query text: drop code fences, collapse line breaks to spaces.
    Query,
    /// A JSON object: drop code fences and stray literal `JSON` tags.
    Json,
}

/// Strips formatting artifacts from model output so the payload can be
/// parsed or executed downstream.
///
/// Pure and idempotent. Does not validate that the result is syntactically
/// valid SQL or JSON; the executor and orchestrator own that.
pub fn sanitize(raw: &str, kind: SanitizeKind) -> String {
    match kind {
        SanitizeKind::Query => {
            let stripped = strip_to_fixed_point(raw, |text| strip_fences(text, "sql"));
            collapse_line_breaks(&stripped).trim().to_string()
        }
        SanitizeKind::Json => {
            let stripped =
                strip_to_fixed_point(raw, |text| strip_fences(text, "json").replace("JSON", ""));
            stripped.trim().to_string()
        }
    }
}

/// Removing a marker can splice its neighbours into a fresh marker
/// (`JJSONSON` loses the inner token and becomes `JSON`), so stripping
/// repeats until the text stops changing.
fn strip_to_fixed_point(input: &str, step: impl Fn(&str) -> String) -> String {
    let mut current = input.to_string();
    loop {
        let next = step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Drops every ``` fence together with a directly attached language tag,
/// whatever its casing.
fn strip_fences(input: &str, tag: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(position) = rest.find("```") {
        output.push_str(&rest[..position]);
        rest = &rest[position + 3..];
        if let Some(head) = rest.get(..tag.len()) {
            if head.eq_ignore_ascii_case(tag) {
                rest = &rest[tag.len()..];
            }
        }
    }
    output.push_str(rest);
    output
}

fn collapse_line_breaks(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_break = false;
    for character in input.chars() {
        if character == '\r' || character == '\n' {
            if !in_break {
                output.push(' ');
                in_break = true;
            }
        } else {
            output.push(character);
            in_break = false;
        }
    }
    output
}
