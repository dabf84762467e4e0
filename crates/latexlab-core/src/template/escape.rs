//! Escaping of untrusted strings for interpolation into LaTeX source

use toml::Value;

/// Characters that LaTeX treats specially and that are escaped with a backslash
const BACKSLASH_ESCAPED: &[char] = &['{', '}', '_', '#', '%', '&', '$'];

/// Make a string safe to place inside LaTeX source
///
/// Substitutions are applied in a fixed order. The backslash pass runs first,
/// so the backslashes introduced by later passes are left alone.
///
/// ```rust
/// use latexlab_core::template::escape_tex;
///
/// assert_eq!(escape_tex("50% off"), r"50\% off");
/// assert_eq!(escape_tex("a\nb"), r"a\\b");
/// ```
pub fn escape_tex(value: &str) -> String {
    let value = value.replace('\\', r"\textbackslash");
    let value = escape_specials(&value);
    let value = value
        .replace('~', r"\~{}")
        .replace('^', r"\^{}")
        .replace('"', "''");
    let value = collapse_ellipses(&value);

    value.replace('\n', r"\\")
}

/// Apply [`escape_tex`] to strings, pass every other value through
pub fn escape_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(escape_tex(s)),
        other => other.clone(),
    }
}

fn escape_specials(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if BACKSLASH_ESCAPED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Replace each run of three or more periods with `\ldots`
fn collapse_ellipses(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut dots = 0;

    for c in value.chars() {
        if c == '.' {
            dots += 1;
            continue;
        }
        flush_dots(&mut out, dots);
        dots = 0;
        out.push(c);
    }
    flush_dots(&mut out, dots);

    out
}

fn flush_dots(out: &mut String, dots: usize) {
    if dots >= 3 {
        out.push_str(r"\ldots");
    } else {
        for _ in 0..dots {
            out.push('.');
        }
    }
}
