//! Diff rendering for fixture comparison.
//!
//! Lines are quoted so padding stays visible, and a caret marks the first
//! differing column.

/// Render a text diff between expected and actual output.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let exp: Vec<&str> = expected.split('\n').collect();
    let act: Vec<&str> = actual.split('\n').collect();

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    for i in 0..exp.len().max(act.len()) {
        let (e, a) = (exp.get(i), act.get(i));
        if e == a {
            continue;
        }
        out.push_str(&format!("@@ line {} @@\n", i + 1));
        if let Some(e) = e {
            out.push_str(&format!("-\"{e}\"\n"));
        }
        if let Some(a) = a {
            out.push_str(&format!("+\"{a}\"\n"));
        }
        if let (Some(e), Some(a)) = (e, a) {
            let col = first_difference(e, a);
            out.push_str(&format!("  {}^ column {}\n", " ".repeat(col), col + 1));
        }
    }
    out
}

/// Char index of the first position where `a` and `b` differ.
fn first_difference(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .position(|(x, y)| x != y)
        .unwrap_or_else(|| a.chars().count().min(b.chars().count()))
}
