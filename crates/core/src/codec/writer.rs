use crate::model::SearchIndex;

/// Serialize an index back into the generator's `searchData` format.
///
/// Output is one entry per line, matching the layout the generator itself
/// produces; feeding it back through `parse_search_data` yields the same
/// entries.
pub fn write_search_data(index: &SearchIndex) -> String {
    let mut out = String::from("var searchData=\n[\n");
    let count = index.len();

    for (pos, entry) in index.entries().iter().enumerate() {
        out.push_str("  [");
        push_quoted(&mut out, &entry.key);
        out.push_str(",[");
        push_quoted(&mut out, &entry.name);
        for occ in &entry.occurrences {
            out.push_str(",[");
            push_quoted(&mut out, &occ.anchor.to_href());
            out.push(',');
            out.push(if occ.opens_in_parent { '1' } else { '0' });
            out.push(',');
            push_quoted(&mut out, &occ.label());
            out.push(']');
        }
        out.push_str("]]");
        if pos + 1 < count {
            out.push(',');
        }
        out.push('\n');
    }

    out.push_str("];\n");
    out
}

fn push_quoted(out: &mut String, value: &str) {
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
}
