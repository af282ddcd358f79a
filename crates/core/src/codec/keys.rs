//! Key mangling and page-name decoding.
//!
//! The generator identifies search entries by a "mangled" key: the symbol
//! name, lowercased, with every character outside `[a-z0-9]` (and below
//! U+0080) replaced by `_` followed by its hex code. The browser search
//! script applies the same transformation to the user's query before doing a
//! prefix comparison, so both sides must agree exactly.

/// Mangle a symbol name (or a query) into a search key.
///
/// ```
/// use doxsearch_core::codec::mangle_key;
///
/// assert_eq!(mangle_key("io_new"), "io_5fnew");
/// assert_eq!(mangle_key("Is UUID16"), "is_20uuid16");
/// ```
pub fn mangle_key(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || (c as u32) >= 0x80 {
            out.push(c);
        } else {
            let code = c as u32;
            if code < 16 {
                out.push_str(&format!("_0{code:x}"));
            } else {
                out.push_str(&format!("_{code:x}"));
            }
        }
    }
    out
}

/// Reverse `mangle_key` for ASCII escapes.
///
/// Returns `None` when the key contains a malformed escape (a `_` that is not
/// followed by two hex digits). Case information lost during mangling cannot
/// be recovered; the result is always lowercase.
pub fn demangle_key(key: &str) -> Option<String> {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars();
    while let Some(c) = chars.next() {
        if c != '_' {
            out.push(c);
            continue;
        }
        let hi = chars.next()?.to_digit(16)?;
        let lo = chars.next()?.to_digit(16)?;
        out.push(char::from_u32(hi * 16 + lo)?);
    }
    Some(out)
}

/// Decode a generated page name (e.g. `io-mainloop_8c.html`) back into the
/// name of the file or compound it documents (`io-mainloop.c`).
///
/// Unknown escape sequences are passed through unchanged.
pub fn decode_page_name(page: &str) -> String {
    let stem = page.strip_suffix(".html").unwrap_or(page);
    let chars: Vec<char> = stem.chars().collect();
    let mut out = String::with_capacity(stem.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '_' || i + 1 >= chars.len() {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let next = chars[i + 1];
        if next == '0' {
            if let Some(decoded) = chars.get(i + 2).and_then(|c| two_char_escape(*c)) {
                out.push(decoded);
                i += 3;
                continue;
            }
        } else if let Some(decoded) = one_char_escape(next) {
            out.push(decoded);
            i += 2;
            continue;
        } else if next.is_ascii_lowercase() {
            out.push(next.to_ascii_uppercase());
            i += 2;
            continue;
        }

        out.push('_');
        i += 1;
    }

    out
}

fn one_char_escape(c: char) -> Option<char> {
    Some(match c {
        '_' => '_',
        '1' => ':',
        '2' => '/',
        '3' => '<',
        '4' => '>',
        '5' => '*',
        '6' => '&',
        '7' => '|',
        '8' => '.',
        '9' => '!',
        _ => return None,
    })
}

fn two_char_escape(c: char) -> Option<char> {
    Some(match c {
        '0' => ',',
        '1' => ' ',
        '2' => '{',
        '3' => '}',
        '4' => '?',
        '5' => '^',
        '6' => '%',
        '7' => '(',
        '8' => ')',
        '9' => '+',
        'a' => '=',
        'b' => '$',
        'c' => '\\',
        'd' => '@',
        'e' => ']',
        'f' => '[',
        'g' => '#',
        'h' => '"',
        'i' => '~',
        'j' => '\'',
        'k' => ';',
        'l' => '`',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mangles_underscores_and_uppercase() {
        assert_eq!(mangle_key("io_set_read_handler"), "io_5fset_5fread_5fhandler");
        assert_eq!(mangle_key("IO_New"), "io_5fnew");
        assert_eq!(mangle_key("operator=="), "operator_3d_3d");
    }

    #[test]
    fn mangles_control_characters_with_leading_zero() {
        assert_eq!(mangle_key("a\tb"), "a_09b");
    }

    #[test]
    fn keeps_non_ascii_characters() {
        assert_eq!(mangle_key("größe"), "größe");
    }

    #[test]
    fn demangle_reverses_ascii_escapes() {
        assert_eq!(demangle_key("is_5fbase_5fuuid128").as_deref(), Some("is_base_uuid128"));
        assert_eq!(demangle_key("a_09b").as_deref(), Some("a\tb"));
    }

    #[test]
    fn demangle_rejects_truncated_escape() {
        assert_eq!(demangle_key("io_5"), None);
        assert_eq!(demangle_key("io_zz"), None);
    }

    #[test]
    fn decodes_page_names() {
        assert_eq!(decode_page_name("io-mainloop_8c.html"), "io-mainloop.c");
        assert_eq!(decode_page_name("io_8h.html"), "io.h");
        assert_eq!(decode_page_name("gatt-client_8c.html"), "gatt-client.c");
        assert_eq!(decode_page_name("dir_2sub_2file_8h"), "dir/sub/file.h");
        assert_eq!(decode_page_name("struct_my__type.html"), "structMy_type");
        assert_eq!(decode_page_name("op_07_08"), "op()");
        assert_eq!(decode_page_name("class_0ifoo_0k.html"), "class~foo;");
        assert_eq!(decode_page_name("q_0hx_0hy_0jz_0l"), "q\"x\"y'z`");
    }

    #[test]
    fn passes_unknown_escapes_through() {
        assert_eq!(decode_page_name("trailing_"), "trailing_");
        assert_eq!(decode_page_name("odd_0z"), "odd_0z");
    }
}
