//! Text escaping for the string-table formats written by the emitters.
//!
//! Resource values are authored with XML entity escapes. Each target format
//! first resolves those entities, then applies its own quoting rules.

/// Resolves XML character entities (`&amp;`, `&#10;`, `&#x41;`, ...).
///
/// Unknown or malformed entities are kept verbatim.
///
/// # Examples
///
/// ```
/// use resbind::escape::unescape_xml;
///
/// assert_eq!(unescape_xml("Tom &amp; Jerry"), "Tom & Jerry");
/// assert_eq!(unescape_xml("&lt;b&gt;&#x41;&#66;"), "<b>AB");
/// assert_eq!(unescape_xml("&unknown; &"), "&unknown; &");
/// ```
#[must_use]
pub fn unescape_xml(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        while let Some(&next) = chars.peek() {
            if next == ';' {
                chars.next();
                terminated = true;
                break;
            }
            if next == '&' || next.is_whitespace() || entity.len() > 8 {
                break;
            }
            entity.push(next);
            chars.next();
        }

        match decode_entity(&entity).filter(|_| terminated) {
            Some(decoded) => result.push(decoded),
            None => {
                result.push('&');
                result.push_str(&entity);
                if terminated {
                    result.push(';');
                }
            }
        }
    }

    result
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let numeric = entity.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Escapes a value for an Apple `Localizable.strings` table.
///
/// Newlines become the two-character sequence `\n` and double quotes are
/// backslash-escaped.
///
/// # Examples
///
/// ```
/// use resbind::escape::apple_string;
///
/// assert_eq!(apple_string("Say \"hi\"\nnow"), "Say \\\"hi\\\"\\nnow");
/// assert_eq!(apple_string("Fish &amp; Chips"), "Fish & Chips");
/// ```
#[must_use]
pub fn apple_string(input: &str) -> String {
    unescape_xml(input)
        .replace('\n', "\\n")
        .replace('"', "\\\"")
}

/// Escapes a value for an Android `strings.xml` table.
///
/// With `strict_line_breaks` set, raw newlines are written untouched so only
/// explicit `\n` sequences break lines on device.
///
/// # Examples
///
/// ```
/// use resbind::escape::android_string;
///
/// assert_eq!(android_string("It's <ok>", false), "It\\'s &lt;ok&gt;");
/// assert_eq!(android_string("a\nb", false), "a\\nb");
/// assert_eq!(android_string("a\nb", true), "a\nb");
/// ```
#[must_use]
pub fn android_string(input: &str, strict_line_breaks: bool) -> String {
    let decoded = unescape_xml(input);
    let mut result = String::with_capacity(decoded.len());
    for ch in decoded.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '\n' if !strict_line_breaks => result.push_str("\\n"),
            _ => result.push(ch),
        }
    }
    result
}

/// Escapes text content for XML documents (plists, resource tables).
///
/// # Examples
///
/// ```
/// use resbind::escape::xml_text;
///
/// assert_eq!(xml_text("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
/// ```
#[must_use]
pub fn xml_text(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Escapes a value for a JVM `.properties` resource bundle.
///
/// # Examples
///
/// ```
/// use resbind::escape::properties_value;
///
/// assert_eq!(properties_value("C:\\dir\nnext"), "C:\\\\dir\\nnext");
/// ```
#[must_use]
pub fn properties_value(input: &str) -> String {
    let decoded = unescape_xml(input);
    let mut result = String::with_capacity(decoded.len());
    for ch in decoded.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("&quot;quoted&quot;", "\"quoted\"")]
    #[case("it&apos;s", "it's")]
    #[case("line&#10;break", "line\nbreak")]
    #[case("&#x263A;", "\u{263A}")]
    #[case("&amp;amp;", "&amp;")]
    #[case("a & b", "a & b")]
    #[case("&#xZZ;", "&#xZZ;")]
    #[case("dangling &amp", "dangling &amp")]
    fn unescapes_entities(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(unescape_xml(input), expected);
    }

    #[rstest]
    fn apple_escapes_quotes_and_newlines() {
        let escaped = apple_string("He said \"hi\"\nthen left");
        assert_eq!(escaped, "He said \\\"hi\\\"\\nthen left");
    }

    #[rstest]
    fn apple_keeps_authored_escape_sequences() {
        assert_eq!(apple_string("tab\\there"), "tab\\there");
    }

    #[rstest]
    #[case(false, "one\\ntwo")]
    #[case(true, "one\ntwo")]
    fn android_line_breaks_follow_strict_flag(#[case] strict: bool, #[case] expected: &str) {
        assert_eq!(android_string("one\ntwo", strict), expected);
    }

    #[rstest]
    fn android_reescapes_markup() {
        assert_eq!(
            android_string("&lt;b&gt;5 &amp; \"6\"", false),
            "&lt;b&gt;5 &amp; \\\"6\\\""
        );
    }

    #[rstest]
    fn properties_escape_control_characters() {
        assert_eq!(properties_value("a\tb\r\nc"), "a\\tb\\r\\nc");
    }
}
