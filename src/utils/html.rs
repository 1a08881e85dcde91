//! Plain-text extraction from HTML documents.

/// Elements whose body is dropped together with their tags
const RAW_TEXT_ELEMENTS: &[(&[u8], &[u8])] = &[
    (b"<script", b"</script>"),
    (b"<style", b"</style>"),
];

const ENTITIES: &[(&[u8], u8)] = &[
    (b"&amp;", b'&'),
    (b"&lt;", b'<'),
    (b"&gt;", b'>'),
    (b"&quot;", b'"'),
    (b"&nbsp;", b' '),
];

/// Strip tags, `<script>`/`<style>` bodies and the common entities from `html`.
///
/// Unknown entities are kept verbatim. An unterminated `<script>` or
/// `<style>` swallows the rest of the document.
pub fn extract_text(html: &str) -> String {
    let bytes = html.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut inside_tag = false;
    let mut i = 0;

    while i < bytes.len() {
        let rest = &bytes[i..];

        if !inside_tag {
            if let Some(close) = raw_text_close(rest) {
                i += find_ignore_case(rest, close).map_or(rest.len(), |pos| pos + close.len());
                continue;
            }
        }

        match bytes[i] {
            b'<' => inside_tag = true,
            b'>' => inside_tag = false,
            _ if inside_tag => {}
            b'&' => {
                if let Some((name, ch)) = ENTITIES.iter().find(|(name, _)| rest.starts_with(name)) {
                    out.push(*ch);
                    i += name.len();
                    continue;
                }
                out.push(b'&');
            }
            b => out.push(b),
        }
        i += 1;
    }

    // Only ASCII ranges were removed, so the output stays valid UTF-8
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Closing tag to skip to if `rest` opens a raw-text element
fn raw_text_close(rest: &[u8]) -> Option<&'static [u8]> {
    RAW_TEXT_ELEMENTS.iter().find_map(|&(open, close)| {
        let opens = rest.len() > open.len()
            && rest[..open.len()].eq_ignore_ascii_case(open)
            && matches!(rest[open.len()], b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r');
        opens.then_some(close)
    })
}

fn find_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}
