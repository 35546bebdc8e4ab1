//! Line ending normalisation of expanded content.

use std::borrow::Cow;
use std::iter;

use tessera_config::LineEnding;

const CRLF: &str = "\r\n";
const LF: &str = "\n";

/// Apply `policy` to `text`.
///
/// `Dos` first collapses CRLF to LF and then expands every LF to CRLF, so
/// content that already uses CRLF is left as is. `Unix` drops every CR that
/// directly precedes an LF, including runs such as `\r\r\n`; other CRs stay.
#[must_use]
pub fn normalize_line_endings(text: &str, policy: LineEnding) -> Cow<'_, str> {
    match policy {
        LineEnding::Keep => Cow::Borrowed(text),
        LineEnding::Dos => Cow::Owned(text.replace(CRLF, LF).replace(LF, CRLF)),
        LineEnding::Unix if text.contains(CRLF) => Cow::Owned(strip_cr_before_lf(text)),
        LineEnding::Unix => Cow::Borrowed(text),
    }
}

fn strip_cr_before_lf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_cr = 0;
    for ch in text.chars() {
        match ch {
            '\r' => pending_cr += 1,
            '\n' => {
                pending_cr = 0;
                out.push('\n');
            }
            other => {
                out.extend(iter::repeat_n('\r', pending_cr));
                pending_cr = 0;
                out.push(other);
            }
        }
    }
    out.extend(iter::repeat_n('\r', pending_cr));
    out
}
