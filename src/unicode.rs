//! Character classification for ECMAScript source text.

use unicode_xid::UnicodeXID;

pub const ZWNJ: char = '\u{200C}';
pub const ZWJ: char = '\u{200D}';

/// Check if a character can start an identifier
#[inline]
pub fn is_id_start(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphabetic() || ch == '_' || ch == '$';
    }
    UnicodeXID::is_xid_start(ch) || is_id_only_start(ch)
}

/// Check if a character can continue an identifier
#[inline]
pub fn is_id_continue(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphanumeric() || ch == '_' || ch == '$';
    }
    ch == ZWNJ || ch == ZWJ || UnicodeXID::is_xid_continue(ch) || is_id_only_start(ch)
}

/// `ID_Start` code points missing from `XID_Start`.
///
/// The XID sets drop characters that change under NFKC, but identifiers are
/// defined over `ID_Start`/`ID_Continue`.
fn is_id_only_start(ch: char) -> bool {
    matches!(
        ch,
        '\u{037A}'
            | '\u{0E33}'
            | '\u{0EB3}'
            | '\u{309B}'..='\u{309C}'
            | '\u{FC5E}'..='\u{FC63}'
            | '\u{FDFA}'..='\u{FDFB}'
            | '\u{FE70}'
            | '\u{FE72}'
            | '\u{FE74}'
            | '\u{FE76}'
            | '\u{FE78}'
            | '\u{FE7A}'
            | '\u{FE7C}'
            | '\u{FE7E}'
            | '\u{FF9E}'..='\u{FF9F}'
    )
}

/// LF, CR, LS and PS
#[inline]
pub fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// ECMAScript WhiteSpace: TAB, VT, FF, ZWNBSP and every `Zs` code point.
pub fn is_whitespace(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\u{000B}'
            | '\u{000C}'
            | ' '
            | '\u{00A0}'
            | '\u{FEFF}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}
