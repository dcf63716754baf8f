//! Marker encoding for escaped quotes and embedded newlines.
//!
//! The line scanner is strictly line-local, so before it runs, escaped
//! quotes and the literal newlines produced by block folding are replaced
//! with opaque markers; the markers are reversed after classification.

const ENCODED: [(&str, &str); 3] = [("\\'", "$@00"), ("\\\"", "$@01"), ("\n", "$@02")];
const DECODED: [(&str, &str); 3] = [("$@00", "'"), ("$@01", "\""), ("$@02", "\n")];

pub fn encode(text: &str) -> String {
    let mut out = text.to_string();
    for (from, to) in ENCODED {
        out = out.replace(from, to);
    }
    out
}

pub fn decode(text: &str) -> String {
    let mut out = text.to_string();
    for (from, to) in DECODED {
        out = out.replace(from, to);
    }
    out
}
