//! Line-oriented edits on session description text.
//!
//! The local media stack has no decoder for the retransmission (`rtx`)
//! codec, so every line that advertises it, or that carries its `apt=`
//! format parameter, must be removed before a remote description is
//! installed.

const CRLF: &str = "\r\n";
const LF: &str = "\n";

/// Line terminator used by the document: CRLF if it appears anywhere, LF
/// otherwise.
pub fn line_ending(sdp: &str) -> &'static str {
    if sdp.contains(CRLF) { CRLF } else { LF }
}

/// True for lines that declare the retransmission codec or its
/// associated-payload parameter.
pub fn is_retransmission_line(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    if lower.contains("video/rtx") || lower.contains("apt=") {
        return true;
    }

    // a=rtpmap:<pt> rtx/<clock>
    lower
        .strip_prefix("a=rtpmap:")
        .and_then(|rest| rest.split_once(' '))
        .is_some_and(|(_, encoding)| encoding.trim_start().starts_with("rtx/"))
}

/// Removes retransmission lines, keeping every other line in order.
///
/// Retained lines are re-joined with the document's own terminator, and a
/// trailing terminator is kept only if the input had one. The result is a
/// fixed point: filtering it again returns it unchanged.
pub fn strip_retransmission(sdp: &str) -> String {
    let ending = line_ending(sdp);
    let terminated = sdp.ends_with('\n');

    let mut out = String::with_capacity(sdp.len());
    for line in sdp.lines() {
        if is_retransmission_line(line) {
            continue;
        }
        out.push_str(line);
        out.push_str(ending);
    }

    if !terminated && out.ends_with(ending) {
        out.truncate(out.len() - ending.len());
    }
    out
}
