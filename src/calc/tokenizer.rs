//! Token counting via the cl100k_base BPE vocabulary.
//!
//! The encoder is the same one OpenAI's chat models bill against, so counts
//! line up with invoices for those models and are a close approximation for
//! other vendors.

use std::sync::OnceLock;

use tiktoken_rs::{cl100k_base, CoreBPE};

static BPE: OnceLock<CoreBPE> = OnceLock::new();

/// Lazily build the encoder once per process; the vocabulary is embedded in
/// the binary so initialization cannot fail at runtime.
fn bpe() -> &'static CoreBPE {
    BPE.get_or_init(|| cl100k_base().expect("embedded cl100k_base vocabulary"))
}

/// Count BPE tokens in `text`.
///
/// Empty or whitespace-only text is exactly 0 tokens and never reaches the
/// encoder. Any well-formed Unicode string is accepted.
pub(crate) fn count_tokens(text: &str) -> u64 {
    if text.trim().is_empty() {
        return 0;
    }
    bpe().encode_ordinary(text).len() as u64
}

/// Count tokens plus a fixed message-framing overhead.
///
/// `overhead` approximates the tokens a chat API adds around the raw text
/// (role markers, message separators). It is a configured constant, not a
/// measured quantity, so the result is an estimate rather than an exact
/// billable count. Blank text stays 0 regardless of overhead.
pub(crate) fn estimate_tokens(text: &str, overhead: u64) -> u64 {
    if text.trim().is_empty() {
        return 0;
    }
    count_tokens(text) + overhead
}
