//! Incremental UTF-8 decoding of a chunked response body.
//!
//! The transport splits the body at arbitrary byte offsets, so a multi-byte
//! character may straddle two chunks. [`Utf8Decoder`] carries the incomplete
//! tail forward; [`decode_chars`] adapts a byte-chunk stream into a stream of
//! characters.

use std::collections::VecDeque;
use std::pin::Pin;

use futures_util::{stream, Stream, StreamExt};

/// Stateful UTF-8 decoder. Invalid sequences decode as U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    carry: Vec<u8>,
}

impl Utf8Decoder {
    /// Decode `bytes`, returning every character completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<char> {
        self.carry.extend_from_slice(bytes);
        let mut out = Vec::new();
        let mut rest: &[u8] = &self.carry;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.extend(valid.chars());
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    out.extend(String::from_utf8_lossy(valid).chars());
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        // Incomplete sequence at the end: wait for more bytes.
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        self.carry = rest.to_vec();
        out
    }

    /// Flush a dangling partial sequence at end of input.
    pub fn finish(&mut self) -> Option<char> {
        if self.carry.is_empty() {
            None
        } else {
            self.carry.clear();
            Some(char::REPLACEMENT_CHARACTER)
        }
    }
}

struct DecodeState<S> {
    body: Pin<Box<S>>,
    decoder: Utf8Decoder,
    pending: VecDeque<char>,
    finished: bool,
}

/// Turn a stream of byte chunks into a stream of characters. A transport
/// error is yielded in order and ends the stream.
pub fn decode_chars<S, B, E>(body: S) -> impl Stream<Item = Result<char, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let state = DecodeState {
        body: Box::pin(body),
        decoder: Utf8Decoder::default(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if let Some(c) = st.pending.pop_front() {
                return Some((Ok(c), st));
            }
            if st.finished {
                return None;
            }
            match st.body.next().await {
                Some(Ok(chunk)) => st.pending.extend(st.decoder.push(chunk.as_ref())),
                Some(Err(e)) => {
                    st.finished = true;
                    return Some((Err(e), st));
                }
                None => {
                    st.finished = true;
                    st.pending.extend(st.decoder.finish());
                }
            }
        }
    })
}
