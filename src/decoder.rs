//! # Line-oriented control code decoder.
//!
//! Raw text arrives in arbitrary chunks (a line may be split across reads, one
//! read may carry several lines). [`CodeDecoder`] reassembles lines on `\n`
//! and keeps only the ones that are a single integer in `0..=9`:
//!
//! ```text
//! "1\n  5 \nhello\n" ─┐
//!                     ├──► push() ──► [1, 5]
//! "12\n3"            ─┘    push() ──► []     ("12" out of range, "3" incomplete)
//! "\n"                     push() ──► [3]
//! ```
//!
//! Any trailing text without a final newline is discarded when the input ends.
//!
//! ## Example
//! ```rust
//! use workshop::CodeDecoder;
//!
//! let mut decoder = CodeDecoder::new();
//! assert_eq!(decoder.push(b"4\nwelcome!\n -1\n9"), vec![4]);
//! assert_eq!(decoder.push(b"\n"), vec![9]);
//! ```

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::state::StateHandle;

/// Incremental newline decoder for control codes.
#[derive(Debug, Default)]
pub struct CodeDecoder {
    pending: Vec<u8>,
}

impl CodeDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns the codes of every line it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<u8> {
        self.pending.extend_from_slice(chunk);

        let mut codes = Vec::new();
        let mut consumed = 0;
        while let Some(pos) = self.pending[consumed..].iter().position(|&b| b == b'\n') {
            let line = &self.pending[consumed..consumed + pos];
            if let Some(code) = Self::parse_line(line) {
                codes.push(code);
            }
            consumed += pos + 1;
        }
        self.pending.drain(..consumed);
        codes
    }

    /// Bytes buffered after the last newline.
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Parses one complete line (without the newline).
    pub fn parse_line(line: &[u8]) -> Option<u8> {
        let text = std::str::from_utf8(line).ok()?.trim();
        if text.is_empty() {
            return None;
        }
        let n: i64 = text.parse().ok()?;
        u8::try_from(n).ok().filter(|code| *code <= 9)
    }

    /// Reads `reader` to the end and submits every decoded code to `state`, in order.
    ///
    /// Returns the number of codes submitted.
    pub async fn pump<R>(mut self, mut reader: R, state: &StateHandle) -> std::io::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = vec![0u8; 1024];
        let mut sent = 0;
        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            for code in self.push(&buf[..n]) {
                if let Err(e) = state.apply_code(code).await {
                    tracing::warn!(code, error = e.as_label(), "state controller gone, stopping decoder");
                    return Ok(sent);
                }
                sent += 1;
            }
        }
        if !self.pending.is_empty() {
            tracing::debug!(bytes = self.pending.len(), "discarding unterminated line");
        }
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Bus;
    use crate::state::StateController;
    use crate::vehicles::Category;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn test_lines_split_across_chunks() {
        let mut d = CodeDecoder::new();
        assert!(d.push(b"  ").is_empty());
        assert!(d.push(b"7").is_empty());
        assert_eq!(d.push(b" \r\n0\n"), vec![7, 0]);
        assert!(d.pending().is_empty());
    }

    #[test]
    fn test_invalid_lines_skipped() {
        let mut d = CodeDecoder::new();
        let codes = d.push(b"\n\nserver says hi\n10\n-3\n3.5\n+2\n-0\n99999999999999999999\n8\n");
        assert_eq!(codes, vec![2, 0, 8]);
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(CodeDecoder::parse_line(b" 9 "), Some(9));
        assert_eq!(CodeDecoder::parse_line(b""), None);
        assert_eq!(CodeDecoder::parse_line(&[0xff, b'1']), None);
    }

    #[tokio::test]
    async fn test_pump_feeds_controller_in_order() {
        let (ctrl, handle) = StateController::new(16, Bus::new(16), tokio::time::Instant::now());
        let token = CancellationToken::new();
        ctrl.spawn(token.clone());

        let input: &[u8] = b"1\nnoise\n4\n3";
        let sent = CodeDecoder::new().pump(input, &handle).await.unwrap();
        assert_eq!(sent, 2);

        let state = handle.apply_and_confirm(8).await.unwrap();
        assert_eq!(state.restricted, Some(Category::A));
        assert_eq!(state.priority, Some(Category::A));
        token.cancel();
    }
}
