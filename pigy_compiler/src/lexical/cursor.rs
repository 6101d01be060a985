//! Character cursor over a buffered byte source
//!
//! Decodes UTF-8 one character at a time, keeps the line-relative column
//! counter the state machine uses to spot line-leading markers, and offers a
//! single replay slot for characters that must be seen again by another
//! context.

use super::error::LexerError;
use crate::utils::Position;
use std::io::{self, BufRead};

/// Column value meaning "nothing consumed on this line yet"
pub const LINE_START: u32 = 0;

pub struct CharCursor<R> {
    reader: R,
    replay: Option<char>,
    column: u32,
    /// Position of the next byte to decode
    next: Position,
    /// Position of the character most recently returned
    current: Position,
    chars_read: usize,
}

impl<R: BufRead> CharCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            replay: None,
            column: LINE_START,
            next: Position::start(),
            current: Position::start(),
            chars_read: 0,
        }
    }

    /// Next character, or `None` at end of input. Replayed characters come
    /// first and do not move the column counter.
    pub fn next_char(&mut self) -> Result<Option<char>, LexerError> {
        if let Some(c) = self.replay.take() {
            return Ok(Some(c));
        }

        let Some(c) = self.decode()? else {
            return Ok(None);
        };

        if c != '\n' && c != '\r' {
            self.column += 1;
        }
        self.current = self.next;
        self.next = self.next.advance(c);
        self.chars_read += 1;
        Ok(Some(c))
    }

    /// Queue `c` to be returned by the next read
    pub fn replay(&mut self, c: char) {
        debug_assert!(self.replay.is_none(), "replay slot already occupied");
        self.replay = Some(c);
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn reset_column(&mut self) {
        self.column = LINE_START;
    }

    /// True when the last character read was the first one on its line
    pub fn at_line_start(&self) -> bool {
        self.column == LINE_START + 1
    }

    pub fn position(&self) -> Position {
        self.current
    }

    pub fn chars_read(&self) -> usize {
        self.chars_read
    }

    fn decode(&mut self) -> Result<Option<char>, LexerError> {
        let offset = self.next.offset;
        let Some(first) = self.read_byte()? else {
            return Ok(None);
        };

        let width = utf8_width(first).ok_or(LexerError::InvalidEncoding { offset })?;
        let mut bytes = [first, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = self
                .read_byte()?
                .ok_or(LexerError::InvalidEncoding { offset })?;
        }

        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or(LexerError::InvalidEncoding { offset })
    }

    fn read_byte(&mut self) -> Result<Option<u8>, LexerError> {
        loop {
            let byte = match self.reader.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => buf[0],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(LexerError::Io {
                        position: self.next,
                        source,
                    })
                }
            };
            self.reader.consume(1);
            return Ok(Some(byte));
        }
    }
}

/// Encoded length implied by a UTF-8 lead byte
fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}
