//! Stock token consumers

use super::{Completion, TokenConsumer};
use crate::log_error;
use crate::logging::codes;
use crate::tokens::{Token, TokenStream};
use serde::Serialize;
use std::io::{self, Write};

/// Accumulates every token plus the concatenated payload text, the buffer a
/// code generator would work from.
#[derive(Debug, Default)]
pub struct TokenCollector {
    stream: TokenStream,
    text: String,
}

impl TokenCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct CollectedTokens {
    pub stream: TokenStream,
    pub text: String,
    pub completion: Completion,
}

impl TokenConsumer for TokenCollector {
    type Output = CollectedTokens;

    fn consume(&mut self, token: Token) {
        self.text.push_str(&token.payload);
        self.stream.push(token);
    }

    fn finish(self, completion: Completion) -> CollectedTokens {
        CollectedTokens {
            stream: self.stream,
            text: self.text,
            completion,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `[id: payload]`
    #[default]
    Plain,
    /// One JSON object per line
    Json,
}

#[derive(Serialize)]
struct TokenRecord<'a> {
    id: u32,
    category: &'static str,
    payload: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    literal: Option<char>,
}

/// Writes each token as soon as it arrives
pub struct TokenPrinter<W: Write + Send + 'static> {
    writer: W,
    format: OutputFormat,
    written: usize,
    error: Option<io::Error>,
}

#[derive(Debug)]
pub struct PrintSummary {
    pub tokens_written: usize,
    pub completion: Completion,
}

impl<W: Write + Send + 'static> TokenPrinter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            written: 0,
            error: None,
        }
    }

    fn write_token(&mut self, token: &Token) -> io::Result<()> {
        match self.format {
            OutputFormat::Plain => writeln!(self.writer, "{}", token),
            OutputFormat::Json => {
                let record = TokenRecord {
                    id: token.id(),
                    category: token.category.name(),
                    payload: &token.payload,
                    literal: token.literal,
                };
                serde_json::to_writer(&mut self.writer, &record)?;
                writeln!(self.writer)
            }
        }
    }
}

impl TokenPrinter<io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write + Send + 'static> TokenConsumer for TokenPrinter<W> {
    type Output = io::Result<PrintSummary>;

    fn consume(&mut self, token: Token) {
        // keep draining after a write failure so the producer never blocks
        if self.error.is_some() {
            return;
        }
        match self.write_token(&token) {
            Ok(()) => self.written += 1,
            Err(e) => {
                log_error!(codes::sink::CONSUMER_OUTPUT_FAILURE, "Failed to write token",
                    "written" => self.written,
                    "io_error" => &e);
                self.error = Some(e);
            }
        }
    }

    fn finish(mut self, completion: Completion) -> io::Result<PrintSummary> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(PrintSummary {
            tokens_written: self.written,
            completion,
        })
    }
}
