//! Token sink: hands tokens from the lexer to a consumer running on its own thread
//!
//! The producer side ([`TokenSink`]) pushes tokens into a bounded channel and
//! finishes with an explicit [`SinkMessage::Complete`] or
//! [`SinkMessage::Abort`] event. The consumer side drains the channel in
//! emission order and hands each token to a [`TokenConsumer`].

pub mod consumers;

use crate::logging::{self, codes};
use crate::tokens::Token;
use crate::{log_debug, log_error};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

pub use consumers::{CollectedTokens, OutputFormat, PrintSummary, TokenCollector, TokenPrinter};

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("token consumer stopped receiving")]
    Closed,

    #[error("token consumer panicked")]
    ConsumerPanicked,

    #[error("failed to start token consumer: {0}")]
    Spawn(#[from] std::io::Error),
}

impl SinkError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            SinkError::Closed => codes::sink::SINK_CLOSED,
            SinkError::ConsumerPanicked => codes::sink::CONSUMER_PANICKED,
            SinkError::Spawn(_) => codes::system::INITIALIZATION_FAILURE,
        }
    }
}

/// Messages carried from producer to consumer
#[derive(Debug)]
pub enum SinkMessage {
    Token(Token),
    Complete,
    Abort(String),
}

/// How the token stream ended, as observed by the consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Complete,
    Aborted(String),
    /// Producer went away without signalling
    Disconnected,
}

/// Anything tokens can be emitted into
pub trait TokenEmitter {
    fn emit(&mut self, token: Token) -> Result<(), SinkError>;
}

/// Synchronous emission into a plain vector
impl TokenEmitter for Vec<Token> {
    fn emit(&mut self, token: Token) -> Result<(), SinkError> {
        self.push(token);
        Ok(())
    }
}

/// Receives tokens in emission order on the consumer thread
pub trait TokenConsumer: Send + 'static {
    type Output: Send + 'static;

    fn consume(&mut self, token: Token);

    fn finish(self, completion: Completion) -> Self::Output;
}

/// Producer handle
pub struct TokenSink {
    sender: SyncSender<SinkMessage>,
    sent: usize,
}

impl TokenSink {
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Signal normal end of the stream
    pub fn complete(self) -> Result<(), SinkError> {
        self.sender
            .send(SinkMessage::Complete)
            .map_err(|_| SinkError::Closed)
    }

    /// Tell the consumer to stop after a fatal producer error
    pub fn abort(self, reason: &str) -> Result<(), SinkError> {
        self.sender
            .send(SinkMessage::Abort(reason.to_string()))
            .map_err(|_| SinkError::Closed)
    }
}

impl TokenEmitter for TokenSink {
    fn emit(&mut self, token: Token) -> Result<(), SinkError> {
        self.sender.send(SinkMessage::Token(token)).map_err(|_| {
            log_error!(codes::sink::SINK_CLOSED, "Token consumer hung up",
                "tokens_sent" => self.sent);
            SinkError::Closed
        })?;
        self.sent += 1;
        Ok(())
    }
}

/// Join handle for the consumer thread
pub struct ConsumerHandle<O> {
    handle: JoinHandle<O>,
}

impl<O> ConsumerHandle<O> {
    pub fn join(self) -> Result<O, SinkError> {
        self.handle.join().map_err(|_| {
            log_error!(codes::sink::CONSUMER_PANICKED, "Token consumer thread panicked");
            SinkError::ConsumerPanicked
        })
    }
}

/// Start `consumer` on its own thread. A capacity of zero makes every
/// emission a rendezvous with the consumer.
pub fn spawn_consumer<C: TokenConsumer>(
    consumer: C,
    capacity: usize,
) -> Result<(TokenSink, ConsumerHandle<C::Output>), SinkError> {
    let (sender, receiver) = mpsc::sync_channel(capacity);
    let file_context = logging::get_current_file_context();

    let handle = thread::Builder::new()
        .name("pigy-token-consumer".to_string())
        .spawn(move || match file_context {
            Some(path) => logging::with_file_context(&path, || drain(receiver, consumer)),
            None => drain(receiver, consumer),
        })?;

    Ok((TokenSink { sender, sent: 0 }, ConsumerHandle { handle }))
}

fn drain<C: TokenConsumer>(receiver: Receiver<SinkMessage>, mut consumer: C) -> C::Output {
    let mut received = 0usize;

    let completion = loop {
        match receiver.recv() {
            Ok(SinkMessage::Token(token)) => {
                received += 1;
                consumer.consume(token);
            }
            Ok(SinkMessage::Complete) => break Completion::Complete,
            Ok(SinkMessage::Abort(reason)) => break Completion::Aborted(reason),
            Err(_) => break Completion::Disconnected,
        }
    };

    log_debug!("Token consumer drained",
        "code" => codes::success::CONSUMER_DRAINED,
        "tokens" => received,
        "completion" => format!("{:?}", completion));

    consumer.finish(completion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenCategory;
    use assert_matches::assert_matches;

    struct Counting(usize);

    impl TokenConsumer for Counting {
        type Output = (usize, Completion);

        fn consume(&mut self, _token: Token) {
            self.0 += 1;
        }

        fn finish(self, completion: Completion) -> Self::Output {
            (self.0, completion)
        }
    }

    struct Panicking;

    impl TokenConsumer for Panicking {
        type Output = ();

        fn consume(&mut self, _token: Token) {
            panic!("consumer failure");
        }

        fn finish(self, _completion: Completion) {}
    }

    #[test]
    fn test_complete_event_ends_drain() {
        let (mut sink, handle) = spawn_consumer(Counting(0), 0).unwrap();
        for c in ['a', 'b', 'c'] {
            sink.emit(Token::raw(c)).unwrap();
        }
        assert_eq!(sink.sent(), 3);
        sink.complete().unwrap();

        assert_eq!(handle.join().unwrap(), (3, Completion::Complete));
    }

    #[test]
    fn test_abort_carries_reason() {
        let (mut sink, handle) = spawn_consumer(Counting(0), 4).unwrap();
        sink.emit(Token::new(TokenCategory::RulePattern, "x")).unwrap();
        sink.abort("stack underflow").unwrap();

        let (count, completion) = handle.join().unwrap();
        assert_eq!(count, 1);
        assert_eq!(completion, Completion::Aborted("stack underflow".into()));
    }

    #[test]
    fn test_dropped_sink_disconnects() {
        let (sink, handle) = spawn_consumer(Counting(0), 1).unwrap();
        drop(sink);
        assert_eq!(handle.join().unwrap(), (0, Completion::Disconnected));
    }

    #[test]
    fn test_panicking_consumer_is_reported() {
        let (mut sink, handle) = spawn_consumer(Panicking, 0).unwrap();
        let _ = sink.emit(Token::raw('x'));
        // the consumer is gone; further sends fail
        let mut failed = false;
        for _ in 0..3 {
            if sink.emit(Token::raw('y')).is_err() {
                failed = true;
                break;
            }
        }
        assert!(failed);
        assert_matches!(handle.join(), Err(SinkError::ConsumerPanicked));
    }

    struct FileTagged;

    impl TokenConsumer for FileTagged {
        type Output = Option<std::path::PathBuf>;

        fn consume(&mut self, _token: Token) {}

        fn finish(self, _completion: Completion) -> Self::Output {
            logging::get_current_file_context()
        }
    }

    #[test]
    fn test_consumer_thread_inherits_file_context() {
        let path = std::path::Path::new("calc.pigy");
        let handle = logging::with_file_context(path, || {
            let (sink, handle) = spawn_consumer(FileTagged, 0).unwrap();
            sink.complete().unwrap();
            handle
        });
        assert_eq!(handle.join().unwrap(), Some(path.to_path_buf()));

        let (sink, handle) = spawn_consumer(FileTagged, 0).unwrap();
        sink.complete().unwrap();
        assert_eq!(handle.join().unwrap(), None);
    }

    #[test]
    fn test_vec_emitter() {
        let mut tokens: Vec<Token> = Vec::new();
        tokens.emit(Token::eof()).unwrap();
        assert_eq!(tokens.len(), 1);
    }
}
