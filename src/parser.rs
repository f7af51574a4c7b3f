//! The line grammar, following [https://bottlecaps.de/rr/ui]'s syntax
//! ```ebnf
//! line        ::= ( field | '(' [^)]* ')' )* ( '*' [0-9]+ )? ( ';' [^\r\n]* )? [\r\n]
//! field       ::= [a-zA-Z] real_number?
//! real_number ::= '-'? [0-9]* ( '.' [0-9]* )?
//! ```
//!
//! The parser never rejects a byte. Unknown letters start a field that is discarded, stray
//! characters are ignored and a field only ends when the next one starts, a comment opens or the
//! line ends.
//!
//! On each line terminator the line is validated:
//! - with line numbers required, the `N` field must be present and not lower than the expected
//!   line number,
//! - the `*` field must match the xor of the line's bytes, and must be present when checksums are
//!   required.
//!
//! A valid line is acknowledged with `ok ` followed by the executor's output and a new line.
//! Otherwise a resend request is written and the executor is not called.
mod fields;
mod values;


use core::fmt::{self, Write};

use crate::{config::ChecksumPolicy, types::CommandRecord, Config, Error};

use fields::{transition, State, Word};
use values::DecFloat;

/// Acts on accepted lines.
pub trait Executor {
    /// `record` may be updated to change the persistent modes (units, positioning, expected line
    /// number). Anything written to `reply` is sent between the `ok ` and the end of line.
    fn execute(&mut self, record: &mut CommandRecord, reply: &mut dyn Write) -> fmt::Result;
}

impl<F> Executor for F
where
    F: FnMut(&mut CommandRecord, &mut dyn Write) -> fmt::Result,
{
    fn execute(&mut self, record: &mut CommandRecord, reply: &mut dyn Write) -> fmt::Result {
        self(record, reply)
    }
}

#[derive(Debug, Clone)]
pub struct Parser {
    config: Config,
    state: State,
    value: DecFloat,
    record: CommandRecord,
    /// Nothing but the terminator was received for this line.
    empty: bool,
    /// An echo write failed during this line.
    reply_failed: bool,
}

impl Parser {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: State::Idle,
            value: DecFloat::default(),
            record: CommandRecord::new(),
            empty: true,
            reply_failed: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn record(&self) -> &CommandRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut CommandRecord {
        &mut self.record
    }

    /// Processes one byte.
    ///
    /// Returns `None` until a line terminator is received. Empty lines are skipped rather than
    /// rejected, even with line numbers required, so a CRLF pair yields a single item. A terminated
    /// line yields `Ok(())` if it was accepted and handed to `executor`, or the reason for the
    /// resend request otherwise.
    pub fn feed<X, W>(
        &mut self,
        byte: u8,
        executor: &mut X,
        reply: &mut W,
    ) -> Option<Result<(), Error>>
    where
        X: Executor + ?Sized,
        W: Write,
    {
        let terminator = matches!(byte, b'\r' | b'\n');
        if terminator && self.empty {
            return None;
        }
        self.empty = false;

        if self.config.checksum_policy == ChecksumPolicy::IncludeMarker && !terminator {
            self.checksum(byte);
        }

        let pending = match self.state {
            State::Field(word) => word,
            _ => None,
        };
        let (state, effects) = transition(self.state, byte);
        self.state = state;

        if effects.commit {
            self.commit(pending, reply);
        }
        if let Some(word) = effects.start {
            word.start(&mut self.record);
            if self.config.echo {
                self.reply_failed |= reply.write_char(word.letter()).is_err();
            }
        }
        if let Some(numeral) = effects.numeral {
            self.value.push(numeral);
        }

        if self.config.checksum_policy == ChecksumPolicy::ExcludeMarker && !terminator {
            self.checksum(byte);
        }

        if effects.end_of_line {
            if self.config.echo {
                self.reply_failed |= reply.write_char(char::from(byte)).is_err();
            }
            Some(self.end_of_line(executor, reply))
        } else {
            None
        }
    }

    fn checksum(&mut self, byte: u8) {
        if !self.record.seen.checksum {
            self.record.checksum_computed ^= byte;
        }
    }

    fn commit<W: Write>(&mut self, word: Option<Word>, reply: &mut W) {
        let value = self.value;
        self.value.clear();
        let Some(word) = word else {
            return;
        };

        let value = word.conversion(&self.record, &self.config).apply(&value);
        word.store(&mut self.record, value);
        tracing::trace!(field = %word.letter(), value, "field committed");

        if self.config.echo {
            self.reply_failed |= write!(reply, "{}", value).is_err();
        }
    }

    fn validate(&self) -> Result<(), Error> {
        let record = &self.record;
        if self.config.require_line_number {
            match record.line_number() {
                Some(n) if n >= record.expected_line_number => {}
                _ => return Err(Error::UnexpectedLineNumber(record.expected_line_number)),
            }
        }

        let valid = match record.checksum_read() {
            Some(read) => read == record.checksum_computed,
            None => !self.config.require_checksum,
        };
        if valid {
            Ok(())
        } else {
            Err(Error::BadChecksum(record.checksum_computed))
        }
    }

    fn end_of_line<X, W>(&mut self, executor: &mut X, reply: &mut W) -> Result<(), Error>
    where
        X: Executor + ?Sized,
        W: Write,
    {
        let res = match self.validate() {
            Ok(()) => {
                tracing::debug!(
                    line_number = ?self.record.line_number(),
                    command = ?self.record.command,
                    "line accepted"
                );
                let acknowledged = acknowledge(&mut self.record, executor, reply);
                if let Some(n) = self.record.line_number() {
                    self.record.expected_line_number = n.saturating_add(1);
                }
                match acknowledged {
                    Ok(()) if !self.reply_failed => Ok(()),
                    _ => Err(Error::Reply),
                }
            }
            Err(e) => {
                tracing::warn!(
                    line_number = ?self.record.line_number(),
                    expected_line_number = self.record.expected_line_number,
                    checksum = self.record.checksum_computed,
                    "{}",
                    e
                );
                let _ = writeln!(reply, "{}", e);
                Err(e)
            }
        };

        self.record.reset();
        self.value.clear();
        self.state = State::Idle;
        self.empty = true;
        self.reply_failed = false;
        res
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn acknowledge<X, W>(record: &mut CommandRecord, executor: &mut X, reply: &mut W) -> fmt::Result
where
    X: Executor + ?Sized,
    W: Write,
{
    // the executor runs even when the reply channel fails, the line has been accepted
    let ok = reply.write_str("ok ");
    let executed = executor.execute(record, reply);
    let eol = reply.write_str("\n");
    ok.and(executed).and(eol)
}
