use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures::Stream;
use pin_project_lite::pin_project;

use crate::{Error, Executor, Parser};

pub trait ByteStreamExt: Stream<Item = u8> {
    /// Drives `parser` with the bytes of this stream, yielding one item per terminated line.
    fn gcode_lines<X, W>(self, parser: Parser, executor: X, reply: W) -> Lines<Self, X, W>
    where
        Self: Sized,
        X: Executor,
        W: fmt::Write,
    {
        Lines::new(self, parser, executor, reply)
    }
}
impl<T: ?Sized> ByteStreamExt for T where T: Stream<Item = u8> {}

pin_project! {
    pub struct Lines<S, X, W> {
        #[pin]
        input: S,
        parser: Parser,
        executor: X,
        reply: W,
    }
}

impl<S, X, W> Lines<S, X, W> {
    pub fn new(input: S, parser: Parser, executor: X, reply: W) -> Self {
        Self {
            input,
            parser,
            executor,
            reply,
        }
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn executor(&self) -> &X {
        &self.executor
    }

    pub fn reply(&self) -> &W {
        &self.reply
    }

    pub fn into_parts(self) -> (Parser, X, W) {
        (self.parser, self.executor, self.reply)
    }
}

impl<S, X, W> Stream for Lines<S, X, W>
where
    S: Stream<Item = u8>,
    X: Executor,
    W: fmt::Write,
{
    type Item = Result<(), Error>;

    fn poll_next(self: Pin<&mut Self>, ctx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            match this.input.as_mut().poll_next(ctx) {
                Poll::Ready(Some(b)) => {
                    let res = this.parser.feed(b, &mut *this.executor, &mut *this.reply);
                    if let Some(res) = res {
                        return Poll::Ready(Some(res));
                    }
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::ByteStreamExt;
    use crate::{xor_sum, CommandRecord, Config, Error, Parser};
    use core::fmt;
    use futures::stream::{self, StreamExt};

    fn recorder() -> impl FnMut(&mut CommandRecord, &mut dyn fmt::Write) -> fmt::Result {
        |record: &mut CommandRecord, reply: &mut dyn fmt::Write| {
            write!(reply, "X:{}", record.target.x)
        }
    }

    #[test]
    fn one_item_per_line() {
        let input = b"G1 X1\nG1 X2\nG1 X3";
        let mut lines = stream::iter(input.iter().copied()).gcode_lines(
            Parser::new(
                Config::default()
                    .require_line_number(false)
                    .require_checksum(false),
            ),
            recorder(),
            String::new(),
        );
        let results = futures_executor::block_on((&mut lines).collect::<Vec<_>>());
        assert_eq!(results, [Ok(()), Ok(())]);
        assert_eq!(lines.reply(), "ok X:80\nok X:160\n");

        // the unterminated line is still pending
        let (parser, _, _) = lines.into_parts();
        assert!(parser.record().seen.x);
    }

    #[test]
    fn resend_requests_are_yielded() {
        let line = "N1 G1 X1";
        let input = format!(
            "{}*{}\n{}*{}\n",
            line,
            xor_sum(line.as_bytes()),
            line,
            xor_sum(line.as_bytes()) ^ 1
        );
        let config = Config::default()
            .require_line_number(true)
            .require_checksum(true)
            .with_checksum_policy(crate::ChecksumPolicy::ExcludeMarker);
        let mut parser = Parser::new(config);
        parser.record_mut().expected_line_number = 1;
        let mut lines =
            stream::iter(input.into_bytes()).gcode_lines(parser, recorder(), String::new());

        assert_eq!(futures_executor::block_on(lines.next()), Some(Ok(())));
        assert_eq!(lines.parser().record().expected_line_number, 2);
        assert_eq!(
            futures_executor::block_on(lines.next()),
            Some(Err(Error::UnexpectedLineNumber(2)))
        );
        assert_eq!(futures_executor::block_on(lines.next()), None);
        assert_eq!(lines.reply(), "ok X:80\nresend, expected line number 2\n");
    }
}
