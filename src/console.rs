use std::fmt::Display;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;

/// Result of waiting on an operator prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    /// Input reached end-of-file.
    Closed,
    /// The session was cancelled while waiting.
    Interrupted,
}

/// Operator console: status lines out, Enter-to-continue prompts in.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()
    }

    pub async fn confirm(
        &mut self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> io::Result<Confirmation> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut buf = String::new();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                writeln!(self.output)?;
                Ok(Confirmation::Interrupted)
            }
            read = self.input.read_line(&mut buf) => match read? {
                0 => {
                    writeln!(self.output)?;
                    Ok(Confirmation::Closed)
                }
                _ => Ok(Confirmation::Confirmed),
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn enter_confirms() {
        let mut console = Console::new(&b"\n"[..], Vec::new());
        let token = CancellationToken::new();
        let got = console.confirm("Press Enter...", &token).await.unwrap();
        assert_eq!(got, Confirmation::Confirmed);
        assert_eq!(console.into_output(), b"Press Enter...");
    }

    #[tokio::test]
    async fn eof_is_closed() {
        let mut console = Console::new(&b""[..], Vec::new());
        let token = CancellationToken::new();
        let got = console.confirm("> ", &token).await.unwrap();
        assert_eq!(got, Confirmation::Closed);
    }

    #[tokio::test]
    async fn cancelled_token_interrupts() {
        let (reader, _writer) = tokio::io::duplex(64);
        let mut console = Console::new(tokio::io::BufReader::new(reader), Vec::new());
        let token = CancellationToken::new();
        token.cancel();
        let got = console.confirm("> ", &token).await.unwrap();
        assert_eq!(got, Confirmation::Interrupted);
    }
}
