use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// One line entered at the prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputLine {
    /// The text, without the line ending or continuation marker.
    pub text: String,
    /// The line ended with `\`, so the message goes on.
    pub continues: bool,
}

impl InputLine {
    /// Splits off a trailing continuation backslash.
    pub fn parse(line: &str) -> Self {
        match line.strip_suffix('\\') {
            Some(text) => Self {
                text: text.to_owned(),
                continues: true,
            },
            None => Self {
                text: line.to_owned(),
                continues: false,
            },
        }
    }
}

/// Line-oriented reader over the terminal input.
///
/// Create one per process and keep it: the underlying buffer may already
/// hold lines that have not been asked for yet.
#[derive(Debug)]
pub struct InputReader<R> {
    lines: Lines<R>,
}

impl InputReader<BufReader<Stdin>> {
    /// Reads from standard input.
    #[inline]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> InputReader<R> {
    /// Wraps a buffered reader.
    #[inline]
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Returns the next line without its line ending, or `None` at end of
    /// input.
    pub async fn next_line(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(err) => {
                error!("error reading input: {err}");
                None
            }
        }
    }

    /// Returns the next line, split into text and continuation marker.
    #[inline]
    pub async fn next_input(&mut self) -> Option<InputLine> {
        let line = self.next_line().await?;
        Some(InputLine::parse(&line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lines_are_not_lost_between_reads() {
        let mut reader = InputReader::new(&b"satu\ndua\r\ntiga\n"[..]);
        assert_eq!(reader.next_line().await.as_deref(), Some("satu"));
        assert_eq!(reader.next_line().await.as_deref(), Some("dua"));
        assert_eq!(reader.next_line().await.as_deref(), Some("tiga"));
        assert_eq!(reader.next_line().await, None);
    }

    #[tokio::test]
    async fn test_continuation() {
        let mut reader = InputReader::new(&b"baris satu\\\nbaris dua\n"[..]);
        assert_eq!(
            reader.next_input().await,
            Some(InputLine {
                text: "baris satu".to_owned(),
                continues: true,
            })
        );
        assert_eq!(
            reader.next_input().await,
            Some(InputLine {
                text: "baris dua".to_owned(),
                continues: false,
            })
        );
        assert_eq!(reader.next_input().await, None);
    }
}
