use chatbot_core::{ChatView, Message};

/// Something to write to the terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrintEvent {
    /// A reply starts being revealed.
    Begin,
    /// More characters of the reply being revealed.
    Delta(String),
    /// The reply being revealed is complete.
    End,
    /// A message that appeared without being revealed.
    Message(Message),
}

/// Turns a stream of [`ChatView`]s into append-only terminal output.
///
/// A terminal cannot redraw the transcript, so the printer remembers what
/// it has already written and only emits the difference.
#[derive(Debug, Default)]
pub struct TranscriptPrinter {
    committed: usize,
    // Bytes of the current reveal already printed.
    revealed: Option<usize>,
}

impl TranscriptPrinter {
    /// Creates a printer that treats `view` as already printed.
    pub fn starting_at(view: &ChatView) -> Self {
        Self {
            committed: view.transcript.len(),
            revealed: view.revealing.as_ref().map(String::len),
        }
    }

    /// Returns what needs printing to bring the output up to `view`.
    pub fn update(&mut self, view: &ChatView) -> Vec<PrintEvent> {
        let mut events = vec![];

        for message in view.transcript.iter().skip(self.committed) {
            match self.revealed.take() {
                Some(printed) => {
                    // The reveal was committed, flush what was not
                    // observed yet.
                    let rest = message.content().get(printed..).unwrap_or_default();
                    if !rest.is_empty() {
                        events.push(PrintEvent::Delta(rest.to_owned()));
                    }
                    events.push(PrintEvent::End);
                }
                None => events.push(PrintEvent::Message(message.clone())),
            }
        }
        self.committed = view.transcript.len();

        if let Some(revealing) = &view.revealing {
            let printed = match self.revealed {
                Some(printed) => printed,
                None => {
                    events.push(PrintEvent::Begin);
                    0
                }
            };
            if let Some(delta) = revealing.get(printed..).filter(|d| !d.is_empty()) {
                events.push(PrintEvent::Delta(delta.to_owned()));
            }
            self.revealed = Some(revealing.len().max(printed));
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use chatbot_core::ChatStage;

    use super::*;

    fn view(messages: &[Message], revealing: Option<&str>) -> ChatView {
        ChatView {
            transcript: messages.iter().cloned().collect(),
            revealing: revealing.map(str::to_owned),
            draft: String::new(),
            stage: if revealing.is_some() {
                ChatStage::Revealing
            } else {
                ChatStage::Idle
            },
        }
    }

    #[test]
    fn test_reveal() {
        let user = Message::user("Halo");
        let mut printer = TranscriptPrinter::default();

        assert_eq!(
            printer.update(&view(&[user.clone()], None)),
            [PrintEvent::Message(user.clone())]
        );
        assert_eq!(
            printer.update(&view(&[user.clone()], Some(""))),
            [PrintEvent::Begin]
        );
        assert_eq!(
            printer.update(&view(&[user.clone()], Some("Ha"))),
            [PrintEvent::Delta("Ha".to_owned())]
        );
        assert_eq!(printer.update(&view(&[user.clone()], Some("Ha"))), []);
        assert_eq!(
            printer.update(&view(&[user.clone(), Message::assistant("Hai!")], None)),
            [PrintEvent::Delta("i!".to_owned()), PrintEvent::End]
        );
    }

    #[test]
    fn test_starting_at() {
        let history = view(&[Message::user("a"), Message::assistant("b")], None);
        let mut printer = TranscriptPrinter::starting_at(&history);
        assert_eq!(printer.update(&history), []);
    }
}
