//! Human-readable dumps of messages for diagnostics.

use std::fmt;

use super::{Message, MessageContents, MessageHeader, MessageType};

/// Multi-line rendering of a message, each line starting with a prefix.
///
/// Created by [`Message::printable_view`]; [`Message::printable`] renders it
/// straight into a `String`.
#[derive(Clone, Copy, Debug)]
pub struct Printable<'a> {
    message: &'a Message,
    line_prefix: &'a str,
}

impl Message {
    /// Borrow a [`Display`](fmt::Display) adapter rendering the message.
    #[must_use]
    pub fn printable_view<'a>(&'a self, line_prefix: &'a str) -> Printable<'a> {
        Printable {
            message: self,
            line_prefix,
        }
    }

    /// Render the header and a kind-specific summary of the message.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbimwire::Message;
    ///
    /// let text = Message::open(7, 4096).printable("> ");
    /// assert!(text.starts_with("> Header:\n"));
    /// assert!(text.contains("max_control_transfer = 4096"));
    /// ```
    #[must_use]
    pub fn printable(&self, line_prefix: &str) -> String {
        self.printable_view(line_prefix).to_string()
    }
}

impl fmt::Display for Printable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.line_prefix;
        let header = match self.message.header() {
            Ok(header) => header,
            Err(err) => return writeln!(f, "{p}Header: <malformed: {err}>"),
        };
        let code = MessageHeader::raw_type(self.message.as_bytes()).unwrap_or_default();

        writeln!(f, "{p}Header:")?;
        writeln!(f, "{p}  length      = {}", header.length())?;
        writeln!(
            f,
            "{p}  type        = {} (0x{code:08x})",
            header.message_type()
        )?;
        writeln!(f, "{p}  transaction = {}", header.transaction_id())?;

        if header.message_type() == MessageType::Invalid {
            tracing::warn!(code, "rendering message with an invalid type");
            return Ok(());
        }

        match self.message.contents() {
            Err(err) => writeln!(f, "{p}Contents: <malformed: {err}>"),
            Ok(MessageContents::Close) => Ok(()),
            Ok(MessageContents::Open {
                max_control_transfer,
            }) => {
                writeln!(f, "{p}Contents:")?;
                writeln!(f, "{p}  max_control_transfer = {max_control_transfer}")
            }
            Ok(MessageContents::OpenDone { status } | MessageContents::CloseDone { status }) => {
                writeln!(f, "{p}Contents:")?;
                writeln!(
                    f,
                    "{p}  status error = '{status}' (0x{:08x})",
                    status.code()
                )
            }
            Ok(MessageContents::HostError { error } | MessageContents::FunctionError { error }) => {
                writeln!(f, "{p}Contents:")?;
                writeln!(f, "{p}  error = '{error}' (0x{:08x})", error.code())
            }
            Ok(
                MessageContents::Command(body)
                | MessageContents::CommandDone(body)
                | MessageContents::Indication(body),
            ) => {
                writeln!(f, "{p}Fragment header:")?;
                writeln!(f, "{p}  total   = {}", body.header().total())?;
                writeln!(f, "{p}  current = {}", body.header().current())
            }
        }
    }
}
