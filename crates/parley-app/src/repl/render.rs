//! Terminal rendering of messages and streamed replies.

use std::io::{self, Write};

use parley_ai::Role;

use crate::controller::Message;

const USER_LABEL: &str = "you";

pub fn label(role: Role, model_label: &str) -> &str {
    match role {
        Role::User => USER_LABEL,
        Role::Model => model_label,
    }
}

/// Format a complete message for display.
pub fn format_message(message: &Message, model_label: &str) -> String {
    let mut out = format!(
        "[{}] {}> ",
        message.timestamp.format("%H:%M"),
        label(message.role, model_label)
    );
    if let Some(ref image) = message.image {
        out.push_str(&format!("[image: {}] ", image.mime_type));
    }
    if message.is_error {
        out.push_str("(!) ");
    }
    out.push_str(&message.text);
    out
}

pub fn print_message(message: &Message, model_label: &str) {
    println!("{}", format_message(message, model_label));
}

/// Writes a streaming reply incrementally.
///
/// Each update carries the full accumulated text; only the part not yet
/// printed is written.
pub struct StreamPrinter<W: Write> {
    out: W,
    printed: usize,
}

impl StreamPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> StreamPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, printed: 0 }
    }

    pub fn begin(&mut self, model_label: &str) -> io::Result<()> {
        write!(self.out, "{model_label}> ")?;
        self.out.flush()
    }

    pub fn update(&mut self, accumulated: &str) -> io::Result<()> {
        match accumulated.get(self.printed..) {
            Some(suffix) if !suffix.is_empty() => {
                self.out.write_all(suffix.as_bytes())?;
                self.printed = accumulated.len();
                self.out.flush()
            }
            _ => Ok(()),
        }
    }

    /// Terminate the reply line, printing the error text if it failed.
    pub fn finish(&mut self, message: Option<&Message>) -> io::Result<()> {
        if let Some(message) = message.filter(|m| m.is_error) {
            if self.printed > 0 {
                writeln!(self.out)?;
            }
            write!(self.out, "(!) {}", message.text)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(printer: StreamPrinter<Vec<u8>>) -> String {
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn prints_only_new_suffix() {
        let mut p = StreamPrinter::new(Vec::new());
        p.begin("flash").unwrap();
        p.update("Hi").unwrap();
        p.update("Hi there!").unwrap();
        p.update("Hi there!").unwrap();
        p.finish(None).unwrap();
        assert_eq!(output(p), "flash> Hi there!\n");
    }

    #[test]
    fn error_replaces_partial_line() {
        let mut p = StreamPrinter::new(Vec::new());
        p.begin("pro").unwrap();
        p.update("partial").unwrap();
        let mut m = Message::placeholder();
        m.mark_error("Sorry, something went wrong.");
        p.finish(Some(&m)).unwrap();
        assert_eq!(output(p), "pro> partial\n(!) Sorry, something went wrong.\n");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_surface_to_caller() {
        let mut p = StreamPrinter::new(BrokenPipe);
        assert!(p.begin("flash").is_err());
        let err = p.update("Hi").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn format_user_message_with_image() {
        let image = parley_ai::ImagePayload {
            mime_type: "image/png".into(),
            data: String::new(),
        };
        let m = Message::user("look", Some(image));
        let line = format_message(&m, "flash");
        assert!(line.ends_with("you> [image: image/png] look"));
    }
}
