//! Message sinks

use super::message::Message;
use crate::error::Result;
use crate::types::JsonValue;
use std::io::Write;

/// Destination for output messages
pub trait Emitter: Send {
    fn emit(&mut self, message: &Message) -> Result<()>;

    /// Write a free-form JSON message (catalog, summaries)
    fn emit_value(&mut self, value: &JsonValue) -> Result<()>;
}

/// JSON lines over any writer
#[derive(Debug)]
pub struct JsonLinesWriter<W: Write + Send> {
    out: W,
    pretty: bool,
}

impl JsonLinesWriter<std::io::Stdout> {
    /// Writer over stdout
    pub fn stdout(pretty: bool) -> Self {
        Self::new(std::io::stdout(), pretty)
    }
}

impl<W: Write + Send> JsonLinesWriter<W> {
    pub fn new(out: W, pretty: bool) -> Self {
        Self { out, pretty }
    }

    /// Recover the inner writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line<T: serde::Serialize>(&mut self, value: &T) -> Result<()> {
        let line = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> Emitter for JsonLinesWriter<W> {
    fn emit(&mut self, message: &Message) -> Result<()> {
        self.write_line(message)
    }

    fn emit_value(&mut self, value: &JsonValue) -> Result<()> {
        self.write_line(value)
    }
}

/// In-memory sink
#[derive(Debug, Default)]
pub struct MessageCollector {
    pub messages: Vec<Message>,
    pub values: Vec<JsonValue>,
}

impl MessageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record payloads emitted for a stream, in order
    pub fn records(&self, stream: &str) -> Vec<&JsonValue> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Record {
                    stream: s, record, ..
                } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Streams a schema was emitted for, in order
    pub fn schemas(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Schema { stream, .. } => Some(stream.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Values of every state message, in order
    pub fn states(&self) -> Vec<&JsonValue> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::State { value } => Some(value),
                _ => None,
            })
            .collect()
    }
}

impl Emitter for MessageCollector {
    fn emit(&mut self, message: &Message) -> Result<()> {
        self.messages.push(message.clone());
        Ok(())
    }

    fn emit_value(&mut self, value: &JsonValue) -> Result<()> {
        self.values.push(value.clone());
        Ok(())
    }
}
