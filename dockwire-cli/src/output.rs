//! Output formatting abstraction for text vs JSON rendering
//!
//! All subcommand output flows through [`OutputWriter`] which handles format switching.
//! This keeps format-specific logic out of command handlers entirely.

use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Abstraction for writing CLI output in different formats.
///
/// Subcommand handlers call `writer.render(&payload)` where `payload`
/// implements both `Serialize` (for JSON) and `Render` (for text).
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a payload to stdout.
    ///
    /// For `Text` format, delegates to `Render::render_text()`.
    /// For `Json` format, serialises via `serde_json`.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.render_to(payload, &mut handle)
    }

    /// Render a payload to an arbitrary writer.
    pub fn render_to<T: Render + Serialize>(
        &self,
        payload: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => {
                payload.render_text(w)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

/// Trait for human-readable text rendering.
///
/// Implemented by every CLI output payload alongside `serde::Serialize`.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

/// Raw engine document (inspect, stats, top, ...).
///
/// Serialises as the document itself; text output is indented JSON.
#[derive(Serialize)]
#[serde(transparent)]
pub struct Document(pub Value);

impl Render for Document {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let pretty = serde_json::to_string_pretty(&self.0).map_err(std::io::Error::other)?;
        writeln!(w, "{pretty}")
    }
}

/// Result of a single action on a resource (start, rm, ...).
#[derive(Serialize)]
pub struct ActionReport {
    /// Resource kind (container, volume, image)
    pub resource: &'static str,
    /// Identifier the action was applied to
    pub id: String,
    /// Past-tense action name
    pub action: &'static str,
}

impl Render for ActionReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "{} {} {} {}",
            "✓".green(),
            self.resource,
            self.id.bold(),
            self.action
        )
    }
}

/// Shortens a `sha256:`-prefixed or full hex id to 12 characters.
pub fn short_id(id: &str) -> &str {
    let id = id.strip_prefix("sha256:").unwrap_or(id);
    match id.char_indices().nth(12) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct TestPayload {
        field1: String,
        field2: u32,
    }

    impl Render for TestPayload {
        fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
            writeln!(w, "Field1: {}", self.field1)?;
            writeln!(w, "Field2: {}", self.field2)?;
            Ok(())
        }
    }

    fn render<T: Render + Serialize>(format: OutputFormat, payload: &T) -> String {
        let mut buffer = Vec::new();
        OutputWriter::new(format)
            .render_to(payload, &mut buffer)
            .expect("rendering should succeed");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[test]
    fn test_output_writer_text_format() {
        let payload = TestPayload {
            field1: "test value".to_owned(),
            field2: 42,
        };
        let output = render(OutputFormat::Text, &payload);
        assert!(output.contains("Field1: test value"), "should render field1");
        assert!(output.contains("Field2: 42"), "should render field2");
    }

    #[test]
    fn test_output_writer_json_format() {
        let payload = TestPayload {
            field1: "test".to_owned(),
            field2: 100,
        };
        let output = render(OutputFormat::Json, &payload);
        let parsed: Value = serde_json::from_str(&output).expect("should parse back to JSON");
        assert_eq!(parsed["field1"].as_str(), Some("test"));
        assert_eq!(parsed["field2"].as_u64(), Some(100));
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_document_json_is_transparent() {
        let doc = Document(json!({"Id": "abc", "State": {"Running": true}}));
        let output = render(OutputFormat::Json, &doc);
        let parsed: Value = serde_json::from_str(&output).expect("valid JSON");
        assert_eq!(parsed["State"]["Running"], json!(true));
    }

    #[test]
    fn test_document_text_is_indented_json() {
        let doc = Document(json!({"Id": "abc"}));
        let output = render(OutputFormat::Text, &doc);
        assert!(output.contains("\"Id\": \"abc\""));
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_action_report_text() {
        let report = ActionReport {
            resource: "container",
            id: "abc123".to_owned(),
            action: "started",
        };
        let output = render(OutputFormat::Text, &report);
        assert!(output.contains("container"));
        assert!(output.contains("abc123"));
        assert!(output.contains("started"));
    }

    #[test]
    fn test_action_report_json() {
        let report = ActionReport {
            resource: "volume",
            id: "data".to_owned(),
            action: "removed",
        };
        let output = render(OutputFormat::Json, &report);
        let parsed: Value = serde_json::from_str(&output).expect("valid JSON");
        assert_eq!(
            parsed,
            json!({"resource": "volume", "id": "data", "action": "removed"})
        );
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("sha256:0123456789abcdef"), "0123456789ab");
        assert_eq!(short_id("0123456789abcdef0123"), "0123456789ab");
        assert_eq!(short_id("abc"), "abc");
    }
}
