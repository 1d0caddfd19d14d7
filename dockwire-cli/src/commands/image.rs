//! `dockwire image` command handler

use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use dockwire_engine::{DockerEngine, Image, Transport};

use crate::cli::{ImageAction, ImageArgs};
use crate::error::CliError;
use crate::output::{ActionReport, Document, OutputWriter, Render, short_id};

/// Execute the `image` command.
pub async fn execute<T: Transport>(
    args: ImageArgs,
    engine: &DockerEngine<T>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let output = run(args.action, engine).await?;
    writer.render(&output)
}

/// Output of an image subcommand.
#[derive(Serialize)]
#[serde(untagged)]
pub enum ImageOutput {
    Action(ActionReport),
    Document(Document),
    List(ImageList),
    Removal(ImageRemoval),
}

impl Render for ImageOutput {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match self {
            Self::Action(report) => report.render_text(w),
            Self::Document(doc) => doc.render_text(w),
            Self::List(list) => list.render_text(w),
            Self::Removal(removal) => removal.render_text(w),
        }
    }
}

async fn run<T: Transport>(
    action: ImageAction,
    engine: &DockerEngine<T>,
) -> Result<ImageOutput, CliError> {
    let output = match action {
        ImageAction::Pull { reference } => {
            let image = Image::pull(engine, &reference).await?;
            ImageOutput::Action(ActionReport {
                resource: "image",
                id: image.reference().to_owned(),
                action: "pulled",
            })
        }
        ImageAction::List { all } => {
            ImageOutput::List(ImageList::from_value(&Image::list(engine, all).await?))
        }
        ImageAction::Inspect { reference } => {
            ImageOutput::Document(Document(Image::from_reference(reference).inspect(engine).await?))
        }
        ImageAction::Rm {
            reference,
            force,
            no_prune,
        } => {
            let items = Image::from_reference(&reference)
                .remove(engine, force, no_prune)
                .await?;
            ImageOutput::Removal(ImageRemoval { reference, items })
        }
    };
    Ok(output)
}

/// Image list table.
#[derive(Serialize)]
pub struct ImageList {
    pub images: Vec<ImageRow>,
}

#[derive(Serialize)]
pub struct ImageRow {
    pub id: String,
    pub tags: Vec<String>,
    pub size: u64,
}

impl ImageList {
    /// Extracts rows from the `GET /images/json` array.
    pub fn from_value(value: &Value) -> Self {
        let images = value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|item| ImageRow {
                        id: item["Id"].as_str().unwrap_or_default().to_owned(),
                        tags: item["RepoTags"]
                            .as_array()
                            .map(|tags| {
                                tags.iter()
                                    .filter_map(Value::as_str)
                                    .map(str::to_owned)
                                    .collect()
                            })
                            .unwrap_or_default(),
                        size: item["Size"].as_u64().unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { images }
    }
}

impl Render for ImageList {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "{:<12}  {:>10}  {}",
            "ID".bold(),
            "SIZE".bold(),
            "TAGS".bold()
        )?;
        for image in &self.images {
            let tags = if image.tags.is_empty() {
                "<none>".to_owned()
            } else {
                image.tags.join(", ")
            };
            writeln!(
                w,
                "{:<12}  {:>10}  {}",
                short_id(&image.id),
                human_size(image.size),
                tags
            )?;
        }
        Ok(())
    }
}

/// Result of `image rm`: the engine's untagged/deleted list.
#[derive(Serialize)]
pub struct ImageRemoval {
    pub reference: String,
    pub items: Value,
}

impl Render for ImageRemoval {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for item in self.items.as_array().into_iter().flatten() {
            if let Some(tag) = item["Untagged"].as_str() {
                writeln!(w, "Untagged: {tag}")?;
            }
            if let Some(id) = item["Deleted"].as_str() {
                writeln!(w, "Deleted: {id}")?;
            }
        }
        Ok(())
    }
}

/// Formats a byte count with a binary unit (`12.3MB`).
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "kB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes}B")
    } else {
        format!("{value:.1}{}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{MockTransport, engine};

    #[tokio::test]
    async fn test_pull_reports_resolved_reference() {
        let engine = engine(MockTransport::new().respond(200, r#"{"status":"Downloaded"}"#));
        let output = run(
            ImageAction::Pull {
                reference: "alpine".to_owned(),
            },
            &engine,
        )
        .await
        .expect("pull should succeed");
        match output {
            ImageOutput::Action(report) => assert_eq!(report.id, "alpine:latest"),
            _ => panic!("expected action report"),
        }
    }

    #[tokio::test]
    async fn test_list_renders_tags_and_size() {
        let engine = engine(MockTransport::new().respond(
            200,
            r#"[{"Id":"sha256:0123456789abcdef","RepoTags":["alpine:latest"],"Size":7340032},{"Id":"sha256:fedcba9876543210","RepoTags":null,"Size":512}]"#,
        ));
        let output = run(ImageAction::List { all: false }, &engine)
            .await
            .expect("list");
        let mut buffer = Vec::new();
        output.render_text(&mut buffer).expect("render");
        let text = String::from_utf8(buffer).expect("utf-8");
        assert!(text.contains("0123456789ab"));
        assert!(text.contains("alpine:latest"));
        assert!(text.contains("7.0MB"));
        assert!(text.contains("<none>"));
        assert!(text.contains("512B"));
    }

    #[tokio::test]
    async fn test_rm_renders_untagged_and_deleted() {
        let engine = engine(MockTransport::new().respond(
            200,
            r#"[{"Untagged":"alpine:latest"},{"Deleted":"sha256:0123"}]"#,
        ));
        let output = run(
            ImageAction::Rm {
                reference: "alpine:latest".to_owned(),
                force: false,
                no_prune: false,
            },
            &engine,
        )
        .await
        .expect("rm");
        let mut buffer = Vec::new();
        output.render_text(&mut buffer).expect("render");
        let text = String::from_utf8(buffer).expect("utf-8");
        assert_eq!(text, "Untagged: alpine:latest\nDeleted: sha256:0123\n");
    }

    #[tokio::test]
    async fn test_rm_rejects_dot_segment_reference() {
        let engine = engine(MockTransport::new());
        let err = run(
            ImageAction::Rm {
                reference: "../containers/abc".to_owned(),
                force: true,
                no_prune: false,
            },
            &engine,
        )
        .await
        .err()
        .expect("dot segments should be rejected");
        assert_eq!(err.exit_code(), 1);
        assert!(engine.transport().requests().is_empty());
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0B");
        assert_eq!(human_size(1536), "1.5kB");
        assert_eq!(human_size(5 * 1024 * 1024 * 1024), "5.0GB");
    }
}
