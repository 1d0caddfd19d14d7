//! `dockwire volume` command handler

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use dockwire_engine::{DockerEngine, Transport, Volume, VolumeOptions};

use crate::cli::{VolumeAction, VolumeArgs};
use crate::error::CliError;
use crate::output::{ActionReport, Document, OutputWriter, Render};

/// Execute the `volume` command.
pub async fn execute<T: Transport>(
    args: VolumeArgs,
    engine: &DockerEngine<T>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let output = run(args.action, engine).await?;
    writer.render(&output)
}

/// Output of a volume subcommand.
#[derive(Serialize)]
#[serde(untagged)]
pub enum VolumeOutput {
    Action(ActionReport),
    Document(Document),
    List(VolumeList),
}

impl Render for VolumeOutput {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match self {
            Self::Action(report) => report.render_text(w),
            Self::Document(doc) => doc.render_text(w),
            Self::List(list) => list.render_text(w),
        }
    }
}

async fn run<T: Transport>(
    action: VolumeAction,
    engine: &DockerEngine<T>,
) -> Result<VolumeOutput, CliError> {
    let output = match action {
        VolumeAction::Create {
            name,
            driver,
            label,
        } => {
            let options = VolumeOptions {
                driver,
                driver_opts: BTreeMap::new(),
                labels: label.into_iter().collect(),
            };
            let volume = Volume::create(engine, &name, &options).await?;
            acted(volume.name(), "created")
        }
        VolumeAction::List => VolumeOutput::List(VolumeList::from_value(&Volume::list(engine).await?)),
        VolumeAction::Inspect { name } => {
            VolumeOutput::Document(Document(Volume::from_name(name).inspect(engine).await?))
        }
        VolumeAction::Rm { name, force } => {
            Volume::from_name(&name).remove(engine, force).await?;
            acted(&name, "removed")
        }
    };
    Ok(output)
}

fn acted(name: &str, action: &'static str) -> VolumeOutput {
    VolumeOutput::Action(ActionReport {
        resource: "volume",
        id: name.to_owned(),
        action,
    })
}

/// Volume list table.
#[derive(Serialize)]
pub struct VolumeList {
    pub volumes: Vec<VolumeRow>,
}

#[derive(Serialize)]
pub struct VolumeRow {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
}

impl VolumeList {
    /// Extracts rows from the `{"Volumes": [...]}` document.
    pub fn from_value(value: &Value) -> Self {
        let volumes = value["Volumes"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|item| VolumeRow {
                        name: item["Name"].as_str().unwrap_or_default().to_owned(),
                        driver: item["Driver"].as_str().unwrap_or_default().to_owned(),
                        mountpoint: item["Mountpoint"].as_str().unwrap_or_default().to_owned(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { volumes }
    }
}

impl Render for VolumeList {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "{:<32}  {:<10}  {}",
            "NAME".bold(),
            "DRIVER".bold(),
            "MOUNTPOINT".bold()
        )?;
        for v in &self.volumes {
            writeln!(w, "{:<32}  {:<10}  {}", v.name, v.driver, v.mountpoint)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{MockTransport, engine};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_sends_driver_and_labels() {
        let engine = engine(MockTransport::new().respond(201, r#"{"Name":"data"}"#));
        let output = run(
            VolumeAction::Create {
                name: "data".to_owned(),
                driver: "local".to_owned(),
                label: vec![("team".to_owned(), "infra".to_owned())],
            },
            &engine,
        )
        .await
        .expect("create should succeed");

        match output {
            VolumeOutput::Action(report) => assert_eq!(report.id, "data"),
            _ => panic!("expected action report"),
        }
        let body = engine.transport().requests()[0].body.clone().expect("body");
        assert_eq!(body["Labels"], json!({"team": "infra"}));
        assert_eq!(body["Driver"], json!("local"));
    }

    #[tokio::test]
    async fn test_list_renders_table() {
        let engine = engine(MockTransport::new().respond(
            200,
            r#"{"Volumes":[{"Name":"data","Driver":"local","Mountpoint":"/var/lib/docker/volumes/data/_data"}],"Warnings":null}"#,
        ));
        let output = run(VolumeAction::List, &engine).await.expect("list");
        let mut buffer = Vec::new();
        output.render_text(&mut buffer).expect("render");
        let text = String::from_utf8(buffer).expect("utf-8");
        assert!(text.contains("data"));
        assert!(text.contains("/var/lib/docker/volumes/data/_data"));
    }

    #[tokio::test]
    async fn test_rm_passes_force() {
        let engine = engine(MockTransport::new().respond(204, ""));
        run(
            VolumeAction::Rm {
                name: "data".to_owned(),
                force: true,
            },
            &engine,
        )
        .await
        .expect("rm should succeed");
        assert_eq!(engine.transport().requests()[0].path, "/volumes/data?force=true");
    }

    #[test]
    fn test_volume_list_with_null_volumes_is_empty() {
        assert!(VolumeList::from_value(&json!({"Volumes": null})).volumes.is_empty());
    }
}
