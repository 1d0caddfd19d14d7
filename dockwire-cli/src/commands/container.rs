//! `dockwire container` command handler

use std::io::Write;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use dockwire_engine::{
    Container, ContainerSpec, DockerEngine, Image, ListContainersOptions, LogsOptions,
    RemoveOptions, Transport, Volume,
};

use crate::cli::{ContainerAction, ContainerArgs, CreateContainerArgs};
use crate::error::CliError;
use crate::output::{ActionReport, Document, OutputWriter, Render, short_id};

/// Execute the `container` command.
pub async fn execute<T: Transport>(
    args: ContainerArgs,
    engine: &DockerEngine<T>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let output = run(args.action, engine).await?;
    writer.render(&output)
}

/// Output of a container subcommand.
#[derive(Serialize)]
#[serde(untagged)]
pub enum ContainerOutput {
    Action(ActionReport),
    Document(Document),
    List(ContainerList),
    Logs(LogsReport),
}

impl Render for ContainerOutput {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match self {
            Self::Action(report) => report.render_text(w),
            Self::Document(doc) => doc.render_text(w),
            Self::List(list) => list.render_text(w),
            Self::Logs(logs) => logs.render_text(w),
        }
    }
}

async fn run<T: Transport>(
    action: ContainerAction,
    engine: &DockerEngine<T>,
) -> Result<ContainerOutput, CliError> {
    let output = match action {
        ContainerAction::Create(args) => {
            let name = args.name.clone();
            let spec = build_spec(args);
            debug!(name = %name, image = ?spec.image, "creating container");
            let container = Container::create(engine, &name, &spec).await?;
            acted(container.id(), "created")
        }
        ContainerAction::List {
            all,
            limit,
            size,
            filters,
        } => {
            let options = ListContainersOptions {
                all,
                limit,
                size,
                filters,
            };
            let listed = Container::list(engine, &options).await?;
            ContainerOutput::List(ContainerList::from_value(&listed))
        }
        ContainerAction::Inspect { id } => {
            ContainerOutput::Document(Document(Container::from_id(id).inspect(engine).await?))
        }
        ContainerAction::Start { id } => {
            Container::from_id(&id).start(engine).await?;
            acted(&id, "started")
        }
        ContainerAction::Stop { id } => {
            Container::from_id(&id).stop(engine).await?;
            acted(&id, "stopped")
        }
        ContainerAction::Restart { id } => {
            Container::from_id(&id).restart(engine).await?;
            acted(&id, "restarted")
        }
        ContainerAction::Kill { id } => {
            Container::from_id(&id).kill(engine).await?;
            acted(&id, "killed")
        }
        ContainerAction::Pause { id } => {
            Container::from_id(&id).pause(engine).await?;
            acted(&id, "paused")
        }
        ContainerAction::Unpause { id } => {
            Container::from_id(&id).unpause(engine).await?;
            acted(&id, "unpaused")
        }
        ContainerAction::Rename { id, name } => {
            Container::from_id(&id).rename(engine, &name).await?;
            acted(&id, "renamed")
        }
        ContainerAction::Top { id, ps_args } => ContainerOutput::Document(Document(
            Container::from_id(id).processes(engine, &ps_args).await?,
        )),
        ContainerAction::Logs {
            id,
            tail,
            timestamps,
            stderr,
        } => {
            let options = LogsOptions {
                stderr,
                timestamps,
                tail,
                ..LogsOptions::default()
            };
            let logs = Container::from_id(&id).logs(engine, &options).await?;
            ContainerOutput::Logs(LogsReport { id, logs })
        }
        ContainerAction::Stats { id } => ContainerOutput::Document(Document(
            Container::from_id(id).stats(engine, true).await?,
        )),
        ContainerAction::Resize { id, width, height } => {
            Container::from_id(&id)
                .resize_tty(engine, width, height)
                .await?;
            acted(&id, "resized")
        }
        ContainerAction::Rm { id, volumes, force } => {
            let options = RemoveOptions {
                volumes,
                force,
                link: false,
            };
            Container::from_id(&id).remove(engine, options).await?;
            acted(&id, "removed")
        }
    };
    Ok(output)
}

fn acted(id: &str, action: &'static str) -> ContainerOutput {
    ContainerOutput::Action(ActionReport {
        resource: "container",
        id: id.to_owned(),
        action,
    })
}

/// Builds the creation spec from command-line flags.
fn build_spec(args: CreateContainerArgs) -> ContainerSpec {
    let mut spec = ContainerSpec::new()
        .image(Image::from_reference(args.image))
        .tty(args.tty);
    for (key, value) in args.env {
        spec = spec.env(key, value);
    }
    for binding in args.port {
        spec = spec.port(binding);
    }
    for (volume, path) in args.volume {
        spec = spec.volume(path, Volume::from_name(volume));
    }
    for (key, value) in args.label {
        spec = spec.label(key, value);
    }
    if !args.cmd.is_empty() {
        spec = spec.cmd(args.cmd);
    }
    if let Some(dir) = args.workdir {
        spec = spec.working_dir(dir);
    }
    spec
}

/// Container list table.
#[derive(Serialize)]
pub struct ContainerList {
    pub containers: Vec<ContainerRow>,
}

#[derive(Serialize)]
pub struct ContainerRow {
    pub id: String,
    pub name: String,
    pub image: String,
    pub state: String,
    pub status: String,
}

impl ContainerList {
    /// Extracts rows from the `GET /containers/json` array. Unknown shapes yield no rows.
    pub fn from_value(value: &Value) -> Self {
        let containers = value
            .as_array()
            .map(|items| items.iter().map(ContainerRow::from_value).collect())
            .unwrap_or_default();
        Self { containers }
    }
}

impl ContainerRow {
    fn from_value(item: &Value) -> Self {
        let text = |key: &str| item[key].as_str().unwrap_or_default().to_owned();
        let name = item["Names"][0]
            .as_str()
            .unwrap_or_default()
            .trim_start_matches('/')
            .to_owned();
        Self {
            id: text("Id"),
            name,
            image: text("Image"),
            state: text("State"),
            status: text("Status"),
        }
    }
}

impl Render for ContainerList {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "{:<12}  {:<24}  {:<32}  {:<10}  {}",
            "ID".bold(),
            "NAME".bold(),
            "IMAGE".bold(),
            "STATE".bold(),
            "STATUS".bold()
        )?;
        for c in &self.containers {
            let state = match c.state.as_str() {
                "running" => c.state.green(),
                "paused" | "restarting" => c.state.yellow(),
                _ => c.state.red(),
            };
            writeln!(
                w,
                "{:<12}  {:<24}  {:<32}  {:<10}  {}",
                short_id(&c.id),
                c.name,
                c.image,
                state,
                c.status
            )?;
        }
        Ok(())
    }
}

/// Raw container logs.
#[derive(Serialize)]
pub struct LogsReport {
    pub id: String,
    pub logs: String,
}

impl Render for LogsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        write!(w, "{}", self.logs)
    }
}
