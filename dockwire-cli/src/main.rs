//! dockwire CLI -- Docker Engine HTTP API 명령줄 도구
//!
//! 설정 로드 → 로깅 초기화 → 엔진 구성 → 서브커맨드 실행 순서로 동작합니다.
//! 명령 출력은 stdout, 로그는 stderr로 나갑니다.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::path::Path;

use clap::Parser;
use tracing::debug;

use dockwire_core::config::GeneralConfig;
use dockwire_engine::{ConnectionConfig, DockerEngine};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    dockwire_core::metrics::describe_all();
    let writer = OutputWriter::new(cli.output);

    if let Err(e) = run(cli, &writer).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, writer: &OutputWriter) -> Result<(), CliError> {
    let log_level = cli.log_level.as_deref();

    match cli.command {
        Commands::Config(args) => {
            logging::init_tracing(&GeneralConfig::default(), log_level)?;
            commands::config::execute(args, &cli.config, writer).await
        }
        Commands::Container(args) => {
            let engine = connect(&cli.config, log_level).await?;
            commands::container::execute(args, &engine, writer).await
        }
        Commands::Volume(args) => {
            let engine = connect(&cli.config, log_level).await?;
            commands::volume::execute(args, &engine, writer).await
        }
        Commands::Image(args) => {
            let engine = connect(&cli.config, log_level).await?;
            commands::image::execute(args, &engine, writer).await
        }
    }
}

/// 설정을 로드하고 로깅을 초기화한 뒤 엔진을 구성합니다.
///
/// 연동 비활성화 여부는 여기서 확인하지 않습니다. 첫 API 호출의 guard가
/// 진단 메시지와 함께 거부합니다.
async fn connect(config_path: &Path, log_level: Option<&str>) -> Result<DockerEngine, CliError> {
    let config = commands::config::load_effective(config_path).await?;
    logging::init_tracing(&config.general, log_level)?;

    let connection = ConnectionConfig::from_core(&config.docker);
    debug!(
        base_url = %connection.base_url(),
        enabled = connection.enabled,
        "docker engine configured"
    );
    Ok(DockerEngine::connect(connection)?)
}
