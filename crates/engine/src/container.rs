//! Container 핸들과 컨테이너 API 호출
//!
//! [`Container`]는 원격 컨테이너의 식별자만 보관하는 값 타입입니다.
//! 모든 메서드는 [`DockerEngine`]을 받아 정확히 한 번의 API 호출을 수행합니다
//! (`find`만 예외로, 존재 확인 후 핸들을 생성합니다).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::engine::DockerEngine;
use crate::error::EngineError;
use crate::name::validate_name;
use crate::query::{Query, segment};
use crate::spec::ContainerSpec;
use crate::transport::{ApiRequest, Transport};

/// 원격 컨테이너 핸들
///
/// 로컬에서 식별자가 여전히 유효한지는 확인하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Container {
    id: String,
}

/// `GET /containers/json` 옵션
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListContainersOptions {
    /// 중지된 컨테이너 포함 여부
    pub all: bool,
    /// 최근 생성된 N개만 반환
    pub limit: Option<u32>,
    /// `SizeRw`, `SizeRootFs` 포함 여부
    pub size: bool,
    /// JSON 인코딩된 필터 (예: `{"status":["running"]}`)
    pub filters: Option<String>,
}

/// `GET /containers/{id}/logs` 옵션
///
/// 스트리밍은 지원하지 않으므로 `follow`는 항상 `false`로 전송됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogsOptions {
    pub stdout: bool,
    pub stderr: bool,
    /// UNIX 타임스탬프 (초) 이후의 로그만
    pub since: Option<i64>,
    /// UNIX 타임스탬프 (초) 이전의 로그만
    pub until: Option<i64>,
    pub timestamps: bool,
    /// 마지막 N줄, 또는 `"all"`
    pub tail: String,
}

impl Default for LogsOptions {
    fn default() -> Self {
        Self {
            stdout: true,
            stderr: false,
            since: None,
            until: None,
            timestamps: false,
            tail: "all".to_owned(),
        }
    }
}

/// `DELETE /containers/{id}` 옵션
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    /// 익명 볼륨도 함께 삭제
    pub volumes: bool,
    /// 실행 중이면 kill 후 삭제
    pub force: bool,
    /// 링크만 삭제
    pub link: bool,
}

#[derive(Deserialize)]
struct CreateResponse {
    #[serde(rename = "Id")]
    id: String,
}

impl Container {
    /// 식별자로 핸들을 생성합니다. I/O는 수행하지 않습니다.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn path(&self, suffix: &str) -> Result<String, EngineError> {
        Ok(format!("/containers/{}{suffix}", segment(&self.id)?))
    }

    /// 컨테이너를 생성합니다 (`POST /containers/create?name=`).
    ///
    /// # Errors
    ///
    /// - `EngineError::Validation`: 이름 규칙 위반 (요청 전송 안 함)
    /// - `EngineError::Remote`: 201 이외의 응답
    pub async fn create<T: Transport>(
        engine: &DockerEngine<T>,
        name: &str,
        spec: &ContainerSpec,
    ) -> Result<Self, EngineError> {
        engine.ensure_ready()?;
        validate_name(name)?;

        let body = serde_json::to_value(spec.translate())
            .map_err(|e| EngineError::Decode(format!("failed to encode container spec: {e}")))?;
        let path = Query::new().push("name", name).append_to("/containers/create");

        let created: CreateResponse = engine
            .expect_typed(ApiRequest::post(path).with_body(body), 201)
            .await?;

        info!(name, id = %created.id, "container created");
        Ok(Self::from_id(created.id))
    }

    /// 컨테이너 목록을 조회합니다.
    pub async fn list<T: Transport>(
        engine: &DockerEngine<T>,
        options: &ListContainersOptions,
    ) -> Result<Value, EngineError> {
        let path = Query::new()
            .push("all", options.all)
            .push_opt("limit", options.limit)
            .push("size", options.size)
            .push_opt("filters", options.filters.as_deref())
            .append_to("/containers/json");
        engine.expect_json(ApiRequest::get(path), 200).await
    }

    /// 컨테이너 존재 여부 (200 → true, 404 → false)
    pub async fn exists<T: Transport>(
        engine: &DockerEngine<T>,
        id: &str,
    ) -> Result<bool, EngineError> {
        engine
            .probe(ApiRequest::get(Self::from_id(id).path("/json")?))
            .await
    }

    /// 존재를 확인한 뒤 핸들을 반환합니다.
    ///
    /// # Errors
    ///
    /// 컨테이너가 없으면 `EngineError::NotFound`.
    pub async fn find<T: Transport>(engine: &DockerEngine<T>, id: &str) -> Result<Self, EngineError> {
        if Self::exists(engine, id).await? {
            Ok(Self::from_id(id))
        } else {
            Err(EngineError::NotFound {
                kind: "container",
                id: id.to_owned(),
            })
        }
    }

    pub async fn inspect<T: Transport>(&self, engine: &DockerEngine<T>) -> Result<Value, EngineError> {
        engine.expect_json(ApiRequest::get(self.path("/json")?), 200).await
    }

    /// 컨테이너 안의 프로세스 목록 (`ps_args` 기본값은 `-ef`)
    pub async fn processes<T: Transport>(
        &self,
        engine: &DockerEngine<T>,
        ps_args: &str,
    ) -> Result<Value, EngineError> {
        let path = Query::new().push("ps_args", ps_args).append_to(&self.path("/top")?);
        engine.expect_json(ApiRequest::get(path), 200).await
    }

    /// 로그 본문을 그대로 반환합니다.
    ///
    /// TTY가 없는 컨테이너의 경우 본문에 stream 헤더 바이트가 섞여 있을 수 있습니다.
    pub async fn logs<T: Transport>(
        &self,
        engine: &DockerEngine<T>,
        options: &LogsOptions,
    ) -> Result<String, EngineError> {
        let path = Query::new()
            .push("follow", false)
            .push("stdout", options.stdout)
            .push("stderr", options.stderr)
            .push_opt("since", options.since)
            .push_opt("until", options.until)
            .push("timestamps", options.timestamps)
            .push("tail", &options.tail)
            .append_to(&self.path("/logs")?);
        let response = engine.expect_status(ApiRequest::get(path), 200).await?;
        Ok(response.body)
    }

    /// 리소스 사용량 스냅샷 1회
    pub async fn stats<T: Transport>(
        &self,
        engine: &DockerEngine<T>,
        one_shot: bool,
    ) -> Result<Value, EngineError> {
        let path = Query::new()
            .push("stream", false)
            .push("one-shot", one_shot)
            .append_to(&self.path("/stats")?);
        engine.expect_json(ApiRequest::get(path), 200).await
    }

    /// 리소스 제한을 변경합니다. `body`는 엔진 스키마 그대로 전달됩니다.
    pub async fn update<T: Transport>(
        &self,
        engine: &DockerEngine<T>,
        body: &Value,
    ) -> Result<Value, EngineError> {
        engine
            .expect_json(ApiRequest::post(self.path("/update")?).with_body(body.clone()), 200)
            .await
    }

    /// 이름을 변경합니다. 핸들의 식별자는 바뀌지 않습니다.
    ///
    /// # Errors
    ///
    /// 새 이름이 규칙에 맞지 않으면 요청 없이 `EngineError::Validation`.
    pub async fn rename<T: Transport>(
        &self,
        engine: &DockerEngine<T>,
        name: &str,
    ) -> Result<(), EngineError> {
        engine.ensure_ready()?;
        validate_name(name)?;
        let path = Query::new().push("name", name).append_to(&self.path("/rename")?);
        engine.expect_empty(ApiRequest::post(path), 204).await?;
        info!(id = %self.id, name, "container renamed");
        Ok(())
    }

    /// TTY 크기를 변경합니다.
    pub async fn resize_tty<T: Transport>(
        &self,
        engine: &DockerEngine<T>,
        width: u32,
        height: u32,
    ) -> Result<(), EngineError> {
        let path = Query::new()
            .push("h", height)
            .push("w", width)
            .append_to(&self.path("/resize")?);
        engine.expect_empty(ApiRequest::post(path), 200).await
    }

    pub async fn start<T: Transport>(&self, engine: &DockerEngine<T>) -> Result<(), EngineError> {
        self.action(engine, "start").await
    }

    pub async fn stop<T: Transport>(&self, engine: &DockerEngine<T>) -> Result<(), EngineError> {
        self.action(engine, "stop").await
    }

    pub async fn restart<T: Transport>(&self, engine: &DockerEngine<T>) -> Result<(), EngineError> {
        self.action(engine, "restart").await
    }

    pub async fn kill<T: Transport>(&self, engine: &DockerEngine<T>) -> Result<(), EngineError> {
        self.action(engine, "kill").await
    }

    pub async fn pause<T: Transport>(&self, engine: &DockerEngine<T>) -> Result<(), EngineError> {
        self.action(engine, "pause").await
    }

    pub async fn unpause<T: Transport>(&self, engine: &DockerEngine<T>) -> Result<(), EngineError> {
        self.action(engine, "unpause").await
    }

    /// 컨테이너를 삭제합니다. 이후 이 핸들로의 호출은 원격에서 실패합니다.
    pub async fn remove<T: Transport>(
        &self,
        engine: &DockerEngine<T>,
        options: RemoveOptions,
    ) -> Result<(), EngineError> {
        let path = Query::new()
            .push("v", options.volumes)
            .push("force", options.force)
            .push("link", options.link)
            .append_to(&self.path("")?);
        engine.expect_empty(ApiRequest::delete(path), 204).await?;
        info!(id = %self.id, "container removed");
        Ok(())
    }

    async fn action<T: Transport>(
        &self,
        engine: &DockerEngine<T>,
        action: &str,
    ) -> Result<(), EngineError> {
        engine
            .expect_empty(ApiRequest::post(self.path(&format!("/{action}"))?), 204)
            .await?;
        info!(id = %self.id, action, "container action completed");
        Ok(())
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::config::ConnectionConfig;
    use crate::image::Image;
    use crate::port::PortBinding;
    use crate::transport::{Method, MockTransport};

    fn engine(mock: MockTransport) -> DockerEngine<MockTransport> {
        DockerEngine::with_transport(
            ConnectionConfig::new("http://localhost:2375", "v1.43", true),
            Arc::new(mock),
        )
    }

    #[tokio::test]
    async fn create_returns_handle_from_id() {
        let engine = engine(MockTransport::new().respond(201, r#"{"Id":"abc123","Warnings":[]}"#));
        let spec = ContainerSpec::new()
            .image(Image::from_reference("ubuntu:latest"))
            .port(PortBinding::tcp(80, 8080));

        let container = Container::create(&engine, "web", &spec).await.unwrap();
        assert_eq!(container.id(), "abc123");

        let req = &engine.transport().requests()[0];
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, "/containers/create?name=web");
        let body = req.body.as_ref().unwrap();
        assert_eq!(body["Image"], json!("ubuntu:latest"));
        assert_eq!(body["ExposedPorts"], json!({"80/tcp": {}}));
    }

    #[tokio::test]
    async fn create_non_201_carries_message() {
        let engine = engine(MockTransport::new().respond(400, r#"{"message":"bad param"}"#));
        let err = Container::create(&engine, "web", &ContainerSpec::new())
            .await
            .unwrap_err();
        match err {
            EngineError::Remote { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad param");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_with_invalid_name_sends_nothing() {
        let engine = engine(MockTransport::new());
        let err = Container::create(&engine, "bad name!", &ContainerSpec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
        assert!(engine.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn create_with_201_but_no_id_is_decode_error() {
        let engine = engine(MockTransport::new().respond(201, "{}"));
        let err = Container::create(&engine, "web", &ContainerSpec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Decode(_)));
    }

    #[tokio::test]
    async fn list_encodes_options() {
        let engine = engine(MockTransport::new().respond(200, "[]"));
        let options = ListContainersOptions {
            all: true,
            limit: Some(3),
            size: false,
            filters: Some(r#"{"status":["exited"]}"#.to_owned()),
        };
        let listed = Container::list(&engine, &options).await.unwrap();
        assert_eq!(listed, json!([]));
        assert_eq!(
            engine.transport().requests()[0].path,
            "/containers/json?all=true&limit=3&size=false&filters=%7B%22status%22%3A%5B%22exited%22%5D%7D"
        );
    }

    #[tokio::test]
    async fn find_absent_container_is_not_found() {
        let engine = engine(MockTransport::new().respond(404, r#"{"message":"No such container: x"}"#));
        let err = Container::find(&engine, "x").await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { kind: "container", .. }));
    }

    #[tokio::test]
    async fn find_present_container_uses_caller_id() {
        let engine = engine(MockTransport::new().respond(200, r#"{"Id":"full-id"}"#));
        let container = Container::find(&engine, "web").await.unwrap();
        assert_eq!(container, Container::from_id("web"));
        assert_eq!(engine.transport().requests()[0].path, "/containers/web/json");
    }

    #[tokio::test]
    async fn lookup_ids_are_percent_encoded() {
        let engine = engine(MockTransport::new().respond(404, ""));
        assert!(!Container::exists(&engine, "a/../b").await.unwrap());
        assert_eq!(
            engine.transport().requests()[0].path,
            "/containers/a%2F..%2Fb/json"
        );
    }

    #[tokio::test]
    async fn lifecycle_actions_expect_204() {
        let engine = engine(
            MockTransport::new()
                .respond(204, "")
                .respond(204, "")
                .respond(204, "")
                .respond(204, "")
                .respond(204, "")
                .respond(204, ""),
        );
        let container = Container::from_id("abc");
        container.start(&engine).await.unwrap();
        container.stop(&engine).await.unwrap();
        container.restart(&engine).await.unwrap();
        container.kill(&engine).await.unwrap();
        container.pause(&engine).await.unwrap();
        container.unpause(&engine).await.unwrap();

        let paths: Vec<String> = engine
            .transport()
            .requests()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "/containers/abc/start",
                "/containers/abc/stop",
                "/containers/abc/restart",
                "/containers/abc/kill",
                "/containers/abc/pause",
                "/containers/abc/unpause",
            ]
        );
    }

    #[tokio::test]
    async fn start_already_started_is_remote_error() {
        let engine = engine(MockTransport::new().respond(304, ""));
        let err = Container::from_id("abc").start(&engine).await.unwrap_err();
        assert_eq!(err.status(), Some(304));
    }

    #[tokio::test]
    async fn processes_uses_top_endpoint() {
        let engine = engine(MockTransport::new().respond(200, r#"{"Titles":[],"Processes":[]}"#));
        Container::from_id("abc").processes(&engine, "aux").await.unwrap();
        assert_eq!(
            engine.transport().requests()[0].path,
            "/containers/abc/top?ps_args=aux"
        );
    }

    #[tokio::test]
    async fn logs_returns_raw_text() {
        let engine = engine(MockTransport::new().respond(200, "hello\nworld\n"));
        let options = LogsOptions {
            tail: "10".to_owned(),
            timestamps: true,
            ..LogsOptions::default()
        };
        let logs = Container::from_id("abc").logs(&engine, &options).await.unwrap();
        assert_eq!(logs, "hello\nworld\n");
        assert_eq!(
            engine.transport().requests()[0].path,
            "/containers/abc/logs?follow=false&stdout=true&stderr=false&timestamps=true&tail=10"
        );
    }

    #[tokio::test]
    async fn stats_never_streams() {
        let engine = engine(MockTransport::new().respond(200, r#"{"read":"now"}"#));
        Container::from_id("abc").stats(&engine, true).await.unwrap();
        assert_eq!(
            engine.transport().requests()[0].path,
            "/containers/abc/stats?stream=false&one-shot=true"
        );
    }

    #[tokio::test]
    async fn update_sends_body() {
        let engine = engine(MockTransport::new().respond(200, r#"{"Warnings":[]}"#));
        let body = json!({"Memory": 314572800});
        let result = Container::from_id("abc").update(&engine, &body).await.unwrap();
        assert_eq!(result, json!({"Warnings": []}));
        let req = &engine.transport().requests()[0];
        assert_eq!(req.path, "/containers/abc/update");
        assert_eq!(req.body, Some(body));
    }

    #[tokio::test]
    async fn rename_validates_and_expects_204() {
        let engine = engine(MockTransport::new().respond(204, ""));
        let container = Container::from_id("abc");

        let err = container.rename(&engine, "-bad").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation { .. }));
        assert!(engine.transport().requests().is_empty());

        container.rename(&engine, "web2").await.unwrap();
        assert_eq!(
            engine.transport().requests()[0].path,
            "/containers/abc/rename?name=web2"
        );
    }

    #[tokio::test]
    async fn resize_tty_sends_dimensions() {
        let engine = engine(MockTransport::new().respond(200, ""));
        Container::from_id("abc").resize_tty(&engine, 80, 24).await.unwrap();
        assert_eq!(
            engine.transport().requests()[0].path,
            "/containers/abc/resize?h=24&w=80"
        );
    }

    #[tokio::test]
    async fn remove_encodes_flags() {
        let engine = engine(MockTransport::new().respond(204, ""));
        let options = RemoveOptions {
            volumes: true,
            force: true,
            link: false,
        };
        Container::from_id("abc").remove(&engine, options).await.unwrap();
        let req = &engine.transport().requests()[0];
        assert_eq!(req.method, Method::Delete);
        assert_eq!(req.path, "/containers/abc?v=true&force=true&link=false");
    }

    #[tokio::test]
    async fn remove_failure_uses_uniform_message() {
        let engine = engine(MockTransport::new().respond(409, r#"{"message":"container is running"}"#));
        let err = Container::from_id("abc")
            .remove(&engine, RemoveOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "docker api returned 409: container is running");
    }

    #[test]
    fn display_is_id() {
        assert_eq!(Container::from_id("abc123").to_string(), "abc123");
    }
}
