//! Image 핸들과 이미지 API 호출

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::engine::DockerEngine;
use crate::error::EngineError;
use crate::query::{Query, image_segment};
use crate::transport::{ApiRequest, Transport};

/// 태그가 없는 참조에 적용되는 기본 태그
pub const DEFAULT_TAG: &str = "latest";

/// 원격 이미지 핸들 (`ubuntu:latest`, 이미지 ID, digest 참조 등)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Image {
    reference: String,
}

impl Image {
    /// 참조 문자열로 핸들을 생성합니다. I/O는 수행하지 않습니다.
    pub fn from_reference(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    fn path(&self, suffix: &str) -> Result<String, EngineError> {
        Ok(format!("/images/{}{suffix}", image_segment(&self.reference)?))
    }

    /// 레지스트리에서 이미지를 받습니다.
    ///
    /// 엔진은 pull 진행 상황을 줄 단위 JSON으로 보내며 실패해도 200을 반환하므로,
    /// 본문에 `error` 필드가 있으면 `EngineError::Remote`로 변환합니다.
    pub async fn pull<T: Transport>(
        engine: &DockerEngine<T>,
        reference: &str,
    ) -> Result<Self, EngineError> {
        let (repository, tag) = split_reference(reference);
        let path = Query::new()
            .push("fromImage", repository)
            .push_opt("tag", tag)
            .append_to("/images/create");

        let response = engine.expect_status(ApiRequest::post(path), 200).await?;
        if let Some(message) = stream_error(&response.body) {
            return Err(EngineError::Remote {
                status: response.status,
                message,
            });
        }

        let pulled = match tag {
            Some(tag) => format!("{repository}:{tag}"),
            None => repository.to_owned(),
        };
        info!(image = %pulled, "image pulled");
        Ok(Self::from_reference(pulled))
    }

    /// 이미지 목록 (`all`이면 중간 레이어 포함)
    pub async fn list<T: Transport>(
        engine: &DockerEngine<T>,
        all: bool,
    ) -> Result<Value, EngineError> {
        let path = Query::new().push("all", all).append_to("/images/json");
        engine.expect_json(ApiRequest::get(path), 200).await
    }

    pub async fn exists<T: Transport>(
        engine: &DockerEngine<T>,
        reference: &str,
    ) -> Result<bool, EngineError> {
        engine
            .probe(ApiRequest::get(Self::from_reference(reference).path("/json")?))
            .await
    }

    /// 존재를 확인한 뒤 핸들을 반환합니다.
    pub async fn find<T: Transport>(
        engine: &DockerEngine<T>,
        reference: &str,
    ) -> Result<Self, EngineError> {
        if Self::exists(engine, reference).await? {
            Ok(Self::from_reference(reference))
        } else {
            Err(EngineError::NotFound {
                kind: "image",
                id: reference.to_owned(),
            })
        }
    }

    pub async fn inspect<T: Transport>(&self, engine: &DockerEngine<T>) -> Result<Value, EngineError> {
        engine.expect_json(ApiRequest::get(self.path("/json")?), 200).await
    }

    /// 이미지를 삭제하고 `[{"Untagged": ...}, {"Deleted": ...}]` 목록을 반환합니다.
    pub async fn remove<T: Transport>(
        &self,
        engine: &DockerEngine<T>,
        force: bool,
        noprune: bool,
    ) -> Result<Value, EngineError> {
        let path = Query::new()
            .push("force", force)
            .push("noprune", noprune)
            .append_to(&self.path("")?);
        let removed = engine.expect_json(ApiRequest::delete(path), 200).await?;
        info!(image = %self.reference, "image removed");
        Ok(removed)
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference)
    }
}

/// 참조를 `(repository, tag)`로 나눕니다.
///
/// - `ubuntu` → `("ubuntu", Some("latest"))`
/// - `ubuntu:22.04` → `("ubuntu", Some("22.04"))`
/// - `registry:5000/app` → `("registry:5000/app", Some("latest"))`
/// - `app@sha256:...` → `("app@sha256:...", None)`
pub fn split_reference(reference: &str) -> (&str, Option<&str>) {
    if reference.contains('@') {
        return (reference, None);
    }
    let last_segment_start = reference.rfind('/').map_or(0, |i| i + 1);
    match reference[last_segment_start..].rfind(':') {
        Some(i) => {
            let at = last_segment_start + i;
            (&reference[..at], Some(&reference[at + 1..]))
        }
        None => (reference, Some(DEFAULT_TAG)),
    }
}

/// pull 진행 스트림에서 첫 번째 `error` 메시지를 찾습니다.
fn stream_error(body: &str) -> Option<String> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .find_map(|event| {
            let message = event.get("error")?.as_str()?.to_owned();
            debug!(error = %message, "pull stream reported error");
            Some(message)
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::config::ConnectionConfig;
    use crate::transport::{Method, MockTransport};

    fn engine(mock: MockTransport) -> DockerEngine<MockTransport> {
        DockerEngine::with_transport(
            ConnectionConfig::new("http://localhost:2375", "v1.43", true),
            Arc::new(mock),
        )
    }

    #[test]
    fn split_reference_forms() {
        assert_eq!(split_reference("ubuntu"), ("ubuntu", Some("latest")));
        assert_eq!(split_reference("ubuntu:22.04"), ("ubuntu", Some("22.04")));
        assert_eq!(
            split_reference("registry:5000/team/app"),
            ("registry:5000/team/app", Some("latest"))
        );
        assert_eq!(
            split_reference("registry:5000/team/app:1.0"),
            ("registry:5000/team/app", Some("1.0"))
        );
        assert_eq!(
            split_reference("alpine@sha256:abcd"),
            ("alpine@sha256:abcd", None)
        );
    }

    #[tokio::test]
    async fn pull_defaults_tag_to_latest() {
        let engine = engine(MockTransport::new().respond(
            200,
            "{\"status\":\"Pulling from library/ubuntu\"}\n{\"status\":\"Status: Downloaded newer image for ubuntu:latest\"}\n",
        ));
        let image = Image::pull(&engine, "ubuntu").await.unwrap();
        assert_eq!(image.reference(), "ubuntu:latest");

        let req = &engine.transport().requests()[0];
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, "/images/create?fromImage=ubuntu&tag=latest");
    }

    #[tokio::test]
    async fn pull_stream_error_is_remote_error() {
        let engine = engine(MockTransport::new().respond(
            200,
            "{\"status\":\"Pulling\"}\n{\"errorDetail\":{\"message\":\"manifest unknown\"},\"error\":\"manifest unknown\"}\n",
        ));
        let err = Image::pull(&engine, "ubuntu:nope").await.unwrap_err();
        match err {
            EngineError::Remote { message, .. } => assert_eq!(message, "manifest unknown"),
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn pull_digest_sends_no_tag() {
        let engine = engine(MockTransport::new().respond(200, ""));
        let image = Image::pull(&engine, "alpine@sha256:abcd").await.unwrap();
        assert_eq!(image.reference(), "alpine@sha256:abcd");
        assert_eq!(
            engine.transport().requests()[0].path,
            "/images/create?fromImage=alpine%40sha256%3Aabcd"
        );
    }

    #[tokio::test]
    async fn inspect_keeps_repository_slashes() {
        let engine = engine(MockTransport::new().respond(200, r#"{"Id":"sha256:1"}"#));
        Image::from_reference("team/app:1.0").inspect(&engine).await.unwrap();
        assert_eq!(
            engine.transport().requests()[0].path,
            "/images/team/app%3A1.0/json"
        );
    }

    #[tokio::test]
    async fn find_absent_image_is_not_found() {
        let engine = engine(MockTransport::new().respond(404, r#"{"message":"No such image: x"}"#));
        let err = Image::find(&engine, "x").await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { kind: "image", .. }));
    }

    #[tokio::test]
    async fn list_passes_all_flag() {
        let engine = engine(MockTransport::new().respond(200, "[]"));
        Image::list(&engine, true).await.unwrap();
        assert_eq!(engine.transport().requests()[0].path, "/images/json?all=true");
    }

    #[tokio::test]
    async fn remove_returns_deleted_list() {
        let engine = engine(MockTransport::new().respond(
            200,
            r#"[{"Untagged":"ubuntu:latest"},{"Deleted":"sha256:1"}]"#,
        ));
        let removed = Image::from_reference("ubuntu:latest")
            .remove(&engine, false, true)
            .await
            .unwrap();
        assert_eq!(removed[1], json!({"Deleted": "sha256:1"}));
        let req = &engine.transport().requests()[0];
        assert_eq!(req.method, Method::Delete);
        assert_eq!(req.path, "/images/ubuntu%3Alatest?force=false&noprune=true");
    }

    #[tokio::test]
    async fn remove_in_use_uses_uniform_message() {
        let engine = engine(MockTransport::new().respond(
            409,
            r#"{"message":"conflict: unable to remove repository reference"}"#,
        ));
        let err = Image::from_reference("ubuntu")
            .remove(&engine, false, false)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert!(err.to_string().ends_with("conflict: unable to remove repository reference"));
    }
}
