//! Volume 핸들과 볼륨 API 호출

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::engine::DockerEngine;
use crate::error::EngineError;
use crate::name::validate_name;
use crate::query::{Query, segment};
use crate::transport::{ApiRequest, Transport};

/// 원격 named volume 핸들
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Volume {
    name: String,
}

/// `POST /volumes/create` 옵션
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeOptions {
    pub driver: String,
    pub driver_opts: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,
}

impl Default for VolumeOptions {
    fn default() -> Self {
        Self {
            driver: "local".to_owned(),
            driver_opts: BTreeMap::new(),
            labels: BTreeMap::new(),
        }
    }
}

#[derive(Deserialize)]
struct CreateResponse {
    #[serde(rename = "Name")]
    name: String,
}

impl Volume {
    /// 이름으로 핸들을 생성합니다. I/O는 수행하지 않습니다.
    pub fn from_name(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> Result<String, EngineError> {
        Ok(format!("/volumes/{}", segment(&self.name)?))
    }

    /// 볼륨을 생성합니다.
    ///
    /// # Errors
    ///
    /// - `EngineError::Validation`: 이름 규칙 위반 (요청 전송 안 함)
    /// - `EngineError::Remote`: 201 이외의 응답
    pub async fn create<T: Transport>(
        engine: &DockerEngine<T>,
        name: &str,
        options: &VolumeOptions,
    ) -> Result<Self, EngineError> {
        engine.ensure_ready()?;
        validate_name(name)?;

        let body = json!({
            "Name": name,
            "Driver": options.driver,
            "DriverOpts": options.driver_opts,
            "Labels": options.labels,
        });
        let created: CreateResponse = engine
            .expect_typed(ApiRequest::post("/volumes/create").with_body(body), 201)
            .await?;

        info!(name = %created.name, driver = %options.driver, "volume created");
        Ok(Self::from_name(created.name))
    }

    /// `{"Volumes": [...], "Warnings": [...]}` 문서를 그대로 반환합니다.
    pub async fn list<T: Transport>(engine: &DockerEngine<T>) -> Result<Value, EngineError> {
        engine.expect_json(ApiRequest::get("/volumes"), 200).await
    }

    pub async fn exists<T: Transport>(
        engine: &DockerEngine<T>,
        name: &str,
    ) -> Result<bool, EngineError> {
        engine.probe(ApiRequest::get(Self::from_name(name).path()?)).await
    }

    /// 존재를 확인한 뒤 핸들을 반환합니다.
    pub async fn find<T: Transport>(
        engine: &DockerEngine<T>,
        name: &str,
    ) -> Result<Self, EngineError> {
        if Self::exists(engine, name).await? {
            Ok(Self::from_name(name))
        } else {
            Err(EngineError::NotFound {
                kind: "volume",
                id: name.to_owned(),
            })
        }
    }

    pub async fn inspect<T: Transport>(&self, engine: &DockerEngine<T>) -> Result<Value, EngineError> {
        engine.expect_json(ApiRequest::get(self.path()?), 200).await
    }

    /// 볼륨을 삭제합니다. 사용 중인 볼륨은 `force` 없이 409로 거부됩니다.
    pub async fn remove<T: Transport>(
        &self,
        engine: &DockerEngine<T>,
        force: bool,
    ) -> Result<(), EngineError> {
        let path = Query::new().push("force", force).append_to(&self.path()?);
        engine.expect_empty(ApiRequest::delete(path), 204).await?;
        info!(name = %self.name, "volume removed");
        Ok(())
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
