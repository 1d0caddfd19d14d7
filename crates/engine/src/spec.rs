//! Container creation spec and its translation to the engine's wire schema.
//!
//! [`ContainerSpec`] uses friendly snake_case fields, all optional. Defaults are
//! filled in by [`ContainerSpec::translate`], not at construction, so a
//! partially specified spec always translates to the same complete
//! [`CreateContainerBody`].
//!
//! # Translation rules
//!
//! | spec field | wire field | default |
//! |---|---|---|
//! | `hostname` | `Hostname` | `""` |
//! | `domainname` | `Domainname` | `""` |
//! | `user` | `User` | `""` |
//! | `attach_stdin` | `AttachStdin` | `false` |
//! | `attach_stdout` | `AttachStdout` | `true` |
//! | `attach_stderr` | `AttachStderr` | `true` |
//! | `tty` | `Tty` | `false` |
//! | `open_stdin` | `OpenStdin` | `false` |
//! | `stdin_once` | `StdinOnce` | `false` |
//! | `env` | `Env` (`NAME=VALUE`, insertion order) | `[]` |
//! | `cmd` | `Cmd` | `["/bin/sh"]` |
//! | `entrypoint` | `Entrypoint` | omitted |
//! | `image` | `Image` | `""` |
//! | `labels` | `Labels` | `{}` |
//! | `volumes` | `HostConfig.Binds` (`volume:path`) | `[]` |
//! | `working_dir` | `WorkingDir` | `""` |
//! | `network_disabled` | `NetworkDisabled` | `false` |
//! | `mac_address` | `MacAddress` | omitted |
//! | `ports` | `ExposedPorts` + `HostConfig.PortBindings` | `{}` |
//! | `stop_signal` | `StopSignal` | `"SIGTERM"` |
//! | `stop_timeout` | `StopTimeout` | `10` |
//! | `host_config` | `HostConfig` | `{}` |
//! | `networking_config` | `NetworkingConfig` | `{}` |

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::image::Image;
use crate::port::PortBinding;
use crate::volume::Volume;

/// Default command when none is given.
pub const DEFAULT_CMD: &str = "/bin/sh";
/// Default stop signal.
pub const DEFAULT_STOP_SIGNAL: &str = "SIGTERM";
/// Default stop timeout in seconds.
pub const DEFAULT_STOP_TIMEOUT_SECS: u64 = 10;

/// Friendly container description consumed by container creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerSpec {
    pub hostname: Option<String>,
    pub domainname: Option<String>,
    pub user: Option<String>,
    pub attach_stdin: Option<bool>,
    pub attach_stdout: Option<bool>,
    pub attach_stderr: Option<bool>,
    pub tty: Option<bool>,
    pub open_stdin: Option<bool>,
    pub stdin_once: Option<bool>,
    /// Environment in insertion order.
    pub env: Vec<(String, String)>,
    pub cmd: Option<Vec<String>>,
    pub entrypoint: Option<Vec<String>>,
    pub image: Option<Image>,
    pub labels: BTreeMap<String, String>,
    /// Container path → named volume.
    pub volumes: BTreeMap<String, Volume>,
    pub working_dir: Option<String>,
    pub network_disabled: Option<bool>,
    pub mac_address: Option<String>,
    pub ports: Vec<PortBinding>,
    pub stop_signal: Option<String>,
    pub stop_timeout: Option<u64>,
    pub host_config: Option<Map<String, Value>>,
    pub networking_config: Option<Map<String, Value>>,
}

/// Body of `POST /containers/create`, in the engine's exact field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateContainerBody {
    pub hostname: String,
    pub domainname: String,
    pub user: String,
    pub attach_stdin: bool,
    pub attach_stdout: bool,
    pub attach_stderr: bool,
    pub tty: bool,
    pub open_stdin: bool,
    pub stdin_once: bool,
    pub env: Vec<String>,
    pub cmd: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entrypoint: Vec<String>,
    pub image: String,
    pub labels: BTreeMap<String, String>,
    pub working_dir: String,
    pub network_disabled: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mac_address: String,
    pub exposed_ports: BTreeMap<String, EmptyObject>,
    pub stop_signal: String,
    pub stop_timeout: u64,
    pub host_config: Map<String, Value>,
    pub networking_config: Map<String, Value>,
}

/// Serializes as `{}`; the engine's notation for set membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmptyObject {}

/// One entry of `HostConfig.PortBindings[key]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostPortBinding {
    pub host_ip: String,
    pub host_port: String,
}

impl ContainerSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn tty(mut self, tty: bool) -> Self {
        self.tty = Some(tty);
        self
    }

    /// Sets an environment variable. Re-setting a name keeps its original position.
    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.env.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.env.push((name, value)),
        }
        self
    }

    pub fn cmd<I, S>(mut self, cmd: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cmd = Some(cmd.into_iter().map(Into::into).collect());
        self
    }

    pub fn entrypoint<I, S>(mut self, entrypoint: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entrypoint = Some(entrypoint.into_iter().map(Into::into).collect());
        self
    }

    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Mounts `volume` at `container_path`.
    pub fn volume(mut self, container_path: impl Into<String>, volume: Volume) -> Self {
        self.volumes.insert(container_path.into(), volume);
        self
    }

    pub fn port(mut self, binding: PortBinding) -> Self {
        self.ports.push(binding);
        self
    }

    pub fn working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn stop_signal(mut self, signal: impl Into<String>) -> Self {
        self.stop_signal = Some(signal.into());
        self
    }

    pub fn stop_timeout(mut self, secs: u64) -> Self {
        self.stop_timeout = Some(secs);
        self
    }

    pub fn host_config(mut self, host_config: Map<String, Value>) -> Self {
        self.host_config = Some(host_config);
        self
    }

    pub fn networking_config(mut self, networking_config: Map<String, Value>) -> Self {
        self.networking_config = Some(networking_config);
        self
    }

    /// Produces the complete wire body, applying every default.
    pub fn translate(&self) -> CreateContainerBody {
        let host_config = merge_host_config(
            self.host_config.clone().unwrap_or_default(),
            volume_binds(&self.volumes),
            port_bindings(&self.ports),
        );

        CreateContainerBody {
            hostname: self.hostname.clone().unwrap_or_default(),
            domainname: self.domainname.clone().unwrap_or_default(),
            user: self.user.clone().unwrap_or_default(),
            attach_stdin: self.attach_stdin.unwrap_or(false),
            attach_stdout: self.attach_stdout.unwrap_or(true),
            attach_stderr: self.attach_stderr.unwrap_or(true),
            tty: self.tty.unwrap_or(false),
            open_stdin: self.open_stdin.unwrap_or(false),
            stdin_once: self.stdin_once.unwrap_or(false),
            env: env_strings(&self.env),
            cmd: self
                .cmd
                .clone()
                .unwrap_or_else(|| vec![DEFAULT_CMD.to_owned()]),
            entrypoint: self.entrypoint.clone().unwrap_or_default(),
            image: self
                .image
                .as_ref()
                .map(|i| i.reference().to_owned())
                .unwrap_or_default(),
            labels: self.labels.clone(),
            working_dir: self.working_dir.clone().unwrap_or_default(),
            network_disabled: self.network_disabled.unwrap_or(false),
            mac_address: self.mac_address.clone().unwrap_or_default(),
            exposed_ports: exposed_ports(&self.ports),
            stop_signal: self
                .stop_signal
                .clone()
                .unwrap_or_else(|| DEFAULT_STOP_SIGNAL.to_owned()),
            stop_timeout: self.stop_timeout.unwrap_or(DEFAULT_STOP_TIMEOUT_SECS),
            host_config,
            networking_config: self.networking_config.clone().unwrap_or_default(),
        }
    }
}

/// `[(FOO, bar)]` → `["FOO=bar"]`, preserving order.
pub fn env_strings(env: &[(String, String)]) -> Vec<String> {
    env.iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect()
}

/// One `{}` placeholder per distinct `port/protocol` key.
pub fn exposed_ports(ports: &[PortBinding]) -> BTreeMap<String, EmptyObject> {
    ports
        .iter()
        .map(|binding| (binding.key(), EmptyObject {}))
        .collect()
}

/// Bindings grouped by `port/protocol`; duplicates accumulate in input order.
pub fn port_bindings(ports: &[PortBinding]) -> BTreeMap<String, Vec<HostPortBinding>> {
    let mut map: BTreeMap<String, Vec<HostPortBinding>> = BTreeMap::new();
    for binding in ports {
        map.entry(binding.key()).or_default().push(HostPortBinding {
            host_ip: binding.host_ip.clone(),
            host_port: binding.host_port.to_string(),
        });
    }
    map
}

/// `{"/data": Volume("db")}` → `["db:/data"]`.
pub fn volume_binds(volumes: &BTreeMap<String, Volume>) -> Vec<String> {
    volumes
        .iter()
        .map(|(path, volume)| format!("{}:{path}", volume.name()))
        .collect()
}

/// Adds computed `Binds` and `PortBindings` to a caller-supplied `HostConfig`.
///
/// Entries the caller already put under either key are kept and come first.
fn merge_host_config(
    mut host_config: Map<String, Value>,
    binds: Vec<String>,
    bindings: BTreeMap<String, Vec<HostPortBinding>>,
) -> Map<String, Value> {
    let mut all_binds = match host_config.remove("Binds") {
        Some(Value::Array(existing)) => existing,
        _ => Vec::new(),
    };
    all_binds.extend(binds.into_iter().map(Value::String));
    host_config.insert("Binds".to_owned(), Value::Array(all_binds));

    let mut all_bindings = match host_config.remove("PortBindings") {
        Some(Value::Object(existing)) => existing,
        _ => Map::new(),
    };
    for (key, list) in bindings {
        let entry = all_bindings
            .entry(key)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        if let Value::Array(items) = entry {
            items.extend(
                list.into_iter()
                    .map(|b| json!({ "HostIp": b.host_ip, "HostPort": b.host_port })),
            );
        }
    }
    host_config.insert("PortBindings".to_owned(), Value::Object(all_bindings));

    host_config
}
