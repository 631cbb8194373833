//! Probe Config - 컨테이너 셀프 테스트 설정
//!
//! TOML 파일(선택) + CLI 오버라이드를 병합합니다.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default label key correlating containers with a test run
pub const DEFAULT_INSTANCE_LABEL: &str = "dockprobe.test-instance-id";

/// Default worker registration ceiling (seconds)
pub const DEFAULT_WORKER_WAIT_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// Probe Config
// ============================================================================

/// dockprobe 통합 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeConfig {
    /// 워커 등록 대기 제한 (초)
    #[serde(default = "default_worker_wait_timeout_secs")]
    pub worker_wait_timeout_secs: u64,

    /// execute() 호출 간격 (ms)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// 테스트 인스턴스 라벨 키
    #[serde(default = "default_instance_label")]
    pub instance_label: String,

    /// 워커 등록 수신 주소
    #[serde(default = "default_registration_addr")]
    pub registration_addr: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            worker_wait_timeout_secs: default_worker_wait_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            instance_label: default_instance_label(),
            registration_addr: default_registration_addr(),
        }
    }
}

impl ProbeConfig {
    // ========================================================================
    // Load
    // ========================================================================

    /// 파일이 주어지면 로드, 아니면 기본값
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                debug!("Loading probe config from {}", path.display());
                let raw = std::fs::read_to_string(path)?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열 파싱
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// 값 검증
    pub fn validate(&self) -> Result<()> {
        if self.worker_wait_timeout_secs == 0 {
            return Err(Error::Config(
                "workerWaitTimeoutSecs must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config(
                "pollIntervalMs must be greater than zero".to_string(),
            ));
        }
        if self.instance_label.trim().is_empty() {
            return Err(Error::Config("instanceLabel cannot be empty".to_string()));
        }
        Ok(())
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 오버라이드 병합 (overrides가 우선)
    pub fn merge(&mut self, overrides: ProbeOverrides) {
        if let Some(timeout) = overrides.worker_wait_timeout_secs {
            self.worker_wait_timeout_secs = timeout;
        }
        if let Some(interval) = overrides.poll_interval_ms {
            self.poll_interval_ms = interval;
        }
        if let Some(label) = overrides.instance_label {
            self.instance_label = label;
        }
        if let Some(addr) = overrides.registration_addr {
            self.registration_addr = addr;
        }
    }

    pub fn worker_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.worker_wait_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// CLI 등에서 넘어오는 선택적 오버라이드
#[derive(Debug, Clone, Default)]
pub struct ProbeOverrides {
    pub worker_wait_timeout_secs: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub instance_label: Option<String>,
    pub registration_addr: Option<String>,
}

fn default_worker_wait_timeout_secs() -> u64 {
    DEFAULT_WORKER_WAIT_TIMEOUT_SECS
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_instance_label() -> String {
    DEFAULT_INSTANCE_LABEL.to_string()
}

fn default_registration_addr() -> String {
    "0.0.0.0:9091".to_string()
}
