//! Config - 통합 설정 관리
//!
//! - `probe.rs` - ProbeConfig 셀프 테스트 설정

mod probe;

pub use probe::{
    ProbeConfig, ProbeOverrides, DEFAULT_INSTANCE_LABEL, DEFAULT_WORKER_WAIT_TIMEOUT_SECS,
};
