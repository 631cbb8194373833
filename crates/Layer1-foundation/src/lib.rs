//! # dockprobe-foundation
//!
//! Foundation layer for dockprobe:
//! - Config: 셀프 테스트 설정 (ProbeConfig)
//! - Error: 공통 에러 타입

pub mod config;
pub mod error;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config
// ============================================================================
pub use config::{
    ProbeConfig, ProbeOverrides, DEFAULT_INSTANCE_LABEL, DEFAULT_WORKER_WAIT_TIMEOUT_SECS,
};
