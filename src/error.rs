//! # 错误类型
//!
//! 编解码核心的全部失败情形。所有错误都是终止性的，不可重试。

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegError {
    #[error("Invalid carrier: {0}")]
    InvalidCarrier(String),

    #[error("Carrier too small: {required} bits required, {available} bits available")]
    CarrierTooSmall { required: u64, available: u64 },

    #[error("No available slot remaining (every bit-plane of the carrier is used)")]
    CapacityExhausted,

    #[error("Binary value needs {needed} bits, larger than the expected {width}")]
    ValueTooLarge { needed: u32, width: u32 },

    #[error("Hidden data is truncated or corrupt")]
    TruncatedOrCorruptData,
}

pub type Result<T> = std::result::Result<T, StegError>;
