//! Decoder 错误类型

use thiserror::Error;

/// 解码失败
///
/// 始终携带出错字段名与字节偏移；调用方丢弃该包并继续。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// 缓冲区短于声明的头部长度
    #[error("malformed header: got {len} bytes, need at least {expected}")]
    MalformedHeader {
        /// 实际长度
        len: usize,
        /// 声明的头部长度
        expected: usize,
    },

    /// 读取越过缓冲区末尾
    #[error("field '{field}' at offset {offset} runs past the end of a {len}-byte buffer")]
    OutOfBounds {
        /// 字段名
        field: &'static str,
        /// 字节偏移
        offset: usize,
        /// 缓冲区长度
        len: usize,
    },

    /// 字段值不满足声明的类型约束
    #[error("field '{field}' at offset {offset} is invalid: {reason}")]
    InvalidValue {
        /// 字段名
        field: &'static str,
        /// 字节偏移
        offset: usize,
        /// 原因
        reason: String,
    },
}

impl DecodeError {
    /// Offending field name
    pub fn field(&self) -> &'static str {
        match self {
            Self::MalformedHeader { .. } => "header",
            Self::OutOfBounds { field, .. } | Self::InvalidValue { field, .. } => field,
        }
    }

    /// Offending byte offset
    pub fn offset(&self) -> usize {
        match self {
            Self::MalformedHeader { len, .. } => *len,
            Self::OutOfBounds { offset, .. } | Self::InvalidValue { offset, .. } => *offset,
        }
    }
}

/// Decoder Result 类型别名
pub type Result<T> = std::result::Result<T, DecodeError>;
