//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的不可变对象，在构造时完成校验。
//! 附带两个常用实现：邮箱地址与姓名。
//!
use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 值对象抽象
pub trait ValueObject {
    /// 业务校验失败时的错误类型
    type Error;

    /// 校验自身取值
    fn validate(&self) -> Result<(), Self::Error>;
}

/// 电子邮箱地址
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub const MAX_LEN: usize = 254;

    /// 解析并校验邮箱地址；不合法时返回 `InvalidValue`
    pub fn parse(value: impl Into<String>) -> DomainResult<Self> {
        let candidate = Self(value.into());
        candidate.validate()?;
        Ok(candidate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `@` 前的本地部分
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map(|(local, _)| local).unwrap_or("")
    }

    /// `@` 后的域名部分
    pub fn domain(&self) -> &str {
        self.0
            .split_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or("")
    }
}

impl ValueObject for EmailAddress {
    type Error = DomainError;

    fn validate(&self) -> DomainResult<()> {
        let value = &self.0;
        if value.is_empty() || value.len() > Self::MAX_LEN {
            return Err(DomainError::invalid_value(format!(
                "email length out of bounds: {}",
                value.len()
            )));
        }
        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::invalid_value(format!(
                "email missing '@': {value}"
            )));
        };
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return Err(DomainError::invalid_value(format!(
                "email is malformed: {value}"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 姓名（名与姓两段）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FullName {
    first: String,
    last: String,
}

impl FullName {
    pub const MAX_PART_LEN: usize = 100;

    /// 创建并校验姓名；任一段为空或超长时返回 `InvalidValue`
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> DomainResult<Self> {
        let candidate = Self {
            first: first.into(),
            last: last.into(),
        };
        candidate.validate()?;
        Ok(candidate)
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn last(&self) -> &str {
        &self.last
    }
}

impl ValueObject for FullName {
    type Error = DomainError;

    fn validate(&self) -> DomainResult<()> {
        for (label, part) in [("first name", &self.first), ("last name", &self.last)] {
            if part.is_empty() {
                return Err(DomainError::invalid_value(format!("{label} is empty")));
            }
            if part.len() > Self::MAX_PART_LEN {
                return Err(DomainError::invalid_value(format!(
                    "{label} exceeds {} characters",
                    Self::MAX_PART_LEN
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}
