//! Named cluster policies and consistency levels.
//!
//! Every choice is a closed enum parsed from its configuration name before a
//! session is opened. The driver adapter maps the enums onto its own types.

use crate::error::{CassError, Result};
use std::fmt;

const LOAD_BALANCING: &str = "load balancing";
const RECONNECTION: &str = "reconnection";
const RETRY: &str = "retry";

/// Load balancing policies that can be requested by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadBalancingPolicy {
    DcAwareRoundRobin,
    LatencyAware,
    RoundRobin,
    TokenAware,
    HostFilter,
    ErrorAware,
}

impl LoadBalancingPolicy {
    const ALL: [Self; 6] = [
        Self::DcAwareRoundRobin,
        Self::LatencyAware,
        Self::RoundRobin,
        Self::TokenAware,
        Self::HostFilter,
        Self::ErrorAware,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DcAwareRoundRobin => "DCAwareRoundRobinPolicy",
            Self::LatencyAware => "LatencyAwarePolicy",
            Self::RoundRobin => "RoundRobinPolicy",
            Self::TokenAware => "TokenAwarePolicy",
            Self::HostFilter => "HostFilterPolicy",
            Self::ErrorAware => "ErrorAwarePolicy",
        }
    }

    /// Looks up a policy by its exact name.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| invalid(LOAD_BALANCING, name))
    }

    /// Returns an error if the policy has no driver counterpart.
    pub fn ensure_supported(self) -> Result<Self> {
        match self {
            Self::HostFilter | Self::ErrorAware => Err(CassError::UnsupportedPolicy {
                kind: LOAD_BALANCING,
                name: self.as_str().to_string(),
            }),
            supported => Ok(supported),
        }
    }
}

/// Reconnection policies that can be requested by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectionPolicy {
    Constant,
    Exponential,
}

impl ReconnectionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constant => "ConstantReconnectionPolicy",
            Self::Exponential => "ExponentialReconnectionPolicy",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        [Self::Constant, Self::Exponential]
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| invalid(RECONNECTION, name))
    }
}

/// Retry policies that can be requested by name.
///
/// The `Logging*` variants log each retry decision and then defer to the
/// wrapped policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    Default,
    DowngradingConsistency,
    Fallthrough,
    LoggingDefault,
    LoggingDowngradingConsistency,
    LoggingFallthrough,
}

impl RetryPolicy {
    const ALL: [Self; 6] = [
        Self::Default,
        Self::DowngradingConsistency,
        Self::Fallthrough,
        Self::LoggingDefault,
        Self::LoggingDowngradingConsistency,
        Self::LoggingFallthrough,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "DefaultRetryPolicy",
            Self::DowngradingConsistency => "DowngradingConsistencyRetryPolicy",
            Self::Fallthrough => "FallthroughRetryPolicy",
            Self::LoggingDefault => "LoggingDefaultRetryPolicy",
            Self::LoggingDowngradingConsistency => "LoggingDowngradingConsistencyRetryPolicy",
            Self::LoggingFallthrough => "LoggingFallthroughRetryPolicy",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| invalid(RETRY, name))
    }

    pub fn is_logging(&self) -> bool {
        matches!(
            self,
            Self::LoggingDefault | Self::LoggingDowngradingConsistency | Self::LoggingFallthrough
        )
    }

    /// Returns the policy that makes the retry decisions.
    pub fn inner(&self) -> Self {
        match self {
            Self::LoggingDefault => Self::Default,
            Self::LoggingDowngradingConsistency => Self::DowngradingConsistency,
            Self::LoggingFallthrough => Self::Fallthrough,
            other => *other,
        }
    }
}

/// Regular consistency levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyLevel {
    Any,
    One,
    Two,
    Three,
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    Serial,
    LocalSerial,
    LocalOne,
}

impl ConsistencyLevel {
    const ALL: [Self; 11] = [
        Self::Any,
        Self::One,
        Self::Two,
        Self::Three,
        Self::Quorum,
        Self::All,
        Self::LocalQuorum,
        Self::EachQuorum,
        Self::Serial,
        Self::LocalSerial,
        Self::LocalOne,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::One => "ONE",
            Self::Two => "TWO",
            Self::Three => "THREE",
            Self::Quorum => "QUORUM",
            Self::All => "ALL",
            Self::LocalQuorum => "LOCAL_QUORUM",
            Self::EachQuorum => "EACH_QUORUM",
            Self::Serial => "SERIAL",
            Self::LocalSerial => "LOCAL_SERIAL",
            Self::LocalOne => "LOCAL_ONE",
        }
    }

    /// Parses a level name, ignoring case.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| CassError::config(format!("\"{name}\" is not a valid consistency level")))
    }

    pub fn is_serial(&self) -> bool {
        matches!(self, Self::Serial | Self::LocalSerial)
    }
}

/// Serial consistency levels for lightweight transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialConsistencyLevel {
    Serial,
    LocalSerial,
}

impl SerialConsistencyLevel {
    pub fn from_name(name: &str) -> Result<Self> {
        let not_serial =
            || CassError::config(format!("\"{name}\" is not a valid serial consistency level"));
        match ConsistencyLevel::from_name(name).map_err(|_| not_serial())? {
            ConsistencyLevel::Serial => Ok(Self::Serial),
            ConsistencyLevel::LocalSerial => Ok(Self::LocalSerial),
            _ => Err(not_serial()),
        }
    }
}

/// Frame compression algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionKind {
    None,
    Lz4,
    Snappy,
}

impl CompressionKind {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "lz4" => Ok(Self::Lz4),
            "snappy" => Ok(Self::Snappy),
            _ => Err(CassError::config(format!(
                "\"{name}\" is not a valid compression algorithm"
            ))),
        }
    }
}

impl fmt::Display for LoadBalancingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ReconnectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn invalid(kind: &'static str, name: &str) -> CassError {
    CassError::InvalidPolicyName {
        kind,
        name: name.to_string(),
    }
}
