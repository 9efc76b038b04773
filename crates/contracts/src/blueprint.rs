//! CaptureBlueprint - Config Loader 输出
//!
//! 描述一次采集运行的完整配置：线格式、会话标签、圈时边界、采样周期、持久化目标。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::{
    ContractError, LapBounds, LegacyDetectionConfig, SessionLabels, TrackerConfig, TyreCompound,
    WireFormat, DEFAULT_SAMPLE_PERIOD, DEFAULT_TELEMETRY_PORT,
};

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的采集配置蓝图
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CaptureBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 网络与线格式
    #[validate(nested)]
    pub capture: CaptureConfig,

    /// 静态会话标签
    #[serde(default)]
    #[validate(nested)]
    pub session: SessionConfig,

    /// 圈时判定
    #[serde(default)]
    #[validate(nested)]
    pub laps: LapConfig,

    /// 遥测采样
    #[serde(default)]
    #[validate(nested)]
    pub telemetry: TelemetryConfig,

    /// 持久化目标
    #[validate(nested)]
    pub store: StoreConfig,
}

/// 网络与线格式配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CaptureConfig {
    /// 线格式选择器 (newer / legacy 及别名)
    #[validate(length(min = 1))]
    pub format: String,

    /// 监听地址
    #[serde(default = "default_bind_address")]
    #[validate(length(min = 1))]
    pub bind_address: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_TELEMETRY_PORT
}

/// 会话配置 (协议不可靠地传输这些字段)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SessionConfig {
    #[serde(default = "default_track")]
    #[validate(length(min = 1))]
    pub track: String,

    #[serde(default = "default_session_type")]
    #[validate(length(min = 1))]
    pub session_type: String,

    #[serde(default = "default_weather")]
    #[validate(length(min = 1))]
    pub weather: String,

    /// 起始轮胎配方名称
    #[serde(default = "default_starting_compound")]
    pub starting_compound: String,

    /// 起始燃油
    #[serde(default = "default_starting_fuel")]
    #[validate(range(min = 0.0))]
    pub starting_fuel: f32,

    /// 固定会话日期 (可选)
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

fn default_track() -> String {
    "Unknown Track".to_string()
}

fn default_session_type() -> String {
    "Race".to_string()
}

fn default_weather() -> String {
    "Clear".to_string()
}

fn default_starting_compound() -> String {
    TyreCompound::default().name().to_string()
}

fn default_starting_fuel() -> f32 {
    100.0
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            track: default_track(),
            session_type: default_session_type(),
            weather: default_weather(),
            starting_compound: default_starting_compound(),
            starting_fuel: default_starting_fuel(),
            date: None,
        }
    }
}

/// 圈时判定配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LapConfig {
    /// 有效圈时下限 (毫秒)
    #[serde(default = "default_min_lap_ms")]
    pub min_lap_ms: u32,

    /// 有效圈时上限 (毫秒)
    #[serde(default = "default_max_lap_ms")]
    pub max_lap_ms: u32,

    /// 旧格式：计时归零阈值 (秒)
    #[serde(default = "default_legacy_epsilon")]
    #[validate(range(exclusive_min = 0.0))]
    pub legacy_epsilon_s: f32,

    /// 旧格式：最小峰值 (秒)，防止启动噪声
    #[serde(default = "default_legacy_min_peak")]
    #[validate(range(exclusive_min = 0.0))]
    pub legacy_min_peak_s: f32,
}

fn default_min_lap_ms() -> u32 {
    LapBounds::default().min_ms
}

fn default_max_lap_ms() -> u32 {
    LapBounds::default().max_ms
}

fn default_legacy_epsilon() -> f32 {
    LegacyDetectionConfig::default().epsilon_s
}

fn default_legacy_min_peak() -> f32 {
    LegacyDetectionConfig::default().min_peak_s
}

impl Default for LapConfig {
    fn default() -> Self {
        Self {
            min_lap_ms: default_min_lap_ms(),
            max_lap_ms: default_max_lap_ms(),
            legacy_epsilon_s: default_legacy_epsilon(),
            legacy_min_peak_s: default_legacy_min_peak(),
        }
    }
}

/// 遥测采样配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TelemetryConfig {
    /// 每 N 帧转发一帧
    #[serde(default = "default_sample_period")]
    #[validate(range(min = 1))]
    pub sample_period: u64,
}

fn default_sample_period() -> u64 {
    DEFAULT_SAMPLE_PERIOD
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            sample_period: default_sample_period(),
        }
    }
}

/// 持久化配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoreConfig {
    /// Store 名称
    #[validate(length(min = 1))]
    pub name: String,

    /// Store 类型
    pub store_type: StoreType,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Store 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// 日志输出
    Log,
    /// JSON Lines 文件输出
    File,
    /// 内存 (测试/试运行)
    Memory,
}

impl CaptureBlueprint {
    /// Defaults for a format: log store, standard labels and thresholds
    pub fn with_format(format: WireFormat) -> Self {
        Self {
            version: ConfigVersion::V1,
            capture: CaptureConfig {
                format: format.as_str().to_string(),
                bind_address: default_bind_address(),
                port: default_port(),
            },
            session: SessionConfig::default(),
            laps: LapConfig::default(),
            telemetry: TelemetryConfig::default(),
            store: StoreConfig {
                name: "log".to_string(),
                store_type: StoreType::Log,
                params: HashMap::new(),
            },
        }
    }

    /// Resolve the wire format selector
    pub fn wire_format(&self) -> Result<WireFormat, ContractError> {
        self.capture
            .format
            .parse()
            .map_err(|e: crate::UnknownWireFormat| {
                ContractError::config_validation("capture.format", e.to_string())
            })
    }

    /// Resolve the starting compound label
    pub fn starting_compound(&self) -> Result<TyreCompound, ContractError> {
        self.session
            .starting_compound
            .parse()
            .map_err(|e: String| ContractError::config_validation("session.starting_compound", e))
    }

    /// Build a TrackerConfig from blueprint data
    pub fn to_tracker_config(&self) -> Result<TrackerConfig, ContractError> {
        Ok(TrackerConfig {
            format: self.wire_format()?,
            lap_bounds: LapBounds {
                min_ms: self.laps.min_lap_ms,
                max_ms: self.laps.max_lap_ms,
            },
            legacy: LegacyDetectionConfig {
                epsilon_s: self.laps.legacy_epsilon_s,
                min_peak_s: self.laps.legacy_min_peak_s,
            },
            sample_period: self.telemetry.sample_period,
            session: SessionLabels {
                track: self.session.track.clone(),
                session_type: self.session.session_type.clone(),
                weather: self.session.weather.clone(),
                date: self.session.date,
            },
            starting_compound: self.starting_compound()?,
            starting_fuel: self.session.starting_fuel,
        })
    }
}
