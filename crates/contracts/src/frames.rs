//! 解码帧 - Decoder 输出
//!
//! 两种线格式共用同一组帧类型。

use serde::{Deserialize, Serialize};

use crate::TyreCompound;

/// 圈时帧
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LapFrame {
    /// 上一圈用时 (秒)，非正值视为缺失；旧格式总是 None
    pub last_lap_time: Option<f32>,

    /// 当前圈实时计时 (秒)
    pub current_lap_time: f32,

    /// 当前圈是否无效 (仅新格式)
    pub invalid: Option<bool>,
}

/// 车辆遥测帧
///
/// 每个字段都可能缺失：新格式总是完整，旧格式无法解码的字段为 `None`，
/// 以便与真实的零值区分。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    /// 速度 (km/h)
    pub speed: Option<u16>,

    /// 油门 [0, 1]
    pub throttle: Option<f32>,

    /// 刹车 [0, 1]
    pub brake: Option<f32>,

    /// 档位 [-1, 8]，-1 = 倒档，0 = 空档
    pub gear: Option<i8>,

    /// 引擎转速
    pub rpm: Option<u16>,

    /// DRS 是否打开
    pub drs: Option<bool>,
}

impl TelemetryFrame {
    /// All fields decoded
    pub fn is_complete(&self) -> bool {
        self.undecoded_fields().is_empty()
    }

    /// Names of fields that could not be decoded
    pub fn undecoded_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.speed.is_none() {
            missing.push("speed");
        }
        if self.throttle.is_none() {
            missing.push("throttle");
        }
        if self.brake.is_none() {
            missing.push("brake");
        }
        if self.gear.is_none() {
            missing.push("gear");
        }
        if self.rpm.is_none() {
            missing.push("rpm");
        }
        if self.drs.is_none() {
            missing.push("drs");
        }
        missing
    }
}

/// 车辆状态帧
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarStatusFrame {
    /// 映射后的轮胎配方
    pub tyre_compound: TyreCompound,

    /// 原始配方 id
    pub compound_id: u8,

    /// 剩余燃油
    pub fuel_in_tank: f32,
}

/// 单个解码帧
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedFrame {
    Lap(LapFrame),
    Telemetry(TelemetryFrame),
    CarStatus(CarStatusFrame),
}

impl DecodedFrame {
    /// Short label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lap(_) => "lap",
            Self::Telemetry(_) => "telemetry",
            Self::CarStatus(_) => "car_status",
        }
    }
}
