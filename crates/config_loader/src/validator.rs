//! 配置校验模块
//!
//! 校验规则：
//! - 字段级约束 (validator derive)：标签非空、sample_period >= 1、阈值 > 0
//! - 线格式选择器可解析 (未知格式在启动时即为致命错误)
//! - 起始轮胎配方存在于查找表
//! - min_lap_ms <= max_lap_ms
//! - legacy_min_peak_s > legacy_epsilon_s

use contracts::{CaptureBlueprint, ContractError};
use validator::Validate;

/// 校验 CaptureBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &CaptureBlueprint) -> Result<(), ContractError> {
    validate_fields(blueprint)?;
    validate_wire_format(blueprint)?;
    validate_starting_compound(blueprint)?;
    validate_lap_bounds(blueprint)?;
    validate_legacy_thresholds(blueprint)?;
    Ok(())
}

/// 字段级约束
fn validate_fields(blueprint: &CaptureBlueprint) -> Result<(), ContractError> {
    blueprint
        .validate()
        .map_err(|e| ContractError::config_validation("blueprint", e.to_string()))
}

/// 校验线格式选择器
fn validate_wire_format(blueprint: &CaptureBlueprint) -> Result<(), ContractError> {
    blueprint.wire_format().map(|_| ())
}

/// 校验起始轮胎配方
fn validate_starting_compound(blueprint: &CaptureBlueprint) -> Result<(), ContractError> {
    blueprint.starting_compound().map(|_| ())
}

/// 校验圈时边界
fn validate_lap_bounds(blueprint: &CaptureBlueprint) -> Result<(), ContractError> {
    let laps = &blueprint.laps;
    if laps.min_lap_ms > laps.max_lap_ms {
        return Err(ContractError::config_validation(
            "laps.min_lap_ms / laps.max_lap_ms",
            format!(
                "min_lap_ms ({}) must be <= max_lap_ms ({})",
                laps.min_lap_ms, laps.max_lap_ms
            ),
        ));
    }
    Ok(())
}

/// 校验旧格式检测阈值
fn validate_legacy_thresholds(blueprint: &CaptureBlueprint) -> Result<(), ContractError> {
    let laps = &blueprint.laps;
    if laps.legacy_min_peak_s <= laps.legacy_epsilon_s {
        return Err(ContractError::config_validation(
            "laps.legacy_min_peak_s",
            format!(
                "legacy_min_peak_s ({}) must be > legacy_epsilon_s ({})",
                laps.legacy_min_peak_s, laps.legacy_epsilon_s
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        CaptureConfig, ConfigVersion, LapConfig, SessionConfig, StoreConfig, StoreType,
        TelemetryConfig,
    };

    fn minimal_blueprint() -> CaptureBlueprint {
        CaptureBlueprint {
            version: ConfigVersion::V1,
            capture: CaptureConfig {
                format: "newer".into(),
                bind_address: "0.0.0.0".into(),
                port: 20777,
            },
            session: SessionConfig::default(),
            laps: LapConfig::default(),
            telemetry: TelemetryConfig::default(),
            store: StoreConfig {
                name: "log".into(),
                store_type: StoreType::Log,
                params: Default::default(),
            },
        }
    }

    #[test]
    fn test_valid_config() {
        let bp = minimal_blueprint();
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_unknown_format() {
        let mut bp = minimal_blueprint();
        bp.capture.format = "motogp".into();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("capture.format"), "got: {err}");
        assert!(err.contains("motogp"), "got: {err}");
    }

    #[test]
    fn test_zero_sample_period() {
        let mut bp = minimal_blueprint();
        bp.telemetry.sample_period = 0;
        let result = validate(&bp);
        assert!(matches!(result, Err(ContractError::ConfigValidation { .. })));
    }

    #[test]
    fn test_empty_track_label() {
        let mut bp = minimal_blueprint();
        bp.session.track = String::new();
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_unknown_starting_compound() {
        let mut bp = minimal_blueprint();
        bp.session.starting_compound = "C5".into();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("starting_compound"), "got: {err}");
    }

    #[test]
    fn test_inverted_lap_bounds() {
        let mut bp = minimal_blueprint();
        bp.laps.min_lap_ms = 200_000;
        bp.laps.max_lap_ms = 100_000;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("min_lap_ms"), "got: {err}");
    }

    #[test]
    fn test_peak_below_epsilon() {
        let mut bp = minimal_blueprint();
        bp.laps.legacy_epsilon_s = 2.0;
        bp.laps.legacy_min_peak_s = 1.0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("legacy_min_peak_s"), "got: {err}");
    }

    #[test]
    fn test_empty_store_name() {
        let mut bp = minimal_blueprint();
        bp.store.name = String::new();
        assert!(validate(&bp).is_err());
    }
}
