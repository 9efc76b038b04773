//! 采集指标收集模块
//!
//! 基于 RaceEvent 与解码结果记录运行指标，并在内存中聚合用于结束摘要。

use std::collections::BTreeMap;

use contracts::RaceEvent;
use metrics::{counter, gauge, histogram};

/// 记录收到一个数据报
pub fn record_datagram_received(bytes: usize) {
    counter!("f1_capture_datagrams_total").increment(1);
    histogram!("f1_capture_datagram_bytes").record(bytes as f64);
}

/// 记录解码失败 (按字段)
pub fn record_decode_error(field: &'static str) {
    counter!("f1_capture_decode_errors_total", "field" => field).increment(1);
}

/// 从 RaceEvent 记录指标
///
/// 每个事件在持久化成功后调用一次。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_race_event;
///
/// for event in tracker.observe(frame) {
///     recorder.record(&event)?;
///     record_race_event(&event);
/// }
/// ```
pub fn record_race_event(event: &RaceEvent) {
    match event {
        RaceEvent::SessionStarted(_) => {
            counter!("f1_capture_sessions_total").increment(1);
        }
        RaceEvent::TyreChanged { to, .. } => {
            counter!("f1_capture_tyre_changes_total", "compound" => to.name()).increment(1);
        }
        RaceEvent::LapCompleted(lap) => {
            let valid = if lap.is_valid { "true" } else { "false" };
            counter!("f1_capture_laps_total", "valid" => valid).increment(1);
            histogram!("f1_capture_lap_time_ms").record(f64::from(lap.lap_time_ms));
            gauge!("f1_capture_fuel_load").set(f64::from(lap.fuel_load));
            gauge!("f1_capture_tyre_age").set(f64::from(lap.tyre_age));
        }
        RaceEvent::TelemetrySampled { .. } => {
            counter!("f1_capture_telemetry_samples_total").increment(1);
        }
    }
}

/// 采集指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct CaptureStatsAggregator {
    /// 数据报总数
    pub datagrams: u64,

    /// 解码失败总数
    pub decode_errors: u64,

    /// 各字段解码失败次数
    pub decode_errors_by_field: BTreeMap<&'static str, u64>,

    /// 圈数
    pub laps: u64,

    /// 有效圈数
    pub valid_laps: u64,

    /// 换胎次数
    pub tyre_changes: u64,

    /// 遥测样本数
    pub telemetry_samples: u64,

    /// 有效圈圈时统计 (秒)
    pub lap_time_stats: RunningStats,

    /// 最快有效圈 (毫秒)
    pub best_lap_ms: Option<u32>,
}

impl CaptureStatsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_datagram(&mut self) {
        self.datagrams += 1;
    }

    pub fn record_decode_error(&mut self, field: &'static str) {
        self.decode_errors += 1;
        *self.decode_errors_by_field.entry(field).or_insert(0) += 1;
    }

    /// 更新聚合统计
    pub fn update(&mut self, event: &RaceEvent) {
        match event {
            RaceEvent::SessionStarted(_) => {}
            RaceEvent::TyreChanged { .. } => self.tyre_changes += 1,
            RaceEvent::LapCompleted(lap) => {
                self.laps += 1;
                if lap.is_valid {
                    self.valid_laps += 1;
                    self.lap_time_stats.push(f64::from(lap.lap_time_ms) / 1000.0);
                    self.best_lap_ms = Some(
                        self.best_lap_ms
                            .map_or(lap.lap_time_ms, |best| best.min(lap.lap_time_ms)),
                    );
                }
            }
            RaceEvent::TelemetrySampled { .. } => self.telemetry_samples += 1,
        }
    }

    /// 生成摘要报告
    pub fn summary(&self) -> CaptureSummary {
        CaptureSummary {
            datagrams: self.datagrams,
            decode_errors: self.decode_errors,
            decode_error_rate: if self.datagrams > 0 {
                self.decode_errors as f64 / self.datagrams as f64 * 100.0
            } else {
                0.0
            },
            laps: self.laps,
            valid_laps: self.valid_laps,
            tyre_changes: self.tyre_changes,
            telemetry_samples: self.telemetry_samples,
            lap_time_s: StatsSummary::from(&self.lap_time_stats),
            best_lap_ms: self.best_lap_ms,
            decode_errors_by_field: self.decode_errors_by_field.clone(),
        }
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct CaptureSummary {
    pub datagrams: u64,
    pub decode_errors: u64,
    pub decode_error_rate: f64,
    pub laps: u64,
    pub valid_laps: u64,
    pub tyre_changes: u64,
    pub telemetry_samples: u64,
    pub lap_time_s: StatsSummary,
    pub best_lap_ms: Option<u32>,
    pub decode_errors_by_field: BTreeMap<&'static str, u64>,
}

/// `m:ss.mmm`
fn format_lap_ms(ms: u32) -> String {
    format!("{}:{:02}.{:03}", ms / 60_000, (ms % 60_000) / 1000, ms % 1000)
}

impl std::fmt::Display for CaptureSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Capture Summary ===")?;
        writeln!(f, "Datagrams received: {}", self.datagrams)?;
        writeln!(
            f,
            "Decode errors: {} ({:.2}%)",
            self.decode_errors, self.decode_error_rate
        )?;
        writeln!(f, "Laps captured: {} ({} valid)", self.laps, self.valid_laps)?;
        writeln!(f, "Tyre changes: {}", self.tyre_changes)?;
        writeln!(f, "Telemetry samples: {}", self.telemetry_samples)?;
        writeln!(f, "Valid lap time (s): {}", self.lap_time_s)?;
        if let Some(best) = self.best_lap_ms {
            writeln!(f, "Best lap: {}", format_lap_ms(best))?;
        }

        if !self.decode_errors_by_field.is_empty() {
            writeln!(f, "Decode errors by field:")?;
            for (field, count) in &self.decode_errors_by_field {
                writeln!(f, "  {}: {}", field, count)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
