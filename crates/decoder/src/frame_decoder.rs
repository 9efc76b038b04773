//! FrameDecoder trait - 线格式解码抽象
//!
//! 每种线格式一个实现，启动时通过 [`decoder_for`] 选定一次。

use contracts::{
    CarStatusFrame, DecodedFrame, LapFrame, PacketHeader, PacketType, TelemetryFrame, WireFormat,
};
use tracing::trace;

use crate::error::Result;
use crate::legacy::LegacyFormatDecoder;
use crate::newer::NewerFormatDecoder;

/// 线格式解码器
///
/// 无状态；所有方法只读取传入的缓冲区。
pub trait FrameDecoder: Send + Sync {
    /// 对应的线格式
    fn format(&self) -> WireFormat;

    /// 声明的头部长度 (字节)
    fn header_len(&self) -> usize;

    /// 解析包头并分类
    ///
    /// # Errors
    /// 缓冲区短于 [`header_len`](Self::header_len) 时返回 `MalformedHeader`
    fn decode_header(&self, buf: &[u8]) -> Result<PacketHeader>;

    /// 解析圈时帧
    fn decode_lap_frame(&self, buf: &[u8]) -> Result<LapFrame>;

    /// 解析遥测帧
    fn decode_telemetry_frame(&self, buf: &[u8]) -> Result<TelemetryFrame>;

    /// 解析车辆状态帧
    fn decode_car_status_frame(&self, buf: &[u8]) -> Result<CarStatusFrame>;

    /// 解析包头并分派到对应的帧解析
    ///
    /// 旧格式的合并帧依次产出圈时、车辆状态、遥测三帧；不支持的包不产出帧。
    fn decode(&self, buf: &[u8]) -> Result<Vec<DecodedFrame>> {
        let header = self.decode_header(buf)?;

        let frames = match header.packet_type {
            PacketType::LapData => vec![DecodedFrame::Lap(self.decode_lap_frame(buf)?)],
            PacketType::CarTelemetry => {
                vec![DecodedFrame::Telemetry(self.decode_telemetry_frame(buf)?)]
            }
            PacketType::CarStatus => {
                vec![DecodedFrame::CarStatus(self.decode_car_status_frame(buf)?)]
            }
            PacketType::Combined => vec![
                DecodedFrame::Lap(self.decode_lap_frame(buf)?),
                DecodedFrame::CarStatus(self.decode_car_status_frame(buf)?),
                DecodedFrame::Telemetry(self.decode_telemetry_frame(buf)?),
            ],
            PacketType::Unsupported => {
                trace!(
                    format = %header.format,
                    discriminator = ?header.discriminator,
                    len = buf.len(),
                    "ignoring unsupported packet"
                );
                Vec::new()
            }
        };

        Ok(frames)
    }
}

/// Select the decoder for a wire format
pub fn decoder_for(format: WireFormat) -> Box<dyn FrameDecoder> {
    match format {
        WireFormat::Newer => Box::new(NewerFormatDecoder),
        WireFormat::Legacy => Box::new(LegacyFormatDecoder),
    }
}
