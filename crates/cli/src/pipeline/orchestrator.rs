//! Capture orchestrator - UDP receive loop feeding decoder, tracker and store.

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bytes::Bytes;
use contracts::{CaptureBlueprint, ContractError, RaceStore, TrackerConfig, MAX_DATAGRAM_BYTES};
use decoder::{decoder_for, FrameDecoder};
use observability::{record_datagram_received, record_decode_error, record_race_event};
use race_state::RaceStateTracker;
use store::EventRecorder;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use super::CaptureStats;

/// Log a progress line every this many datagrams
const PROGRESS_EVERY: u64 = 500;

/// Capture configuration
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    /// Validated configuration
    pub blueprint: CaptureBlueprint,

    /// Stop after this many datagrams (None = unlimited)
    pub max_datagrams: Option<u64>,

    /// Stop after this long (None = no timeout)
    pub timeout: Option<Duration>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// One datagram's worth of work: decode, reduce, persist
///
/// Synchronous and single-owner; a store failure is returned and ends the run.
pub struct CaptureStep<S: RaceStore> {
    decoder: Box<dyn FrameDecoder>,
    tracker: RaceStateTracker,
    recorder: EventRecorder<S>,
    stats: CaptureStats,
}

impl<S: RaceStore> CaptureStep<S> {
    pub fn new(config: TrackerConfig, store: S) -> Self {
        Self {
            decoder: decoder_for(config.format),
            tracker: RaceStateTracker::new(config),
            recorder: EventRecorder::new(store),
            stats: CaptureStats::default(),
        }
    }

    /// Process one datagram
    ///
    /// # Errors
    /// Only persistence failures; undecodable datagrams are counted and dropped.
    pub fn process(&mut self, datagram: &[u8]) -> Result<(), ContractError> {
        self.stats.datagrams += 1;
        self.stats.aggregate.record_datagram();
        record_datagram_received(datagram.len());

        if self.stats.datagrams % PROGRESS_EVERY == 0 {
            info!(
                datagrams = self.stats.datagrams,
                laps = self.tracker.laps_completed(),
                current_lap = self.tracker.current_lap(),
                "datagrams received"
            );
        }

        let frames = match self.decoder.decode(datagram) {
            Ok(frames) => frames,
            Err(e) => {
                debug!(
                    field = e.field(),
                    offset = e.offset(),
                    len = datagram.len(),
                    error = %e,
                    "dropping undecodable datagram"
                );
                self.stats.decode_errors += 1;
                self.stats.aggregate.record_decode_error(e.field());
                record_decode_error(e.field());
                return Ok(());
            }
        };

        for frame in frames {
            self.stats.frames_decoded += 1;
            let events = self.tracker.observe(frame);
            self.apply(events)?;
        }
        Ok(())
    }

    /// Seal the trailing lap and flush the store
    pub fn finish(mut self) -> Result<(CaptureStats, S), ContractError> {
        let events = self.tracker.finish();
        self.apply(events)?;
        self.recorder.flush()?;

        self.stats.laps = self.recorder.laps_written();
        self.stats.telemetry_samples = self.recorder.samples_written();
        Ok((self.stats, self.recorder.into_store()))
    }

    pub fn stats(&self) -> &CaptureStats {
        &self.stats
    }

    #[cfg(test)]
    pub fn tracker(&self) -> &RaceStateTracker {
        &self.tracker
    }

    fn apply(&mut self, events: Vec<contracts::RaceEvent>) -> Result<(), ContractError> {
        for event in events {
            self.recorder.record(&event)?;
            record_race_event(&event);
            self.stats.aggregate.update(&event);
        }
        Ok(())
    }
}

/// Capture run: binds the socket and drives the loop until stopped
pub struct Capture {
    settings: CaptureSettings,
}

impl Capture {
    pub fn new(settings: CaptureSettings) -> Self {
        Self { settings }
    }

    /// Run until the shutdown future resolves, a limit is reached, or the store fails
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<CaptureStats> {
        let blueprint = &self.settings.blueprint;

        // Initialize Metrics (optional)
        if let Some(port) = self.settings.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let tracker_config = blueprint
            .to_tracker_config()
            .context("Invalid tracker configuration")?;
        let store = store::create_store(&blueprint.store).context("Failed to create store")?;

        let addr = format!("{}:{}", blueprint.capture.bind_address, blueprint.capture.port);
        let socket = UdpSocket::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind UDP socket on {addr}"))?;

        info!(
            addr = %addr,
            format = %tracker_config.format,
            store = %blueprint.store.name,
            "Listening for telemetry"
        );

        let step = CaptureStep::new(tracker_config, store);
        run_loop(
            socket,
            step,
            shutdown,
            self.settings.max_datagrams,
            self.settings.timeout,
        )
        .await
    }
}

/// Receive loop shared by `Capture::run` and tests
async fn run_loop<S: RaceStore>(
    socket: UdpSocket,
    mut step: CaptureStep<S>,
    shutdown: impl Future<Output = ()>,
    max_datagrams: Option<u64>,
    timeout: Option<Duration>,
) -> Result<CaptureStats> {
    let start_time = Instant::now();
    let mut buf = vec![0u8; MAX_DATAGRAM_BYTES];

    let deadline = async {
        match timeout {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(shutdown);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                warn!("Received shutdown signal, stopping capture...");
                break;
            }
            _ = &mut deadline => {
                warn!(timeout_secs = timeout.map(|t| t.as_secs()), "Capture timed out");
                break;
            }
            received = socket.recv_from(&mut buf) => {
                let (len, peer) = received.context("UDP receive failed")?;
                let datagram = Bytes::copy_from_slice(&buf[..len]);
                debug!(peer = %peer, len, "datagram");

                step.process(&datagram).context("Persisting capture data failed")?;

                if max_datagrams.is_some_and(|max| step.stats().datagrams >= max) {
                    info!(datagrams = step.stats().datagrams, "Reached max datagrams limit");
                    break;
                }
            }
        }
    }

    info!("Shutting down capture...");
    let (mut stats, store) = step.finish().context("Final flush failed")?;
    stats.duration = start_time.elapsed();

    info!(
        store = %store.name(),
        duration_secs = stats.duration.as_secs_f64(),
        laps = stats.laps,
        "Capture shutdown complete"
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{StoreConfig, StoreType, TyreCompound, WireFormat};
    use decoder::synth::{LegacyFrameBuilder, NewerPacketBuilder};
    use std::collections::HashMap;
    use store::MemoryStore;

    fn newer_step(store: MemoryStore) -> CaptureStep<MemoryStore> {
        let mut config = TrackerConfig::new(WireFormat::Newer);
        config.sample_period = 2;
        CaptureStep::new(config, store)
    }

    #[test]
    fn test_step_persists_laps_and_samples() {
        let mut step = newer_step(MemoryStore::new("mem"));
        let packets = [
            NewerPacketBuilder::car_status(3, 100.0),
            NewerPacketBuilder::lap_data(82.45, 0.3, false),
            NewerPacketBuilder::car_status(3, 92.0),
            NewerPacketBuilder::car_telemetry(250, 1.0, 0.0, 7, 11_000, true),
            NewerPacketBuilder::car_telemetry(251, 1.0, 0.0, 7, 11_100, true),
        ];
        for packet in &packets {
            step.process(packet).unwrap();
        }

        let (stats, store) = step.finish().unwrap();
        assert_eq!(stats.datagrams, 5);
        assert_eq!(stats.laps, 1);
        assert_eq!(stats.telemetry_samples, 1);
        assert_eq!(store.sessions.len(), 1);

        let lap = store.lap_records()[0];
        assert_eq!(lap.lap_time_ms, 82_450);
        assert_eq!(lap.fuel_load, 92.0);
        assert_eq!(lap.tyre_compound, TyreCompound::Soft);
        assert_eq!(store.telemetry[0].speed, Some(251));
        assert_eq!(store.flush_count(), 1);
    }

    #[test]
    fn test_step_drops_undecodable_datagrams() {
        let mut step = newer_step(MemoryStore::new("mem"));
        step.process(&[0u8; 4]).unwrap();
        step.process(&NewerPacketBuilder::raw(2, 30)).unwrap();

        assert_eq!(step.stats().decode_errors, 2);
        assert_eq!(step.stats().aggregate.decode_errors_by_field.get("header"), Some(&1));
        assert_eq!(step.tracker().laps_completed(), 0);
    }

    #[test]
    fn test_store_failure_ends_step() {
        // session row succeeds, lap row fails
        let mut step = newer_step(MemoryStore::new("mem").fail_after(1));
        step.process(&NewerPacketBuilder::lap_data(80.0, 0.1, false))
            .unwrap();
        let err = step
            .process(&NewerPacketBuilder::car_status(3, 90.0))
            .unwrap_err();
        assert!(matches!(err, ContractError::Persistence { .. }));
    }

    #[test]
    fn test_finish_seals_trailing_lap() {
        let mut step = newer_step(MemoryStore::new("mem"));
        step.process(&NewerPacketBuilder::car_status(3, 80.0)).unwrap();
        step.process(&NewerPacketBuilder::lap_data(85.0, 0.2, false))
            .unwrap();
        assert_eq!(step.tracker().laps_completed(), 0);

        let (stats, store) = step.finish().unwrap();
        assert_eq!(stats.laps, 1);
        assert_eq!(store.lap_records()[0].fuel_load, 80.0);
    }

    #[test]
    fn test_legacy_datagram_seals_its_own_boundary() {
        let mut config = TrackerConfig::new(WireFormat::Legacy);
        config.sample_period = 1000;
        let mut step = CaptureStep::new(config, MemoryStore::new("mem"));
        for t in [5.0, 45.0, 71.5] {
            step.process(&LegacyFrameBuilder::new().lap_time(t).fuel(50.0).build())
                .unwrap();
        }
        step.process(&LegacyFrameBuilder::new().lap_time(0.1).fuel(49.2).build())
            .unwrap();
        assert_eq!(step.tracker().laps_completed(), 1);

        let (stats, store) = step.finish().unwrap();
        assert_eq!(stats.laps, 1);
        assert_eq!(store.lap_records()[0].lap_time_ms, 71_500);
        assert_eq!(store.lap_records()[0].fuel_load, 49.2);
    }

    #[tokio::test]
    async fn test_loop_over_loopback_udp() {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let packets = [
            NewerPacketBuilder::lap_data(90.5, 0.2, false),
            NewerPacketBuilder::car_status(4, 70.0),
            NewerPacketBuilder::raw(1, 100),
        ];
        for packet in &packets {
            sender.send_to(packet, addr).await.unwrap();
        }

        let step = newer_step(MemoryStore::new("mem"));
        let stats = run_loop(
            socket,
            step,
            std::future::pending::<()>(),
            Some(3),
            Some(Duration::from_secs(5)),
        )
        .await
        .unwrap();

        assert_eq!(stats.datagrams, 3);
        assert_eq!(stats.laps, 1);
        assert_eq!(stats.aggregate.tyre_changes, 1);
    }

    #[tokio::test]
    async fn test_run_rejects_unknown_format() {
        let mut blueprint = CaptureBlueprint::with_format(WireFormat::Newer);
        blueprint.capture.format = "f1_2030".into();
        blueprint.store = StoreConfig {
            name: "mem".into(),
            store_type: StoreType::Memory,
            params: HashMap::new(),
        };

        let result = Capture::new(CaptureSettings {
            blueprint,
            max_datagrams: None,
            timeout: None,
            metrics_port: None,
        })
        .run(std::future::ready(()))
        .await;
        assert!(result.is_err());
    }
}
