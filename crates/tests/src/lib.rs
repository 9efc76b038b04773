//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 合成数据报 e2e 测试（无需模拟器）

#[cfg(test)]
mod contract_tests {
    use contracts::{PacketType, TyreCompound, WireFormat};

    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_wire_contract_snapshot() {
        assert_eq!("f1_2018".parse::<WireFormat>().unwrap(), WireFormat::Newer);
        assert_eq!("f1_2017".parse::<WireFormat>().unwrap(), WireFormat::Legacy);
        assert_eq!(PacketType::from_discriminator(2), PacketType::LapData);
        assert_eq!(PacketType::from_discriminator(6), PacketType::CarTelemetry);
        assert_eq!(PacketType::from_discriminator(7), PacketType::CarStatus);
        assert_eq!(PacketType::from_discriminator(0), PacketType::Unsupported);
        assert_eq!(TyreCompound::from_id(4), TyreCompound::Medium);
    }
}

#[cfg(test)]
mod e2e_tests {
    use bytes::Bytes;
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ContractError, RaceStore, TrackerConfig, TyreCompound, WireFormat};
    use decoder::synth::{LegacyFrameBuilder, NewerPacketBuilder};
    use decoder::{decoder_for, FrameDecoder};
    use observability::CaptureStatsAggregator;
    use race_state::RaceStateTracker;
    use store::{EventRecorder, JsonlStore, JsonlStoreConfig, MemoryStore};

    /// Decoder -> RaceStateTracker -> EventRecorder, the receive loop without the socket
    struct Harness<S: RaceStore> {
        decoder: Box<dyn FrameDecoder>,
        tracker: RaceStateTracker,
        recorder: EventRecorder<S>,
        stats: CaptureStatsAggregator,
    }

    impl<S: RaceStore> Harness<S> {
        fn new(config: TrackerConfig, store: S) -> Self {
            Self {
                decoder: decoder_for(config.format),
                tracker: RaceStateTracker::new(config),
                recorder: EventRecorder::new(store),
                stats: CaptureStatsAggregator::new(),
            }
        }

        fn feed(&mut self, datagrams: &[Bytes]) -> Result<(), ContractError> {
            for datagram in datagrams {
                self.stats.record_datagram();
                let frames = match self.decoder.decode(datagram) {
                    Ok(frames) => frames,
                    Err(e) => {
                        self.stats.record_decode_error(e.field());
                        continue;
                    }
                };
                for frame in frames {
                    for event in self.tracker.observe(frame) {
                        self.recorder.record(&event)?;
                        self.stats.update(&event);
                    }
                }
            }
            Ok(())
        }

        fn finish(mut self) -> Result<(S, CaptureStatsAggregator), ContractError> {
            for event in self.tracker.finish() {
                self.recorder.record(&event)?;
                self.stats.update(&event);
            }
            self.recorder.flush()?;
            Ok((self.recorder.into_store(), self.stats))
        }
    }

    fn newer_config(sample_period: u64) -> TrackerConfig {
        let mut config = TrackerConfig::new(WireFormat::Newer);
        config.sample_period = sample_period;
        config
    }

    /// End-to-end test: newer-format datagrams -> three laps with status snapshots
    ///
    /// 验证完整的数据流：
    /// 1. 合成数据报经解码器拆分为帧
    /// 2. Tracker 推断圈边界并在下一个状态帧封存
    /// 3. Store 持久化会话、圈与采样遥测
    #[test]
    fn test_e2e_newer_race() {
        let mut harness = Harness::new(newer_config(3), MemoryStore::new("mem"));

        let mut datagrams = vec![NewerPacketBuilder::car_status(3, 100.0)];
        for (lap, lap_time) in [(1u32, 92.1f32), (2, 92.4), (3, 93.0)] {
            for i in 0..6u16 {
                datagrams.push(NewerPacketBuilder::car_telemetry(
                    200 + i,
                    0.9,
                    0.0,
                    6,
                    10_500,
                    false,
                ));
            }
            datagrams.push(NewerPacketBuilder::lap_data(lap_time, 0.4, false));
            datagrams.push(NewerPacketBuilder::car_status(3, 100.0 - 2.5 * lap as f32));
        }
        harness.feed(&datagrams).unwrap();
        let (store, stats) = harness.finish().unwrap();

        assert_eq!(store.sessions.len(), 1);
        let laps = store.lap_records();
        assert_eq!(laps.len(), 3);
        assert_eq!(
            laps.iter().map(|l| l.lap_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(laps[0].lap_time_ms, 92_100);
        assert_eq!(laps[1].fuel_load, 95.0);
        assert_eq!(
            laps.iter().map(|l| l.tyre_age).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(laps.iter().all(|l| l.is_valid));

        // 18 telemetry frames, every 3rd forwarded, but only once a lap exists
        assert_eq!(store.telemetry.len(), 4);
        assert_eq!(stats.laps, 3);
        assert_eq!(stats.best_lap_ms, Some(92_100));
        assert_eq!(stats.decode_errors, 0);
    }

    #[test]
    fn test_e2e_invalid_flag_and_bounds() {
        let mut harness = Harness::new(newer_config(40), MemoryStore::new("mem"));
        harness
            .feed(&[
                NewerPacketBuilder::lap_data(25.0, 0.1, false),
                NewerPacketBuilder::car_status(3, 90.0),
                NewerPacketBuilder::lap_data(88.0, 0.1, true),
                NewerPacketBuilder::car_status(3, 88.0),
                NewerPacketBuilder::lap_data(89.0, 0.1, false),
                NewerPacketBuilder::car_status(3, 86.0),
            ])
            .unwrap();
        let (store, stats) = harness.finish().unwrap();

        let validity: Vec<_> = store.lap_records().iter().map(|l| l.is_valid).collect();
        assert_eq!(validity, vec![false, false, true]);
        assert_eq!(stats.valid_laps, 1);
    }

    #[test]
    fn test_e2e_tyre_change_resets_age() {
        let mut harness = Harness::new(newer_config(40), MemoryStore::new("mem"));
        harness
            .feed(&[
                NewerPacketBuilder::car_status(3, 100.0),
                NewerPacketBuilder::lap_data(90.0, 0.1, false),
                NewerPacketBuilder::car_status(3, 98.0),
                NewerPacketBuilder::lap_data(91.0, 0.1, false),
                // pit stop: mediums fitted before the boundary is sealed
                NewerPacketBuilder::car_status(4, 96.0),
                NewerPacketBuilder::lap_data(95.0, 0.1, false),
                NewerPacketBuilder::car_status(4, 94.0),
            ])
            .unwrap();
        let (store, stats) = harness.finish().unwrap();

        let laps = store.lap_records();
        assert_eq!(
            laps.iter()
                .map(|l| (l.tyre_compound, l.tyre_age))
                .collect::<Vec<_>>(),
            vec![
                (TyreCompound::Soft, 1),
                (TyreCompound::Medium, 1),
                (TyreCompound::Medium, 2),
            ]
        );
        assert_eq!(stats.tyre_changes, 1);
    }

    #[test]
    fn test_e2e_legacy_race() {
        let config = TrackerConfig::new(WireFormat::Legacy);
        let mut harness = Harness::new(config, MemoryStore::new("mem"));

        let frame = |t: f32, fuel: f32| {
            LegacyFrameBuilder::new()
                .lap_time(t)
                .speed_mps(80.0)
                .throttle(1.0)
                .gear(7.0)
                .rpm(11_000.0)
                .fuel(fuel)
                .compound(3)
                .build()
        };

        let mut datagrams = Vec::new();
        for (lap, peak) in [(0u32, 84.0f32), (1, 83.5)] {
            let mut t = 0.0;
            while t < peak {
                datagrams.push(frame(t, 60.0 - lap as f32));
                t += 1.0;
            }
            datagrams.push(frame(peak, 60.0 - lap as f32));
        }
        datagrams.push(frame(0.05, 58.0));
        harness.feed(&datagrams).unwrap();
        let (store, stats) = harness.finish().unwrap();

        let laps = store.lap_records();
        assert_eq!(laps.len(), 2);
        assert_eq!(laps[0].lap_time_ms, 84_000);
        assert_eq!(laps[1].lap_time_ms, 83_500);
        assert_eq!(laps[1].fuel_load, 58.0);
        assert_eq!(stats.tyre_changes, 0);

        // legacy speed arrives in m/s
        assert!(store.telemetry.iter().all(|s| s.speed == Some(288)));
        assert!(!store.telemetry.is_empty());
    }

    #[test]
    fn test_e2e_malformed_datagrams_are_dropped() {
        let mut harness = Harness::new(newer_config(1), MemoryStore::new("mem"));
        harness
            .feed(&[
                Bytes::from_static(&[1, 2, 3]),
                NewerPacketBuilder::raw(2, 40),
                NewerPacketBuilder::raw(3, 200),
                NewerPacketBuilder::lap_data(90.0, 0.1, false),
                NewerPacketBuilder::car_status(3, 80.0),
            ])
            .unwrap();
        let (store, stats) = harness.finish().unwrap();

        assert_eq!(stats.datagrams, 5);
        assert_eq!(stats.decode_errors, 2);
        assert_eq!(store.lap_records().len(), 1);
    }

    #[test]
    fn test_e2e_store_failure_is_fatal() {
        let mut harness = Harness::new(newer_config(40), MemoryStore::new("mem").fail_after(2));
        let result = harness.feed(&[
            NewerPacketBuilder::lap_data(90.0, 0.1, false),
            NewerPacketBuilder::car_status(3, 80.0),
            NewerPacketBuilder::lap_data(91.0, 0.1, false),
            NewerPacketBuilder::car_status(3, 78.0),
        ]);

        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::Persistence { .. }));
    }

    #[test]
    fn test_e2e_config_to_jsonl_store() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!(
            r#"
[capture]
format = "f1_2018"

[session]
track = "Suzuka"
starting_compound = "medium"

[telemetry]
sample_period = 1

[store]
name = "files"
store_type = "file"
params = {{ base_path = "{}" }}
"#,
            dir.path().display()
        );
        let blueprint = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        let config = blueprint.to_tracker_config().unwrap();
        let jsonl =
            JsonlStore::new("files", JsonlStoreConfig::from_params(&blueprint.store.params))
                .unwrap();

        let mut harness = Harness::new(config, jsonl);
        harness
            .feed(&[
                NewerPacketBuilder::lap_data(95.25, 0.1, false),
                NewerPacketBuilder::car_status(4, 70.0),
                NewerPacketBuilder::car_telemetry(300, 1.0, 0.0, 8, 12_000, true),
            ])
            .unwrap();
        harness.finish().unwrap();

        let laps = std::fs::read_to_string(dir.path().join(store::stores::jsonl::LAPS_FILE))
            .unwrap();
        let row: serde_json::Value = serde_json::from_str(laps.lines().next().unwrap()).unwrap();
        assert_eq!(row["lap_time_ms"], 95_250);
        assert_eq!(row["lap_time"], "1:35.250");
        assert_eq!(row["tyre_age"], 1);

        let sessions =
            std::fs::read_to_string(dir.path().join(store::stores::jsonl::SESSIONS_FILE))
                .unwrap();
        assert!(sessions.contains("Suzuka"));

        let telemetry =
            std::fs::read_to_string(dir.path().join(store::stores::jsonl::TELEMETRY_FILE))
                .unwrap();
        assert_eq!(telemetry.lines().count(), 1);
    }

    #[test]
    fn test_e2e_unknown_format_is_config_error() {
        let toml = r#"
[capture]
format = "f1_2030"

[store]
name = "log"
store_type = "log"
"#;
        let err = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }
}
