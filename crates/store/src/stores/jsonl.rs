//! JsonlStore - appends one JSON object per line to three files

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use contracts::{
    ContractError, LapId, LapRecord, RaceStore, SessionId, SessionState, TelemetrySample,
};
use serde::Serialize;
use tracing::{debug, error, instrument};

pub const SESSIONS_FILE: &str = "sessions.jsonl";
pub const LAPS_FILE: &str = "laps.jsonl";
pub const TELEMETRY_FILE: &str = "telemetry.jsonl";

/// Configuration for JsonlStore
#[derive(Debug, Clone)]
pub struct JsonlStoreConfig {
    /// Output directory
    pub base_path: PathBuf,
}

impl JsonlStoreConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./capture"));

        Self { base_path }
    }
}

#[derive(Serialize)]
struct SessionRow<'a> {
    session_id: SessionId,
    #[serde(flatten)]
    session: &'a SessionState,
}

#[derive(Serialize)]
struct LapRow<'a> {
    lap_id: LapId,
    session_id: SessionId,
    #[serde(flatten)]
    lap: &'a LapRecord,
    lap_time: String,
}

/// Append-only writer plus the next id for its table
struct Table {
    writer: BufWriter<File>,
    next_id: u64,
}

impl Table {
    fn open(path: &Path) -> std::io::Result<Self> {
        // Continue numbering after rows left by earlier runs
        let existing = match File::open(path) {
            Ok(file) => BufReader::new(file).lines().count() as u64,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e),
        };
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            next_id: existing + 1,
        })
    }

    fn append<T: Serialize>(&mut self, row: &T) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, row)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.writer.write_all(b"\n")
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Store that writes `sessions.jsonl`, `laps.jsonl` and `telemetry.jsonl`
pub struct JsonlStore {
    name: String,
    config: JsonlStoreConfig,
    sessions: Table,
    laps: Table,
    telemetry: Table,
}

impl JsonlStore {
    /// Create a new JsonlStore, creating the base directory if needed
    pub fn new(name: impl Into<String>, config: JsonlStoreConfig) -> std::io::Result<Self> {
        fs::create_dir_all(&config.base_path)?;

        Ok(Self {
            name: name.into(),
            sessions: Table::open(&config.base_path.join(SESSIONS_FILE))?,
            laps: Table::open(&config.base_path.join(LAPS_FILE))?,
            telemetry: Table::open(&config.base_path.join(TELEMETRY_FILE))?,
            config,
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        Self::new(name, JsonlStoreConfig::from_params(params))
    }

    pub fn base_path(&self) -> &Path {
        &self.config.base_path
    }

    fn write_failed(&self, what: &str, e: std::io::Error) -> ContractError {
        error!(store = %self.name, table = what, error = %e, "Write failed");
        ContractError::persistence(&self.name, format!("{what}: {e}"))
    }
}

impl RaceStore for JsonlStore {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "jsonl_store_session", skip(self, session), fields(store = %self.name))]
    fn create_session(&mut self, session: &SessionState) -> Result<SessionId, ContractError> {
        let session_id = SessionId(self.sessions.take_id());
        let row = SessionRow {
            session_id,
            session,
        };
        self.sessions
            .append(&row)
            .and_then(|()| self.sessions.writer.flush())
            .map_err(|e| self.write_failed(SESSIONS_FILE, e))?;
        Ok(session_id)
    }

    #[instrument(name = "jsonl_store_lap", skip(self, lap), fields(store = %self.name, lap = lap.lap_number))]
    fn insert_lap(
        &mut self,
        session_id: SessionId,
        lap: &LapRecord,
    ) -> Result<LapId, ContractError> {
        let lap_id = LapId(self.laps.take_id());
        let row = LapRow {
            lap_id,
            session_id,
            lap,
            lap_time: lap.formatted_time(),
        };
        self.laps
            .append(&row)
            .and_then(|()| self.laps.writer.flush())
            .map_err(|e| self.write_failed(LAPS_FILE, e))?;
        Ok(lap_id)
    }

    fn insert_telemetry(&mut self, sample: &TelemetrySample) -> Result<(), ContractError> {
        self.telemetry
            .append(sample)
            .map_err(|e| self.write_failed(TELEMETRY_FILE, e))
    }

    #[instrument(name = "jsonl_store_flush", skip(self))]
    fn flush(&mut self) -> Result<(), ContractError> {
        for (what, table) in [
            (SESSIONS_FILE, &mut self.sessions),
            (LAPS_FILE, &mut self.laps),
            (TELEMETRY_FILE, &mut self.telemetry),
        ] {
            table.writer.flush().map_err(|e| {
                error!(store = %self.name, table = what, error = %e, "Flush failed");
                ContractError::persistence(&self.name, format!("{what}: {e}"))
            })?;
        }
        debug!(store = %self.name, "JsonlStore flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::TyreCompound;
    use tempfile::tempdir;

    fn session() -> SessionState {
        SessionState {
            track: "Spa".into(),
            session_type: "Race".into(),
            weather: "Rain".into(),
            date: NaiveDate::from_ymd_opt(2024, 7, 28).unwrap(),
        }
    }

    fn lap(n: u32) -> LapRecord {
        LapRecord {
            lap_number: n,
            lap_time_ms: 106_512,
            tyre_compound: TyreCompound::Intermediate,
            tyre_age: n,
            fuel_load: 70.5,
            is_valid: true,
        }
    }

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_jsonl_store_writes_rows() {
        let dir = tempdir().unwrap();
        let config = JsonlStoreConfig {
            base_path: dir.path().to_path_buf(),
        };
        let mut store = JsonlStore::new("test_jsonl", config).unwrap();

        let session_id = store.create_session(&session()).unwrap();
        let lap_id = store.insert_lap(session_id, &lap(1)).unwrap();
        store
            .insert_telemetry(&TelemetrySample {
                lap_id,
                speed: Some(301),
                throttle: None,
                brake: Some(0.0),
                gear: Some(8),
                rpm: Some(11_800),
                drs: Some(true),
            })
            .unwrap();
        store.flush().unwrap();

        let sessions = read_lines(&dir.path().join(SESSIONS_FILE));
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0]["session_id"], 1);
        assert_eq!(sessions[0]["track"], "Spa");
        assert_eq!(sessions[0]["date"], "2024-07-28");

        let laps = read_lines(&dir.path().join(LAPS_FILE));
        assert_eq!(laps[0]["lap_id"], 1);
        assert_eq!(laps[0]["session_id"], 1);
        assert_eq!(laps[0]["lap_time_ms"], 106_512);
        assert_eq!(laps[0]["lap_time"], "1:46.512");
        assert_eq!(laps[0]["tyre_compound"], "Intermediate");

        let telemetry = read_lines(&dir.path().join(TELEMETRY_FILE));
        assert_eq!(telemetry[0]["lap_id"], 1);
        assert!(telemetry[0]["throttle"].is_null());
    }

    #[test]
    fn test_jsonl_store_continues_ids() {
        let dir = tempdir().unwrap();
        let params = HashMap::from([(
            "base_path".to_string(),
            dir.path().to_string_lossy().into_owned(),
        )]);

        {
            let mut store = JsonlStore::from_params("first", &params).unwrap();
            let session_id = store.create_session(&session()).unwrap();
            store.insert_lap(session_id, &lap(1)).unwrap();
            store.insert_lap(session_id, &lap(2)).unwrap();
            store.flush().unwrap();
        }

        let mut store = JsonlStore::from_params("second", &params).unwrap();
        let session_id = store.create_session(&session()).unwrap();
        assert_eq!(session_id, SessionId(2));
        assert_eq!(store.insert_lap(session_id, &lap(1)).unwrap(), LapId(3));
    }

    #[test]
    fn test_default_base_path() {
        let config = JsonlStoreConfig::from_params(&HashMap::new());
        assert_eq!(config.base_path, PathBuf::from("./capture"));
    }
}
