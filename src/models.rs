use crate::errors::RecordError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, str::FromStr};

/// Map difficulty, ordinal 1 (Very Easy) through 7 (Death).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TierId {
    VeryEasy = 1,
    Easy = 2,
    Medium = 3,
    Hard = 4,
    VeryHard = 5,
    Extreme = 6,
    Death = 7,
}

impl TierId {
    pub const ALL: [TierId; 7] = [
        TierId::VeryEasy,
        TierId::Easy,
        TierId::Medium,
        TierId::Hard,
        TierId::VeryHard,
        TierId::Extreme,
        TierId::Death,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            TierId::VeryEasy => "Very Easy",
            TierId::Easy => "Easy",
            TierId::Medium => "Medium",
            TierId::Hard => "Hard",
            TierId::VeryHard => "Very Hard",
            TierId::Extreme => "Extreme",
            TierId::Death => "Death",
        }
    }
}

impl TryFrom<u8> for TierId {
    type Error = RecordError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        TierId::ALL
            .get(usize::from(value).wrapping_sub(1))
            .copied()
            .ok_or(RecordError::InvalidTier(value))
    }
}

impl From<TierId> for u8 {
    fn from(tier: TierId) -> Self {
        tier.number()
    }
}

/// Scoring track: `pro` runs use no teleports, `tp` runs use at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RunType {
    #[default]
    Pro,
    Tp,
}

impl RunType {
    pub fn of(teleports: u32) -> Self {
        if teleports == 0 { RunType::Pro } else { RunType::Tp }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunType::Pro => "pro",
            RunType::Tp => "tp",
        }
    }
}

impl TryFrom<String> for RunType {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunType {
    type Err = RecordError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pro" => Ok(RunType::Pro),
            "tp" => Ok(RunType::Tp),
            other => Err(RecordError::UnknownRunType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mapper {
    pub name: String,
    pub id: String,
}

fn pair_mappers(
    map: &str,
    names: Vec<String>,
    ids: Vec<String>,
) -> Result<Vec<Mapper>, RecordError> {
    if names.len() != ids.len() {
        return Err(RecordError::MapperMismatch {
            map: map.to_string(),
            names: names.len(),
            ids: ids.len(),
        });
    }

    Ok(names
        .into_iter()
        .zip(ids)
        .map(|(name, id)| Mapper { name, id })
        .collect())
}

fn split_mappers(mappers: Vec<Mapper>) -> (Vec<String>, Vec<String>) {
    mappers.into_iter().map(|m| (m.name, m.id)).unzip()
}

/// Personal best as served by the stats API, mapper credits as parallel arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinishWire {
    pub map_id: u32,
    pub map_name: String,
    #[serde(rename = "mapperNames", default)]
    pub mapper_names: Vec<String>,
    #[serde(rename = "mapperIds", default)]
    pub mapper_ids: Vec<String>,
    pub difficulty: TierId,
    pub points: u32,
    pub time: f64,
    #[serde(default)]
    pub teleports: u32,
    #[serde(default)]
    pub server_name: String,
    #[serde(default)]
    pub server_id: u32,
    pub created_on: NaiveDateTime,
}

/// One personal-best completion of a map by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FinishWire", into = "FinishWire")]
pub struct FinishRecord {
    pub map_id: u32,
    pub map_name: String,
    pub mappers: Vec<Mapper>,
    pub difficulty: TierId,
    pub points: u32,
    pub time: f64,
    pub teleports: u32,
    pub server_name: String,
    pub server_id: u32,
    pub created_on: NaiveDateTime,
}

impl FinishRecord {
    pub fn run_type(&self) -> RunType {
        RunType::of(self.teleports)
    }
}

impl TryFrom<FinishWire> for FinishRecord {
    type Error = RecordError;

    fn try_from(wire: FinishWire) -> Result<Self, Self::Error> {
        let mappers = pair_mappers(&wire.map_name, wire.mapper_names, wire.mapper_ids)?;
        Ok(Self {
            map_id: wire.map_id,
            map_name: wire.map_name,
            mappers,
            difficulty: wire.difficulty,
            points: wire.points,
            time: wire.time,
            teleports: wire.teleports,
            server_name: wire.server_name,
            server_id: wire.server_id,
            created_on: wire.created_on,
        })
    }
}

impl From<FinishRecord> for FinishWire {
    fn from(record: FinishRecord) -> Self {
        let (mapper_names, mapper_ids) = split_mappers(record.mappers);
        Self {
            map_id: record.map_id,
            map_name: record.map_name,
            mapper_names,
            mapper_ids,
            difficulty: record.difficulty,
            points: record.points,
            time: record.time,
            teleports: record.teleports,
            server_name: record.server_name,
            server_id: record.server_id,
            created_on: record.created_on,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapWire {
    pub id: u32,
    pub name: String,
    pub difficulty: TierId,
    #[serde(rename = "mapperNames", default)]
    pub mapper_names: Vec<String>,
    #[serde(rename = "mapperIds", default)]
    pub mapper_ids: Vec<String>,
}

/// Catalog entry for a ranked map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MapWire", into = "MapWire")]
pub struct MapInfo {
    pub id: u32,
    pub name: String,
    pub difficulty: TierId,
    pub mappers: Vec<Mapper>,
}

impl TryFrom<MapWire> for MapInfo {
    type Error = RecordError;

    fn try_from(wire: MapWire) -> Result<Self, Self::Error> {
        let mappers = pair_mappers(&wire.name, wire.mapper_names, wire.mapper_ids)?;
        Ok(Self {
            id: wire.id,
            name: wire.name,
            difficulty: wire.difficulty,
            mappers,
        })
    }
}

impl From<MapInfo> for MapWire {
    fn from(map: MapInfo) -> Self {
        let (mapper_names, mapper_ids) = split_mappers(map.mappers);
        Self {
            id: map.id,
            name: map.name,
            difficulty: map.difficulty,
            mapper_names,
            mapper_ids,
        }
    }
}

/// A catalog map the player has no finish on for the active run type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfinishRecord {
    pub map_id: u32,
    pub map_name: String,
    pub mappers: Vec<Mapper>,
    pub difficulty: TierId,
}

impl From<&MapInfo> for UnfinishRecord {
    fn from(map: &MapInfo) -> Self {
        Self {
            map_id: map.id,
            map_name: map.name.clone(),
            mappers: map.mappers.clone(),
            difficulty: map.difficulty,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steam_id: String,
}

/// Cached API results for one player: the map catalog plus every PB.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    #[serde(default)]
    pub player: PlayerInfo,
    #[serde(default)]
    pub maps: Vec<MapInfo>,
    #[serde(default)]
    pub finishes: Vec<FinishRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct RunRecords {
    pub finishes: Vec<FinishRecord>,
    pub unfinishes: Vec<UnfinishRecord>,
}

impl PlayerSnapshot {
    /// Splits the snapshot into the finishes of one run type and the catalog
    /// maps left without a finish on that run type.
    pub fn records_for(&self, run_type: RunType) -> RunRecords {
        let finishes: Vec<FinishRecord> = self
            .finishes
            .iter()
            .filter(|record| record.run_type() == run_type)
            .cloned()
            .collect();

        let finished: HashSet<u32> = finishes.iter().map(|record| record.map_id).collect();
        let unfinishes = self
            .maps
            .iter()
            .filter(|map| !finished.contains(&map.id))
            .map(UnfinishRecord::from)
            .collect();

        RunRecords {
            finishes,
            unfinishes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RunTypeQuery {
    pub run_type: Option<RunType>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub player: PlayerInfo,
    pub maps: usize,
    pub finishes: usize,
    pub pro_finishes: usize,
    pub tp_finishes: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Totals {
    pub finishes: usize,
    pub maps: usize,
    pub completion: f64,
    pub points: u64,
    pub average_points: Option<f64>,
    pub playtime_seconds: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TierPoint {
    pub tier: TierId,
    pub label: String,
    pub finishes: usize,
    pub maps: usize,
    pub completion: f64,
    pub points: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountPoint {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapperPoint {
    pub mapper: String,
    pub finishes: usize,
    pub maps: usize,
    pub completion: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub created_on: NaiveDateTime,
    pub map_name: String,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlaytimePoint {
    pub key: String,
    pub seconds: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FinishPoint {
    pub map_name: String,
    pub tier: TierId,
    pub points: u32,
    pub time: f64,
    pub created_on: NaiveDateTime,
}

impl From<&FinishRecord> for FinishPoint {
    fn from(record: &FinishRecord) -> Self {
        Self {
            map_name: record.map_name.clone(),
            tier: record.difficulty,
            points: record.points,
            time: record.time,
            created_on: record.created_on,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BreakPoint {
    pub from: FinishPoint,
    pub to: FinishPoint,
    pub seconds: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Highlights {
    pub most_finished_tier: TierPoint,
    pub busiest_day: CountPoint,
    pub busiest_month: CountPoint,
    pub busiest_quarter: CountPoint,
    pub longest_day: PlaytimePoint,
    pub favorite_server: CountPoint,
    pub most_completed_mapper: Option<MapperPoint>,
    pub least_completed_mapper: Option<MapperPoint>,
    pub longest_break: Option<BreakPoint>,
    pub shortest_break: Option<BreakPoint>,
    pub first_finish: FinishPoint,
    pub latest_finish: FinishPoint,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub player: PlayerInfo,
    pub run_type: RunType,
    pub message: Option<String>,
    pub totals: Totals,
    pub tiers: Vec<TierPoint>,
    pub years: Vec<CountPoint>,
    pub top_mappers: Vec<MapperPoint>,
    pub top_servers: Vec<CountPoint>,
    pub points_progression: Vec<SeriesPoint>,
    pub average_points: Vec<SeriesPoint>,
    pub highlights: Option<Highlights>,
}
