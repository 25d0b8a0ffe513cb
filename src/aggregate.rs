use crate::groups::OrderedMap;
use crate::models::{FinishRecord, RunType, TierId, UnfinishRecord};
use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// Records per tier, borrowed from the aggregated input.
pub type TierGroups<'a, T> = BTreeMap<TierId, Vec<&'a T>>;

/// Records per string bucket, in the order each bucket was first seen.
pub type Groups<'a, T> = OrderedMap<Vec<&'a T>>;

/// Grouped index over one player's records for a single run type.
///
/// Tier-keyed maps always hold all seven tiers. Every other map only holds
/// keys that occurred at least once, so an empty input leaves them empty,
/// and iterates them in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordsTopStatistics<'a> {
    pub run_type: RunType,
    pub finishes_per_tier: TierGroups<'a, FinishRecord>,
    pub unfinishes_per_tier: TierGroups<'a, UnfinishRecord>,
    pub maps_per_tier: BTreeMap<TierId, usize>,
    pub finishes_per_day: Groups<'a, FinishRecord>,
    pub finishes_per_month: Groups<'a, FinishRecord>,
    pub finishes_per_quarter: Groups<'a, FinishRecord>,
    pub finishes_per_year: Groups<'a, FinishRecord>,
    pub finishes_per_mapper: Groups<'a, FinishRecord>,
    pub unfinishes_per_mapper: Groups<'a, UnfinishRecord>,
    pub maps_per_mapper: OrderedMap<usize>,
    pub finishes_per_server: Groups<'a, FinishRecord>,
}

impl<'a> RecordsTopStatistics<'a> {
    pub fn finishes_in(&self, tier: TierId) -> &[&'a FinishRecord] {
        self.finishes_per_tier
            .get(&tier)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn unfinishes_in(&self, tier: TierId) -> &[&'a UnfinishRecord] {
        self.unfinishes_per_tier
            .get(&tier)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn maps_in(&self, tier: TierId) -> usize {
        self.maps_per_tier.get(&tier).copied().unwrap_or(0)
    }

    pub fn finishes_by(&self, mapper: &str) -> &[&'a FinishRecord] {
        self.finishes_per_mapper
            .get(mapper)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Groups finishes and unfinishes in one pass over each slice.
///
/// A record credited to N mappers lands in N mapper buckets. Server names
/// are taken as-is, so a renamed server shows up under each historical name.
pub fn aggregate<'a>(
    run_type: RunType,
    finishes: &'a [FinishRecord],
    unfinishes: &'a [UnfinishRecord],
) -> RecordsTopStatistics<'a> {
    let mut stats = RecordsTopStatistics {
        run_type,
        finishes_per_tier: TierId::ALL.iter().map(|tier| (*tier, Vec::new())).collect(),
        unfinishes_per_tier: TierId::ALL.iter().map(|tier| (*tier, Vec::new())).collect(),
        maps_per_tier: TierId::ALL.iter().map(|tier| (*tier, 0)).collect(),
        finishes_per_day: OrderedMap::new(),
        finishes_per_month: OrderedMap::new(),
        finishes_per_quarter: OrderedMap::new(),
        finishes_per_year: OrderedMap::new(),
        finishes_per_mapper: OrderedMap::new(),
        unfinishes_per_mapper: OrderedMap::new(),
        maps_per_mapper: OrderedMap::new(),
        finishes_per_server: OrderedMap::new(),
    };

    for record in finishes {
        stats
            .finishes_per_tier
            .entry(record.difficulty)
            .or_default()
            .push(record);
        *stats.maps_per_tier.entry(record.difficulty).or_default() += 1;

        let at = &record.created_on;
        push(&mut stats.finishes_per_day, &day_key(at), record);
        push(&mut stats.finishes_per_month, &month_key(at), record);
        push(&mut stats.finishes_per_quarter, &quarter_key(at), record);
        push(&mut stats.finishes_per_year, &year_key(at), record);

        for mapper in &record.mappers {
            push(&mut stats.finishes_per_mapper, &mapper.name, record);
            *stats.maps_per_mapper.entry_or_default(&mapper.name) += 1;
        }

        push(&mut stats.finishes_per_server, &record.server_name, record);
    }

    for record in unfinishes {
        stats
            .unfinishes_per_tier
            .entry(record.difficulty)
            .or_default()
            .push(record);
        *stats.maps_per_tier.entry(record.difficulty).or_default() += 1;

        for mapper in &record.mappers {
            push(&mut stats.unfinishes_per_mapper, &mapper.name, record);
            *stats.maps_per_mapper.entry_or_default(&mapper.name) += 1;
        }
    }

    stats
}

fn push<'a, T>(groups: &mut Groups<'a, T>, key: &str, record: &'a T) {
    groups.entry_or_default(key).push(record);
}

/// `2024-3-15`: unpadded year, month and day as written on the record.
pub fn day_key(at: &NaiveDateTime) -> String {
    format!("{}-{}-{}", at.year(), at.month(), at.day())
}

pub fn month_key(at: &NaiveDateTime) -> String {
    format!("{}-{}-1", at.year(), at.month())
}

pub fn quarter_key(at: &NaiveDateTime) -> String {
    format!("Q{} {}", (at.month() + 2) / 3, at.year())
}

pub fn year_key(at: &NaiveDateTime) -> String {
    at.year().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mapper;

    fn at(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn mappers(names: &[&str]) -> Vec<Mapper> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| Mapper {
                name: name.to_string(),
                id: (index + 1).to_string(),
            })
            .collect()
    }

    fn finish(map_id: u32, tier: TierId, names: &[&str], server: &str, created_on: &str) -> FinishRecord {
        FinishRecord {
            map_id,
            map_name: format!("kz_map_{map_id}"),
            mappers: mappers(names),
            difficulty: tier,
            points: 800,
            time: 45.2,
            teleports: 0,
            server_name: server.to_string(),
            server_id: 1,
            created_on: at(created_on),
        }
    }

    fn unfinish(map_id: u32, tier: TierId, names: &[&str]) -> UnfinishRecord {
        UnfinishRecord {
            map_id,
            map_name: format!("kz_map_{map_id}"),
            mappers: mappers(names),
            difficulty: tier,
        }
    }

    fn sample() -> (Vec<FinishRecord>, Vec<UnfinishRecord>) {
        let finishes = vec![
            finish(1, TierId::Medium, &["Bob"], "ServerA", "2024-01-10T00:00:00"),
            finish(2, TierId::Hard, &["Bob", "Ann"], "ServerB", "2024-03-15T10:00:00"),
            finish(3, TierId::Medium, &[], "ServerA", "2023-11-02T23:59:59"),
        ];
        let unfinishes = vec![
            unfinish(4, TierId::Death, &["Ann"]),
            unfinish(5, TierId::Medium, &["Cid"]),
        ];
        (finishes, unfinishes)
    }

    #[test]
    fn calendar_keys_match_record_components() {
        let created = at("2024-03-15T10:00:00");
        assert_eq!(day_key(&created), "2024-3-15");
        assert_eq!(month_key(&created), "2024-3-1");
        assert_eq!(quarter_key(&created), "Q1 2024");
        assert_eq!(year_key(&created), "2024");

        assert_eq!(quarter_key(&at("2024-04-01T00:00:00")), "Q2 2024");
        assert_eq!(quarter_key(&at("2024-09-30T00:00:00")), "Q3 2024");
        assert_eq!(quarter_key(&at("2024-12-31T23:59:59")), "Q4 2024");
    }

    #[test]
    fn every_tier_present_regardless_of_input() {
        let (finishes, unfinishes) = sample();
        let stats = aggregate(RunType::Pro, &finishes, &unfinishes);

        let expected: Vec<TierId> = TierId::ALL.to_vec();
        assert_eq!(stats.finishes_per_tier.keys().copied().collect::<Vec<_>>(), expected);
        assert_eq!(stats.unfinishes_per_tier.keys().copied().collect::<Vec<_>>(), expected);
        assert_eq!(stats.maps_per_tier.keys().copied().collect::<Vec<_>>(), expected);
        assert!(stats.finishes_in(TierId::VeryEasy).is_empty());
    }

    #[test]
    fn tier_buckets_conserve_record_counts() {
        let (finishes, unfinishes) = sample();
        let stats = aggregate(RunType::Pro, &finishes, &unfinishes);

        let finished: usize = TierId::ALL.iter().map(|t| stats.finishes_in(*t).len()).sum();
        let unfinished: usize = TierId::ALL.iter().map(|t| stats.unfinishes_in(*t).len()).sum();
        let maps: usize = stats.maps_per_tier.values().sum();
        assert_eq!(finished, finishes.len());
        assert_eq!(unfinished, unfinishes.len());
        assert_eq!(maps, finishes.len() + unfinishes.len());
        assert_eq!(stats.maps_in(TierId::Medium), 3);
    }

    #[test]
    fn multi_mapper_records_fan_out() {
        let (finishes, unfinishes) = sample();
        let stats = aggregate(RunType::Pro, &finishes, &unfinishes);

        assert_eq!(stats.finishes_by("Bob").len(), 2);
        assert_eq!(stats.finishes_by("Ann").len(), 1);
        assert_eq!(stats.finishes_by("Ann")[0].map_id, 2);
        assert_eq!(
            stats.finishes_per_mapper.keys().cloned().collect::<Vec<_>>(),
            vec!["Bob".to_string(), "Ann".to_string()]
        );
        let fanned: usize = stats.finishes_per_mapper.values().map(Vec::len).sum();
        assert_eq!(fanned, 3);
        assert_eq!(finishes.len(), 3);

        assert_eq!(stats.unfinishes_per_mapper["Ann"].len(), 1);
        assert_eq!(stats.maps_per_mapper["Ann"], 2);
        assert_eq!(stats.maps_per_mapper["Cid"], 1);
    }

    #[test]
    fn servers_and_calendar_buckets() {
        let (finishes, unfinishes) = sample();
        let stats = aggregate(RunType::Pro, &finishes, &unfinishes);

        assert_eq!(stats.finishes_per_server["ServerA"].len(), 2);
        assert_eq!(stats.finishes_per_server["ServerB"].len(), 1);
        assert_eq!(stats.finishes_per_day["2024-3-15"].len(), 1);
        assert_eq!(stats.finishes_per_month["2023-11-1"].len(), 1);
        assert_eq!(stats.finishes_per_quarter["Q1 2024"].len(), 2);
        assert_eq!(stats.finishes_per_quarter["Q4 2023"].len(), 1);
        assert_eq!(stats.finishes_per_year["2024"].len(), 2);
        assert_eq!(stats.finishes_per_year["2023"].len(), 1);
    }

    #[test]
    fn calendar_buckets_keep_first_seen_order() {
        let finishes = vec![
            finish(1, TierId::Easy, &["Bob"], "ServerA", "2024-09-30T12:00:00"),
            finish(2, TierId::Easy, &["Bob"], "ServerA", "2024-10-01T12:00:00"),
        ];
        let stats = aggregate(RunType::Pro, &finishes, &[]);

        assert_eq!(
            stats.finishes_per_day.keys().collect::<Vec<_>>(),
            vec!["2024-9-30", "2024-10-1"]
        );
        assert_eq!(
            stats.finishes_per_month.keys().collect::<Vec<_>>(),
            vec!["2024-9-1", "2024-10-1"]
        );
        assert_eq!(
            crate::summary::max_by_count(stats.finishes_per_day.iter()),
            Some((&"2024-9-30".to_string(), 1))
        );
        assert_eq!(
            crate::summary::max_by_count(stats.finishes_per_month.iter()),
            Some((&"2024-9-1".to_string(), 1))
        );
    }

    #[test]
    fn single_finish_scenario() {
        let finishes = vec![finish(1, TierId::Medium, &["Bob"], "ServerA", "2024-01-10T00:00:00")];
        let stats = aggregate(RunType::Pro, &finishes, &[]);

        assert_eq!(stats.maps_in(TierId::Medium), 1);
        assert_eq!(stats.finishes_in(TierId::Medium).len(), 1);
        assert_eq!(stats.finishes_by("Bob").len(), 1);
        assert_eq!(stats.finishes_per_server["ServerA"].len(), 1);
        assert_eq!(stats.finishes_per_year["2024"].len(), 1);
    }

    #[test]
    fn empty_input_keeps_tiers_and_nothing_else() {
        let stats = aggregate(RunType::Tp, &[], &[]);

        assert_eq!(stats.run_type, RunType::Tp);
        assert_eq!(stats.finishes_per_tier.len(), 7);
        assert!(stats.finishes_per_tier.values().all(Vec::is_empty));
        assert!(stats.maps_per_tier.values().all(|count| *count == 0));
        assert!(stats.finishes_per_day.is_empty());
        assert!(stats.finishes_per_month.is_empty());
        assert!(stats.finishes_per_quarter.is_empty());
        assert!(stats.finishes_per_year.is_empty());
        assert!(stats.finishes_per_mapper.is_empty());
        assert!(stats.maps_per_mapper.is_empty());
        assert!(stats.finishes_per_server.is_empty());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let (finishes, unfinishes) = sample();
        let first = aggregate(RunType::Pro, &finishes, &unfinishes);
        let second = aggregate(RunType::Pro, &finishes, &unfinishes);
        assert_eq!(first, second);
    }

    #[test]
    fn serializes_tiers_as_numeric_keys() {
        let finishes = vec![finish(1, TierId::Medium, &["Bob"], "ServerA", "2024-01-10T00:00:00")];
        let stats = aggregate(RunType::Pro, &finishes, &[]);

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["run_type"], "pro");
        assert_eq!(value["maps_per_tier"]["3"], 1);
        assert_eq!(value["finishes_per_tier"]["7"], serde_json::json!([]));
        assert_eq!(value["finishes_per_mapper"]["Bob"][0]["mapperNames"][0], "Bob");
    }
}
