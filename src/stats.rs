use crate::aggregate::{RecordsTopStatistics, aggregate};
use crate::models::{
    BreakPoint, CountPoint, FinishPoint, FinishRecord, Highlights, MapperPoint, PlayerSnapshot,
    PlaytimePoint, RunType, SeriesPoint, StatsResponse, TierId, TierPoint, Totals,
};
use crate::summary::{self, Gap, percent};

pub const EMPTY_MESSAGE: &str = "This player doesn't have any stats";

pub fn build_stats(snapshot: &PlayerSnapshot, run_type: RunType, top_n: usize) -> StatsResponse {
    let records = snapshot.records_for(run_type);
    let stats = aggregate(run_type, &records.finishes, &records.unfinishes);
    let ordered = summary::chronological(&records.finishes);

    let finishes = records.finishes.len();
    let maps = finishes + records.unfinishes.len();
    let points = summary::total_points(&records.finishes);
    let totals = Totals {
        finishes,
        maps,
        completion: percent(finishes, maps),
        points,
        average_points: (finishes > 0).then(|| points as f64 / finishes as f64),
        playtime_seconds: summary::total_time(&records.finishes),
    };

    let tiers = TierId::ALL
        .iter()
        .map(|tier| tier_point(&stats, *tier))
        .collect();

    let mut years: Vec<CountPoint> = stats
        .finishes_per_year
        .iter()
        .map(|(year, records)| count_point(year, records.len()))
        .collect();
    years.sort_by(|a, b| a.key.cmp(&b.key));

    let top_mappers = summary::top_n(stats.finishes_per_mapper.iter(), top_n, group_size)
        .into_iter()
        .map(|(mapper, _)| mapper_point(&stats, mapper))
        .collect();

    let top_servers = summary::top_n(stats.finishes_per_server.iter(), top_n, group_size)
        .into_iter()
        .map(|(server, count)| count_point(server, count as usize))
        .collect();

    let points_progression = series(summary::cumulative_series(&ordered, |r| f64::from(r.points)));
    let average_points = series(summary::running_average(&ordered, |r| f64::from(r.points)));

    let highlights = highlights(&stats, &ordered);
    let message = highlights.is_none().then(|| EMPTY_MESSAGE.to_string());

    StatsResponse {
        player: snapshot.player.clone(),
        run_type,
        message,
        totals,
        tiers,
        years,
        top_mappers,
        top_servers,
        points_progression,
        average_points,
        highlights,
    }
}

fn highlights(stats: &RecordsTopStatistics<'_>, ordered: &[&FinishRecord]) -> Option<Highlights> {
    let first = ordered.first()?;
    let latest = ordered.last()?;

    let (tier, _) = summary::max_by_count(&stats.finishes_per_tier)?;
    let (day, day_count) = summary::max_by_count(stats.finishes_per_day.iter())?;
    let (month, month_count) = summary::max_by_count(stats.finishes_per_month.iter())?;
    let (quarter, quarter_count) = summary::max_by_count(stats.finishes_per_quarter.iter())?;
    let (longest_day, seconds) =
        summary::max_by_metric(stats.finishes_per_day.iter(), group_playtime)?;
    let (server, server_count) = summary::max_by_count(stats.finishes_per_server.iter())?;

    let completion = |mapper: &String, maps: &usize| percent(stats.finishes_by(mapper).len(), *maps);
    let most_completed_mapper = summary::max_by_metric(stats.maps_per_mapper.iter(), completion)
        .map(|(mapper, _)| mapper_point(stats, mapper));
    let least_completed_mapper = summary::min_by_metric(stats.maps_per_mapper.iter(), completion)
        .map(|(mapper, _)| mapper_point(stats, mapper));

    Some(Highlights {
        most_finished_tier: tier_point(stats, *tier),
        busiest_day: count_point(day, day_count),
        busiest_month: count_point(month, month_count),
        busiest_quarter: count_point(quarter, quarter_count),
        longest_day: PlaytimePoint {
            key: longest_day.clone(),
            seconds,
        },
        favorite_server: count_point(server, server_count),
        most_completed_mapper,
        least_completed_mapper,
        longest_break: summary::longest_gap(ordered).map(break_point),
        shortest_break: summary::shortest_gap(ordered).map(break_point),
        first_finish: FinishPoint::from(*first),
        latest_finish: FinishPoint::from(*latest),
    })
}

fn group_size(_: &String, records: &Vec<&FinishRecord>) -> f64 {
    records.len() as f64
}

fn group_playtime(_: &String, records: &Vec<&FinishRecord>) -> f64 {
    summary::total_time(records.iter().copied())
}

fn tier_point(stats: &RecordsTopStatistics<'_>, tier: TierId) -> TierPoint {
    let finished = stats.finishes_in(tier);
    let maps = stats.maps_in(tier);
    TierPoint {
        tier,
        label: tier.label().to_string(),
        finishes: finished.len(),
        maps,
        completion: percent(finished.len(), maps),
        points: summary::total_points(finished.iter().copied()),
    }
}

fn mapper_point(stats: &RecordsTopStatistics<'_>, mapper: &str) -> MapperPoint {
    let finishes = stats.finishes_by(mapper).len();
    let maps = stats.maps_per_mapper.get(mapper).copied().unwrap_or(finishes);
    MapperPoint {
        mapper: mapper.to_string(),
        finishes,
        maps,
        completion: percent(finishes, maps),
    }
}

fn count_point(key: &str, count: usize) -> CountPoint {
    CountPoint {
        key: key.to_string(),
        count,
    }
}

fn break_point(gap: Gap<'_>) -> BreakPoint {
    BreakPoint {
        from: FinishPoint::from(gap.previous),
        to: FinishPoint::from(gap.next),
        seconds: gap.duration().num_seconds(),
    }
}

fn series(points: Vec<(&FinishRecord, f64)>) -> Vec<SeriesPoint> {
    points
        .into_iter()
        .map(|(record, value)| SeriesPoint {
            created_on: record.created_on,
            map_name: record.map_name.clone(),
            value,
        })
        .collect()
}
