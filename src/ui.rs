use crate::models::{CountPoint, Highlights, MapperPoint, RunType, StatsResponse, TierPoint};
use std::fmt::Write;

pub fn render_index(stats: &StatsResponse) -> String {
    let player = if stats.player.name.is_empty() {
        "Unknown player".to_string()
    } else {
        escape(&stats.player.name)
    };
    let body = match (&stats.highlights, &stats.message) {
        (Some(highlights), _) => render_highlights(highlights),
        (None, Some(message)) => format!(r#"<p class="empty">{}</p>"#, escape(message)),
        (None, None) => String::new(),
    };

    INDEX_HTML
        .replace("{{PLAYER}}", &player)
        .replace("{{STEAM_ID}}", &escape(&stats.player.steam_id))
        .replace("{{PRO_ACTIVE}}", active(stats.run_type, RunType::Pro))
        .replace("{{TP_ACTIVE}}", active(stats.run_type, RunType::Tp))
        .replace("{{FINISHES}}", &stats.totals.finishes.to_string())
        .replace("{{MAPS}}", &stats.totals.maps.to_string())
        .replace("{{COMPLETION}}", &format!("{:.1}%", stats.totals.completion))
        .replace("{{POINTS}}", &stats.totals.points.to_string())
        .replace("{{PLAYTIME}}", &format_duration(stats.totals.playtime_seconds))
        .replace("{{TIER_ROWS}}", &tier_rows(&stats.tiers))
        .replace("{{MAPPER_ROWS}}", &mapper_rows(&stats.top_mappers))
        .replace("{{SERVER_ROWS}}", &count_rows(&stats.top_servers))
        .replace("{{YEAR_ROWS}}", &count_rows(&stats.years))
        .replace("{{HIGHLIGHTS}}", &body)
}

fn active(current: RunType, tab: RunType) -> &'static str {
    if current == tab { "tab active" } else { "tab" }
}

fn render_highlights(highlights: &Highlights) -> String {
    let mut items = vec![
        (
            "Most finished tier",
            format!(
                "{} ({} finishes)",
                highlights.most_finished_tier.label, highlights.most_finished_tier.finishes
            ),
        ),
        ("Busiest day", count_label(&highlights.busiest_day)),
        ("Busiest month", count_label(&highlights.busiest_month)),
        ("Busiest quarter", count_label(&highlights.busiest_quarter)),
        (
            "Most playtime in a day",
            format!(
                "{} ({})",
                highlights.longest_day.key,
                format_duration(highlights.longest_day.seconds)
            ),
        ),
        ("Favorite server", count_label(&highlights.favorite_server)),
        (
            "First finish",
            format!(
                "{} on {}",
                highlights.first_finish.map_name,
                highlights.first_finish.created_on.date()
            ),
        ),
        (
            "Latest finish",
            format!(
                "{} on {}",
                highlights.latest_finish.map_name,
                highlights.latest_finish.created_on.date()
            ),
        ),
    ];
    if let Some(mapper) = &highlights.most_completed_mapper {
        items.push(("Most completed mapper", mapper_label(mapper)));
    }
    if let Some(mapper) = &highlights.least_completed_mapper {
        items.push(("Least completed mapper", mapper_label(mapper)));
    }
    if let Some(gap) = &highlights.longest_break {
        items.push((
            "Longest break",
            format!(
                "{} ({} → {})",
                format_duration(gap.seconds as f64),
                gap.from.map_name,
                gap.to.map_name
            ),
        ));
    }

    let mut html = String::from(r#"<dl class="highlights">"#);
    for (label, value) in items {
        let _ = write!(html, "<dt>{label}</dt><dd>{}</dd>", escape(&value));
    }
    html.push_str("</dl>");
    html
}

fn tier_rows(tiers: &[TierPoint]) -> String {
    tiers.iter().fold(String::new(), |mut html, tier| {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{} / {}</td><td>{:.1}%</td><td>{}</td></tr>",
            tier.label, tier.finishes, tier.maps, tier.completion, tier.points
        );
        html
    })
}

fn mapper_rows(mappers: &[MapperPoint]) -> String {
    mappers.iter().fold(String::new(), |mut html, mapper| {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{} / {}</td><td>{:.1}%</td></tr>",
            escape(&mapper.mapper),
            mapper.finishes,
            mapper.maps,
            mapper.completion
        );
        html
    })
}

fn count_rows(points: &[CountPoint]) -> String {
    points.iter().fold(String::new(), |mut html, point| {
        let _ = write!(html, "<tr><td>{}</td><td>{}</td></tr>", escape(&point.key), point.count);
        html
    })
}

fn count_label(point: &CountPoint) -> String {
    format!("{} ({} finishes)", point.key, point.count)
}

fn mapper_label(mapper: &MapperPoint) -> String {
    format!(
        "{} ({:.1}%, {} of {} maps)",
        mapper.mapper, mapper.completion, mapper.finishes, mapper.maps
    )
}

fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (days, rest) = (total / 86_400, total % 86_400);
    let (hours, rest) = (rest / 3_600, rest % 3_600);
    let (minutes, secs) = (rest / 60, rest % 60);
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else {
        format!("{minutes}m {secs}s")
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{PLAYER}} · KZ Stats</title>
  <style>
    :root {
      --bg: #14171c;
      --card: #1d2129;
      --ink: #e6e8eb;
      --muted: #8b93a1;
      --accent: #f0a63a;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: end;
      gap: 12px;
      flex-wrap: wrap;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
    }

    .tabs {
      display: flex;
      gap: 6px;
    }

    .tab {
      padding: 8px 16px;
      border-radius: 999px;
      color: var(--muted);
      text-decoration: none;
      font-weight: 600;
    }

    .tab.active {
      background: var(--accent);
      color: var(--bg);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat,
    .card {
      background: var(--card);
      border-radius: 16px;
      padding: 16px 18px;
    }

    .stat .label {
      display: block;
      color: var(--muted);
      font-size: 0.85rem;
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
      gap: 16px;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    td,
    th {
      text-align: left;
      padding: 6px 4px;
      border-bottom: 1px solid rgba(255, 255, 255, 0.06);
    }

    .highlights {
      display: grid;
      grid-template-columns: max-content 1fr;
      gap: 6px 16px;
      margin: 0;
    }

    .highlights dt {
      color: var(--muted);
    }

    .highlights dd {
      margin: 0;
    }

    .empty {
      color: var(--muted);
      font-size: 1.1rem;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>{{PLAYER}}</h1>
        <p class="subtitle">{{STEAM_ID}}</p>
      </div>
      <nav class="tabs">
        <a class="{{PRO_ACTIVE}}" href="/?run_type=pro">PRO</a>
        <a class="{{TP_ACTIVE}}" href="/?run_type=tp">TP</a>
      </nav>
    </header>
    <section class="panel">
      <div class="stat"><span class="label">Finishes</span><span class="value">{{FINISHES}}</span></div>
      <div class="stat"><span class="label">Maps</span><span class="value">{{MAPS}}</span></div>
      <div class="stat"><span class="label">Completion</span><span class="value">{{COMPLETION}}</span></div>
      <div class="stat"><span class="label">Points</span><span class="value">{{POINTS}}</span></div>
      <div class="stat"><span class="label">Playtime</span><span class="value">{{PLAYTIME}}</span></div>
    </section>
    <section class="card">{{HIGHLIGHTS}}</section>
    <section class="grid">
      <div class="card">
        <h2>Tiers</h2>
        <table>
          <thead><tr><th>Tier</th><th>Finished</th><th>%</th><th>Points</th></tr></thead>
          <tbody>{{TIER_ROWS}}</tbody>
        </table>
      </div>
      <div class="card">
        <h2>Mappers</h2>
        <table>
          <thead><tr><th>Mapper</th><th>Finished</th><th>%</th></tr></thead>
          <tbody>{{MAPPER_ROWS}}</tbody>
        </table>
      </div>
      <div class="card">
        <h2>Servers</h2>
        <table>
          <thead><tr><th>Server</th><th>Finishes</th></tr></thead>
          <tbody>{{SERVER_ROWS}}</tbody>
        </table>
      </div>
      <div class="card">
        <h2>Years</h2>
        <table>
          <thead><tr><th>Year</th><th>Finishes</th></tr></thead>
          <tbody>{{YEAR_ROWS}}</tbody>
        </table>
      </div>
    </section>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerSnapshot;
    use crate::stats::{EMPTY_MESSAGE, build_stats};

    #[test]
    fn empty_player_renders_message() {
        let mut snapshot = PlayerSnapshot::default();
        snapshot.player.name = "<b>jumper</b>".to_string();
        let html = render_index(&build_stats(&snapshot, RunType::Tp, 10));

        assert!(html.contains("&lt;b&gt;jumper&lt;/b&gt;"));
        assert!(html.contains(&EMPTY_MESSAGE.replace('\'', "&#39;")));
        assert!(html.contains(r#"<a class="tab active" href="/?run_type=tp">"#));
        assert!(html.contains("<td>Death</td><td>0 / 0</td>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn durations_pick_largest_unit() {
        assert_eq!(format_duration(45.2), "0m 45s");
        assert_eq!(format_duration(3_725.0), "1h 2m 5s");
        assert_eq!(format_duration(90_061.0), "1d 1h 1m");
    }
}
