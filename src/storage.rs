use crate::errors::AppError;
use crate::models::PlayerSnapshot;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

/// Reads the cached snapshot. A missing or unreadable file yields an empty
/// player so the dashboard can still come up and show its empty state.
pub async fn load_data(path: &Path) -> PlayerSnapshot {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!("failed to parse snapshot {}: {err}", path.display());
                PlayerSnapshot::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("no snapshot at {}, starting empty", path.display());
            PlayerSnapshot::default()
        }
        Err(err) => {
            error!("failed to read snapshot {}: {err}", path.display());
            PlayerSnapshot::default()
        }
    }
}

pub async fn persist_data(path: &Path, snapshot: &PlayerSnapshot) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(snapshot).map_err(AppError::internal)?;
    fs::write(path, payload).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerInfo, TierId};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("kz_stats_{name}_{}_{nanos}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn missing_file_loads_empty_snapshot() {
        let snapshot = load_data(&temp_path("missing")).await;
        assert_eq!(snapshot, PlayerSnapshot::default());
    }

    #[tokio::test]
    async fn malformed_file_loads_empty_snapshot() {
        let path = temp_path("malformed");
        fs::write(&path, br#"{"finishes": [{"map_id": "nope"}]}"#).await.unwrap();
        assert_eq!(load_data(&path).await, PlayerSnapshot::default());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persisted_snapshot_loads_back() {
        let path = temp_path("persist");
        let snapshot: PlayerSnapshot = serde_json::from_value(serde_json::json!({
            "player": { "name": "jumper", "steam_id": "STEAM_1:0:7" },
            "maps": [{ "id": 9, "name": "kz_ladder", "difficulty": 2, "mapperNames": ["Eve"], "mapperIds": ["5"] }]
        }))
        .unwrap();

        persist_data(&path, &snapshot).await.unwrap();
        let loaded = load_data(&path).await;
        assert_eq!(loaded.player, PlayerInfo { name: "jumper".into(), steam_id: "STEAM_1:0:7".into() });
        assert_eq!(loaded.maps[0].difficulty, TierId::Easy);
        assert_eq!(loaded.maps[0].mappers[0].name, "Eve");
        let _ = fs::remove_file(&path).await;
    }
}
