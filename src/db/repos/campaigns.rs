use rusqlite::{params, Row};

use super::{parse_ts, ts};
use crate::db::models::{CampaignBudget, CampaignCheckUpdate, CreateCampaignInput};
use crate::db::DbPool;
use crate::engine::types::{PacingStatus, PacingStrategy};
use crate::error::PacingError;

fn row_to_campaign(row: &Row) -> rusqlite::Result<CampaignBudget> {
    let strategy_raw: String = row.get("pacing_strategy")?;
    let strategy = PacingStrategy::parse(&strategy_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown pacing strategy '{strategy_raw}'").into(),
        )
    })?;
    let status = row
        .get::<_, Option<String>>("pacing_status")?
        .and_then(|s| PacingStatus::parse(&s));

    Ok(CampaignBudget {
        id: row.get("id")?,
        name: row.get("name")?,
        total_budget: row.get("total_budget")?,
        period_start: parse_ts(0, row.get("period_start")?)?,
        period_end: parse_ts(0, row.get("period_end")?)?,
        pacing_strategy: strategy,
        current_spend: row.get("current_spend")?,
        last_pacing_check: row
            .get::<_, Option<String>>("last_pacing_check")?
            .map(|s| parse_ts(0, s))
            .transpose()?,
        pacing_status: status,
        projected_spend: row.get("projected_spend")?,
        active: row.get::<_, i32>("active")? != 0,
        created_at: parse_ts(0, row.get("created_at")?)?,
        updated_at: parse_ts(0, row.get("updated_at")?)?,
    })
}

pub fn get_active(pool: &DbPool) -> Result<Vec<CampaignBudget>, PacingError> {
    let conn = pool.get()?;
    let mut stmt =
        conn.prepare("SELECT * FROM campaign_budgets WHERE active = 1 ORDER BY created_at")?;
    let rows = stmt.query_map([], row_to_campaign)?;
    Ok(rows.filter_map(|r| r.ok()).collect())
}

pub fn get_by_id(pool: &DbPool, id: &str) -> Result<CampaignBudget, PacingError> {
    let conn = pool.get()?;
    conn.query_row(
        "SELECT * FROM campaign_budgets WHERE id = ?1",
        params![id],
        row_to_campaign,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => PacingError::NotFound(format!("Campaign {id}")),
        other => PacingError::Database(other),
    })
}

pub fn create(pool: &DbPool, input: CreateCampaignInput) -> Result<CampaignBudget, PacingError> {
    if input.name.trim().is_empty() {
        return Err(PacingError::Internal("Name cannot be empty".into()));
    }
    if input.total_budget <= 0.0 {
        return Err(PacingError::InvalidBudget(format!(
            "total_budget must be > 0, got {}",
            input.total_budget
        )));
    }
    if input.period_end <= input.period_start {
        return Err(PacingError::Internal(
            "period_end must be after period_start".into(),
        ));
    }

    let id = input.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let now = ts(chrono::Utc::now());

    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO campaign_budgets
         (id, name, total_budget, period_start, period_end, pacing_strategy,
          current_spend, active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 1, ?7, ?7)",
        params![
            id,
            input.name,
            input.total_budget,
            ts(input.period_start),
            ts(input.period_end),
            input.pacing_strategy.as_str(),
            now,
        ],
    )?;

    get_by_id(pool, &id)
}

pub fn set_active(pool: &DbPool, id: &str, active: bool) -> Result<(), PacingError> {
    let conn = pool.get()?;
    let changed = conn.execute(
        "UPDATE campaign_budgets SET active = ?1, updated_at = ?2 WHERE id = ?3",
        params![active as i32, ts(chrono::Utc::now()), id],
    )?;
    if changed == 0 {
        return Err(PacingError::NotFound(format!("Campaign {id}")));
    }
    Ok(())
}

/// Write back the facts from one evaluation. Returns `false` when a newer
/// check already landed (the stale update is rejected, not an error).
pub fn apply_check(
    pool: &DbPool,
    id: &str,
    update: &CampaignCheckUpdate,
) -> Result<bool, PacingError> {
    let checked_at = ts(update.checked_at);
    let conn = pool.get()?;
    let changed = conn.execute(
        "UPDATE campaign_budgets
         SET current_spend = ?1, pacing_status = ?2, projected_spend = ?3,
             last_pacing_check = ?4, updated_at = ?4
         WHERE id = ?5
           AND (last_pacing_check IS NULL OR last_pacing_check <= ?4)",
        params![
            update.current_spend,
            update.pacing_status.as_str(),
            update.projected_spend,
            checked_at,
            id,
        ],
    )?;
    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn test_pool() -> (tempfile::TempDir, DbPool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = crate::db::init_db(dir.path()).unwrap();
        (dir, pool)
    }

    fn input(name: &str, budget: f64) -> CreateCampaignInput {
        let start = Utc::now() - Duration::days(10);
        CreateCampaignInput {
            id: None,
            name: name.into(),
            total_budget: budget,
            period_start: start,
            period_end: start + Duration::days(30),
            pacing_strategy: PacingStrategy::Linear,
        }
    }

    #[test]
    fn test_create_and_get() {
        let (_dir, pool) = test_pool();
        let campaign = create(&pool, input("Spring Sale", 3000.0)).unwrap();
        assert_eq!(campaign.current_spend, 0.0);
        assert!(campaign.active);
        assert!(campaign.last_pacing_check.is_none());
        assert!(campaign.pacing_status.is_none());

        let loaded = get_by_id(&pool, &campaign.id).unwrap();
        assert_eq!(loaded.name, "Spring Sale");
        assert_eq!(loaded.pacing_strategy, PacingStrategy::Linear);
    }

    #[test]
    fn test_get_by_id_not_found() {
        let (_dir, pool) = test_pool();
        let err = get_by_id(&pool, "missing").unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_create_rejects_zero_budget() {
        let (_dir, pool) = test_pool();
        let err = create(&pool, input("Broken", 0.0)).unwrap_err();
        assert_eq!(err.kind(), "invalid_budget");
    }

    #[test]
    fn test_get_active_excludes_paused() {
        let (_dir, pool) = test_pool();
        let a = create(&pool, input("A", 1000.0)).unwrap();
        let b = create(&pool, input("B", 1000.0)).unwrap();
        set_active(&pool, &b.id, false).unwrap();

        let active = get_active(&pool).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, a.id);
    }

    #[test]
    fn test_apply_check_rejects_stale_write() {
        let (_dir, pool) = test_pool();
        let campaign = create(&pool, input("C", 3000.0)).unwrap();
        let now = Utc::now();

        let fresh = CampaignCheckUpdate {
            current_spend: 1000.0,
            pacing_status: PacingStatus::OnTrack,
            projected_spend: 3000.0,
            checked_at: now,
        };
        assert!(apply_check(&pool, &campaign.id, &fresh).unwrap());

        let stale = CampaignCheckUpdate {
            current_spend: 900.0,
            pacing_status: PacingStatus::Underspending,
            projected_spend: 2800.0,
            checked_at: now - Duration::seconds(30),
        };
        assert!(!apply_check(&pool, &campaign.id, &stale).unwrap());

        let loaded = get_by_id(&pool, &campaign.id).unwrap();
        assert_eq!(loaded.current_spend, 1000.0);
        assert_eq!(loaded.pacing_status, Some(PacingStatus::OnTrack));
    }
}
