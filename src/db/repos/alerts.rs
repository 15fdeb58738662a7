use rusqlite::{params, Row};

use super::{parse_ts, ts};
use crate::db::models::{Alert, AlertFilter};
use crate::db::DbPool;
use crate::engine::types::{AlertSeverity, AlertType};
use crate::error::PacingError;

fn row_to_alert(row: &Row) -> rusqlite::Result<Alert> {
    let type_raw: String = row.get("alert_type")?;
    let alert_type = AlertType::parse(&type_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown alert type '{type_raw}'").into(),
        )
    })?;
    let severity_raw: String = row.get("severity")?;
    let severity = AlertSeverity::parse(&severity_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown severity '{severity_raw}'").into(),
        )
    })?;

    Ok(Alert {
        id: row.get("id")?,
        campaign_id: row.get("campaign_id")?,
        alert_type,
        severity,
        message: row.get("message")?,
        current_spend: row.get("current_spend")?,
        budget_limit: row.get("budget_limit")?,
        projected_spend: row.get("projected_spend")?,
        recommended_action: row.get("recommended_action")?,
        created_at: parse_ts(0, row.get("created_at")?)?,
        resolved: row.get::<_, i32>("resolved")? != 0,
        resolved_at: row
            .get::<_, Option<String>>("resolved_at")?
            .map(|s| parse_ts(0, s))
            .transpose()?,
    })
}

/// Persist a new alert. The id already encodes (campaign, type, instant), so
/// a same-millisecond duplicate collapses into the existing row.
pub fn insert(pool: &DbPool, alert: &Alert) -> Result<(), PacingError> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT OR IGNORE INTO pacing_alerts
         (id, campaign_id, alert_type, severity, message, current_spend,
          budget_limit, projected_spend, recommended_action, created_at, resolved)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0)",
        params![
            alert.id,
            alert.campaign_id,
            alert.alert_type.as_str(),
            alert.severity.as_str(),
            alert.message,
            alert.current_spend,
            alert.budget_limit,
            alert.projected_spend,
            alert.recommended_action,
            ts(alert.created_at),
        ],
    )?;
    Ok(())
}

pub fn list(
    pool: &DbPool,
    campaign_id: &str,
    filter: &AlertFilter,
) -> Result<Vec<Alert>, PacingError> {
    let mut sql = String::from("SELECT * FROM pacing_alerts WHERE campaign_id = ?1");
    if filter.unresolved_only {
        sql.push_str(" AND resolved = 0");
    }
    if filter.alert_type.is_some() {
        sql.push_str(" AND alert_type = ?2");
    }
    sql.push_str(" ORDER BY created_at DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    let conn = pool.get()?;
    let mut stmt = conn.prepare(&sql)?;
    let rows = match filter.alert_type {
        Some(t) => stmt.query_map(params![campaign_id, t.as_str()], row_to_alert)?,
        None => stmt.query_map(params![campaign_id], row_to_alert)?,
    };
    Ok(rows.filter_map(|r| r.ok()).collect())
}

pub fn resolve(
    pool: &DbPool,
    alert_id: &str,
    at: chrono::DateTime<chrono::Utc>,
) -> Result<(), PacingError> {
    let conn = pool.get()?;
    let changed = conn.execute(
        "UPDATE pacing_alerts SET resolved = 1, resolved_at = ?1 WHERE id = ?2 AND resolved = 0",
        params![ts(at), alert_id],
    )?;
    if changed == 0 {
        return Err(PacingError::NotFound(format!("Open alert {alert_id}")));
    }
    Ok(())
}
