use rusqlite::Connection;

use crate::error::PacingError;

/// Run the consolidated, idempotent schema migration.
pub fn run(conn: &Connection) -> Result<(), PacingError> {
    tracing::debug!("Running database migrations");

    conn.execute_batch(SCHEMA)?;

    tracing::info!("Database migrations complete");
    Ok(())
}

const SCHEMA: &str = r#"

-- ============================================================================
-- Campaign budgets
-- ============================================================================

CREATE TABLE IF NOT EXISTS campaign_budgets (
    id                  TEXT PRIMARY KEY,
    name                TEXT NOT NULL,
    total_budget        REAL NOT NULL,
    period_start        TEXT NOT NULL,
    period_end          TEXT NOT NULL,
    pacing_strategy     TEXT NOT NULL DEFAULT 'linear',
    current_spend       REAL NOT NULL DEFAULT 0,
    last_pacing_check   TEXT,
    pacing_status       TEXT,
    projected_spend     REAL,
    active              INTEGER NOT NULL DEFAULT 1,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_campaign_budgets_active ON campaign_budgets(active);

-- ============================================================================
-- Pacing alerts
-- ============================================================================

CREATE TABLE IF NOT EXISTS pacing_alerts (
    id                  TEXT PRIMARY KEY,
    campaign_id         TEXT NOT NULL REFERENCES campaign_budgets(id) ON DELETE CASCADE,
    alert_type          TEXT NOT NULL,
    severity            TEXT NOT NULL,
    message             TEXT NOT NULL,
    current_spend       REAL NOT NULL,
    budget_limit        REAL NOT NULL,
    projected_spend     REAL NOT NULL,
    recommended_action  TEXT NOT NULL,
    created_at          TEXT NOT NULL,
    resolved            INTEGER NOT NULL DEFAULT 0,
    resolved_at         TEXT
);
CREATE INDEX IF NOT EXISTS idx_pacing_alerts_campaign ON pacing_alerts(campaign_id, created_at);
CREATE INDEX IF NOT EXISTS idx_pacing_alerts_resolved ON pacing_alerts(resolved);

"#;
