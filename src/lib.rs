pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod logging;
pub mod spend;

pub use config::PacingConfig;
pub use engine::dispatch::AlertNotifier;
pub use engine::types::{
    AlertSeverity, AlertType, PacingResult, PacingStatus, PacingStrategy, Recommendations,
};
pub use engine::BudgetPacingService;
pub use error::PacingError;
pub use spend::{SpendSource, SpendSourceError};
