//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Savings rules configuration.
    #[serde(default)]
    pub savings: SavingsConfig,
    /// Tenant authorization cache configuration.
    #[serde(default)]
    pub tenant_cache: TenantCacheConfig,
    /// Report cache configuration.
    #[serde(default)]
    pub report_cache: ReportCacheConfig,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Maximum tolerated difference between entry debit and credit totals.
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: Decimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            balance_tolerance: default_balance_tolerance(),
        }
    }
}

fn default_balance_tolerance() -> Decimal {
    // 0.01 in the functional currency
    Decimal::new(1, 2)
}

/// Per-savings-type daily withdrawal limits.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyWithdrawalLimits {
    /// Limit for principal savings (simpanan pokok).
    #[serde(default = "default_daily_limit")]
    pub pokok: Decimal,
    /// Limit for mandatory savings (simpanan wajib).
    #[serde(default = "default_daily_limit")]
    pub wajib: Decimal,
    /// Limit for special savings (simpanan khusus).
    #[serde(default = "default_daily_limit")]
    pub khusus: Decimal,
    /// Limit for voluntary savings (simpanan sukarela).
    #[serde(default = "default_daily_limit")]
    pub sukarela: Decimal,
}

impl Default for DailyWithdrawalLimits {
    fn default() -> Self {
        Self {
            pokok: default_daily_limit(),
            wajib: default_daily_limit(),
            khusus: default_daily_limit(),
            sukarela: default_daily_limit(),
        }
    }
}

fn default_daily_limit() -> Decimal {
    // IDR 5,000,000 per type per rolling 24 hours
    Decimal::new(5_000_000, 0)
}

/// Savings rules configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SavingsConfig {
    /// Absolute ceiling for a single savings movement.
    #[serde(default = "default_max_transaction_amount")]
    pub max_transaction_amount: Decimal,
    /// Rolling 24-hour withdrawal limits, per savings type.
    #[serde(default)]
    pub daily_withdrawal_limits: DailyWithdrawalLimits,
}

impl Default for SavingsConfig {
    fn default() -> Self {
        Self {
            max_transaction_amount: default_max_transaction_amount(),
            daily_withdrawal_limits: DailyWithdrawalLimits::default(),
        }
    }
}

fn default_max_transaction_amount() -> Decimal {
    // IDR 100,000,000 per movement
    Decimal::new(100_000_000, 0)
}

/// Tenant authorization cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TenantCacheConfig {
    /// Time-to-live for cached authorization decisions, in seconds.
    #[serde(default = "default_authorization_ttl_secs")]
    pub authorization_ttl_secs: u64,
    /// Maximum number of cached `(user, tenant)` decisions.
    #[serde(default = "default_authorization_capacity")]
    pub max_entries: u64,
}

impl Default for TenantCacheConfig {
    fn default() -> Self {
        Self {
            authorization_ttl_secs: default_authorization_ttl_secs(),
            max_entries: default_authorization_capacity(),
        }
    }
}

fn default_authorization_ttl_secs() -> u64 {
    300 // 5 minutes
}

fn default_authorization_capacity() -> u64 {
    10_000
}

/// Report cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportCacheConfig {
    /// Time-to-live for cached reports, in seconds.
    #[serde(default = "default_report_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum number of cached reports per tenant and report type.
    #[serde(default = "default_reports_per_tenant")]
    pub max_reports_per_tenant: u64,
}

impl Default for ReportCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_report_ttl_secs(),
            max_reports_per_tenant: default_reports_per_tenant(),
        }
    }
}

fn default_report_ttl_secs() -> u64 {
    300 // 5 minutes
}

fn default_reports_per_tenant() -> u64 {
    64
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KOPRA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
