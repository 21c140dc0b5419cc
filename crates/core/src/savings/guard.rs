//! The savings transaction guard.
//!
//! Every movement runs Validate -> CheckRules -> Post. The guard computes
//! the two balanced legs itself, so a balance-invariant rejection from the
//! ledger here is a defect in the guard, surfaced fatal and never retried.

use std::sync::Arc;

use chrono::Duration;
use rust_decimal::Decimal;
use kopra_shared::config::SavingsConfig;
use kopra_shared::types::{AccountId, MemberId, TenantId};
use kopra_shared::{Clock, SystemClock};

use crate::ledger::{EntryInput, Ledger, LedgerError, LineInput};

use super::directory::{MemberDirectory, SavingsChart};
use super::error::SavingsError;
use super::types::{Member, MemberStatus, SavingsReceipt, SavingsType};

/// Guards savings deposits and withdrawals.
pub struct SavingsTransactionGuard {
    ledger: Arc<Ledger>,
    members: Arc<dyn MemberDirectory>,
    chart: Arc<dyn SavingsChart>,
    config: SavingsConfig,
    clock: Arc<dyn Clock>,
}

impl SavingsTransactionGuard {
    /// Creates a guard with the system clock.
    #[must_use]
    pub fn new(
        ledger: Arc<Ledger>,
        members: Arc<dyn MemberDirectory>,
        chart: Arc<dyn SavingsChart>,
        config: SavingsConfig,
    ) -> Self {
        Self::with_clock(ledger, members, chart, config, Arc::new(SystemClock))
    }

    /// Creates a guard with an explicit clock.
    #[must_use]
    pub fn with_clock(
        ledger: Arc<Ledger>,
        members: Arc<dyn MemberDirectory>,
        chart: Arc<dyn SavingsChart>,
        config: SavingsConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            members,
            chart,
            config,
            clock,
        }
    }

    /// Records a deposit into the member's savings of the given type.
    ///
    /// # Errors
    ///
    /// Returns a validation error before anything is written; the movement
    /// itself is all-or-nothing through the ledger.
    pub fn deposit(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
        savings_type: SavingsType,
        amount: Decimal,
        description: &str,
    ) -> Result<SavingsReceipt, SavingsError> {
        self.validate_amount(amount)?;
        let member = self.require_member(tenant_id, member_id)?;
        if member.status != MemberStatus::Active {
            return Err(SavingsError::InactiveMember(member.id));
        }

        let (cash, savings) = self.resolve_accounts(tenant_id, member_id, savings_type)?;
        let available = self.savings_balance(tenant_id, savings)?;

        let movement_id = self.post_movement(
            tenant_id,
            EntryInput {
                transaction_date: self.clock.now().date_naive(),
                description: description.to_string(),
                reference: Some(format!("{}/{savings_type}", member.member_number)),
                lines: vec![
                    LineInput::debit(cash, amount),
                    LineInput::credit(savings, amount),
                ],
            },
        )?;

        Ok(SavingsReceipt {
            movement_id,
            new_balance: available + amount,
        })
    }

    /// Records a withdrawal from the member's savings of the given type.
    ///
    /// Withdrawal rules: the balance must cover the amount, `wajib` savings
    /// are locked until membership ends with no outstanding loan, and the
    /// rolling 24-hour withdrawal sum must stay within the per-type daily
    /// limit.
    ///
    /// # Errors
    ///
    /// Returns a validation error or business-rule rejection before anything
    /// is written; the movement itself is all-or-nothing through the ledger.
    pub fn withdraw(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
        savings_type: SavingsType,
        amount: Decimal,
        description: &str,
    ) -> Result<SavingsReceipt, SavingsError> {
        self.validate_amount(amount)?;
        let member = self.require_member(tenant_id, member_id)?;
        self.check_withdrawal_status(tenant_id, &member, savings_type)?;

        let (cash, savings) = self.resolve_accounts(tenant_id, member_id, savings_type)?;

        let available = self.savings_balance(tenant_id, savings)?;
        if amount > available {
            return Err(SavingsError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        let limit = self.daily_limit(savings_type);
        let cutoff = self.clock.now() - Duration::hours(24);
        let prior = self.ledger.debit_total_since(tenant_id, savings, cutoff)?;
        if prior + amount > limit {
            return Err(SavingsError::DailyLimitExceeded {
                limit,
                attempted: prior + amount,
            });
        }

        let movement_id = self.post_movement(
            tenant_id,
            EntryInput {
                transaction_date: self.clock.now().date_naive(),
                description: description.to_string(),
                reference: Some(format!("{}/{savings_type}", member.member_number)),
                lines: vec![
                    LineInput::debit(savings, amount),
                    LineInput::credit(cash, amount),
                ],
            },
        )?;

        Ok(SavingsReceipt {
            movement_id,
            new_balance: available - amount,
        })
    }

    fn validate_amount(&self, amount: Decimal) -> Result<(), SavingsError> {
        if amount <= Decimal::ZERO {
            return Err(SavingsError::NonPositiveAmount);
        }
        if amount > self.config.max_transaction_amount {
            return Err(SavingsError::AmountAboveCeiling {
                amount,
                ceiling: self.config.max_transaction_amount,
            });
        }
        Ok(())
    }

    fn require_member(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
    ) -> Result<Member, SavingsError> {
        self.members
            .member(tenant_id, member_id)?
            .ok_or(SavingsError::MemberNotFound(member_id))
    }

    /// Withdrawals require an active member, except `wajib`: mandatory
    /// savings are paid out only when membership has ended and no loan is
    /// outstanding.
    fn check_withdrawal_status(
        &self,
        tenant_id: TenantId,
        member: &Member,
        savings_type: SavingsType,
    ) -> Result<(), SavingsError> {
        if savings_type == SavingsType::Wajib {
            if member.status != MemberStatus::Terminated {
                return Err(SavingsError::MandatorySavingsLocked(member.id));
            }
            let loan = self
                .members
                .outstanding_loan_balance(tenant_id, member.id)?;
            if loan > Decimal::ZERO {
                return Err(SavingsError::MandatorySavingsLocked(member.id));
            }
            return Ok(());
        }

        if member.status != MemberStatus::Active {
            return Err(SavingsError::InactiveMember(member.id));
        }
        Ok(())
    }

    fn resolve_accounts(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
        savings_type: SavingsType,
    ) -> Result<(AccountId, AccountId), SavingsError> {
        let cash = self.chart.cash_account(tenant_id)?.ok_or_else(|| {
            SavingsError::MissingAccountMapping("no cash account for tenant".to_string())
        })?;
        let savings = self
            .chart
            .savings_account(tenant_id, member_id, savings_type)?
            .ok_or_else(|| {
                SavingsError::MissingAccountMapping(format!(
                    "no {savings_type} savings account for member"
                ))
            })?;
        Ok((cash, savings))
    }

    fn savings_balance(
        &self,
        tenant_id: TenantId,
        savings: AccountId,
    ) -> Result<Decimal, SavingsError> {
        let today = self.clock.now().date_naive();
        let balances = self.ledger.balances_as_of(tenant_id, &[savings], today)?;
        Ok(balances.get(&savings).copied().unwrap_or(Decimal::ZERO))
    }

    fn daily_limit(&self, savings_type: SavingsType) -> Decimal {
        let limits = &self.config.daily_withdrawal_limits;
        match savings_type {
            SavingsType::Pokok => limits.pokok,
            SavingsType::Wajib => limits.wajib,
            SavingsType::Khusus => limits.khusus,
            SavingsType::Sukarela => limits.sukarela,
        }
    }

    fn post_movement(
        &self,
        tenant_id: TenantId,
        input: EntryInput,
    ) -> Result<kopra_shared::types::JournalEntryId, SavingsError> {
        match self.ledger.post(tenant_id, input) {
            Ok(entry_id) => Ok(entry_id),
            Err(err @ LedgerError::UnbalancedEntry { .. }) => {
                tracing::error!(
                    tenant_id = %tenant_id,
                    error = %err,
                    "savings guard produced an unbalanced entry"
                );
                Err(SavingsError::Internal(
                    "savings guard produced an unbalanced entry".to_string(),
                ))
            }
            Err(err) => Err(SavingsError::Ledger(err)),
        }
    }
}
