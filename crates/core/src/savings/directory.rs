//! Member and savings-chart storage ports.

use dashmap::DashMap;
use rust_decimal::Decimal;
use kopra_shared::types::{AccountId, MemberId, TenantId};
use kopra_shared::StoreError;

use super::types::{Member, MemberStatus, SavingsType};

/// Member registry port.
///
/// Lookups are tenant-scoped: a member of another tenant is indistinguishable
/// from a missing one.
pub trait MemberDirectory: Send + Sync {
    /// Fetches a member owned by the tenant.
    fn member(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
    ) -> Result<Option<Member>, StoreError>;

    /// Returns the member's outstanding loan principal.
    fn outstanding_loan_balance(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
    ) -> Result<Decimal, StoreError>;
}

/// Maps savings movements onto the tenant's chart of accounts.
pub trait SavingsChart: Send + Sync {
    /// The tenant's cash account.
    fn cash_account(&self, tenant_id: TenantId) -> Result<Option<AccountId>, StoreError>;

    /// The member's savings subaccount for the given type.
    fn savings_account(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
        savings_type: SavingsType,
    ) -> Result<Option<AccountId>, StoreError>;
}

/// In-memory member directory and savings chart for tests and embedded use.
#[derive(Debug, Default)]
pub struct InMemoryMemberDirectory {
    members: DashMap<MemberId, Member>,
    loans: DashMap<(TenantId, MemberId), Decimal>,
    cash_accounts: DashMap<TenantId, AccountId>,
    savings_accounts: DashMap<(TenantId, MemberId, SavingsType), AccountId>,
}

impl InMemoryMemberDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a member.
    pub fn register_member(&self, member: Member) {
        self.members.insert(member.id, member);
    }

    /// Updates a member's status.
    pub fn set_member_status(&self, member_id: MemberId, status: MemberStatus) {
        if let Some(mut member) = self.members.get_mut(&member_id) {
            member.status = status;
        }
    }

    /// Records a member's outstanding loan principal.
    pub fn set_loan_balance(&self, tenant_id: TenantId, member_id: MemberId, balance: Decimal) {
        self.loans.insert((tenant_id, member_id), balance);
    }

    /// Sets the tenant's cash account.
    pub fn set_cash_account(&self, tenant_id: TenantId, account_id: AccountId) {
        self.cash_accounts.insert(tenant_id, account_id);
    }

    /// Maps a member's savings subaccount for one savings type.
    pub fn map_savings_account(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
        savings_type: SavingsType,
        account_id: AccountId,
    ) {
        self.savings_accounts
            .insert((tenant_id, member_id, savings_type), account_id);
    }
}

impl MemberDirectory for InMemoryMemberDirectory {
    fn member(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
    ) -> Result<Option<Member>, StoreError> {
        Ok(self
            .members
            .get(&member_id)
            .filter(|member| member.tenant_id == tenant_id)
            .map(|member| member.clone()))
    }

    fn outstanding_loan_balance(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
    ) -> Result<Decimal, StoreError> {
        Ok(self
            .loans
            .get(&(tenant_id, member_id))
            .map_or(Decimal::ZERO, |balance| *balance))
    }
}

impl SavingsChart for InMemoryMemberDirectory {
    fn cash_account(&self, tenant_id: TenantId) -> Result<Option<AccountId>, StoreError> {
        Ok(self.cash_accounts.get(&tenant_id).map(|id| *id))
    }

    fn savings_account(
        &self,
        tenant_id: TenantId,
        member_id: MemberId,
        savings_type: SavingsType,
    ) -> Result<Option<AccountId>, StoreError> {
        Ok(self
            .savings_accounts
            .get(&(tenant_id, member_id, savings_type))
            .map(|id| *id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(tenant_id: TenantId) -> Member {
        Member {
            id: MemberId::new(),
            tenant_id,
            member_number: "M-0001".to_string(),
            name: "Siti Rahayu".to_string(),
            status: MemberStatus::Active,
        }
    }

    #[test]
    fn test_member_lookup_is_tenant_scoped() {
        let directory = InMemoryMemberDirectory::new();
        let (a, b) = (TenantId::new(), TenantId::new());
        let m = member(a);
        let member_id = m.id;
        directory.register_member(m);

        assert!(directory.member(a, member_id).unwrap().is_some());
        assert!(directory.member(b, member_id).unwrap().is_none());
    }

    #[test]
    fn test_loan_balance_defaults_to_zero() {
        let directory = InMemoryMemberDirectory::new();
        let tenant_id = TenantId::new();
        let member_id = MemberId::new();
        assert_eq!(
            directory
                .outstanding_loan_balance(tenant_id, member_id)
                .unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_savings_account_mapping() {
        let directory = InMemoryMemberDirectory::new();
        let tenant_id = TenantId::new();
        let member_id = MemberId::new();
        let account_id = AccountId::new();

        directory.map_savings_account(tenant_id, member_id, SavingsType::Sukarela, account_id);

        assert_eq!(
            directory
                .savings_account(tenant_id, member_id, SavingsType::Sukarela)
                .unwrap(),
            Some(account_id)
        );
        assert!(directory
            .savings_account(tenant_id, member_id, SavingsType::Wajib)
            .unwrap()
            .is_none());
    }
}
