//! In-memory store and fake collaborators.
//!
//! Compiled for this crate's tests and, through the `testing` feature, for
//! downstream test suites.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use mudra_shared::{Advisor, AdvisorError, EmailError, OtpMailer, Recommendations};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::{IssuedOtp, NewUser, User, UserStore};
use crate::budget::{Budget, BudgetInput, BudgetSpending, BudgetStore};
use crate::category::Category;
use crate::dashboard::{CategoryTotal, DateWindow, MonthlyTotal, SummaryStore};
use crate::goals::{Goal, GoalInput, GoalStore};
use crate::ledger::{Transaction, TransactionInput, TransactionStore};
use crate::money::MAX_AMOUNT;
use crate::period::MonthPeriod;
use crate::risk::RiskProfile;
use crate::store::{StoreError, StoreResult, Stores};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn in_window(window: DateWindow, date: NaiveDate) -> bool {
    window.from <= date && date < window.to
}

/// Every store trait backed by in-process maps.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    transactions: Mutex<Vec<Transaction>>,
    budgets: Mutex<Vec<Budget>>,
    goals: Mutex<Vec<Goal>>,
}

impl InMemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The same store behind every trait.
    #[must_use]
    pub fn stores(self: &Arc<Self>) -> Stores {
        Stores {
            users: self.clone(),
            transactions: self.clone(),
            budgets: self.clone(),
            goals: self.clone(),
            summaries: self.clone(),
        }
    }

    /// Snapshot of an account, by id.
    #[must_use]
    pub fn user(&self, id: Uuid) -> Option<User> {
        lock(&self.users).get(&id).cloned()
    }

    /// Moves an account's code expiry into the past.
    pub fn expire_otp(&self, user_id: Uuid) {
        if let Some(user) = lock(&self.users).get_mut(&user_id) {
            user.otp_expires_at = Some(Utc::now() - chrono::Duration::seconds(1));
        }
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(lock(&self.users)
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut users = lock(&self.users);
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".into()));
        }

        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            is_verified: false,
            otp_code: Some(user.otp.code),
            otp_expires_at: Some(user.otp.expires_at),
            risk_profile: None,
            created_at: Utc::now(),
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn reissue_otp(
        &self,
        user_id: Uuid,
        password_hash: &str,
        otp: &IssuedOtp,
    ) -> StoreResult<Option<User>> {
        let mut users = lock(&self.users);
        Ok(users
            .get_mut(&user_id)
            .filter(|u| !u.is_verified)
            .map(|u| {
                u.password_hash = password_hash.to_string();
                u.otp_code = Some(otp.code.clone());
                u.otp_expires_at = Some(otp.expires_at);
                u.clone()
            }))
    }

    async fn consume_otp(&self, user_id: Uuid, code: &str) -> StoreResult<Option<User>> {
        let mut users = lock(&self.users);
        Ok(users
            .get_mut(&user_id)
            .filter(|u| u.otp_code.as_deref() == Some(code))
            .map(|u| {
                u.is_verified = true;
                u.otp_code = None;
                u.otp_expires_at = None;
                u.clone()
            }))
    }

    async fn set_risk_profile(&self, user_id: Uuid, risk_profile: &str) -> StoreResult<()> {
        if let Some(user) = lock(&self.users).get_mut(&user_id) {
            user.risk_profile = Some(risk_profile.to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn insert(&self, user_id: Uuid, input: &TransactionInput) -> StoreResult<Transaction> {
        let tx = Transaction {
            id: Uuid::new_v4(),
            user_id,
            amount: input.amount,
            category: input.category,
            description: input.description.clone(),
            transaction_date: input.transaction_date,
            created_at: Utc::now(),
        };
        lock(&self.transactions).push(tx.clone());
        Ok(tx)
    }

    async fn list(&self, user_id: Uuid) -> StoreResult<Vec<Transaction>> {
        let mut rows: Vec<_> = lock(&self.transactions)
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        // Insertion order breaks created_at ties.
        rows.reverse();
        rows.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(rows)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: &TransactionInput,
    ) -> StoreResult<Option<Transaction>> {
        let mut rows = lock(&self.transactions);
        Ok(rows
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
            .map(|t| {
                t.amount = input.amount;
                t.category = input.category;
                t.description.clone_from(&input.description);
                t.transaction_date = input.transaction_date;
                t.clone()
            }))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut rows = lock(&self.transactions);
        let before = rows.len();
        rows.retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(rows.len() != before)
    }
}

#[async_trait]
impl BudgetStore for InMemoryStore {
    async fn upsert(&self, user_id: Uuid, input: &BudgetInput) -> StoreResult<Budget> {
        let mut budgets = lock(&self.budgets);
        let month = input.period.month();
        let year = input.period.year();

        if let Some(existing) = budgets.iter_mut().find(|b| {
            b.user_id == user_id && b.category == input.category && b.month == month && b.year == year
        }) {
            existing.limit_amount = input.limit_amount;
            return Ok(existing.clone());
        }

        let budget = Budget {
            id: Uuid::new_v4(),
            user_id,
            category: input.category,
            limit_amount: input.limit_amount,
            month,
            year,
            created_at: Utc::now(),
        };
        budgets.push(budget.clone());
        Ok(budget)
    }

    async fn with_spending(
        &self,
        user_id: Uuid,
        period: MonthPeriod,
    ) -> StoreResult<Vec<BudgetSpending>> {
        let (from, to) = period.date_range();
        let transactions = lock(&self.transactions);

        let mut rows: Vec<_> = lock(&self.budgets)
            .iter()
            .filter(|b| b.user_id == user_id && b.month == period.month() && b.year == period.year())
            .map(|b| BudgetSpending {
                budget: b.clone(),
                total_spent: transactions
                    .iter()
                    .filter(|t| {
                        t.user_id == user_id
                            && t.category == b.category
                            && from <= t.transaction_date
                            && t.transaction_date < to
                    })
                    .map(|t| t.amount)
                    .sum(),
            })
            .collect();
        rows.sort_by_key(|r| r.budget.category.as_str());
        Ok(rows)
    }

    async fn update_limit(
        &self,
        user_id: Uuid,
        id: Uuid,
        limit_amount: Decimal,
    ) -> StoreResult<Option<Budget>> {
        let mut budgets = lock(&self.budgets);
        Ok(budgets
            .iter_mut()
            .find(|b| b.id == id && b.user_id == user_id)
            .map(|b| {
                b.limit_amount = limit_amount;
                b.clone()
            }))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut budgets = lock(&self.budgets);
        let before = budgets.len();
        budgets.retain(|b| !(b.id == id && b.user_id == user_id));
        Ok(budgets.len() != before)
    }
}

#[async_trait]
impl GoalStore for InMemoryStore {
    async fn insert(&self, user_id: Uuid, input: &GoalInput) -> StoreResult<Goal> {
        let goal = Goal {
            id: Uuid::new_v4(),
            user_id,
            goal_name: input.goal_name.clone(),
            target_amount: input.target_amount,
            current_amount: Decimal::ZERO,
            target_date: input.target_date,
            created_at: Utc::now(),
        };
        lock(&self.goals).push(goal.clone());
        Ok(goal)
    }

    async fn list(&self, user_id: Uuid) -> StoreResult<Vec<Goal>> {
        let mut rows: Vec<_> = lock(&self.goals)
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        rows.reverse();
        // `None` sorts before `Some`, so key on `is_none` first for nulls last.
        rows.sort_by(|a, b| {
            (a.target_date.is_none(), a.target_date)
                .cmp(&(b.target_date.is_none(), b.target_date))
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(rows)
    }

    async fn contribute(
        &self,
        user_id: Uuid,
        id: Uuid,
        amount: Decimal,
    ) -> StoreResult<Option<Goal>> {
        let mut goals = lock(&self.goals);
        let Some(goal) = goals
            .iter_mut()
            .find(|g| g.id == id && g.user_id == user_id)
        else {
            return Ok(None);
        };
        match goal.current_amount.checked_add(amount) {
            Some(total) if total <= MAX_AMOUNT => {
                goal.current_amount = total;
                Ok(Some(goal.clone()))
            }
            _ => Err(StoreError::OutOfRange("goals.current_amount".into())),
        }
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut goals = lock(&self.goals);
        let before = goals.len();
        goals.retain(|g| !(g.id == id && g.user_id == user_id));
        Ok(goals.len() != before)
    }
}

#[async_trait]
impl SummaryStore for InMemoryStore {
    async fn spending_by_category(
        &self,
        user_id: Uuid,
        window: DateWindow,
    ) -> StoreResult<Vec<CategoryTotal>> {
        let mut totals: BTreeMap<Category, Decimal> = BTreeMap::new();
        for t in lock(&self.transactions)
            .iter()
            .filter(|t| t.user_id == user_id && in_window(window, t.transaction_date))
        {
            *totals.entry(t.category).or_default() += t.amount;
        }
        Ok(totals
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect())
    }

    async fn monthly_spending(
        &self,
        user_id: Uuid,
        window: DateWindow,
    ) -> StoreResult<Vec<MonthlyTotal>> {
        let mut totals: BTreeMap<MonthPeriod, Decimal> = BTreeMap::new();
        for t in lock(&self.transactions)
            .iter()
            .filter(|t| t.user_id == user_id && in_window(window, t.transaction_date))
        {
            *totals
                .entry(MonthPeriod::containing(t.transaction_date))
                .or_default() += t.amount;
        }
        Ok(totals
            .into_iter()
            .map(|(month, total)| MonthlyTotal {
                month: month.to_string(),
                total,
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
struct SentOtp {
    to: String,
    code: String,
    valid_for: chrono::Duration,
}

/// Mailer that records every code instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentOtp>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    /// A mailer that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail.
    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Most recent code sent to `email`.
    #[must_use]
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        lock(&self.sent)
            .iter()
            .rev()
            .find(|sent| sent.to == email)
            .map(|sent| sent.code.clone())
    }

    /// Lifetime stated in the most recent mail to `email`.
    #[must_use]
    pub fn last_lifetime_for(&self, email: &str) -> Option<chrono::Duration> {
        lock(&self.sent)
            .iter()
            .rev()
            .find(|sent| sent.to == email)
            .map(|sent| sent.valid_for)
    }

    /// Number of codes sent.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        lock(&self.sent).len()
    }
}

#[async_trait]
impl OtpMailer for RecordingMailer {
    async fn send_otp(
        &self,
        to_email: &str,
        otp: &str,
        valid_for: chrono::Duration,
    ) -> Result<(), EmailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmailError::SendError("mailbox unavailable".into()));
        }
        lock(&self.sent).push(SentOtp {
            to: to_email.to_string(),
            code: otp.to_string(),
            valid_for,
        });
        Ok(())
    }
}

/// Which advisor call a [`StubAdvisor`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvisorFailure {
    /// Both calls succeed.
    #[default]
    None,
    /// `risk_profile` times out.
    RiskProfile,
    /// `recommendations` answers 503.
    Recommendations,
}

/// Advisor that scores locally and serves the built-in catalogue.
#[derive(Debug, Default)]
pub struct StubAdvisor {
    failure: AdvisorFailure,
    calls: AtomicUsize,
}

impl StubAdvisor {
    /// A stub that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A stub that fails the given call.
    #[must_use]
    pub fn failing(failure: AdvisorFailure) -> Self {
        Self {
            failure,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Advisor for StubAdvisor {
    async fn risk_profile(&self, answers: &[i32]) -> Result<String, AdvisorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failure == AdvisorFailure::RiskProfile {
            return Err(AdvisorError::Timeout);
        }
        Ok(RiskProfile::from_answers(answers).to_string())
    }

    async fn recommendations(&self, risk_profile: &str) -> Result<Recommendations, AdvisorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failure == AdvisorFailure::Recommendations {
            return Err(AdvisorError::Status(503));
        }
        risk_profile
            .parse::<RiskProfile>()
            .map(|p| p.recommendations())
            .map_err(|_| AdvisorError::Status(400))
    }
}
