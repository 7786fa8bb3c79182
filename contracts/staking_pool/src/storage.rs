use soroban_sdk::{contracttype, Address, Env};

// ── TTL (in ledgers, ~5 seconds each) ───────────────────────────────────────

const INSTANCE_TTL_THRESHOLD: u32 = 17_280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518_400; // ~30 days
const USER_TTL_THRESHOLD: u32 = 17_280;
const USER_TTL_EXTEND: u32 = 518_400;

// ── Storage keys ────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Pool,
    User(Address),
}

// ── Records ─────────────────────────────────────────────────────────────────

/// Pool configuration together with the aggregate accrual state.
///
/// Stored as a single instance entry so every operation reads and writes it
/// as one unit.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    pub owner: Address,
    pub staked_asset: Address,
    pub reward_asset: Address,
    /// Reward units emitted per ledger across the whole pool.
    pub reward_per_time_unit: i128,
    pub start_time: u64,
    /// Exclusive end of the emission window.
    pub bonus_end_time: u64,
    pub pool_end_time: Option<u64>,
    pub total_lock_time: Option<u64>,
    pub min_lock_time: u64,
    pub is_lock_enabled: bool,
    pub reward_enabled: bool,
    pub last_reward_time: u64,
    /// Cumulative reward per staked unit, scaled by `rewards::PRECISION`.
    pub acc_reward_per_share: i128,
    pub total_staked: i128,
    /// Reward units held for claims, kept apart from staked principal.
    pub reward_reserve: i128,
}

/// One participant's position. Created on the first deposit and never
/// removed, even once `amount` returns to zero.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserStakeRecord {
    pub amount: i128,
    /// `acc_reward_per_share` at this user's last settlement.
    pub reward_debt: i128,
    pub pending_rewards_accrued: i128,
    pub lock_until: u64,
    pub lock_duration: u64,
    pub last_deposit_time: u64,
}

impl UserStakeRecord {
    /// A record that has never locked anything counts as a fresh position.
    pub fn has_position(&self) -> bool {
        self.amount > 0 || self.lock_until > 0
    }
}

// ── Pool ────────────────────────────────────────────────────────────────────

pub fn has_pool(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Pool)
}

pub fn get_pool(env: &Env) -> Option<PoolState> {
    env.storage().instance().get(&DataKey::Pool)
}

pub fn set_pool(env: &Env, pool: &PoolState) {
    env.storage().instance().set(&DataKey::Pool, pool);
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

// ── Users ───────────────────────────────────────────────────────────────────

pub fn get_user(env: &Env, user: &Address) -> Option<UserStakeRecord> {
    let key = DataKey::User(user.clone());
    let record: Option<UserStakeRecord> = env.storage().persistent().get(&key);
    if record.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, USER_TTL_THRESHOLD, USER_TTL_EXTEND);
    }
    record
}

pub fn set_user(env: &Env, user: &Address, record: &UserStakeRecord) {
    let key = DataKey::User(user.clone());
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, USER_TTL_THRESHOLD, USER_TTL_EXTEND);
}
