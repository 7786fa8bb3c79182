#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the pool is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub staked_asset: Address,
    pub reward_asset: Address,
    pub reward_per_time_unit: i128,
    pub start_time: u64,
    pub bonus_end_time: u64,
    pub min_lock_time: u64,
}

/// Fired when a user deposits stake (including zero-amount harvests).
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub user: Address,
    pub amount: i128,
    pub lock_until: u64,
    pub new_total_staked: i128,
    pub ledger: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub user: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub ledger: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub user: Address,
    pub amount: i128,
    pub ledger: u64,
}

/// Fired when reward units move into or out of the reserve outside a claim.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveChangedEvent {
    pub account: Address,
    pub amount: i128,
    pub new_reserve: i128,
    pub ledger: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardWindowSetEvent {
    pub start_time: u64,
    pub bonus_end_time: u64,
    pub ledger: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferredEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub ledger: u64,
}

fn ledger(env: &Env) -> u64 {
    u64::from(env.ledger().sequence())
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, event: InitializedEvent) {
    env.events().publish((symbol_short!("INIT"),), event);
}

pub fn publish_deposited(
    env: &Env,
    user: Address,
    amount: i128,
    lock_until: u64,
    new_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), user.clone()),
        DepositedEvent {
            user,
            amount,
            lock_until,
            new_total_staked,
            ledger: ledger(env),
        },
    );
}

pub fn publish_withdrawn(env: &Env, user: Address, amount: i128, new_total_staked: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), user.clone()),
        WithdrawnEvent {
            user,
            amount,
            new_total_staked,
            ledger: ledger(env),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, user: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLMD"), user.clone()),
        RewardClaimedEvent {
            user,
            amount,
            ledger: ledger(env),
        },
    );
}

pub fn publish_rewards_funded(env: &Env, funder: Address, amount: i128, new_reserve: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"), funder.clone()),
        ReserveChangedEvent {
            account: funder,
            amount,
            new_reserve,
            ledger: ledger(env),
        },
    );
}

pub fn publish_reserve_withdrawn(env: &Env, owner: Address, amount: i128, new_reserve: i128) {
    env.events().publish(
        (symbol_short!("RSV_WDR"), owner.clone()),
        ReserveChangedEvent {
            account: owner,
            amount,
            new_reserve,
            ledger: ledger(env),
        },
    );
}

pub fn publish_reward_rate_set(env: &Env, new_rate: i128) {
    env.events()
        .publish((symbol_short!("RWD_RATE"),), (new_rate, ledger(env)));
}

pub fn publish_lock_enabled_set(env: &Env, enabled: bool) {
    env.events()
        .publish((symbol_short!("LOCK_EN"),), (enabled, ledger(env)));
}

pub fn publish_reward_enabled_set(env: &Env, enabled: bool) {
    env.events()
        .publish((symbol_short!("RWD_EN"),), (enabled, ledger(env)));
}

pub fn publish_reward_window_set(env: &Env, start_time: u64, bonus_end_time: u64) {
    env.events().publish(
        (symbol_short!("WINDOW"),),
        RewardWindowSetEvent {
            start_time,
            bonus_end_time,
            ledger: ledger(env),
        },
    );
}

pub fn publish_min_lock_time_set(env: &Env, value: u64) {
    env.events()
        .publish((symbol_short!("MIN_LOCK"),), (value, ledger(env)));
}

pub fn publish_total_lock_time_set(env: &Env, value: u64) {
    env.events()
        .publish((symbol_short!("TOT_LOCK"),), (value, ledger(env)));
}

pub fn publish_pool_end_time_set(env: &Env, value: u64) {
    env.events()
        .publish((symbol_short!("POOL_END"),), (value, ledger(env)));
}

pub fn publish_ownership_transferred(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWNER"), new_owner.clone()),
        OwnershipTransferredEvent {
            old_owner,
            new_owner,
            ledger: ledger(env),
        },
    );
}
