#![no_std]

pub mod events;
pub mod rewards;
pub mod storage;

use soroban_sdk::{contract, contractimpl, token, Address, Env};

pub use storage::{PoolState, UserStakeRecord};

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    InvalidParameter = 5,
    LockTimeNotIncreasing = 6,
    BelowMinimumLockTime = 7,
    LockDurationTooLong = 8,
    WithdrawalLocked = 9,
    InsufficientStake = 10,
    InsufficientRewardReserve = 11,
    AssetTransferFailed = 12,
    ArithmeticOverflow = 13,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingPoolContract;

#[contractimpl]
impl StakingPoolContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `staked_asset` / `reward_asset` – SAC addresses, may be the same.
    /// * `reward_per_time_unit` – reward units emitted per ledger across all
    ///   stakers while inside `[start_time, bonus_end_time)`.
    /// * `min_lock_time` – shortest lock a deposit may request while locks
    ///   are enabled.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        staked_asset: Address,
        reward_asset: Address,
        reward_per_time_unit: i128,
        start_time: u64,
        bonus_end_time: u64,
        min_lock_time: u64,
        owner: Address,
    ) -> Result<(), ContractError> {
        if storage::has_pool(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        owner.require_auth();

        if reward_per_time_unit < 0 || bonus_end_time <= start_time {
            return Err(ContractError::InvalidParameter);
        }

        let pool = PoolState {
            owner: owner.clone(),
            staked_asset: staked_asset.clone(),
            reward_asset: reward_asset.clone(),
            reward_per_time_unit,
            start_time,
            bonus_end_time,
            pool_end_time: None,
            total_lock_time: None,
            min_lock_time,
            is_lock_enabled: true,
            reward_enabled: true,
            last_reward_time: Self::now(&env),
            acc_reward_per_share: 0,
            total_staked: 0,
            reward_reserve: 0,
        };
        storage::set_pool(&env, &pool);

        events::publish_initialized(
            &env,
            events::InitializedEvent {
                owner,
                staked_asset,
                reward_asset,
                reward_per_time_unit,
                start_time,
                bonus_end_time,
                min_lock_time,
            },
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` staked units and (re)lock the position for
    /// `lock_duration` ledgers.
    ///
    /// A zero amount is accepted and only settles rewards and refreshes the
    /// lock. Returns the user's pending reward after settlement.
    pub fn deposit(
        env: Env,
        user: Address,
        amount: i128,
        lock_duration: u64,
    ) -> Result<i128, ContractError> {
        let mut pool = Self::load_pool(&env)?;
        user.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut record = storage::get_user(&env, &user).unwrap_or_default();
        Self::check_lock_request(&pool, &record, lock_duration)?;

        // 1. Settle against the old stake before it changes.
        let now = Self::now(&env);
        let pending = rewards::settle_user(&mut pool, &mut record, now)?;

        // 2. Update the position in memory.
        if amount > 0 {
            record.amount = record
                .amount
                .checked_add(amount)
                .ok_or(ContractError::ArithmeticOverflow)?;
            pool.total_staked = pool
                .total_staked
                .checked_add(amount)
                .ok_or(ContractError::ArithmeticOverflow)?;
        }
        record.lock_duration = lock_duration;
        record.lock_until = now
            .checked_add(lock_duration)
            .ok_or(ContractError::ArithmeticOverflow)?;
        record.last_deposit_time = now;

        // 3. Pull the tokens; nothing has been written yet if this fails.
        if amount > 0 {
            Self::transfer(
                &env,
                &pool.staked_asset,
                &user,
                &env.current_contract_address(),
                amount,
            )?;
        }

        // 4. Commit.
        storage::set_pool(&env, &pool);
        storage::set_user(&env, &user, &record);

        events::publish_deposited(&env, user, amount, record.lock_until, pool.total_staked);

        Ok(pending)
    }

    /// Return `amount` staked units to `user` once their lock has expired.
    ///
    /// Settled but unclaimed reward stays on the record.
    pub fn withdraw(env: Env, user: Address, amount: i128) -> Result<(), ContractError> {
        let mut pool = Self::load_pool(&env)?;
        user.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut record = match storage::get_user(&env, &user) {
            Some(record) => record,
            None if amount == 0 => return Ok(()),
            None => return Err(ContractError::InsufficientStake),
        };
        if amount > record.amount {
            return Err(ContractError::InsufficientStake);
        }

        let now = Self::now(&env);
        if pool.is_lock_enabled && now < Self::unlock_time(&pool, &record) {
            return Err(ContractError::WithdrawalLocked);
        }

        rewards::settle_user(&mut pool, &mut record, now)?;

        record.amount = record
            .amount
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        if amount > 0 {
            Self::transfer(
                &env,
                &pool.staked_asset,
                &env.current_contract_address(),
                &user,
                amount,
            )?;
        }

        storage::set_pool(&env, &pool);
        storage::set_user(&env, &user, &record);

        events::publish_withdrawn(&env, user, amount, pool.total_staked);

        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out everything `user` has accrued from the reward reserve.
    ///
    /// Fails with `InsufficientRewardReserve` rather than paying a partial
    /// amount. Returns the amount transferred.
    pub fn claim(env: Env, user: Address) -> Result<i128, ContractError> {
        let mut pool = Self::load_pool(&env)?;
        user.require_auth();

        let Some(mut record) = storage::get_user(&env, &user) else {
            return Ok(0);
        };

        let owed = rewards::settle_user(&mut pool, &mut record, Self::now(&env))?;
        if owed > pool.reward_reserve {
            return Err(ContractError::InsufficientRewardReserve);
        }

        pool.reward_reserve -= owed;
        record.pending_rewards_accrued = 0;

        if owed > 0 {
            Self::transfer(
                &env,
                &pool.reward_asset,
                &env.current_contract_address(),
                &user,
                owed,
            )?;
        }

        storage::set_pool(&env, &pool);
        storage::set_user(&env, &user, &record);

        events::publish_reward_claimed(&env, user, owed);

        Ok(owed)
    }

    /// Move `amount` reward units from `funder` into the reward reserve.
    /// Returns the new reserve.
    pub fn fund_rewards(env: Env, funder: Address, amount: i128) -> Result<i128, ContractError> {
        let mut pool = Self::load_pool(&env)?;
        funder.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        pool.reward_reserve = pool
            .reward_reserve
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        Self::transfer(
            &env,
            &pool.reward_asset,
            &funder,
            &env.current_contract_address(),
            amount,
        )?;

        storage::set_pool(&env, &pool);

        events::publish_rewards_funded(&env, funder, amount, pool.reward_reserve);

        Ok(pool.reward_reserve)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Reward `user` would receive from a `claim` at the current ledger.
    pub fn pending_reward(env: Env, user: Address) -> Result<i128, ContractError> {
        let (Some(pool), Some(record)) = (storage::get_pool(&env), storage::get_user(&env, &user))
        else {
            return Ok(0);
        };
        rewards::pending_reward(&pool, &record, Self::now(&env))
    }

    /// Return the user's stake record; never-seen users get a zeroed record.
    pub fn user_info(env: Env, user: Address) -> UserStakeRecord {
        storage::get_user(&env, &user).unwrap_or_default()
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::has_pool(&env)
    }

    pub fn pool_state(env: Env) -> Result<PoolState, ContractError> {
        Self::load_pool(&env)
    }

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        Self::load_pool(&env).map(|pool| pool.owner)
    }

    pub fn staked_asset(env: Env) -> Result<Address, ContractError> {
        Self::load_pool(&env).map(|pool| pool.staked_asset)
    }

    pub fn reward_asset(env: Env) -> Result<Address, ContractError> {
        Self::load_pool(&env).map(|pool| pool.reward_asset)
    }

    pub fn reward_per_time_unit(env: Env) -> Result<i128, ContractError> {
        Self::load_pool(&env).map(|pool| pool.reward_per_time_unit)
    }

    pub fn start_time(env: Env) -> Result<u64, ContractError> {
        Self::load_pool(&env).map(|pool| pool.start_time)
    }

    pub fn bonus_end_time(env: Env) -> Result<u64, ContractError> {
        Self::load_pool(&env).map(|pool| pool.bonus_end_time)
    }

    pub fn min_lock_time(env: Env) -> Result<u64, ContractError> {
        Self::load_pool(&env).map(|pool| pool.min_lock_time)
    }

    pub fn total_lock_time(env: Env) -> Result<Option<u64>, ContractError> {
        Self::load_pool(&env).map(|pool| pool.total_lock_time)
    }

    pub fn pool_end_time(env: Env) -> Result<Option<u64>, ContractError> {
        Self::load_pool(&env).map(|pool| pool.pool_end_time)
    }

    pub fn is_lock_enabled(env: Env) -> Result<bool, ContractError> {
        Self::load_pool(&env).map(|pool| pool.is_lock_enabled)
    }

    pub fn is_reward_enabled(env: Env) -> Result<bool, ContractError> {
        Self::load_pool(&env).map(|pool| pool.reward_enabled)
    }

    pub fn total_staked(env: Env) -> Result<i128, ContractError> {
        Self::load_pool(&env).map(|pool| pool.total_staked)
    }

    pub fn reward_reserve(env: Env) -> Result<i128, ContractError> {
        Self::load_pool(&env).map(|pool| pool.reward_reserve)
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Change the emission rate.
    ///
    /// The accumulator is flushed at the old rate first, so rewards already
    /// earned are not repriced.
    pub fn update_reward_per_time_unit(
        env: Env,
        caller: Address,
        new_rate: i128,
    ) -> Result<(), ContractError> {
        let mut pool = Self::load_owned_pool(&env, &caller)?;

        if new_rate < 0 {
            return Err(ContractError::InvalidParameter);
        }

        rewards::sync_pool(&mut pool, Self::now(&env))?;
        pool.reward_per_time_unit = new_rate;
        storage::set_pool(&env, &pool);

        events::publish_reward_rate_set(&env, new_rate);

        Ok(())
    }

    /// Stop enforcing lock durations on deposit and withdrawal.
    pub fn set_lock_disable(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::set_lock_enabled(&env, &caller, false)
    }

    pub fn set_lock_enable(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::set_lock_enabled(&env, &caller, true)
    }

    /// Freeze accrual. Already-settled and already-accumulated rewards stay
    /// claimable; principal stays withdrawable.
    pub fn stop_reward(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::set_reward_enabled(&env, &caller, false)
    }

    /// Resume accrual from the current ledger. The stopped interval never
    /// pays out.
    pub fn resume_reward(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::set_reward_enabled(&env, &caller, true)
    }

    /// Replace the emission window. Applies from the current ledger onward;
    /// time that has already passed is never re-emitted.
    pub fn update_start_and_end_times(
        env: Env,
        caller: Address,
        new_start: u64,
        new_end: u64,
    ) -> Result<(), ContractError> {
        let mut pool = Self::load_owned_pool(&env, &caller)?;

        if new_end <= new_start {
            return Err(ContractError::InvalidParameter);
        }

        let now = Self::now(&env);
        rewards::sync_pool(&mut pool, now)?;
        pool.start_time = new_start;
        pool.bonus_end_time = new_end;
        pool.last_reward_time = now;
        storage::set_pool(&env, &pool);

        events::publish_reward_window_set(&env, new_start, new_end);

        Ok(())
    }

    pub fn set_min_lock_time(env: Env, caller: Address, value: u64) -> Result<(), ContractError> {
        let mut pool = Self::load_owned_pool(&env, &caller)?;

        if pool.total_lock_time.is_some_and(|max| value > max) {
            return Err(ContractError::InvalidParameter);
        }

        pool.min_lock_time = value;
        storage::set_pool(&env, &pool);

        events::publish_min_lock_time_set(&env, value);

        Ok(())
    }

    /// Cap the lock duration a deposit may request.
    pub fn set_total_lock_time(env: Env, caller: Address, value: u64) -> Result<(), ContractError> {
        let mut pool = Self::load_owned_pool(&env, &caller)?;

        if value == 0 || value < pool.min_lock_time {
            return Err(ContractError::InvalidParameter);
        }

        pool.total_lock_time = Some(value);
        storage::set_pool(&env, &pool);

        events::publish_total_lock_time_set(&env, value);

        Ok(())
    }

    /// Set the ledger after which every lock is considered expired.
    pub fn set_pool_end_time(env: Env, caller: Address, value: u64) -> Result<(), ContractError> {
        let mut pool = Self::load_owned_pool(&env, &caller)?;

        if value <= Self::now(&env) {
            return Err(ContractError::InvalidParameter);
        }

        pool.pool_end_time = Some(value);
        storage::set_pool(&env, &pool);

        events::publish_pool_end_time_set(&env, value);

        Ok(())
    }

    /// Pull `amount` of unclaimed reserve back to the owner.
    pub fn emergency_reward_withdraw(
        env: Env,
        caller: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        let mut pool = Self::load_owned_pool(&env, &caller)?;

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        if amount > pool.reward_reserve {
            return Err(ContractError::InsufficientRewardReserve);
        }

        pool.reward_reserve -= amount;

        Self::transfer(
            &env,
            &pool.reward_asset,
            &env.current_contract_address(),
            &caller,
            amount,
        )?;

        storage::set_pool(&env, &pool);

        events::publish_reserve_withdrawn(&env, caller, amount, pool.reward_reserve);

        Ok(())
    }

    /// Hand the owner role to `new_owner` in a single step.
    pub fn transfer_ownership(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        let mut pool = Self::load_owned_pool(&env, &caller)?;

        if new_owner == env.current_contract_address() {
            return Err(ContractError::InvalidParameter);
        }

        let old_owner = pool.owner.clone();
        pool.owner = new_owner.clone();
        storage::set_pool(&env, &pool);

        events::publish_ownership_transferred(&env, old_owner, new_owner);

        Ok(())
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// The pool clock: the current ledger sequence.
    fn now(env: &Env) -> u64 {
        u64::from(env.ledger().sequence())
    }

    /// Guard: revert if the pool is not yet initialized.
    fn load_pool(env: &Env) -> Result<PoolState, ContractError> {
        storage::get_pool(env).ok_or(ContractError::NotInitialized)
    }

    /// Guard: authenticate `caller` and revert unless it is the pool owner.
    fn load_owned_pool(env: &Env, caller: &Address) -> Result<PoolState, ContractError> {
        let pool = Self::load_pool(env)?;
        caller.require_auth();
        if *caller != pool.owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(pool)
    }

    /// Lock-duration rules for a deposit. A fresh position must meet
    /// `min_lock_time`; an existing one may not shorten its recorded lock.
    /// Skipped entirely while locks are disabled.
    fn check_lock_request(
        pool: &PoolState,
        record: &UserStakeRecord,
        lock_duration: u64,
    ) -> Result<(), ContractError> {
        if !pool.is_lock_enabled {
            return Ok(());
        }
        if record.has_position() {
            // A cap lowered below the recorded duration lowers the floor too.
            let floor = pool
                .total_lock_time
                .map_or(record.lock_duration, |max| record.lock_duration.min(max));
            if lock_duration < floor {
                return Err(ContractError::LockTimeNotIncreasing);
            }
        } else if lock_duration < pool.min_lock_time {
            return Err(ContractError::BelowMinimumLockTime);
        }
        if pool.total_lock_time.is_some_and(|max| lock_duration > max) {
            return Err(ContractError::LockDurationTooLong);
        }
        Ok(())
    }

    /// Ledger from which `record` may withdraw; `pool_end_time` caps it.
    fn unlock_time(pool: &PoolState, record: &UserStakeRecord) -> u64 {
        pool.pool_end_time
            .map_or(record.lock_until, |end| end.min(record.lock_until))
    }

    fn set_lock_enabled(env: &Env, caller: &Address, enabled: bool) -> Result<(), ContractError> {
        let mut pool = Self::load_owned_pool(env, caller)?;
        pool.is_lock_enabled = enabled;
        storage::set_pool(env, &pool);

        events::publish_lock_enabled_set(env, enabled);

        Ok(())
    }

    /// Flushes the accumulator under the current setting before flipping it.
    fn set_reward_enabled(env: &Env, caller: &Address, enabled: bool) -> Result<(), ContractError> {
        let mut pool = Self::load_owned_pool(env, caller)?;
        rewards::sync_pool(&mut pool, Self::now(env))?;
        pool.reward_enabled = enabled;
        storage::set_pool(env, &pool);

        events::publish_reward_enabled_set(env, enabled);

        Ok(())
    }

    /// Move `amount` of `asset` through its token contract, surfacing any
    /// failure as `AssetTransferFailed`.
    fn transfer(
        env: &Env,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        match token::Client::new(env, asset).try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::AssetTransferFailed),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin;
