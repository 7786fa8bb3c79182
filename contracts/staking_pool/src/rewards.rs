use crate::storage::{PoolState, UserStakeRecord};
use crate::ContractError;

/// Fixed-point scaling factor.
///
/// `acc_reward_per_share` is stored multiplied by this constant so that
/// per-unit rewards smaller than one token survive integer division.
pub const PRECISION: i128 = 1_000_000_000_000;

// ── Scalar math ─────────────────────────────────────────────────────────────

/// Advance the per-share accumulator by `elapsed` ledgers of emission.
///
/// ```text
/// Δacc = reward_rate × elapsed × PRECISION / total_staked
/// ```
///
/// With nothing staked the accumulator is returned unchanged, which also
/// keeps the division well-defined. Returns `None` on overflow.
pub fn compute_reward_per_share(
    stored: i128,
    reward_rate: i128,
    elapsed: u64,
    total_staked: i128,
) -> Option<i128> {
    if total_staked <= 0 {
        return Some(stored);
    }

    let delta = reward_rate
        .checked_mul(i128::from(elapsed))?
        .checked_mul(PRECISION)?
        .checked_div(total_staked)?;

    stored.checked_add(delta)
}

/// Reward owed to a position since its last snapshot, plus what it already
/// had accrued.
///
/// ```text
/// earned = staked × (current_acc − reward_debt) / PRECISION + accrued
/// ```
pub fn earned(staked: i128, current_acc: i128, reward_debt: i128, accrued: i128) -> Option<i128> {
    let new_rewards = staked
        .checked_mul(current_acc.checked_sub(reward_debt)?)?
        .checked_div(PRECISION)?;

    accrued.checked_add(new_rewards)
}

// ── Pool / user synchronisation ─────────────────────────────────────────────

/// Bring `acc_reward_per_share` and `last_reward_time` up to `now`.
///
/// Only the part of `(last_reward_time, now]` that falls inside
/// `[start_time, bonus_end_time)` emits. Nothing accrues while the pool is
/// empty or rewards are stopped, but `last_reward_time` still moves forward
/// so that idle time is never paid out later.
pub fn sync_pool(pool: &mut PoolState, now: u64) -> Result<(), ContractError> {
    let upper = now.min(pool.bonus_end_time);
    let from = pool.last_reward_time.max(pool.start_time);

    if upper > from && pool.total_staked > 0 && pool.reward_enabled {
        pool.acc_reward_per_share = compute_reward_per_share(
            pool.acc_reward_per_share,
            pool.reward_per_time_unit,
            upper - from,
            pool.total_staked,
        )
        .ok_or(ContractError::ArithmeticOverflow)?;
    }

    if upper > pool.last_reward_time {
        pool.last_reward_time = upper;
    }

    Ok(())
}

/// Sync the pool, then fold everything `record` has earned since its last
/// snapshot into `pending_rewards_accrued`.
///
/// Must run before `record.amount` changes. Returns the record's pending
/// total after settlement.
pub fn settle_user(
    pool: &mut PoolState,
    record: &mut UserStakeRecord,
    now: u64,
) -> Result<i128, ContractError> {
    sync_pool(pool, now)?;

    record.pending_rewards_accrued = earned(
        record.amount,
        pool.acc_reward_per_share,
        record.reward_debt,
        record.pending_rewards_accrued,
    )
    .ok_or(ContractError::ArithmeticOverflow)?;
    record.reward_debt = pool.acc_reward_per_share;

    Ok(record.pending_rewards_accrued)
}

/// Read-only variant of [`settle_user`] working on copies.
pub fn pending_reward(
    pool: &PoolState,
    record: &UserStakeRecord,
    now: u64,
) -> Result<i128, ContractError> {
    let mut pool = pool.clone();
    let mut record = record.clone();
    settle_user(&mut pool, &mut record, now)
}
