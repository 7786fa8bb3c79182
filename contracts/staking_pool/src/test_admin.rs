extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

use crate::{ContractError, StakingPoolContract, StakingPoolContractClient};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Pool with rate 10 over `[0, 1_000)`, min lock 10, a funded reserve and one
/// user holding 1_000 staked units at ledger 0.
fn setup() -> (
    Env,
    StakingPoolContractClient<'static>,
    Address, // owner
    Address, // user
    Address, // reward_token
) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(0);

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(StakingPoolContract, ());
    let client = StakingPoolContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(&stake_token, &reward_token, &10, &0, &1_000, &10, &owner);

    StellarAssetClient::new(&env, &reward_token).mint(&owner, &1_000_000);
    client.fund_rewards(&owner, &1_000_000);

    let user = Address::generate(&env);
    StellarAssetClient::new(&env, &stake_token).mint(&user, &1_000);
    client.deposit(&user, &1_000, &10);

    (env, client, owner, user, reward_token)
}

fn assert_unauthorized<T, C>(result: Result<T, Result<ContractError, C>>) {
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

fn assert_invalid<T, C>(result: Result<T, Result<ContractError, C>>) {
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidParameter),
        _ => unreachable!("Expected InvalidParameter error"),
    }
}

// ── Reward rate ───────────────────────────────────────────────────────────────

#[test]
fn test_update_reward_rate_by_owner() {
    let (env, client, owner, user, _) = setup();

    // Owner halves the rate at ledger 50.
    env.ledger().set_sequence_number(50);
    client.update_reward_per_time_unit(&owner, &5);
    assert_eq!(client.reward_per_time_unit(), 5);

    // 10 × 50 at the old rate, then 5 × 100 at the new one.
    env.ledger().set_sequence_number(150);
    assert_eq!(client.pending_reward(&user), 1_000);
}

#[test]
fn test_update_reward_rate_by_non_owner_fails() {
    let (env, client, _owner, user, _) = setup();

    let intruder = Address::generate(&env);
    assert_unauthorized(client.try_update_reward_per_time_unit(&intruder, &999));
    assert_unauthorized(client.try_update_reward_per_time_unit(&user, &999));
    assert_eq!(client.reward_per_time_unit(), 10);
}

#[test]
fn test_negative_reward_rate_rejected() {
    let (_env, client, owner, _, _) = setup();
    assert_invalid(client.try_update_reward_per_time_unit(&owner, &-1));
}

#[test]
fn test_reward_rate_zero_stops_emission() {
    let (env, client, owner, user, _) = setup();

    env.ledger().set_sequence_number(50);
    client.update_reward_per_time_unit(&owner, &0);

    env.ledger().set_sequence_number(900);
    assert_eq!(client.pending_reward(&user), 500);
}

// ── Lock & reward switches ────────────────────────────────────────────────────

#[test]
fn test_lock_toggle_round_trip() {
    let (env, client, owner, user, _) = setup();

    client.set_lock_disable(&owner);
    assert!(!client.is_lock_enabled());

    // Unlocked immediately while locks are off.
    client.withdraw(&user, &100);

    client.set_lock_enable(&owner);
    assert!(client.is_lock_enabled());

    env.ledger().set_sequence_number(5);
    match client.try_withdraw(&user, &100) {
        Err(Ok(e)) => assert_eq!(e, ContractError::WithdrawalLocked),
        _ => unreachable!("Expected WithdrawalLocked error"),
    }
}

#[test]
fn test_switches_require_owner() {
    let (env, client, _owner, _, _) = setup();

    let intruder = Address::generate(&env);
    assert_unauthorized(client.try_set_lock_disable(&intruder));
    assert_unauthorized(client.try_set_lock_enable(&intruder));
    assert_unauthorized(client.try_stop_reward(&intruder));
    assert_unauthorized(client.try_resume_reward(&intruder));
    assert!(client.is_lock_enabled());
    assert!(client.is_reward_enabled());
}

// ── Emission window ───────────────────────────────────────────────────────────

#[test]
fn test_update_start_and_end_times() {
    let (env, client, owner, user, _) = setup();

    env.ledger().set_sequence_number(100);
    client.update_start_and_end_times(&owner, &500, &600);
    assert_eq!(client.start_time(), 500);
    assert_eq!(client.bonus_end_time(), 600);

    // Already earned 1_000; nothing more until the new window opens.
    env.ledger().set_sequence_number(300);
    assert_eq!(client.pending_reward(&user), 1_000);

    env.ledger().set_sequence_number(700);
    assert_eq!(client.pending_reward(&user), 2_000);
}

#[test]
fn test_window_moved_into_the_past_is_not_retroactive() {
    let (env, client, owner, user, _) = setup();

    env.ledger().set_sequence_number(100);
    client.update_start_and_end_times(&owner, &5, &3_456);

    env.ledger().set_sequence_number(200);
    assert_eq!(client.pending_reward(&user), 2_000);
}

#[test]
fn test_update_window_validation() {
    let (env, client, owner, _, _) = setup();

    assert_invalid(client.try_update_start_and_end_times(&owner, &10, &10));
    assert_invalid(client.try_update_start_and_end_times(&owner, &10, &5));

    let intruder = Address::generate(&env);
    assert_unauthorized(client.try_update_start_and_end_times(&intruder, &5, &3_456));
}

// ── Lock-time setters ─────────────────────────────────────────────────────────

#[test]
fn test_set_min_lock_time() {
    let (_env, client, owner, _, _) = setup();

    client.set_min_lock_time(&owner, &8);
    assert_eq!(client.min_lock_time(), 8);

    client.set_total_lock_time(&owner, &100);
    assert_invalid(client.try_set_min_lock_time(&owner, &101));
    assert_eq!(client.min_lock_time(), 8);
}

#[test]
fn test_set_total_lock_time() {
    let (_env, client, owner, _, _) = setup();

    client.set_total_lock_time(&owner, &259_200);
    assert_eq!(client.total_lock_time(), Some(259_200));

    assert_invalid(client.try_set_total_lock_time(&owner, &0));
    // Below the current minimum of 10.
    assert_invalid(client.try_set_total_lock_time(&owner, &9));
}

#[test]
fn test_set_pool_end_time() {
    let (env, client, owner, _, _) = setup();

    client.set_pool_end_time(&owner, &172_800);
    assert_eq!(client.pool_end_time(), Some(172_800));

    env.ledger().set_sequence_number(200);
    assert_invalid(client.try_set_pool_end_time(&owner, &200));
    assert_invalid(client.try_set_pool_end_time(&owner, &100));
}

#[test]
fn test_lock_setters_require_owner() {
    let (env, client, _owner, _, _) = setup();

    let intruder = Address::generate(&env);
    assert_unauthorized(client.try_set_min_lock_time(&intruder, &1));
    assert_unauthorized(client.try_set_total_lock_time(&intruder, &100));
    assert_unauthorized(client.try_set_pool_end_time(&intruder, &100));
}

// ── Reward reserve ────────────────────────────────────────────────────────────

#[test]
fn test_emergency_reward_withdraw() {
    let (env, client, owner, _, reward_token) = setup();

    client.emergency_reward_withdraw(&owner, &400_000);
    assert_eq!(client.reward_reserve(), 600_000);
    assert_eq!(TokenClient::new(&env, &reward_token).balance(&owner), 400_000);

    match client.try_emergency_reward_withdraw(&owner, &600_001) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InsufficientRewardReserve),
        _ => unreachable!("Expected InsufficientRewardReserve error"),
    }

    let intruder = Address::generate(&env);
    assert_unauthorized(client.try_emergency_reward_withdraw(&intruder, &1));
}

// ── Ownership ─────────────────────────────────────────────────────────────────

#[test]
fn test_transfer_ownership() {
    let (env, client, owner, _, _) = setup();

    let second = Address::generate(&env);
    client.transfer_ownership(&owner, &second);
    assert_eq!(client.owner(), second);

    // The previous owner lost every admin right.
    assert_unauthorized(client.try_set_min_lock_time(&owner, &8));
    assert_unauthorized(client.try_transfer_ownership(&owner, &owner));

    client.set_min_lock_time(&second, &8);
    assert_eq!(client.min_lock_time(), 8);

    let third = Address::generate(&env);
    client.transfer_ownership(&second, &third);
    assert_eq!(client.owner(), third);
}

#[test]
fn test_transfer_ownership_to_pool_fails() {
    let (_env, client, owner, _, _) = setup();

    assert_invalid(client.try_transfer_ownership(&owner, &client.address));
    assert_eq!(client.owner(), owner);
}

#[test]
fn test_admin_before_initialize_fails() {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(StakingPoolContract, ());
    let client = StakingPoolContractClient::new(&env, &contract_id);
    let caller = Address::generate(&env);

    match client.try_stop_reward(&caller) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotInitialized),
        _ => unreachable!("Expected NotInitialized error"),
    }
    match client.try_owner() {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotInitialized),
        _ => unreachable!("Expected NotInitialized error"),
    }
}
