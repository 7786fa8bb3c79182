#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Env,
};
use staking_pool::{StakingPoolContract, StakingPoolContractClient};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { amount: u32, lock: u16 },
    Withdraw { amount: u32 },
    Claim,
    Advance { ledgers: u16 },
    SetRate { rate: u32 },
    ToggleLock,
    StopReward,
    ResumeReward,
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| {
        li.min_persistent_entry_ttl = 5_000_000;
        li.max_entry_ttl = 10_000_000;
    });

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(StakingPoolContract, ());
    let client = StakingPoolContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(&stake_token, &reward_token, &1_000i128, &0u64, &100_000u64, &0u64, &owner);
    StellarAssetClient::new(&env, &reward_token).mint(&owner, &i128::from(u64::MAX));
    client.fund_rewards(&owner, &i128::from(u64::MAX));

    let users: Vec<Address> = (0..4)
        .map(|_| {
            let user = Address::generate(&env);
            StellarAssetClient::new(&env, &stake_token).mint(&user, &i128::from(u64::MAX));
            user
        })
        .collect();

    let mut ledger = 0u32;
    let mut lock_enabled = true;

    for (i, action) in actions.into_iter().enumerate() {
        let caller = &users[i % users.len()];
        match action {
            FuzzAction::Deposit { amount, lock } => {
                let _ = client.try_deposit(caller, &i128::from(amount), &u64::from(lock));
            }
            FuzzAction::Withdraw { amount } => {
                let _ = client.try_withdraw(caller, &i128::from(amount));
            }
            FuzzAction::Claim => {
                let _ = client.try_claim(caller);
            }
            FuzzAction::Advance { ledgers } => {
                ledger = ledger.saturating_add(u32::from(ledgers)).min(4_000_000);
                env.ledger().set_sequence_number(ledger);
            }
            FuzzAction::SetRate { rate } => {
                let _ = client.try_update_reward_per_time_unit(&owner, &i128::from(rate));
            }
            FuzzAction::ToggleLock => {
                if lock_enabled {
                    client.set_lock_disable(&owner);
                } else {
                    client.set_lock_enable(&owner);
                }
                lock_enabled = !lock_enabled;
            }
            FuzzAction::StopReward => client.stop_reward(&owner),
            FuzzAction::ResumeReward => client.resume_reward(&owner),
        }

        let staked: i128 = users.iter().map(|u| client.user_info(u).amount).sum();
        assert_eq!(client.total_staked(), staked);
    }
});
