//! Concurrency integration tests
//!
//! Hammer a shared `TransferCoordinator` from real threads and check the
//! properties every interleaving must preserve:
//! - conservation of the total balance
//! - no negative balance
//! - exactly `floor(B / a)` successes when N transfers of `a` drain a
//!   balance `B` with `N * a > B`
//!
//! Every test runs under both lock policies.

use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use rust_transfer_engine::core::{
    AccountStore, InMemoryAccountStore, LockPolicy, NoopNotificationSink, TransferCoordinator,
};
use rust_transfer_engine::{Account, TransferOutcome, TransferRequest};
use std::sync::{Arc, Barrier};
use std::thread;

fn coordinator(accounts: &[(&str, Decimal)], policy: LockPolicy) -> Arc<TransferCoordinator> {
    let store = Arc::new(InMemoryAccountStore::new());
    for (id, balance) in accounts {
        store.create(Account::new(*id, *balance)).unwrap();
    }
    Arc::new(TransferCoordinator::new(store, policy).with_notifier(Arc::new(NoopNotificationSink)))
}

/// Run every request on its own thread, all released at once
fn run_concurrently(
    coordinator: &Arc<TransferCoordinator>,
    requests: Vec<TransferRequest>,
) -> Vec<TransferOutcome> {
    let barrier = Arc::new(Barrier::new(requests.len()));

    let handles: Vec<_> = requests
        .into_iter()
        .map(|request| {
            let coordinator = Arc::clone(coordinator);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                coordinator.transfer(&request).outcome
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect()
}

fn count(outcomes: &[TransferOutcome], wanted: TransferOutcome) -> usize {
    outcomes.iter().filter(|outcome| **outcome == wanted).count()
}

#[rstest]
fn test_competing_debits_from_one_source(
    #[values(LockPolicy::Global, LockPolicy::PerAccount)] policy: LockPolicy,
) {
    let coordinator = coordinator(&[("X", dec!(100)), ("Y", dec!(0)), ("Z", dec!(0))], policy);

    let outcomes = run_concurrently(
        &coordinator,
        vec![
            TransferRequest::new("X", "Y", dec!(60)),
            TransferRequest::new("X", "Z", dec!(60)),
        ],
    );

    assert_eq!(count(&outcomes, TransferOutcome::Success), 1);
    assert_eq!(count(&outcomes, TransferOutcome::InsufficientFunds), 1);
    assert_eq!(coordinator.get_account("X").unwrap().balance, dec!(40));
    let y = coordinator.get_account("Y").unwrap().balance;
    let z = coordinator.get_account("Z").unwrap().balance;
    assert_eq!(y + z, dec!(60));
}

#[rstest]
#[case::even_split(dec!(100), dec!(10), 25)]
#[case::remainder(dec!(100), dec!(30), 8)]
#[case::tiny_amounts(dec!(1), dec!(0.3), 10)]
fn test_draining_source_yields_exact_successes(
    #[values(LockPolicy::Global, LockPolicy::PerAccount)] policy: LockPolicy,
    #[case] balance: Decimal,
    #[case] amount: Decimal,
    #[case] attempts: usize,
) {
    // Spread the targets so per-account locking really runs in parallel
    let targets: Vec<String> = (0..attempts).map(|i| format!("T{:02}", i)).collect();
    let mut accounts: Vec<(&str, Decimal)> = vec![("SRC", balance)];
    accounts.extend(targets.iter().map(|id| (id.as_str(), Decimal::ZERO)));
    let coordinator = coordinator(&accounts, policy);

    let requests = targets
        .iter()
        .map(|target| TransferRequest::new("SRC", target.clone(), amount))
        .collect();
    let outcomes = run_concurrently(&coordinator, requests);

    let expected_successes = (balance / amount).floor();
    let successes = count(&outcomes, TransferOutcome::Success);
    assert_eq!(Decimal::from(successes), expected_successes);
    assert_eq!(
        count(&outcomes, TransferOutcome::InsufficientFunds),
        attempts - successes
    );
    assert_eq!(
        coordinator.get_account("SRC").unwrap().balance,
        balance - expected_successes * amount
    );
    assert_eq!(coordinator.store().total_balance(), balance);
}

#[rstest]
fn test_mixed_workload_conserves_money(
    #[values(LockPolicy::Global, LockPolicy::PerAccount)] policy: LockPolicy,
) {
    let ids: Vec<String> = (0..8).map(|i| format!("acc-{}", i)).collect();
    let accounts: Vec<(&str, Decimal)> = ids.iter().map(|id| (id.as_str(), dec!(50))).collect();
    let coordinator = coordinator(&accounts, policy);
    let total_before = coordinator.store().total_balance();

    let threads = 8;
    let per_thread = 200;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let coordinator = Arc::clone(&coordinator);
            let barrier = Arc::clone(&barrier);
            let ids = ids.clone();
            thread::spawn(move || {
                // Small LCG so each thread walks a different, repeatable path
                let mut seed: u64 = 0x2545_F491_4F6C_DD1D ^ (t as u64 + 1);
                let mut next = move || {
                    seed = seed
                        .wrapping_mul(6_364_136_223_846_793_005)
                        .wrapping_add(1_442_695_040_888_963_407);
                    (seed >> 33) as usize
                };
                barrier.wait();
                for _ in 0..per_thread {
                    let from = &ids[next() % ids.len()];
                    let to = &ids[next() % ids.len()];
                    let amount = Decimal::new((next() % 2_000) as i64, 2);
                    let outcome = coordinator
                        .transfer(&TransferRequest::new(from.clone(), to.clone(), amount))
                        .outcome;
                    assert_ne!(outcome, TransferOutcome::Failure);
                    assert_ne!(outcome, TransferOutcome::AccountNotFound);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let accounts = coordinator.accounts();
    assert_eq!(accounts.len(), ids.len());
    assert!(accounts.iter().all(|account| account.balance >= Decimal::ZERO));
    assert_eq!(coordinator.store().total_balance(), total_before);
}

#[rstest]
fn test_opposite_directions_do_not_deadlock(
    #[values(LockPolicy::Global, LockPolicy::PerAccount)] policy: LockPolicy,
) {
    let coordinator = coordinator(&[("A", dec!(1000)), ("B", dec!(1000))], policy);

    let requests = (0..16)
        .map(|i| {
            if i % 2 == 0 {
                TransferRequest::new("A", "B", dec!(1))
            } else {
                TransferRequest::new("B", "A", dec!(1))
            }
        })
        .collect();
    let outcomes = run_concurrently(&coordinator, requests);

    assert_eq!(count(&outcomes, TransferOutcome::Success), 16);
    assert_eq!(coordinator.get_account("A").unwrap().balance, dec!(1000));
    assert_eq!(coordinator.get_account("B").unwrap().balance, dec!(1000));
}

#[rstest]
fn test_rejections_never_mutate_under_contention(
    #[values(LockPolicy::Global, LockPolicy::PerAccount)] policy: LockPolicy,
) {
    let coordinator = coordinator(&[("A", dec!(10)), ("B", dec!(10))], policy);

    let requests = vec![
        TransferRequest::new("A", "A", dec!(1)),
        TransferRequest::new("A", "B", dec!(0)),
        TransferRequest::new("B", "A", dec!(-1)),
        TransferRequest::new("A", "nobody", dec!(1)),
        TransferRequest::new("B", "B", dec!(5)),
    ];
    let outcomes = run_concurrently(&coordinator, requests);

    assert_eq!(count(&outcomes, TransferOutcome::Success), 0);
    assert_eq!(count(&outcomes, TransferOutcome::SameAccount), 2);
    assert_eq!(count(&outcomes, TransferOutcome::InsufficientFunds), 2);
    assert_eq!(count(&outcomes, TransferOutcome::AccountNotFound), 1);
    assert_eq!(coordinator.get_account("A").unwrap().balance, dec!(10));
    assert_eq!(coordinator.get_account("B").unwrap().balance, dec!(10));
}

#[test]
fn test_accounts_created_while_transfers_run() {
    let coordinator = coordinator(&[("hub", dec!(1000))], LockPolicy::PerAccount);

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let coordinator = Arc::clone(&coordinator);
            thread::spawn(move || {
                let id = format!("new-{}", i);
                coordinator.create_account(Account::empty(id.clone())).unwrap();
                coordinator.transfer(&TransferRequest::new("hub", id, dec!(10)))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_success());
    }

    assert_eq!(coordinator.get_account("hub").unwrap().balance, dec!(900));
    assert_eq!(coordinator.store().total_balance(), dec!(1000));
}
