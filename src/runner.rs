//! Batch runner
//!
//! Pairs wallets with proxies by position and drives one swap cycle per pair,
//! strictly in input order, for the configured number of loops. A failing
//! wallet is logged and skipped without the between-wallet pause; it never
//! aborts the batch.

use crate::config::SleepRange;
use crate::pacing::pause;
use crate::proxy::ProxyDescriptor;
use crate::wallet::SecureWallet;
use crate::Result;
use async_trait::async_trait;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// Runs one wallet's swap cycle through its proxy
#[async_trait]
pub trait CycleExecutor: Send + Sync {
    async fn run_cycle(
        &self,
        rpc_url: &str,
        proxy: &ProxyDescriptor,
        wallet: &SecureWallet,
    ) -> Result<()>;
}

/// Outcome counts for one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Drives a [`CycleExecutor`] over every (wallet, proxy) pair
pub struct BatchRunner<E> {
    executor: E,
    rpc_url: String,
    sleep_between_wallets: SleepRange,
}

impl<E: CycleExecutor> BatchRunner<E> {
    pub fn new(executor: E, rpc_url: impl Into<String>, sleep_between_wallets: SleepRange) -> Self {
        Self {
            executor,
            rpc_url: rpc_url.into(),
            sleep_between_wallets,
        }
    }

    /// Run `loops` passes over the positional pairing of `wallets` and
    /// `proxies`; extra entries on the longer side are ignored
    pub async fn run(
        &self,
        wallets: &[SecureWallet],
        proxies: &[ProxyDescriptor],
        loops: u32,
    ) -> BatchSummary {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("batch", %run_id);
        self.run_inner(run_id, wallets, proxies, loops)
            .instrument(span)
            .await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        wallets: &[SecureWallet],
        proxies: &[ProxyDescriptor],
        loops: u32,
    ) -> BatchSummary {
        let pairs = wallets.len().min(proxies.len());
        if wallets.len() != proxies.len() {
            warn!(
                wallets = wallets.len(),
                proxies = proxies.len(),
                ignored = wallets.len().max(proxies.len()) - pairs,
                "Wallet and proxy counts differ; extra entries are ignored"
            );
        }

        info!(pairs, loops, rpc_url = %self.rpc_url, "Starting batch");

        let mut summary = BatchSummary {
            run_id,
            attempted: 0,
            succeeded: 0,
            failed: 0,
        };

        for iteration in 1..=loops {
            for (wallet, proxy) in wallets.iter().zip(proxies.iter()) {
                summary.attempted += 1;
                info!(
                    iteration,
                    wallet = %wallet.address(),
                    proxy = %proxy.endpoint(),
                    "Starting swap cycle"
                );

                // Only a completed cycle earns the between-wallet pause
                match self.executor.run_cycle(&self.rpc_url, proxy, wallet).await {
                    Ok(()) => {
                        summary.succeeded += 1;
                        pause(&self.sleep_between_wallets).await;
                    }
                    Err(e) => {
                        summary.failed += 1;
                        error!(wallet = %wallet.address(), error = %e, "Swap cycle failed");
                    }
                }
            }
        }

        info!(
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Batch finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use alloy::primitives::Address;
    use std::sync::Mutex;

    const KEYS: [&str; 3] = [
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
        "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
    ];

    /// Records every call; fails the calls whose index is listed
    struct RecordingExecutor {
        calls: Mutex<Vec<(Address, String)>>,
        fail_on: Vec<usize>,
    }

    impl RecordingExecutor {
        fn new(fail_on: Vec<usize>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on,
            }
        }

        fn calls(&self) -> Vec<(Address, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CycleExecutor for RecordingExecutor {
        async fn run_cycle(
            &self,
            _rpc_url: &str,
            proxy: &ProxyDescriptor,
            wallet: &SecureWallet,
        ) -> Result<()> {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.len();
            calls.push((wallet.address(), proxy.host.clone()));
            if self.fail_on.contains(&index) {
                return Err(Error::Rpc("insufficient funds for gas".to_string()));
            }
            Ok(())
        }
    }

    fn wallets(count: usize) -> Vec<SecureWallet> {
        KEYS[..count]
            .iter()
            .map(|key| SecureWallet::from_hex(key).unwrap())
            .collect()
    }

    fn proxies(count: usize) -> Vec<ProxyDescriptor> {
        (1..=count)
            .map(|i| format!("10.0.0.{i}:8080:user{i}:pass{i}").parse().unwrap())
            .collect()
    }

    fn runner(executor: RecordingExecutor) -> BatchRunner<RecordingExecutor> {
        BatchRunner::new(executor, "https://rpc.zkfair.io", SleepRange::none())
    }

    #[tokio::test]
    async fn pairs_positionally_and_truncates_to_shorter_list() {
        let wallets = wallets(3);
        let runner = runner(RecordingExecutor::new(vec![]));

        let summary = runner.run(&wallets, &proxies(2), 1).await;

        let calls = runner.executor.calls();
        assert_eq!(summary.attempted, 2);
        assert_eq!(
            calls,
            vec![
                (wallets[0].address(), "10.0.0.1".to_string()),
                (wallets[1].address(), "10.0.0.2".to_string()),
            ]
        );
        assert!(calls.iter().all(|(addr, _)| *addr != wallets[2].address()));
    }

    #[tokio::test]
    async fn failure_for_first_wallet_does_not_stop_the_batch() {
        let wallets = wallets(2);
        let runner = runner(RecordingExecutor::new(vec![0]));

        let summary = runner.run(&wallets, &proxies(2), 1).await;

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(runner.executor.calls()[1].0, wallets[1].address());
    }

    #[tokio::test]
    async fn repeats_the_pairing_for_every_loop() {
        let wallets = wallets(2);
        let runner = runner(RecordingExecutor::new(vec![]));

        let summary = runner.run(&wallets, &proxies(2), 3).await;

        let order: Vec<Address> = runner
            .executor
            .calls()
            .into_iter()
            .map(|(addr, _)| addr)
            .collect();
        assert_eq!(summary.attempted, 6);
        assert_eq!(
            order,
            vec![
                wallets[0].address(),
                wallets[1].address(),
                wallets[0].address(),
                wallets[1].address(),
                wallets[0].address(),
                wallets[1].address(),
            ]
        );
    }

    #[tokio::test]
    async fn failed_cycle_moves_on_without_pausing() {
        let wallets = wallets(2);
        let runner = BatchRunner::new(
            RecordingExecutor::new(vec![0, 1]),
            "https://rpc.zkfair.io",
            SleepRange::new(1.0, 1.0),
        );

        let started = std::time::Instant::now();
        let summary = runner.run(&wallets, &proxies(2), 1).await;

        assert_eq!(summary.failed, 2);
        assert!(
            started.elapsed() < std::time::Duration::from_millis(500),
            "failed cycles slept for {:?}",
            started.elapsed()
        );
    }

    #[tokio::test]
    async fn successful_cycle_pauses_before_next_wallet() {
        let runner = BatchRunner::new(
            RecordingExecutor::new(vec![]),
            "https://rpc.zkfair.io",
            SleepRange::new(0.05, 0.05),
        );

        let started = std::time::Instant::now();
        let summary = runner.run(&wallets(1), &proxies(1), 1).await;

        assert_eq!(summary.succeeded, 1);
        assert!(started.elapsed() >= std::time::Duration::from_millis(50));
    }

    #[tokio::test]
    async fn zero_loops_or_empty_inputs_do_nothing() {
        let runner = runner(RecordingExecutor::new(vec![]));

        let summary = runner.run(&wallets(2), &proxies(2), 0).await;
        assert_eq!(summary.attempted, 0);

        let summary = runner.run(&wallets(2), &[], 1).await;
        assert_eq!(summary.attempted, 0);
        assert!(runner.executor.calls().is_empty());
    }
}
