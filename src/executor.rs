//! Swap executor
//!
//! Runs the three-transaction cycle for one wallet:
//!
//! 1. swap-in: `swapExactETHForTokens` spending the USD notional, protected
//!    by the configured slippage tolerance
//! 2. approve: grant the router the wallet's full `token_out` balance
//! 3. swap-out: `swapExactTokensForETH` selling that balance back with
//!    `amountOutMin = 0`
//!
//! Every submission is fire-and-forget. The executor never waits for a
//! receipt, so a reverted swap-in only shows up as a zero balance in the
//! following steps. The return leg has no slippage protection at all; that
//! asymmetry is intentional but leaves the wallet exposed to sandwiching.

use crate::amounts::{min_amount_out, quote_swap};
use crate::audit::{SubmissionJournal, SubmissionRecord, SwapStep};
use crate::chain::{ChainClient, ClientFactory};
use crate::config::Config;
use crate::contracts;
use crate::oracle::PriceOracle;
use crate::pacing::pause;
use crate::proxy::ProxyDescriptor;
use crate::runner::CycleExecutor;
use crate::wallet::SecureWallet;
use crate::Result;
use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use tracing::info;

/// Hashes of the three transactions of one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub swap_in: B256,
    pub approve: B256,
    pub swap_out: B256,
}

/// Executes swap cycles against the configured router
pub struct SwapExecutor<O, F> {
    config: Config,
    oracle: O,
    factory: F,
    journal: Option<SubmissionJournal>,
}

impl<O, F> SwapExecutor<O, F>
where
    O: PriceOracle,
    F: ClientFactory,
{
    pub fn new(config: Config, oracle: O, factory: F) -> Self {
        Self {
            config,
            oracle,
            factory,
            journal: None,
        }
    }

    /// Journal every built transaction to `journal`
    pub fn with_journal(mut self, journal: SubmissionJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Run swap-in, approve and swap-out for `wallet`
    ///
    /// Errors propagate immediately; later steps are skipped.
    pub async fn run_swap_cycle<C>(&self, client: &C, wallet: &SecureWallet) -> Result<CycleReport>
    where
        C: ChainClient + ?Sized,
    {
        let swap_in = self.swap_in(client, wallet).await?;
        pause(&self.config.sleep_between_actions).await;

        let approve = self.approve(client, wallet).await?;
        pause(&self.config.sleep_between_actions).await;

        let swap_out = self.swap_out(client, wallet).await?;

        Ok(CycleReport {
            swap_in,
            approve,
            swap_out,
        })
    }

    async fn swap_in<C>(&self, client: &C, wallet: &SecureWallet) -> Result<B256>
    where
        C: ChainClient + ?Sized,
    {
        let contracts_cfg = &self.config.contracts;
        let quote = quote_swap(
            &self.oracle,
            &self.config.price_symbol,
            self.config.swap_amount_usd,
        )
        .await?;
        let amount_out_min = min_amount_out(quote.output_wei, self.config.slippage_bps);

        let input = contracts::swap_exact_eth_for_tokens(
            amount_out_min,
            vec![contracts_cfg.token_in, contracts_cfg.token_out],
            wallet.address(),
            self.deadline(),
        );

        let hash = self
            .send(
                client,
                wallet,
                SwapStep::SwapIn,
                contracts_cfg.router,
                input,
                quote.input_wei,
                self.config.gas_limit,
            )
            .await?;

        info!(
            wallet = %wallet.address(),
            tx = %hash,
            value = %quote.input_wei,
            amount_out_min = %amount_out_min,
            "Swapped in"
        );
        Ok(hash)
    }

    async fn approve<C>(&self, client: &C, wallet: &SecureWallet) -> Result<B256>
    where
        C: ChainClient + ?Sized,
    {
        let contracts_cfg = &self.config.contracts;
        let balance = client
            .read_balance(contracts_cfg.token_out, wallet.address())
            .await?;

        let input = contracts::approve(contracts_cfg.router, balance);
        let hash = self
            .send(
                client,
                wallet,
                SwapStep::Approve,
                contracts_cfg.token_out,
                input,
                U256::ZERO,
                self.config.approve_gas_limit,
            )
            .await?;

        info!(wallet = %wallet.address(), tx = %hash, amount = %balance, "Approved router");
        Ok(hash)
    }

    async fn swap_out<C>(&self, client: &C, wallet: &SecureWallet) -> Result<B256>
    where
        C: ChainClient + ?Sized,
    {
        let contracts_cfg = &self.config.contracts;
        let balance = client
            .read_balance(contracts_cfg.token_out, wallet.address())
            .await?;

        let input = contracts::swap_exact_tokens_for_eth(
            balance,
            U256::ZERO,
            vec![contracts_cfg.token_out, contracts_cfg.token_in],
            wallet.address(),
            self.deadline(),
        );

        let hash = self
            .send(
                client,
                wallet,
                SwapStep::SwapOut,
                contracts_cfg.router,
                input,
                U256::ZERO,
                self.config.gas_limit,
            )
            .await?;

        info!(wallet = %wallet.address(), tx = %hash, amount_in = %balance, "Swapped out");
        Ok(hash)
    }

    /// Build, sign and (unless dry-running) submit one transaction
    #[allow(clippy::too_many_arguments)]
    async fn send<C>(
        &self,
        client: &C,
        wallet: &SecureWallet,
        step: SwapStep,
        to: Address,
        input: Bytes,
        value: U256,
        gas_limit: u64,
    ) -> Result<B256>
    where
        C: ChainClient + ?Sized,
    {
        let tx = client
            .build_call(wallet.address(), to, input, value, gas_limit)
            .await?;
        let nonce = tx.nonce;
        let signed = wallet.sign_transaction(tx)?;

        let hash = if self.config.dry_run {
            info!(
                wallet = %wallet.address(),
                step = step.name(),
                tx = %signed.hash,
                "Dry-run: signed but not submitted"
            );
            signed.hash
        } else {
            client.submit_signed(&signed.raw).await?
        };

        if let Some(journal) = &self.journal {
            journal.record(&SubmissionRecord {
                wallet: wallet.address(),
                step,
                tx_hash: hash,
                nonce,
                value,
                dry_run: self.config.dry_run,
            });
        }

        Ok(hash)
    }

    fn deadline(&self) -> U256 {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        U256::from(now.saturating_add(self.config.deadline().as_secs()))
    }
}

#[async_trait]
impl<O, F> CycleExecutor for SwapExecutor<O, F>
where
    O: PriceOracle,
    F: ClientFactory,
{
    async fn run_cycle(
        &self,
        rpc_url: &str,
        proxy: &ProxyDescriptor,
        wallet: &SecureWallet,
    ) -> Result<()> {
        let client = self.factory.connect(rpc_url, proxy)?;
        let report = self.run_swap_cycle(&client, wallet).await?;

        tracing::debug!(
            wallet = %wallet.address(),
            proxy = %proxy.endpoint(),
            swap_in = %report.swap_in,
            approve = %report.approve,
            swap_out = %report.swap_out,
            "Swap cycle submitted"
        );
        Ok(())
    }
}
