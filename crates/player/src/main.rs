//! Avengers Arena player - runs one battle against a simulated contract.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use avengers_domain::AccountAddress;
use avengers_player::application::BattleView;
use avengers_player::ports::outbound::LedgerClient;
use avengers_player::{
    BattleCoordinator, BattleSettings, ContractDeployment, MintSelection, SimulatedLedger,
};

const DEMO_ACCOUNT: &str = "0x8985F2dd2b076a67908eDFA9B4c9Dbe74A28F4ab";
const CONFIRMATION_WAIT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "avengers_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut settings = BattleSettings::from_env();
    if settings.account.is_unset() {
        tracing::info!("AVENGERS_ACCOUNT not set, using demo account");
        settings.account = AccountAddress::new(DEMO_ACCOUNT);
    }

    tracing::info!(account = %settings.account, "Starting Avengers Arena player");

    let ledger: Arc<dyn LedgerClient> = Arc::new(
        SimulatedLedger::deploy(settings.account.clone(), ContractDeployment::avengers()?)
            .with_confirmation_delay(Duration::from_millis(250)),
    );
    let coordinator = BattleCoordinator::new(Some(ledger), settings);

    coordinator.initialize().await?;

    let view = coordinator.view();
    if view.player.is_none() {
        coordinator.request_mint(MintSelection::Index(2)).await?;
        wait_for(&coordinator, |view| view.player.is_some()).await?;
    }

    let local = coordinator.settings().account.clone();
    for round in 1..=2 {
        let boss_before = coordinator.view().boss.map(|boss| boss.hp());
        coordinator.request_attack().await?;
        let view = wait_for(&coordinator, |view| {
            view.boss.as_ref().map(|boss| boss.hp()) != boss_before
        })
        .await?;

        if let Some(headlines) = view.headlines(&local) {
            println!("round {round}: {}", headlines.attack);
            println!("round {round}: {}", headlines.counter_attack);
        }
    }

    if let (Some(player), Some(boss)) = (coordinator.view().player, coordinator.view().boss) {
        println!(
            "{} {}/{} hp, {} {}/{} hp",
            player.name(),
            player.hp(),
            player.max_hp(),
            boss.name(),
            boss.hp(),
            boss.max_hp()
        );
    }

    coordinator.shutdown().await;
    Ok(())
}

async fn wait_for(
    coordinator: &BattleCoordinator,
    condition: impl FnMut(&BattleView) -> bool,
) -> anyhow::Result<BattleView> {
    let mut rx = coordinator.watch();
    let view = tokio::time::timeout(CONFIRMATION_WAIT, rx.wait_for(condition))
        .await??
        .clone();
    Ok(view)
}
