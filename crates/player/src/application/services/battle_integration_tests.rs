//! End-to-end battle flows against the mock and simulated ledgers.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use mockall::predicate::eq;

use avengers_domain::{AccountAddress, AttackLifecycleState, Character, UNSET_ADDRESS};
use avengers_shared::LedgerEventKind;

use crate::application::dto::{BattlePhase, BattleView, IntentOutcome, MintSelection};
use crate::application::error::BattleError;
use crate::application::services::BattleCoordinator;
use crate::infrastructure::ledger::SimulatedLedger;
use crate::infrastructure::platform::{FixedClock, FixedRandom};
use crate::infrastructure::settings::BattleSettings;
use crate::infrastructure::testing::{fixtures, MockLedger};
use crate::ports::outbound::{
    LedgerClient, LedgerError, LedgerRequestPort, MockRandomPort, RandomPort,
};

const SETTLE: Duration = Duration::from_secs(1);

fn settings() -> BattleSettings {
    BattleSettings::for_account(fixtures::local_account())
}

fn new_coordinator_with(ledger: Arc<dyn LedgerClient>, random: Arc<dyn RandomPort>) -> BattleCoordinator {
    let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()));
    BattleCoordinator::with_platform(Some(ledger), settings(), clock, random)
}

fn new_coordinator(ledger: Arc<dyn LedgerClient>) -> BattleCoordinator {
    new_coordinator_with(ledger, Arc::new(FixedRandom(0)))
}

/// Mock ledger answering the initial reads with `boss`, the six-hero roster
/// and `player` as the owned character.
fn mock_ledger(boss: Character, player: Option<Character>) -> MockLedger {
    let mut ledger = MockLedger::new();
    ledger
        .requests
        .expect_fetch_boss_record()
        .returning(move || Ok(fixtures::record(&boss)));
    ledger
        .requests
        .expect_fetch_default_roster()
        .returning(|| Ok(fixtures::roster_records()));
    ledger
        .requests
        .expect_fetch_owned_character()
        .returning(move || Ok(player.as_ref().map(fixtures::record)));
    ledger
}

fn simulated() -> Arc<SimulatedLedger> {
    Arc::new(SimulatedLedger::deploy(
        fixtures::local_account(),
        fixtures::avengers(),
    ))
}

async fn wait_for_view(
    coordinator: &BattleCoordinator,
    condition: impl FnMut(&BattleView) -> bool,
) -> BattleView {
    let mut rx = coordinator.watch();
    let view = tokio::time::timeout(SETTLE, rx.wait_for(condition))
        .await
        .expect("view condition reached in time")
        .expect("view channel open")
        .clone();
    view
}

fn boss_hp(view: &BattleView) -> Option<u64> {
    view.boss.as_ref().map(Character::hp)
}

fn player_hp(view: &BattleView) -> Option<u64> {
    view.player.as_ref().map(Character::hp)
}

#[tokio::test(start_paused = true)]
async fn attack_confirmation_hits_both_actors_then_settles() {
    let mut ledger = mock_ledger(
        fixtures::thanos(),
        Some(fixtures::character("Hulk", 500, 1000, 600)),
    );
    ledger
        .requests
        .expect_send_attack()
        .times(1)
        .returning(|| Ok(fixtures::attack_handle()));
    ledger
        .requests
        .expect_await_acceptance()
        .times(1)
        .returning(|handle| Ok(fixtures::receipt(handle)));
    let ledger = Arc::new(ledger);
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();

    let outcome = coordinator.request_attack().await.unwrap();
    assert!(outcome.is_accepted());
    let view = coordinator.view();
    assert_eq!(view.player_lifecycle, AttackLifecycleState::Pending);
    assert_eq!(view.boss_lifecycle, AttackLifecycleState::Pending);

    ledger.emit(fixtures::attack_complete(fixtures::LOCAL_ACCOUNT, 499_400, 400, 600, 100));

    let view = wait_for_view(&coordinator, |v| boss_hp(v) == Some(499_400)).await;
    assert_eq!(player_hp(&view), Some(400));
    assert_eq!(view.player_lifecycle, AttackLifecycleState::Hit);
    assert_eq!(view.boss_lifecycle, AttackLifecycleState::Hit);
    let notification = view.visible_notification.clone().unwrap();
    assert_eq!(notification.target_damage, 600);
    assert_eq!(notification.source_damage, 100);
    let headlines = view.headlines(&fixtures::local_account()).unwrap();
    assert_eq!(headlines.attack, "💥 Your Hulk hit Thanos for 600");

    tokio::time::sleep(Duration::from_millis(2_100)).await;
    let view = coordinator.view();
    assert_eq!(view.player_lifecycle, AttackLifecycleState::Idle);
    assert_eq!(view.boss_lifecycle, AttackLifecycleState::Idle);
    assert!(view.visible_notification.is_some());

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(coordinator.view().visible_notification.is_none());
}

#[tokio::test]
async fn mint_out_of_bounds_never_reaches_ledger() {
    let mut ledger = mock_ledger(fixtures::thanos(), None);
    ledger.requests.expect_send_mint().never();
    let coordinator = new_coordinator(Arc::new(ledger));
    coordinator.initialize().await.unwrap();

    let result = coordinator.request_mint(MintSelection::Index(7)).await;

    assert_eq!(
        result,
        Err(BattleError::RosterIndexOutOfBounds {
            index: 7,
            roster_size: 6
        })
    );
    assert!(!coordinator.view().minting_in_progress);
}

#[tokio::test(start_paused = true)]
async fn minted_character_is_adopted_from_confirmation() {
    let ledger = Arc::new(
        SimulatedLedger::deploy(fixtures::local_account(), fixtures::avengers())
            .with_confirmation_delay(Duration::from_millis(500)),
    );
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();
    assert_eq!(coordinator.view().phase(), BattlePhase::SelectCharacter);

    let outcome = coordinator.request_mint(MintSelection::Index(2)).await.unwrap();
    assert!(outcome.is_accepted());
    let view = coordinator.view();
    assert!(!view.minting_in_progress);
    assert!(view.player.is_none());

    let view = wait_for_view(&coordinator, |v| v.player.is_some()).await;
    assert_eq!(view.player.as_ref(), Some(&fixtures::avengers().roster[2]));
    assert_eq!(view.phase(), BattlePhase::Battle);
    assert_eq!(view.player_lifecycle, AttackLifecycleState::Idle);
    assert!(!view.minting_in_progress);
}

#[tokio::test]
async fn rejected_attack_reverts_and_stays_retryable() {
    let ledger = simulated();
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();
    coordinator.request_mint(MintSelection::Index(2)).await.unwrap();
    wait_for_view(&coordinator, |v| v.player.is_some()).await;

    ledger.reject_next_attack("user rejected transaction");
    let result = coordinator.request_attack().await;

    assert_eq!(
        result,
        Err(BattleError::RequestRejected(LedgerError::rejected(
            "user rejected transaction"
        )))
    );
    let view = coordinator.view();
    assert_eq!(view.player_lifecycle, AttackLifecycleState::Idle);
    assert_eq!(view.boss_lifecycle, AttackLifecycleState::Idle);
    assert!(view.visible_notification.is_none());
    assert!(view.can_attack());

    let retry = coordinator.request_attack().await.unwrap();
    assert!(retry.is_accepted());
    let view = wait_for_view(&coordinator, |v| v.visible_notification.is_some()).await;
    assert_eq!(boss_hp(&view), Some(499_000));
}

#[tokio::test]
async fn initialize_twice_keeps_one_subscription_per_event() {
    let ledger = simulated();
    let coordinator = new_coordinator(ledger.clone());

    coordinator.initialize().await.unwrap();
    coordinator.initialize().await.unwrap();

    for kind in LedgerEventKind::ALL {
        assert_eq!(ledger.subscriber_count(kind), 1);
    }

    coordinator.shutdown().await;
    for kind in LedgerEventKind::ALL {
        assert_eq!(ledger.subscriber_count(kind), 0);
    }
}

#[tokio::test]
async fn dropping_coordinator_releases_subscriptions() {
    let ledger = simulated();
    {
        let coordinator = new_coordinator(ledger.clone());
        coordinator.initialize().await.unwrap();
        assert_eq!(ledger.subscriber_count(LedgerEventKind::AttackComplete), 1);
    }
    for kind in LedgerEventKind::ALL {
        assert_eq!(ledger.subscriber_count(kind), 0);
    }
}

#[tokio::test]
async fn intents_without_ledger_are_unavailable() {
    let coordinator = BattleCoordinator::new(None, settings());

    assert_eq!(
        coordinator.initialize().await,
        Err(BattleError::ConnectionUnavailable)
    );
    assert_eq!(
        coordinator.request_attack().await,
        Err(BattleError::ConnectionUnavailable)
    );
    assert_eq!(
        coordinator.request_mint(MintSelection::Random).await,
        Err(BattleError::ConnectionUnavailable)
    );
}

#[tokio::test]
async fn subscription_failure_is_surfaced_and_retried() {
    let ledger = Arc::new(mock_ledger(fixtures::thanos(), None));
    let coordinator = new_coordinator(ledger.clone());
    ledger.fail_subscriptions(true);

    let result = coordinator.initialize().await;

    assert!(matches!(
        result,
        Err(BattleError::SubscriptionFailure { .. })
    ));
    for kind in LedgerEventKind::ALL {
        assert_eq!(ledger.events.subscriber_count(kind), 0);
    }
    assert!(coordinator.view().boss.is_none());

    ledger.fail_subscriptions(false);
    coordinator.initialize().await.unwrap();
    assert_eq!(boss_hp(&coordinator.view()), Some(500_000));
}

#[tokio::test(start_paused = true)]
async fn second_attack_while_pending_sends_nothing() {
    let ledger = Arc::new(
        SimulatedLedger::deploy(fixtures::local_account(), fixtures::avengers())
            .with_acceptance_delay(Duration::from_millis(200)),
    );
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();
    coordinator.request_mint(MintSelection::Index(0)).await.unwrap();
    wait_for_view(&coordinator, |v| v.player.is_some()).await;

    let (first, second) = tokio::join!(coordinator.request_attack(), coordinator.request_attack());

    assert!(first.unwrap().is_accepted());
    assert_eq!(second, Ok(IntentOutcome::Ignored));
    wait_for_view(&coordinator, |v| v.visible_notification.is_some()).await;
    assert_eq!(ledger.boss().hp(), 499_700);
}

#[tokio::test(start_paused = true)]
async fn second_mint_while_in_flight_is_ignored() {
    let ledger = Arc::new(
        SimulatedLedger::deploy(fixtures::local_account(), fixtures::avengers())
            .with_acceptance_delay(Duration::from_millis(200)),
    );
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();

    let mint = async {
        let outcome = coordinator.request_mint(MintSelection::Index(1)).await;
        assert!(!coordinator.view().minting_in_progress);
        outcome
    };
    let probe = async {
        tokio::task::yield_now().await;
        assert!(coordinator.view().minting_in_progress);
        coordinator.request_mint(MintSelection::Index(4)).await
    };
    let (first, second) = tokio::join!(mint, probe);

    assert!(first.unwrap().is_accepted());
    assert_eq!(second, Ok(IntentOutcome::Ignored));
    let view = wait_for_view(&coordinator, |v| v.player.is_some()).await;
    assert_eq!(view.player.unwrap().name(), "Iron Man");
}

#[tokio::test]
async fn attack_by_other_session_only_moves_boss() {
    let ledger = simulated();
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();
    coordinator.request_mint(MintSelection::Index(2)).await.unwrap();
    wait_for_view(&coordinator, |v| v.player.is_some()).await;

    let other = ledger.connect_as(fixtures::other_account());
    let handle = other.send_mint(4).await.unwrap();
    other.await_acceptance(&handle).await.unwrap();
    let handle = other.send_attack().await.unwrap();
    other.await_acceptance(&handle).await.unwrap();

    let view = wait_for_view(&coordinator, |v| boss_hp(v) == Some(499_200)).await;
    assert_eq!(player_hp(&view), Some(800));
    assert_eq!(view.player_lifecycle, AttackLifecycleState::Idle);
    assert_eq!(view.boss_lifecycle, AttackLifecycleState::Idle);
    assert_eq!(view.player.as_ref().map(Character::name), Some("Thor"));

    let notification = view.visible_notification.clone().unwrap();
    assert!(notification.actor.matches(&fixtures::other_account()));
    let headlines = view.headlines(&fixtures::local_account()).unwrap();
    assert!(!headlines.by_local_actor);
    assert_eq!(headlines.attack, "💥 0x123...5678's Thor hit Thanos for 800");
}

#[tokio::test]
async fn identity_match_ignores_address_case() {
    let ledger = Arc::new(mock_ledger(
        fixtures::thanos(),
        Some(fixtures::character("Thor", 800, 800, 1000)),
    ));
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();

    let shouted = fixtures::LOCAL_ACCOUNT.to_ascii_uppercase().replacen("0X", "0x", 1);
    ledger.emit(fixtures::attack_complete(&shouted, 499_000, 700, 1000, 100));

    let view = wait_for_view(&coordinator, |v| player_hp(v) == Some(700)).await;
    assert_eq!(view.player_lifecycle, AttackLifecycleState::Hit);
    // No local attack was pending, so the boss does not flash.
    assert_eq!(view.boss_lifecycle, AttackLifecycleState::Idle);
}

#[tokio::test]
async fn confirmed_hp_is_clamped_to_max() {
    let ledger = Arc::new(mock_ledger(
        fixtures::thanos(),
        Some(fixtures::character("Thor", 300, 800, 1000)),
    ));
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();

    ledger.emit(fixtures::attack_complete(fixtures::LOCAL_ACCOUNT, 9_000_000, 5_000, 0, 0));

    let view = wait_for_view(&coordinator, |v| v.visible_notification.is_some()).await;
    assert_eq!(boss_hp(&view), Some(500_000));
    assert_eq!(player_hp(&view), Some(800));
    assert_eq!(view.player_lifecycle, AttackLifecycleState::Idle);
}

#[tokio::test]
async fn unset_attacker_never_shows_notification() {
    let ledger = Arc::new(mock_ledger(fixtures::thanos(), None));
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();

    ledger.emit(fixtures::attack_complete(UNSET_ADDRESS, 499_990, 0, 10, 0));

    let view = wait_for_view(&coordinator, |v| boss_hp(v) == Some(499_990)).await;
    assert!(view.visible_notification.is_none());
}

#[tokio::test]
async fn malformed_events_and_records_are_skipped() {
    let mut ledger = MockLedger::new();
    ledger.requests.expect_fetch_boss_record().returning(|| {
        let mut record = fixtures::record(&fixtures::thanos());
        record.hp = None;
        Ok(record)
    });
    ledger
        .requests
        .expect_fetch_default_roster()
        .returning(|| Err(LedgerError::transport("connection reset")));
    ledger
        .requests
        .expect_fetch_owned_character()
        .returning(|| Ok(None));
    let ledger = Arc::new(ledger);
    let coordinator = new_coordinator(ledger.clone());

    coordinator.initialize().await.unwrap();

    let view = coordinator.view();
    assert!(view.boss.is_none());
    assert!(view.roster.is_empty());
    assert_eq!(view.phase(), BattlePhase::SelectCharacter);
}

#[tokio::test]
async fn attack_requires_a_living_character() {
    let ledger = Arc::new(mock_ledger(fixtures::thanos(), None));
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();
    assert_eq!(
        coordinator.request_attack().await,
        Err(BattleError::NoCharacter)
    );

    let fallen = Arc::new(mock_ledger(
        fixtures::thanos(),
        Some(fixtures::character("Hawkeye", 0, 200, 200)),
    ));
    let coordinator = new_coordinator(fallen);
    coordinator.initialize().await.unwrap();
    assert_eq!(coordinator.view().phase(), BattlePhase::Respawn);
    assert_eq!(
        coordinator.request_attack().await,
        Err(BattleError::CharacterDefeated)
    );
}

#[tokio::test]
async fn random_mint_excludes_last_roster_entry() {
    let mut random = MockRandomPort::new();
    random.expect_gen_index().with(eq(5)).times(1).returning(|_| 4);
    let mut ledger = mock_ledger(fixtures::thanos(), None);
    ledger
        .requests
        .expect_send_mint()
        .with(eq(4))
        .times(1)
        .returning(|index| Ok(fixtures::mint_handle(index)));
    ledger
        .requests
        .expect_await_acceptance()
        .returning(|handle| Ok(fixtures::receipt(handle)));
    let coordinator = new_coordinator_with(Arc::new(ledger), Arc::new(random));
    coordinator.initialize().await.unwrap();

    let outcome = coordinator.request_mint(MintSelection::Random).await.unwrap();

    assert!(outcome.is_accepted());
}

#[tokio::test]
async fn random_mint_on_tiny_rosters() {
    let hero = fixtures::character("Hawkeye", 200, 200, 200);
    let mut single = MockLedger::new();
    single
        .requests
        .expect_fetch_boss_record()
        .returning(|| Ok(fixtures::record(&fixtures::thanos())));
    single
        .requests
        .expect_fetch_default_roster()
        .returning(move || Ok(vec![fixtures::record(&hero)]));
    single
        .requests
        .expect_fetch_owned_character()
        .returning(|| Ok(None));
    single
        .requests
        .expect_send_mint()
        .with(eq(0))
        .times(1)
        .returning(|index| Ok(fixtures::mint_handle(index)));
    single
        .requests
        .expect_await_acceptance()
        .returning(|handle| Ok(fixtures::receipt(handle)));
    let coordinator = new_coordinator_with(Arc::new(single), Arc::new(FixedRandom(3)));
    coordinator.initialize().await.unwrap();
    assert!(coordinator
        .request_mint(MintSelection::Random)
        .await
        .unwrap()
        .is_accepted());

    let mut empty = MockLedger::new();
    empty
        .requests
        .expect_fetch_boss_record()
        .returning(|| Ok(fixtures::record(&fixtures::thanos())));
    empty
        .requests
        .expect_fetch_default_roster()
        .returning(|| Ok(Vec::new()));
    empty
        .requests
        .expect_fetch_owned_character()
        .returning(|| Ok(None));
    empty.requests.expect_send_mint().never();
    let coordinator = new_coordinator(Arc::new(empty));
    coordinator.initialize().await.unwrap();
    assert_eq!(
        coordinator.request_mint(MintSelection::Random).await,
        Err(BattleError::EmptyRoster)
    );
}

#[tokio::test]
async fn rejected_mint_clears_flag() {
    let ledger = simulated();
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();

    ledger.reject_next_mint("insufficient funds for gas");
    let result = coordinator.request_mint(MintSelection::Index(3)).await;

    assert!(matches!(result, Err(BattleError::RequestRejected(_))));
    let view = coordinator.view();
    assert!(!view.minting_in_progress);
    assert!(view.player.is_none());
}

#[tokio::test(start_paused = true)]
async fn unconfirmed_attack_times_out_when_configured() {
    let ledger = simulated();
    let settings = BattleSettings {
        pending_timeout: Some(Duration::from_secs(30)),
        ..settings()
    };
    let coordinator = BattleCoordinator::new(Some(ledger.clone()), settings);
    coordinator.initialize().await.unwrap();
    coordinator.request_mint(MintSelection::Index(2)).await.unwrap();
    wait_for_view(&coordinator, |v| v.player.is_some()).await;

    ledger.withhold_events(true);
    coordinator.request_attack().await.unwrap();
    assert_eq!(coordinator.view().player_lifecycle, AttackLifecycleState::Pending);

    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(coordinator.view().player_lifecycle, AttackLifecycleState::Pending);

    tokio::time::sleep(Duration::from_secs(2)).await;
    let view = coordinator.view();
    assert_eq!(view.player_lifecycle, AttackLifecycleState::Idle);
    assert_eq!(view.boss_lifecycle, AttackLifecycleState::Idle);
}

#[tokio::test(start_paused = true)]
async fn without_timeout_unconfirmed_attack_stays_pending() {
    let ledger = simulated();
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();
    coordinator.request_mint(MintSelection::Index(2)).await.unwrap();
    wait_for_view(&coordinator, |v| v.player.is_some()).await;

    ledger.withhold_events(true);
    coordinator.request_attack().await.unwrap();
    tokio::time::sleep(Duration::from_secs(600)).await;

    assert_eq!(coordinator.view().player_lifecycle, AttackLifecycleState::Pending);
    assert_eq!(
        coordinator.request_attack().await,
        Ok(IntentOutcome::Ignored)
    );
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_timers_and_stops_events() {
    let ledger = simulated();
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();
    coordinator.request_mint(MintSelection::Index(2)).await.unwrap();
    wait_for_view(&coordinator, |v| v.player.is_some()).await;
    coordinator.request_attack().await.unwrap();
    wait_for_view(&coordinator, |v| v.visible_notification.is_some()).await;

    coordinator.shutdown().await;

    let view = coordinator.view();
    assert!(view.visible_notification.is_none());
    assert_eq!(view.player_lifecycle, AttackLifecycleState::Idle);

    let other = ledger.connect_as(AccountAddress::new(fixtures::OTHER_ACCOUNT));
    let handle = other.send_mint(0).await.unwrap();
    other.await_acceptance(&handle).await.unwrap();
    let handle = other.send_attack().await.unwrap();
    other.await_acceptance(&handle).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(boss_hp(&coordinator.view()), Some(499_000));
}

#[tokio::test]
async fn on_mint_confirmed_without_ledger_is_a_no_op() {
    let coordinator = BattleCoordinator::new(None, settings());
    let event = avengers_domain::CharacterMinted {
        minter: fixtures::local_account(),
        token_id: avengers_domain::TokenId::new(1),
        character_index: 2,
    };

    assert_eq!(coordinator.on_mint_confirmed(event).await, Ok(()));
    assert!(coordinator.view().player.is_none());
}

#[tokio::test]
async fn confirmation_handlers_apply_directly() {
    let ledger = Arc::new(mock_ledger(
        fixtures::thanos(),
        Some(fixtures::character("Thor", 800, 800, 1000)),
    ));
    let coordinator = new_coordinator(ledger);
    coordinator.initialize().await.unwrap();

    coordinator
        .on_attack_confirmed(avengers_domain::AttackResolved {
            new_boss_hp: 1,
            new_player_hp: 1,
            attacker: fixtures::other_account(),
            damage_to_boss: 5,
            damage_to_player: 5,
        })
        .await;

    let view = coordinator.view();
    assert_eq!(boss_hp(&view), Some(1));
    assert_eq!(player_hp(&view), Some(800));
    assert_eq!(
        view.visible_notification.map(|n| n.issued_at),
        Some(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
    );
}

async fn armed_with_unconfirmed_attack(ledger: &Arc<SimulatedLedger>) -> BattleCoordinator {
    let coordinator = new_coordinator(ledger.clone());
    coordinator.initialize().await.unwrap();
    coordinator.request_mint(MintSelection::Index(2)).await.unwrap();
    wait_for_view(&coordinator, |v| v.player.is_some()).await;

    ledger.withhold_events(true);
    let outcome = coordinator.request_attack().await.unwrap();
    assert!(outcome.is_accepted());
    coordinator
}

#[tokio::test]
async fn mint_by_other_session_keeps_pending_attack() {
    let ledger = simulated();
    let coordinator = armed_with_unconfirmed_attack(&ledger).await;

    let other = ledger.connect_as(fixtures::other_account());
    let handle = other.send_mint(4).await.unwrap();
    other.await_acceptance(&handle).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let view = coordinator.view();
    assert_eq!(view.player_lifecycle, AttackLifecycleState::Pending);
    assert_eq!(view.boss_lifecycle, AttackLifecycleState::Pending);
    assert_eq!(view.player.as_ref().map(Character::name), Some("Thor"));
    assert_eq!(
        coordinator.request_attack().await,
        Ok(IntentOutcome::Ignored)
    );
}

#[tokio::test]
async fn reinitialize_during_pending_attack_keeps_guard() {
    let ledger = simulated();
    let coordinator = armed_with_unconfirmed_attack(&ledger).await;

    coordinator.initialize().await.unwrap();

    let view = coordinator.view();
    assert_eq!(view.player_lifecycle, AttackLifecycleState::Pending);
    assert_eq!(view.boss_lifecycle, AttackLifecycleState::Pending);
    assert_eq!(
        coordinator.request_attack().await,
        Ok(IntentOutcome::Ignored)
    );
    assert_eq!(ledger.subscriber_count(LedgerEventKind::AttackComplete), 1);
}

#[tokio::test]
async fn failed_ownership_read_is_a_read_failure() {
    let mut ledger = MockLedger::new();
    ledger
        .requests
        .expect_fetch_owned_character()
        .returning(|| Err(LedgerError::transport("node unreachable")));
    let coordinator = new_coordinator(Arc::new(ledger));

    let result = coordinator
        .on_mint_confirmed(avengers_domain::CharacterMinted {
            minter: fixtures::local_account(),
            token_id: avengers_domain::TokenId::new(1),
            character_index: 2,
        })
        .await;

    assert!(matches!(result, Err(BattleError::ReadFailed(_))));
    assert!(coordinator.view().player.is_none());
}
