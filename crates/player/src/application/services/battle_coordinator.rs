//! Battle coordinator
//!
//! Owns the arena state for one session and keeps it in step with the
//! ledger:
//!
//! - intents (`request_attack`, `request_mint`) go out as transactions and
//!   only wait for local acceptance
//! - confirmations come back as contract events, are forwarded into a
//!   channel by the subscription handlers, and are applied one at a time by
//!   a single pump task, in delivery order
//! - lifecycle and notification timers run as spawned tasks holding a `Weak`
//!   reference, so nothing outlives the coordinator
//!
//! State lives behind an async mutex that is never held across a ledger
//! call. Every change is published to a `watch` channel as a `BattleView`.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

use avengers_domain::{
    AccountAddress, Actor, AttackResolved, BattleEvent, Character, CharacterMinted,
    CombatNotification,
};
use avengers_shared::{LedgerEvent, LedgerEventKind};

use crate::application::dto::{BattleView, IntentOutcome, MintSelection};
use crate::application::error::BattleError;
use crate::application::services::attack_lifecycle::AttackLifecycle;
use crate::application::services::character_repository::CharacterRepository;
use crate::application::services::notification_queue::NotificationQueue;
use crate::infrastructure::messaging::EventSubscription;
use crate::infrastructure::platform::{SystemClock, SystemRandom};
use crate::infrastructure::settings::BattleSettings;
use crate::ports::outbound::{
    AcceptanceReceipt, ClockPort, LedgerClient, LedgerError, LedgerEventHandler, RandomPort,
};

struct BattleState {
    player: Option<Character>,
    boss: Option<Character>,
    roster: Vec<Character>,
    player_lifecycle: AttackLifecycle,
    boss_lifecycle: AttackLifecycle,
    notifications: NotificationQueue,
    minting_in_progress: bool,
}

impl BattleState {
    fn new(settings: &BattleSettings) -> Self {
        Self {
            player: None,
            boss: None,
            roster: Vec::new(),
            player_lifecycle: AttackLifecycle::new(Actor::Player),
            boss_lifecycle: AttackLifecycle::new(Actor::Boss),
            notifications: NotificationQueue::new(settings.notification_window),
            minting_in_progress: false,
        }
    }

    fn lifecycle_mut(&mut self, actor: Actor) -> &mut AttackLifecycle {
        match actor {
            Actor::Player => &mut self.player_lifecycle,
            Actor::Boss => &mut self.boss_lifecycle,
        }
    }

    /// Install `character` as the local player. The lifecycle restarts only
    /// for a different character, and never while an attack is pending.
    fn adopt_player(&mut self, character: Character) {
        let replaced = self.player.as_ref().map_or(true, |current| {
            current.name() != character.name() || current.image_uri() != character.image_uri()
        });
        self.player = Some(character);
        if replaced && !self.player_lifecycle.state().is_pending() {
            self.player_lifecycle.reset();
        }
    }

    fn view(&self) -> BattleView {
        BattleView {
            player: self.player.clone(),
            boss: self.boss.clone(),
            roster: self.roster.clone(),
            player_lifecycle: self.player_lifecycle.state(),
            boss_lifecycle: self.boss_lifecycle.state(),
            visible_notification: self.notifications.currently_visible().cloned(),
            minting_in_progress: self.minting_in_progress,
        }
    }
}

type ExpiryTask = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Which timer fired.
#[derive(Debug, Clone, Copy)]
enum TimerTarget {
    Lifecycle(Actor),
    Notification,
}

struct BattleShared {
    ledger: Option<Arc<dyn LedgerClient>>,
    settings: BattleSettings,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    repository: CharacterRepository,
    state: Mutex<BattleState>,
    view_tx: watch::Sender<BattleView>,
}

impl BattleShared {
    fn ledger(&self) -> Result<Arc<dyn LedgerClient>, BattleError> {
        self.ledger
            .clone()
            .ok_or(BattleError::ConnectionUnavailable)
    }

    fn local(&self) -> &AccountAddress {
        &self.settings.account
    }

    fn is_local(&self, account: &AccountAddress) -> bool {
        !self.local().is_unset() && self.local().matches(account)
    }

    fn publish_view(&self, state: &BattleState) {
        self.view_tx.send_replace(state.view());
    }

    async fn apply(self: &Arc<Self>, event: LedgerEvent) {
        let event = match self.repository.normalize_event(event) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed ledger event");
                return;
            }
        };
        match event {
            BattleEvent::AttackResolved(event) => self.on_attack_confirmed(event).await,
            BattleEvent::CharacterMinted(event) => {
                if let Err(e) = self.on_mint_confirmed(event).await {
                    tracing::warn!(error = %e, "Could not adopt minted character");
                }
            }
        }
    }

    async fn on_attack_confirmed(self: &Arc<Self>, event: AttackResolved) {
        let by_local = self.is_local(&event.attacker);
        tracing::info!(
            attacker = %event.attacker,
            by_local,
            new_boss_hp = event.new_boss_hp,
            new_player_hp = event.new_player_hp,
            damage_to_boss = event.damage_to_boss,
            damage_to_player = event.damage_to_player,
            "Attack confirmed"
        );

        let mut state = self.state.lock().await;
        state.boss = state.boss.as_ref().map(|boss| boss.with_hp(event.new_boss_hp));

        if by_local {
            state.player = state
                .player
                .as_ref()
                .map(|player| player.with_hp(event.new_player_hp));
            self.apply_damage(&mut state, Actor::Boss, event.damage_to_boss);
            self.apply_damage(&mut state, Actor::Player, event.damage_to_player);
        }

        let notification = CombatNotification::new(
            event.attacker,
            event.damage_to_boss,
            event.damage_to_player,
            self.clock.now(),
        );
        let on_elapsed = self.timer(TimerTarget::Notification);
        state.notifications.publish(notification, on_elapsed);

        self.publish_view(&state);
    }

    fn apply_damage(self: &Arc<Self>, state: &mut BattleState, actor: Actor, damage: u64) {
        let hold = self.settings.hit_reset;
        let on_elapsed = self.timer(TimerTarget::Lifecycle(actor));
        let lifecycle = state.lifecycle_mut(actor);
        if damage == 0 {
            lifecycle.settle_pending();
            return;
        }
        if let Err(e) = lifecycle.enter_hit(hold, on_elapsed) {
            tracing::debug!(actor = %actor, error = %e, "Ignoring hit");
        }
    }

    async fn on_mint_confirmed(self: &Arc<Self>, event: CharacterMinted) -> Result<(), BattleError> {
        tracing::info!(
            minter = %event.minter,
            token_id = %event.token_id,
            character_index = event.character_index,
            url = %self.settings.token_url(event.token_id),
            "Character NFT minted"
        );

        if !self.is_local(&event.minter) {
            tracing::debug!(minter = %event.minter, "Mint by another session");
            return Ok(());
        }
        let Some(ledger) = self.ledger.clone() else {
            return Ok(());
        };
        let owned = ledger
            .fetch_owned_character()
            .await
            .map_err(BattleError::ReadFailed)?;
        let Some(raw) = owned else {
            tracing::debug!("Local account owns no character yet");
            return Ok(());
        };
        let character = self.repository.normalize(&raw)?;

        let mut state = self.state.lock().await;
        tracing::info!(name = character.name(), hp = character.hp(), "Adopted player character");
        state.adopt_player(character);
        self.publish_view(&state);
        Ok(())
    }

    /// Build the task a timer runs with the generation it was armed for.
    fn timer(self: &Arc<Self>, target: TimerTarget) -> impl FnOnce(u64) -> ExpiryTask {
        let shared = Arc::downgrade(self);
        move |generation| -> ExpiryTask {
            Box::pin(async move {
                if let Some(shared) = shared.upgrade() {
                    shared.expire(target, generation).await;
                }
            })
        }
    }

    async fn expire(&self, target: TimerTarget, generation: u64) {
        let mut state = self.state.lock().await;
        let changed = match target {
            TimerTarget::Lifecycle(actor) => state.lifecycle_mut(actor).expire(generation),
            TimerTarget::Notification => state.notifications.expire(generation),
        };
        if changed {
            self.publish_view(&state);
        }
    }

    async fn load_characters(&self, ledger: &Arc<dyn LedgerClient>) {
        let boss = match ledger.fetch_boss_record().await {
            Ok(raw) => self
                .repository
                .normalize(&raw)
                .inspect_err(|e| tracing::warn!(error = %e, "Skipping malformed boss record"))
                .ok(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not fetch boss");
                None
            }
        };
        let roster = match ledger.fetch_default_roster().await {
            Ok(raws) => Some(self.repository.normalize_roster(&raws)),
            Err(e) => {
                tracing::warn!(error = %e, "Could not fetch default roster");
                None
            }
        };
        let player = match ledger.fetch_owned_character().await {
            Ok(Some(raw)) => self
                .repository
                .normalize(&raw)
                .inspect_err(|e| tracing::warn!(error = %e, "Skipping malformed owned character"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Could not fetch owned character");
                None
            }
        };

        let mut state = self.state.lock().await;
        if let Some(boss) = boss {
            tracing::info!(name = boss.name(), hp = boss.hp(), "Boss loaded");
            state.boss = Some(boss);
        }
        if let Some(roster) = roster {
            tracing::info!(roster_size = roster.len(), "Roster loaded");
            state.roster = roster;
        }
        if let Some(player) = player {
            tracing::info!(name = player.name(), hp = player.hp(), "Player character loaded");
            state.adopt_player(player);
        }
        self.publish_view(&state);
    }
}

/// Live subscriptions plus the task applying their events.
struct EventConnection {
    subscriptions: Vec<EventSubscription>,
    pump: JoinHandle<()>,
}

impl EventConnection {
    fn open(ledger: &Arc<dyn LedgerClient>, shared: Weak<BattleShared>) -> Result<Self, LedgerError> {
        let (tx, rx) = mpsc::unbounded_channel::<LedgerEvent>();

        let mut subscriptions = Vec::with_capacity(LedgerEventKind::ALL.len());
        for kind in LedgerEventKind::ALL {
            let tx = tx.clone();
            let handler: LedgerEventHandler = Arc::new(move |event| {
                if tx.send(event).is_err() {
                    tracing::debug!(event = %kind, "Event pump stopped, dropping event");
                }
            });
            subscriptions.push(EventSubscription::open(Arc::clone(ledger), kind, handler)?);
        }

        let pump = tokio::spawn(pump_events(shared, rx));
        Ok(Self {
            subscriptions,
            pump,
        })
    }

    fn close(self) {
        // Drop releases the subscriptions and stops the pump.
        drop(self);
    }
}

impl Drop for EventConnection {
    fn drop(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.close();
        }
        self.pump.abort();
    }
}

async fn pump_events(shared: Weak<BattleShared>, mut rx: mpsc::UnboundedReceiver<LedgerEvent>) {
    while let Some(event) = rx.recv().await {
        let Some(shared) = shared.upgrade() else {
            break;
        };
        shared.apply(event).await;
    }
    tracing::debug!("Event pump finished");
}

/// The battle state machine for one session.
pub struct BattleCoordinator {
    shared: Arc<BattleShared>,
    connection: Mutex<Option<EventConnection>>,
}

impl BattleCoordinator {
    /// Coordinator using the system clock and randomness.
    ///
    /// Without a ledger every intent fails with `ConnectionUnavailable`.
    pub fn new(ledger: Option<Arc<dyn LedgerClient>>, settings: BattleSettings) -> Self {
        Self::with_platform(
            ledger,
            settings,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
        )
    }

    pub fn with_platform(
        ledger: Option<Arc<dyn LedgerClient>>,
        settings: BattleSettings,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let state = BattleState::new(&settings);
        let (view_tx, _) = watch::channel(state.view());
        Self {
            shared: Arc::new(BattleShared {
                ledger,
                settings,
                clock,
                random,
                repository: CharacterRepository::new(),
                state: Mutex::new(state),
                view_tx,
            }),
            connection: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &BattleSettings {
        &self.shared.settings
    }

    /// Subscribe to contract events and load the boss, roster and any
    /// character the local account already owns.
    ///
    /// Safe to call again: the previous subscriptions are released before
    /// new ones are installed. Fetch failures are logged and skipped.
    pub async fn initialize(&self) -> Result<(), BattleError> {
        let ledger = self.shared.ledger()?;
        {
            let mut connection = self.connection.lock().await;
            if let Some(previous) = connection.take() {
                tracing::debug!("Releasing previous event connection");
                previous.close();
            }
            let opened = EventConnection::open(&ledger, Arc::downgrade(&self.shared))
                .map_err(|e| {
                    tracing::error!(error = %e, "Could not subscribe to ledger events");
                    BattleError::from(e)
                })?;
            *connection = Some(opened);
        }

        self.shared.load_characters(&ledger).await;
        tracing::info!(account = %self.shared.local(), "Battle initialized");
        Ok(())
    }

    /// Attack the boss with the local character.
    ///
    /// Returns once the transaction is accepted; damage is applied when the
    /// confirmation event arrives. `Ignored` while an attack is pending.
    pub async fn request_attack(&self) -> Result<IntentOutcome, BattleError> {
        let ledger = self.shared.ledger()?;
        {
            let mut state = self.shared.state.lock().await;
            let player = state.player.as_ref().ok_or(BattleError::NoCharacter)?;
            if player.is_defeated() {
                return Err(BattleError::CharacterDefeated);
            }
            if let Err(e) = state.player_lifecycle.begin_attack() {
                tracing::debug!(error = %e, "Ignoring attack while one is pending");
                return Ok(IntentOutcome::Ignored);
            }
            if let Err(e) = state.boss_lifecycle.begin_attack() {
                tracing::debug!(error = %e, "Boss lifecycle already pending");
            }
            if let Some(timeout) = self.shared.settings.pending_timeout {
                for actor in [Actor::Player, Actor::Boss] {
                    let on_elapsed = self.shared.timer(TimerTarget::Lifecycle(actor));
                    state
                        .lifecycle_mut(actor)
                        .arm_pending_timeout(timeout, on_elapsed);
                }
            }
            self.shared.publish_view(&state);
        }

        tracing::info!(account = %self.shared.local(), "Attacking boss");
        match submit_attack(ledger.as_ref()).await {
            Ok(receipt) => {
                tracing::info!(hash = %receipt.hash, block_number = receipt.block_number, "Attack accepted");
                Ok(IntentOutcome::Accepted(receipt))
            }
            Err(e) => {
                tracing::error!(error = %e, "Attack rejected");
                let mut state = self.shared.state.lock().await;
                state.player_lifecycle.abort();
                state.boss_lifecycle.abort();
                self.shared.publish_view(&state);
                Err(BattleError::RequestRejected(e))
            }
        }
    }

    /// Mint a character NFT from the default roster.
    ///
    /// The new character is adopted when the mint event arrives, not here.
    pub async fn request_mint(&self, selection: MintSelection) -> Result<IntentOutcome, BattleError> {
        let ledger = self.shared.ledger()?;
        let character_index = {
            let mut state = self.shared.state.lock().await;
            let roster_size = state.roster.len();
            let character_index = match selection {
                MintSelection::Index(index) if index < roster_size => index,
                MintSelection::Index(index) => {
                    return Err(BattleError::RosterIndexOutOfBounds { index, roster_size });
                }
                MintSelection::Random if roster_size == 0 => return Err(BattleError::EmptyRoster),
                // The last roster entry is never drawn.
                MintSelection::Random => self
                    .shared
                    .random
                    .gen_index(roster_size.saturating_sub(1).max(1))
                    .min(roster_size - 1),
            };
            if state.minting_in_progress {
                tracing::debug!(character_index, "Ignoring mint while one is in flight");
                return Ok(IntentOutcome::Ignored);
            }
            state.minting_in_progress = true;
            self.shared.publish_view(&state);
            character_index
        };

        tracing::info!(character_index, "Minting character NFT");
        let result = submit_mint(ledger.as_ref(), character_index).await;

        let mut state = self.shared.state.lock().await;
        state.minting_in_progress = false;
        self.shared.publish_view(&state);
        drop(state);

        match result {
            Ok(receipt) => {
                tracing::info!(hash = %receipt.hash, block_number = receipt.block_number, "Mint accepted");
                Ok(IntentOutcome::Accepted(receipt))
            }
            Err(e) => {
                tracing::error!(error = %e, character_index, "Mint rejected");
                Err(BattleError::RequestRejected(e))
            }
        }
    }

    /// Apply a confirmed attack from any session.
    pub async fn on_attack_confirmed(&self, event: AttackResolved) {
        self.shared.on_attack_confirmed(event).await;
    }

    /// Apply a confirmed mint: read back and adopt the owned character.
    pub async fn on_mint_confirmed(&self, event: CharacterMinted) -> Result<(), BattleError> {
        self.shared.on_mint_confirmed(event).await
    }

    /// Release subscriptions, stop the event pump and cancel timers.
    pub async fn shutdown(&self) {
        if let Some(connection) = self.connection.lock().await.take() {
            connection.close();
        }
        let mut state = self.shared.state.lock().await;
        state.player_lifecycle.reset();
        state.boss_lifecycle.reset();
        state.notifications.clear();
        self.shared.publish_view(&state);
        tracing::info!("Battle shut down");
    }

    /// Current presentation snapshot.
    pub fn view(&self) -> BattleView {
        self.shared.view_tx.borrow().clone()
    }

    /// Receive a new `BattleView` after every state change.
    pub fn watch(&self) -> watch::Receiver<BattleView> {
        self.shared.view_tx.subscribe()
    }
}

async fn submit_attack(ledger: &dyn LedgerClient) -> Result<AcceptanceReceipt, LedgerError> {
    let handle = ledger.send_attack().await?;
    ledger.await_acceptance(&handle).await
}

async fn submit_mint(
    ledger: &dyn LedgerClient,
    character_index: usize,
) -> Result<AcceptanceReceipt, LedgerError> {
    let handle = ledger.send_mint(character_index).await?;
    ledger.await_acceptance(&handle).await
}
