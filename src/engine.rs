//! Snapshot synchronization engine
//!
//! Orchestrates the store, the level-set registry, and the host boundary on
//! domain events: world transitions, death, logout, explicit and periodic
//! saves, and backup capture. All operations run inline on the host's main
//! simulation thread and are total: a failed write is logged by the store
//! and the event handler proceeds, because aborting a handler would
//! desynchronize the player from the game loop.
//!
//! The only deferred operation is the post-transition apply: loading
//! happens in the transition handler, but the loaded snapshot must be
//! applied one tick later to dodge a race with world-management addons, so
//! [`SyncEngine::on_post_transition`] hands the host a [`PendingApply`]
//! task to run after the next tick boundary.

use crate::config::EngineConfig;
use crate::host::{EntityCodec, ItemCodec, LivePlayer, WorldView};
use crate::level_set::LevelSetRegistry;
use crate::snapshot::{
    ARMOUR_SLOTS, MAX_HEALTH, MAX_HUNGER, PLAYER_INVENTORY_SIZE, PartialLocation, PlayerSnapshot,
    codec,
};
use crate::store::{BackupRecord, SnapshotStore};
use log::debug;

/// A loaded snapshot waiting to be applied one tick after a world
/// transition.
///
/// The host queues this on its event loop and hands it back to
/// [`SyncEngine::apply_pending`] after the next tick boundary. There is no
/// cancellation path: if the player disconnects within that tick, the apply
/// checks liveness and becomes a no-op.
#[derive(Debug, Clone)]
pub struct PendingApply {
    world: String,
    snapshot: PlayerSnapshot,
}

impl PendingApply {
    /// The destination world the snapshot belongs to.
    pub fn world(&self) -> &str {
        &self.world
    }

    pub fn snapshot(&self) -> &PlayerSnapshot {
        &self.snapshot
    }
}

/// Tick-counted trigger for the periodic global save.
///
/// The host calls [`GlobalSaveTimer::tick`] once per simulation tick and,
/// when it fires, runs [`SyncEngine::on_explicit_save`] for every online
/// player. The interval comes from the configuration, already clamped to
/// its one-minute floor.
pub struct GlobalSaveTimer {
    interval: u64,
    elapsed: u64,
}

impl GlobalSaveTimer {
    pub fn new(config: &EngineConfig) -> Self {
        GlobalSaveTimer {
            interval: config.global_save_interval(),
            elapsed: 0,
        }
    }

    /// Picks up the interval from a reloaded configuration. The elapsed
    /// count is kept, so a shortened interval that has already passed
    /// fires on the next tick.
    pub fn refresh(&mut self, config: &EngineConfig) {
        self.interval = config.global_save_interval();
    }

    /// Advances the timer by one tick. Returns true when the interval has
    /// elapsed, resetting the count.
    pub fn tick(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.interval {
            self.elapsed = 0;
            return true;
        }
        false
    }
}

/// The orchestration core: computes which worlds an event affects and
/// drives the store accordingly.
///
/// Generic over the host's blob codec; each operation is generic over the
/// live player handle so tests can drive the engine with plain mocks.
pub struct SyncEngine<C> {
    store: SnapshotStore,
    registry: LevelSetRegistry,
    config: EngineConfig,
    codec: C,
}

impl<C> SyncEngine<C>
where
    C: ItemCodec + EntityCodec,
{
    pub fn new(
        store: SnapshotStore,
        registry: LevelSetRegistry,
        config: EngineConfig,
        codec: C,
    ) -> Self {
        SyncEngine {
            store,
            registry,
            config,
            codec,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn registry(&self) -> &LevelSetRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replaces the configuration and re-reads the level sets from disk.
    /// Triggered by an administrative reload command.
    ///
    /// The engine holds no timer, so a host running a [`GlobalSaveTimer`]
    /// must call [`GlobalSaveTimer::refresh`] with the new configuration
    /// for the periodic cadence to change.
    pub fn reload(&mut self, config: EngineConfig) {
        self.config = config;
        self.registry.reload();
    }

    /// Pre-transition hook: the player is about to leave `from_world`.
    ///
    /// Saves the outgoing snapshot (with the location discarded when the
    /// world is configured for coordinate nulling), propagates across the
    /// level set, and detaches the player's mount so re-entering the world
    /// cannot duplicate the vehicle entity.
    pub fn on_pre_transition<P>(&self, player: &mut P, from_world: &str)
    where
        P: LivePlayer<Item = <C as ItemCodec>::Item, Entity = <C as EntityCodec>::Entity>,
    {
        self.save_and_propagate(&*player, from_world);
        player.eject();
    }

    /// Post-transition hook: the player has arrived in `world`.
    ///
    /// Loads the destination snapshot, forces the world's default game
    /// mode, and, for coordinate-nulling destinations, immediately
    /// re-runs the save so the just-computed location is discarded before
    /// the player can accumulate state there. The returned task must be
    /// run one tick later via [`SyncEngine::apply_pending`].
    pub fn on_post_transition<P, W>(&self, player: &mut P, world: &W) -> PendingApply
    where
        P: LivePlayer<Item = <C as ItemCodec>::Item, Entity = <C as EntityCodec>::Entity>,
        W: WorldView,
    {
        let snapshot = self.store.load(world.name(), player.player_id());
        player.set_game_mode(world.default_game_mode());

        if self.config.nulls_coordinates(world.name()) {
            self.save_and_propagate(&*player, world.name());
        }

        PendingApply {
            world: world.name().to_string(),
            snapshot,
        }
    }

    /// Runs a deferred post-transition apply. No-op if the player went
    /// offline within the deferral tick.
    pub fn apply_pending<P>(&self, pending: PendingApply, player: &mut P)
    where
        P: LivePlayer<Item = <C as ItemCodec>::Item, Entity = <C as EntityCodec>::Entity>,
    {
        if !player.is_online() {
            debug!(
                "Skipping deferred apply for {} in {}: player is offline",
                player.player_id(),
                pending.world
            );
            return;
        }

        self.apply_snapshot(&pending.snapshot, player, &pending.world);
    }

    /// Death hook: captures the post-death state for `world` and its set.
    ///
    /// When the effective rule is "do not keep inventory" (the platform
    /// rule, with the per-world override forcing loss), the live items are
    /// dropped into the world at the death location so the drop stays
    /// visible, and the stored snapshot gets empty inventory and armour.
    /// The snapshot always loses its location (the platform picks the
    /// respawn point) and has health and hunger reset to their maxima.
    pub fn on_death<P, W>(&self, player: &mut P, world: &W)
    where
        P: LivePlayer<Item = <C as ItemCodec>::Item, Entity = <C as EntityCodec>::Entity>,
        W: WorldView,
    {
        let player_id = player.player_id().to_string();
        let keep_inventory =
            world.keep_inventory() && !self.config.forces_inventory_loss(world.name());

        let mut snapshot = self.capture(&*player, None);
        snapshot.health = MAX_HEALTH;
        snapshot.hunger = MAX_HUNGER;

        if !keep_inventory {
            let mut drops: Vec<_> = player.inventory().into_iter().flatten().collect();
            drops.extend(player.armour().into_iter().flatten());
            player.drop_items(drops);

            snapshot.inventory = vec![None; PLAYER_INVENTORY_SIZE];
            snapshot.armour = vec![None; ARMOUR_SLOTS];
        }

        debug!("Death save for {} in {}", player_id, world.name());
        self.store.save(world.name(), &player_id, &snapshot);
        // The death snapshot is already location-free, so every member of
        // the set gets it verbatim.
        self.propagate(&player_id, world.name(), &snapshot, true);
    }

    /// Explicit save: manual command, world-save event, or the periodic
    /// timer. Step-1 save semantics without the mount handling, plus an
    /// accompanying backup write for the triggering world.
    pub fn on_explicit_save<P>(&self, player: &P, world: &str)
    where
        P: LivePlayer<Item = <C as ItemCodec>::Item, Entity = <C as EntityCodec>::Entity>,
    {
        let snapshot = self.save_and_propagate(player, world);
        self.store.backup(world, player.player_id(), &snapshot);
    }

    /// Backup capture: the same snapshot construction as an explicit save,
    /// routed to the backup directory and propagated across the set. Each
    /// member's backup keeps that member's own stored coordinates.
    pub fn on_backup<P>(&self, player: &P, world: &str)
    where
        P: LivePlayer<Item = <C as ItemCodec>::Item, Entity = <C as EntityCodec>::Entity>,
    {
        let player_id = player.player_id();
        let nulling = self.config.nulls_coordinates(world);
        let location = if nulling { None } else { Some(player.location()) };
        let snapshot = self.capture(player, location);

        self.store.backup(world, player_id, &snapshot);

        for member in self.registry.resolve_set(world).worlds() {
            if member == world {
                continue;
            }
            let member_location = if nulling {
                None
            } else {
                self.store.load(member, player_id).coordinates
            };
            self.store
                .backup(member, player_id, &snapshot.with_location(member_location));
        }
    }

    /// Logout hook: a final save plus a backup of the session.
    pub fn on_logout<P>(&self, player: &P, world: &str)
    where
        P: LivePlayer<Item = <C as ItemCodec>::Item, Entity = <C as EntityCodec>::Entity>,
    {
        self.save_and_propagate(player, world);
        self.on_backup(player, world);
    }

    /// Restores a backup: the snapshot is persisted as the authoritative
    /// state for (player, world) and applied to the live player.
    pub fn restore_backup<P>(&self, player: &mut P, world: &str, record: &BackupRecord)
    where
        P: LivePlayer<Item = <C as ItemCodec>::Item, Entity = <C as EntityCodec>::Entity>,
    {
        let player_id = player.player_id().to_string();
        self.store.save(world, &player_id, &record.snapshot);
        self.apply_snapshot(&record.snapshot, player, world);
    }

    /// Clones another player's stored snapshot for `world` onto this
    /// player. The coordinates are stripped first: a clone must not
    /// teleport the target onto the source player's position.
    pub fn clone_to<P>(&self, player: &mut P, world: &str, source_player_id: &str)
    where
        P: LivePlayer<Item = <C as ItemCodec>::Item, Entity = <C as EntityCodec>::Entity>,
    {
        let player_id = player.player_id().to_string();
        let snapshot = self.store.load(world, source_player_id).stripped_of_location();
        self.store.save(world, &player_id, &snapshot);
        self.apply_snapshot(&snapshot, player, world);
    }

    /// Builds a snapshot from the live player state with the given
    /// location. Item and vehicle handles go through the blob codec; a
    /// handle that fails to encode degrades to an empty slot.
    fn capture<P>(&self, player: &P, location: Option<PartialLocation>) -> PlayerSnapshot
    where
        P: LivePlayer<Item = <C as ItemCodec>::Item, Entity = <C as EntityCodec>::Entity>,
    {
        PlayerSnapshot {
            inventory: codec::encode_contents(&self.codec, &player.inventory()),
            armour: codec::encode_contents(&self.codec, &player.armour()),
            potion_effects: player.active_effects(),
            coordinates: location,
            experience_levels: player.experience_levels(),
            experience_points: player.experience_points(),
            health: player.health(),
            hunger: player.hunger(),
            vehicle: player
                .vehicle()
                .and_then(|holder| holder.to_encoded(&self.codec)),
        }
    }

    /// Saves the player's snapshot for `world` and propagates it across the
    /// resolved level set. Returns the snapshot stored for `world` itself.
    fn save_and_propagate<P>(&self, player: &P, world: &str) -> PlayerSnapshot
    where
        P: LivePlayer<Item = <C as ItemCodec>::Item, Entity = <C as EntityCodec>::Entity>,
    {
        let nulling = self.config.nulls_coordinates(world);
        let location = if nulling { None } else { Some(player.location()) };
        let snapshot = self.capture(player, location);

        self.store.save(world, player.player_id(), &snapshot);
        self.propagate(player.player_id(), world, &snapshot, nulling);
        snapshot
    }

    /// Writes the non-positional fields of `snapshot` to every other member
    /// of the origin world's set, in configured order, skipping the origin.
    /// Each target keeps its own previously stored location unless nulling
    /// is in effect, in which case everyone's location is discarded.
    fn propagate(&self, player_id: &str, origin: &str, snapshot: &PlayerSnapshot, nulling: bool) {
        for member in self.registry.resolve_set(origin).worlds() {
            if member == origin {
                continue;
            }

            let location = if nulling {
                None
            } else {
                self.store.load(member, player_id).coordinates
            };
            self.store
                .save(member, player_id, &snapshot.with_location(location));
        }
    }

    /// Applies a snapshot to the live player. Placement is skipped for
    /// empty snapshots and for worlds with coordinate handling disabled.
    fn apply_snapshot<P>(&self, snapshot: &PlayerSnapshot, player: &mut P, world: &str)
    where
        P: LivePlayer<Item = <C as ItemCodec>::Item, Entity = <C as EntityCodec>::Entity>,
    {
        player.set_inventory(codec::decode_contents(&self.codec, &snapshot.inventory));
        player.set_armour(codec::decode_contents(&self.codec, &snapshot.armour));
        player.set_experience(snapshot.experience_levels, snapshot.experience_points);
        player.set_health(snapshot.health);
        player.set_hunger(snapshot.hunger);

        player.clear_effects();
        for effect in &snapshot.potion_effects {
            player.add_effect(effect);
        }

        if let Some(location) = snapshot.coordinates {
            if !self.config.coordinate_handling_disabled(world) {
                player.teleport(location);
            }
        }
    }
}
