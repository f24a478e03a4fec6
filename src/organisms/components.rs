use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable handle for one entity. Allocated per world and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ecological role of an entity. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Producer, // Plants - regenerate in place
    Grazer,   // Herbivores - eat producers
    Predator, // Carnivores - eat grazers
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Producer, Species::Grazer, Species::Predator];

    /// Order in which species are updated within a tick. Hunters run before
    /// their prey so they see the prey exactly as it stood at tick start.
    pub const UPDATE_ORDER: [Species; 3] = [Species::Predator, Species::Grazer, Species::Producer];

    /// The species this one forages on.
    pub fn prey(self) -> Option<Species> {
        match self {
            Species::Producer => None,
            Species::Grazer => Some(Species::Producer),
            Species::Predator => Some(Species::Grazer),
        }
    }

    pub fn is_motile(self) -> bool {
        self.prey().is_some()
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Producer => "producer",
            Species::Grazer => "grazer",
            Species::Predator => "predator",
        }
    }

    /// Stable slot for per-species arrays, in [`Species::ALL`] order.
    pub(crate) fn index(self) -> usize {
        match self {
            Species::Producer => 0,
            Species::Grazer => 1,
            Species::Predator => 2,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current energy level, always within `[0, max]` (0.0 = dead).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Energy {
    current: f32,
    max: f32,
}

impl Energy {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn with_energy(max: f32, current: f32) -> Self {
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn ratio(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn gain(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    pub fn drain(&mut self, amount: f32) {
        self.current = (self.current - amount).clamp(0.0, self.max);
    }

    /// Apply a signed change in one step, clamping once.
    pub fn adjust(&mut self, delta: f32) {
        self.current = (self.current + delta).clamp(0.0, self.max);
    }

    /// Remove up to `amount` and return what was actually taken.
    pub fn take(&mut self, amount: f32) -> f32 {
        let taken = amount.clamp(0.0, self.current);
        self.current -= taken;
        taken
    }

    /// Zero the balance, returning what was left.
    pub fn deplete(&mut self) -> f32 {
        std::mem::replace(&mut self.current, 0.0)
    }
}

/// One simulated organism.
///
/// Values handed out by [`World::snapshot`](crate::World::snapshot) are
/// copies; nothing done to them reaches the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) species: Species,
    pub(crate) position: Vec2,
    /// Unit direction of travel. Zero for producers.
    pub(crate) heading: Vec2,
    pub(crate) energy: Energy,
    /// Ticks survived.
    pub(crate) age: u32,
    /// Ticks until reproduction is possible again.
    pub(crate) reproduction_cooldown: u32,
    /// Ticks until the wander heading is re-rolled.
    pub(crate) wander_ticks: u32,
}

impl Entity {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    pub fn energy(&self) -> f32 {
        self.energy.current()
    }

    pub fn max_energy(&self) -> f32 {
        self.energy.max()
    }

    pub fn energy_ratio(&self) -> f32 {
        self.energy.ratio()
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn reproduction_cooldown(&self) -> u32 {
        self.reproduction_cooldown
    }

    pub fn is_dead(&self) -> bool {
        self.energy.is_dead()
    }
}

/// Live entity count per species.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulationCounts {
    pub producer: usize,
    pub grazer: usize,
    pub predator: usize,
}

impl PopulationCounts {
    pub fn from_entities<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Self {
        let mut counts = Self::default();
        for entity in entities {
            counts.increment(entity.species);
        }
        counts
    }

    pub fn get(&self, species: Species) -> usize {
        self.as_array()[species.index()]
    }

    pub fn increment(&mut self, species: Species) {
        *self.slot_mut(species) += 1;
    }

    pub fn total(&self) -> usize {
        self.producer + self.grazer + self.predator
    }

    fn as_array(&self) -> [usize; 3] {
        [self.producer, self.grazer, self.predator]
    }

    fn slot_mut(&mut self, species: Species) -> &mut usize {
        match species {
            Species::Producer => &mut self.producer,
            Species::Grazer => &mut self.grazer,
            Species::Predator => &mut self.predator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_never_leaves_its_range() {
        let mut energy = Energy::with_energy(10.0, 4.0);
        energy.drain(6.0);
        assert_eq!(energy.current(), 0.0);
        assert!(energy.is_dead());

        energy.gain(25.0);
        assert_eq!(energy.current(), 10.0);

        let clamped = Energy::with_energy(10.0, -3.0);
        assert_eq!(clamped.current(), 0.0);
    }

    #[test]
    fn net_adjustment_clamps_once() {
        let mut full = Energy::new(50.0);
        full.adjust(0.3 - 0.1);
        assert_eq!(full.current(), 50.0);

        let mut low = Energy::with_energy(50.0, 0.1);
        low.adjust(-0.25);
        assert!(low.is_dead());
    }

    #[test]
    fn take_is_bounded_by_the_balance() {
        let mut energy = Energy::with_energy(10.0, 1.5);
        assert_eq!(energy.take(4.0), 1.5);
        assert!(energy.is_dead());
        assert_eq!(energy.take(4.0), 0.0);
    }

    #[test]
    fn roles_form_a_food_chain() {
        assert_eq!(Species::Predator.prey(), Some(Species::Grazer));
        assert_eq!(Species::Grazer.prey(), Some(Species::Producer));
        assert_eq!(Species::Producer.prey(), None);
        assert!(!Species::Producer.is_motile());
    }

    #[test]
    fn counts_track_each_species() {
        let mut counts = PopulationCounts::default();
        counts.increment(Species::Grazer);
        counts.increment(Species::Grazer);
        counts.increment(Species::Predator);
        assert_eq!(counts.get(Species::Grazer), 2);
        assert_eq!(counts.get(Species::Producer), 0);
        assert_eq!(counts.total(), 3);
    }
}
