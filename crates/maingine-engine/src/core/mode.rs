/// A pluggable unit of application behavior.
///
/// Modes are activated and deactivated by name through [`ModeRegistry`].
/// Every activation is bracketed by exactly one [`Mode::enter`] and one
/// [`Mode::exit`]; between them the loop calls [`Mode::tick`] and
/// [`Mode::draw`] any number of times.
///
/// Panics raised from a hook are not caught by the engine. They unwind
/// through the loop and abort the run.
///
/// [`ModeRegistry`]: super::ModeRegistry
pub trait Mode {
    /// Called when the mode becomes active.
    fn enter(&mut self) {}

    /// Advances the simulation by `dt` seconds.
    ///
    /// With a capped tick rate `dt` is always the fixed tick period.
    fn tick(&mut self, dt: f64);

    /// Renders the current state. Presentation is handled by the surface.
    fn draw(&mut self) {}

    /// Called when the mode stops being active.
    fn exit(&mut self) {}
}

/// Stable handle to a mode stored in a [`ModeArena`].
///
/// Handles carry a generation, so a handle to a mode that was taken out of
/// the arena never resolves to a later occupant of the same slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ModeId {
    index: u32,
    generation: u32,
}

struct Slot {
    generation: u32,
    mode: Option<Box<dyn Mode>>,
}

/// Storage for mode instances, owned by the embedding application.
///
/// The registry only ever holds [`ModeId`]s. Lifetime stays with whoever owns
/// the arena: [`ModeArena::take`] hands a mode back and is the only way one
/// leaves the arena before the arena itself is dropped.
#[derive(Default)]
pub struct ModeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl ModeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `mode` and returns its handle.
    pub fn insert<M: Mode + 'static>(&mut self, mode: M) -> ModeId {
        self.insert_boxed(Box::new(mode))
    }

    pub fn insert_boxed(&mut self, mode: Box<dyn Mode>) -> ModeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.mode = Some(mode);
            return ModeId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            mode: Some(mode),
        });
        ModeId {
            index,
            generation: 0,
        }
    }

    /// Removes the mode behind `id` and returns ownership of it.
    pub fn take(&mut self, id: ModeId) -> Option<Box<dyn Mode>> {
        let slot = self.slot_mut(id)?;
        let mode = slot.mode.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(mode)
    }

    pub fn contains(&self, id: ModeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ModeId) -> Option<&dyn Mode> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.mode.as_deref()
    }

    pub fn get_mut(&mut self, id: ModeId) -> Option<&mut (dyn Mode + 'static)> {
        self.slot_mut(id)?.mode.as_deref_mut()
    }

    /// Number of modes currently stored.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot_mut(&mut self, id: ModeId) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(id.index as usize)?;
        (slot.generation == id.generation).then_some(slot)
    }
}
