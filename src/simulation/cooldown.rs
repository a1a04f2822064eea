use std::collections::HashMap;

/// Per-entity rate limiter keyed by entity id.
///
/// An entity passes the gate if strictly more than `cooldown_ms` has elapsed
/// since it last passed. An entity that has never passed is measured from
/// time zero, so nothing passes inside the first window after start-up.
#[derive(Debug, Default)]
pub struct CooldownGate {
    last_pass: HashMap<u64, u64>,
}

impl CooldownGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the gate for `entity_id` at `now_ms`, recording the time on a pass
    pub fn try_pass(&mut self, entity_id: u64, now_ms: u64, cooldown_ms: u64) -> bool {
        let last = self.last_pass.get(&entity_id).copied().unwrap_or(0);
        let ready = now_ms.saturating_sub(last) > cooldown_ms;
        if ready {
            self.last_pass.insert(entity_id, now_ms);
        }
        ready
    }

    /// Forget an entity, e.g. when the host destroys it
    pub fn forget(&mut self, entity_id: u64) {
        self.last_pass.remove(&entity_id);
    }
}
