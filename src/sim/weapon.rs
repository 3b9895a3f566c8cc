//! Weapons, the player's loadout and their timers
//!
//! Reloads and automatic fire run on the simulation clock (milliseconds fed in
//! through `TickInput::dt_ms`). Deadlines are checked at the start of a tick,
//! so weapon state only ever changes at tick boundaries.

use serde::{Deserialize, Serialize};

use crate::consts::{RELOAD_MS, SPREAD_DEG};

/// How many pellets a trigger pull releases
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FirePattern {
    Single,
    /// `count` pellets fanned `spacing_deg` apart around the aim
    Spread { count: u32, spacing_deg: f32 },
}

impl FirePattern {
    /// Pellet angles for a shot aimed at `aim` (radians)
    pub fn angles(&self, aim: f32) -> Vec<f32> {
        match *self {
            FirePattern::Single => vec![aim],
            FirePattern::Spread { count, spacing_deg } => {
                let mid = (count.max(1) - 1) as f32 / 2.0;
                (0..count.max(1))
                    .map(|i| aim + ((i as f32 - mid) * spacing_deg).to_radians())
                    .collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    /// Rounds in the magazine
    pub magazine: u32,
    /// Full magazine size
    pub capacity: u32,
    /// Rounds left outside the magazine
    pub reserve: u32,
    pub pattern: FirePattern,
    /// Automatic fire interval; `None` fires once per trigger pull
    pub interval_ms: Option<f64>,
    pub reloading: bool,
    reload_due: Option<f64>,
}

impl Weapon {
    pub fn new(
        name: &str,
        capacity: u32,
        reserve: u32,
        pattern: FirePattern,
        interval_ms: Option<f64>,
    ) -> Self {
        Self {
            name: name.to_string(),
            magazine: capacity,
            capacity,
            reserve,
            pattern,
            interval_ms,
            reloading: false,
            reload_due: None,
        }
    }

    pub fn pistol() -> Self {
        Self::new("Pistol", 30, 240, FirePattern::Single, None)
    }

    pub fn shotgun() -> Self {
        Self::new(
            "Shotgun",
            30,
            240,
            FirePattern::Spread {
                count: 3,
                spacing_deg: SPREAD_DEG,
            },
            None,
        )
    }

    pub fn rifle() -> Self {
        Self::new("Rifle", 30, 240, FirePattern::Single, Some(50.0))
    }

    pub fn can_shoot(&self) -> bool {
        self.magazine > 0
    }

    pub fn can_reload(&self) -> bool {
        self.reserve > 0 && !self.reloading
    }

    /// Fire one round if the magazine has one; an empty magazine starts a
    /// reload when possible. Returns true if a round left the barrel.
    pub fn shoot_bullet(&mut self, now: f64) -> bool {
        let fired = self.can_shoot();
        if fired {
            self.magazine -= 1;
        }

        if self.can_reload() && !self.can_shoot() {
            self.reload(now);
        }

        fired
    }

    /// Start a reload that completes `RELOAD_MS` later
    pub fn reload(&mut self, now: f64) {
        self.reloading = true;
        self.reload_due = Some(now + RELOAD_MS);
        log::debug!("{} reloading", self.name);
    }

    /// Complete a pending reload whose deadline has passed
    pub fn update(&mut self, now: f64) {
        match self.reload_due {
            Some(due) if now >= due => self.finish_reload(),
            _ => {}
        }
    }

    /// A reload always costs a full magazine from the reserve
    fn finish_reload(&mut self) {
        self.magazine = self.capacity;
        self.reserve = self.reserve.saturating_sub(self.capacity);
        self.reloading = false;
        self.reload_due = None;
        log::debug!("{} reloaded ({} / {})", self.name, self.magazine, self.reserve);
    }
}

/// Repeating fire armed by holding the trigger on an automatic weapon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct AutoFire {
    weapon: usize,
    interval: f64,
    next_at: f64,
}

/// The player's three weapons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub weapons: [Weapon; 3],
    pub selected: usize,
    auto_fire: Option<AutoFire>,
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            weapons: [Weapon::pistol(), Weapon::shotgun(), Weapon::rifle()],
            selected: 0,
            auto_fire: None,
        }
    }
}

impl Loadout {
    pub fn current(&self) -> &Weapon {
        &self.weapons[self.selected]
    }

    pub fn select(&mut self, index: usize) {
        if index < self.weapons.len() {
            self.selected = index;
        } else {
            log::warn!("No weapon in slot {}", index);
        }
    }

    /// Trigger pressed: fire once, or arm automatic fire. Returns the
    /// pattern to spawn when a round was fired right away.
    pub fn shoot(&mut self, now: f64) -> Option<FirePattern> {
        let weapon = &mut self.weapons[self.selected];
        match weapon.interval_ms {
            Some(interval) => {
                self.auto_fire = Some(AutoFire {
                    weapon: self.selected,
                    interval,
                    next_at: now + interval,
                });
                None
            }
            None => weapon.shoot_bullet(now).then_some(weapon.pattern),
        }
    }

    /// Trigger released
    pub fn release(&mut self) {
        self.auto_fire = None;
    }

    /// Manual reload of the selected weapon
    pub fn reload(&mut self, now: f64) {
        let weapon = &mut self.weapons[self.selected];
        if weapon.can_reload() {
            weapon.reload(now);
        }
    }

    /// Run every deadline up to `now`; returns the patterns of rounds fired
    /// by automatic fire, oldest first
    pub fn update(&mut self, now: f64) -> Vec<FirePattern> {
        let mut volleys = Vec::new();

        if let Some(auto) = self.auto_fire.as_mut() {
            let interval = auto.interval.max(1.0);
            while auto.next_at <= now {
                let at = auto.next_at;
                let weapon = &mut self.weapons[auto.weapon];
                weapon.update(at);
                if weapon.shoot_bullet(at) {
                    volleys.push(weapon.pattern);
                }
                auto.next_at += interval;
            }
        }

        for weapon in &mut self.weapons {
            weapon.update(now);
        }

        volleys
    }
}
