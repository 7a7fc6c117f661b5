use crate::components::{PlayerId, Role};
use crate::error::RoleError;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a hit changes roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitRule {
    /// Attacker and victim exchange roles. The number of seekers never changes.
    #[default]
    Swap,
    /// Only the victim's role toggles. Can drive the match to all seekers or all hiders.
    Flip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitResult {
    pub attacker_new_role: Role,
    pub victim_new_role: Role,
    /// True iff one of the two players went from Hider to Seeker.
    pub became_seeker: bool,
    /// The player that became a seeker, if any. Needs a respawn.
    pub new_seeker: Option<PlayerId>,
}

/// Authoritative role of every player in the match.
#[derive(Resource, Debug, Default, Clone)]
pub struct RoleState {
    // Ordered so iteration (and anything derived from it) is deterministic
    roles: BTreeMap<PlayerId, Role>,
    rule: HitRule,
}

impl RoleState {
    pub fn new(rule: HitRule) -> Self {
        Self {
            roles: BTreeMap::new(),
            rule,
        }
    }

    pub fn register(&mut self, id: PlayerId, role: Role) -> Result<(), RoleError> {
        if self.roles.contains_key(&id) {
            return Err(RoleError::DuplicatePlayer(id));
        }
        self.roles.insert(id, role);
        Ok(())
    }

    pub fn remove(&mut self, id: PlayerId) -> Option<Role> {
        self.roles.remove(&id)
    }

    pub fn get_role(&self, id: PlayerId) -> Option<Role> {
        self.roles.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn players(&self) -> impl Iterator<Item = (PlayerId, Role)> + '_ {
        self.roles.iter().map(|(id, role)| (*id, *role))
    }

    pub fn hiders(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players()
            .filter(|(_, role)| *role == Role::Hider)
            .map(|(id, _)| id)
    }

    pub fn seeker_count(&self) -> usize {
        self.roles.values().filter(|r| **r == Role::Seeker).count()
    }

    /// Resolves `attacker` hitting `victim` under the configured rule.
    ///
    /// Both ids are validated before anything is written, so an error leaves
    /// every role as it was.
    pub fn apply_hit(
        &mut self,
        attacker: PlayerId,
        victim: PlayerId,
    ) -> Result<HitResult, RoleError> {
        if attacker == victim {
            return Err(RoleError::InvalidHit(attacker));
        }
        let attacker_old = self
            .get_role(attacker)
            .ok_or(RoleError::UnknownPlayer(attacker))?;
        let victim_old = self
            .get_role(victim)
            .ok_or(RoleError::UnknownPlayer(victim))?;

        let (attacker_new, victim_new) = match self.rule {
            HitRule::Swap => (victim_old, attacker_old),
            HitRule::Flip => (attacker_old, victim_old.toggled()),
        };
        self.roles.insert(attacker, attacker_new);
        self.roles.insert(victim, victim_new);

        let new_seeker = if attacker_old == Role::Hider && attacker_new == Role::Seeker {
            Some(attacker)
        } else if victim_old == Role::Hider && victim_new == Role::Seeker {
            Some(victim)
        } else {
            None
        };

        Ok(HitResult {
            attacker_new_role: attacker_new,
            victim_new_role: victim_new,
            became_seeker: new_seeker.is_some(),
            new_seeker,
        })
    }
}
