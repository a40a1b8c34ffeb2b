use crate::config::game::MAX_NAME_LEN;
use crate::game::grid::Grid;
use crate::game::types::{PlayerId, PlayerSummary};

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Cells cleared this round.
    pub score: u32,
    pub is_ready: bool,
    /// Recomputed on every rename.
    pub is_admin: bool,
    /// Private board in normal mode. Empty before the first round and in capture mode.
    pub grid: Grid,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        let short: String = id.simple().to_string().chars().take(4).collect();
        Self {
            id,
            name: format!("Player {}", short),
            score: 0,
            is_ready: false,
            is_admin: false,
            grid: Grid::default(),
        }
    }

    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            id: self.id,
            name: self.name.clone(),
            is_ready: self.is_ready,
            is_admin: self.is_admin,
        }
    }
}

/// Connected players, kept in registration order.
#[derive(Debug, Clone)]
pub struct PlayerRegistry {
    players: Vec<Player>,
    admin_name: String,
}

impl PlayerRegistry {
    pub fn new(admin_name: impl Into<String>) -> Self {
        Self {
            players: Vec::new(),
            admin_name: admin_name.into(),
        }
    }

    /// Add a player with a default name. Registering a known id returns the existing player.
    pub fn register(&mut self, id: PlayerId) -> &mut Player {
        let idx = match self.players.iter().position(|p| p.id == id) {
            Some(idx) => idx,
            None => {
                let mut player = Player::new(id);
                player.is_admin = player.name == self.admin_name;
                self.players.push(player);
                self.players.len() - 1
            }
        };
        &mut self.players[idx]
    }

    /// Set the display name, truncated to `MAX_NAME_LEN` characters, and refresh the admin flag.
    pub fn rename(&mut self, id: PlayerId, name: &str) -> Option<&Player> {
        let admin_name = &self.admin_name;
        let player = self.players.iter_mut().find(|p| p.id == id)?;
        player.name = name.chars().take(MAX_NAME_LEN).collect();
        player.is_admin = player.name == *admin_name;
        Some(player)
    }

    pub fn set_ready(&mut self, id: PlayerId, ready: bool) -> Option<&Player> {
        let player = self.get_mut(id)?;
        player.is_ready = ready;
        Some(player)
    }

    pub fn toggle_ready(&mut self, id: PlayerId) -> Option<&Player> {
        let player = self.get_mut(id)?;
        player.is_ready = !player.is_ready;
        Some(player)
    }

    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(idx))
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn list(&self) -> &[Player] {
        &self.players
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// True when at least one player is connected and every player is ready.
    pub fn all_ready(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.is_ready)
    }

    pub fn summaries(&self) -> Vec<PlayerSummary> {
        self.players.iter().map(Player::summary).collect()
    }
}
