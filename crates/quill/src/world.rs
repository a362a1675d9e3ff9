/// Creatures `game summon` knows how to spawn.
pub const SPAWNABLE: &[&str] = &["slime"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub kind: String,
    pub position: Position,
}

/// Why a creature could not be spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    UnknownKind,
    OutOfBounds,
}

#[derive(Debug, Default)]
pub struct Player {
    /// Pixel position.
    pub position: Position,
    pub god_mode: bool,
}

/// The bit of simulated world that chat commands reach into.
#[derive(Debug)]
pub struct World {
    pub player: Player,
    pub entities: Vec<Entity>,
    /// Always at least 1.
    tile_size: i32,
}

impl World {
    pub fn new(tile_size: i32) -> Self {
        Self {
            player: Player::default(),
            entities: Vec::new(),
            tile_size: tile_size.max(1),
        }
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Moves the player to the given tile. Returns `None` if the pixel position overflows.
    pub fn teleport(&mut self, tile_x: i32, tile_y: i32) -> Option<Position> {
        let position = self.tile_to_pixels(tile_x, tile_y)?;
        self.player.position = position;
        tracing::info!("Player teleported to tile ({tile_x}, {tile_y})");
        Some(position)
    }

    /// Spawns a known creature on the given tile.
    pub fn spawn_entity(
        &mut self,
        kind: &str,
        tile_x: i32,
        tile_y: i32,
    ) -> Result<Position, SpawnError> {
        if !SPAWNABLE.contains(&kind) {
            return Err(SpawnError::UnknownKind);
        }
        let position = self
            .tile_to_pixels(tile_x, tile_y)
            .ok_or(SpawnError::OutOfBounds)?;
        self.entities.push(Entity {
            kind: kind.to_string(),
            position,
        });
        tracing::info!("Spawned {kind} at tile ({tile_x}, {tile_y})");
        Ok(position)
    }

    /// The player's tile, rounding towards negative infinity.
    pub fn player_tile(&self) -> Position {
        Position {
            x: self.player.position.x.div_euclid(self.tile_size),
            y: self.player.position.y.div_euclid(self.tile_size),
        }
    }

    fn tile_to_pixels(&self, tile_x: i32, tile_y: i32) -> Option<Position> {
        Some(Position {
            x: tile_x.checked_mul(self.tile_size)?,
            y: tile_y.checked_mul(self.tile_size)?,
        })
    }
}
