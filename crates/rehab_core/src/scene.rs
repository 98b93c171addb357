//! Arena serialization
//!
//! Provides the Scene struct for loading arenas from RON files. A scene
//! lists entity templates; instantiating it spawns them into a [`World`].

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use rehab_physics::{KinematicBody, PhysicsError};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::sprite::{SolidSprite, Sprite};
use crate::surface::argb;
use crate::world::{EntityKey, World};

/// A serializable arena description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Arena name (for display/debugging)
    pub name: String,
    /// Arena width in pixels
    pub width: u32,
    /// Arena height in pixels
    pub height: u32,
    /// Entity templates in spawn order
    #[serde(default)]
    pub entities: Vec<EntityTemplate>,
}

/// A serializable entity description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub name: String,
    pub kind: EntityKind,
    /// Mass in kilograms
    pub mass: f64,
    /// Starting position `(x, y)`, Y up
    pub position: (f64, f64),
    #[serde(default = "default_gravity")]
    pub gravity: bool,
    pub sprite: SpriteTemplate,
    /// Explicit compositing layer
    #[serde(default)]
    pub layer: Option<usize>,
}

fn default_gravity() -> bool {
    true
}

/// A serializable sprite description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpriteTemplate {
    /// Solid rectangle, color as `(a, r, g, b)`
    Solid {
        width: u32,
        height: u32,
        color: [u8; 4],
    },
}

impl SpriteTemplate {
    pub fn build(&self) -> Arc<dyn Sprite> {
        match self {
            SpriteTemplate::Solid {
                width,
                height,
                color: [a, r, g, b],
            } => Arc::new(SolidSprite::new(*width, *height, argb(*a, *r, *g, *b))),
        }
    }
}

impl EntityTemplate {
    /// Build the entity this template describes
    pub fn build(&self) -> Result<Entity, SceneLoadError> {
        let (x, y) = self.position;
        let body = KinematicBody::at(self.mass, x, y)
            .map_err(|e| SceneLoadError::InvalidEntity {
                name: self.name.clone(),
                source: e,
            })?
            .with_gravity(self.gravity);

        let mut entity = Entity::new(self.name.clone(), self.kind, body, self.sprite.build());
        entity.layer = self.layer;
        Ok(entity)
    }
}

impl Scene {
    /// Create a new empty scene
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            entities: Vec::new(),
        }
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneLoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse a scene from RON text
    pub fn from_ron(contents: &str) -> Result<Self, SceneLoadError> {
        Ok(ron::from_str(contents)?)
    }

    /// Add an entity template to this scene
    pub fn add_entity(&mut self, entity: EntityTemplate) {
        self.entities.push(entity);
    }

    /// Spawn every template into `world`
    ///
    /// All templates are validated before anything is spawned, so a bad
    /// template leaves the world untouched.
    pub fn instantiate(&self, world: &mut World) -> Result<Vec<EntityKey>, SceneLoadError> {
        let entities = self
            .entities
            .iter()
            .map(EntityTemplate::build)
            .collect::<Result<Vec<_>, _>>()?;

        let keys = entities
            .into_iter()
            .map(|entity| world.spawn(entity).0)
            .collect::<Vec<_>>();
        log::info!("Instantiated arena '{}' with {} entities", self.name, keys.len());
        Ok(keys)
    }
}

/// Error loading or instantiating a scene
#[derive(Debug)]
pub enum SceneLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// A template describes an impossible body
    InvalidEntity { name: String, source: PhysicsError },
}

impl From<io::Error> for SceneLoadError {
    fn from(e: io::Error) -> Self {
        SceneLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneLoadError::Parse(e)
    }
}

impl fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "IO error: {}", e),
            SceneLoadError::Parse(e) => write!(f, "Parse error: {}", e),
            SceneLoadError::InvalidEntity { name, source } => {
                write!(f, "Invalid entity '{}': {}", name, source)
            }
        }
    }
}

impl std::error::Error for SceneLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneLoadError::Io(e) => Some(e),
            SceneLoadError::Parse(e) => Some(e),
            SceneLoadError::InvalidEntity { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARENA: &str = r#"
        Scene(
            name: "BASIC-TEST",
            width: 720,
            height: 480,
            entities: [
                EntityTemplate(
                    name: "floor",
                    kind: Prop,
                    mass: 400.0,
                    position: (0.0, 32.0),
                    gravity: false,
                    sprite: Solid(width: 720, height: 32, color: (255, 90, 90, 90)),
                ),
                EntityTemplate(
                    name: "player",
                    kind: Actor,
                    mass: 62.0,
                    position: (0.0, 480.0),
                    sprite: Solid(width: 32, height: 32, color: (255, 200, 60, 60)),
                    layer: Some(1),
                ),
            ],
        )
    "#;

    #[test]
    fn test_parse_arena() {
        let scene = Scene::from_ron(ARENA).unwrap();
        assert_eq!(scene.name, "BASIC-TEST");
        assert_eq!((scene.width, scene.height), (720, 480));
        assert_eq!(scene.entities.len(), 2);

        let floor = &scene.entities[0];
        assert_eq!(floor.kind, EntityKind::Prop);
        assert!(!floor.gravity);
        assert_eq!(floor.layer, None);

        let player = &scene.entities[1];
        assert!(player.gravity, "gravity defaults to on");
        assert_eq!(player.layer, Some(1));
    }

    #[test]
    fn test_instantiate_spawns_entities() {
        let scene = Scene::from_ron(ARENA).unwrap();
        let mut world = World::new();
        let keys = scene.instantiate(&mut world).unwrap();

        assert_eq!(keys.len(), 2);
        let (_, player) = world.get_by_name("player").unwrap();
        let player = player.read();
        assert_eq!(player.position(), (0.0, 480.0));
        assert_eq!(player.body.mass(), 62.0);
        assert_eq!(player.sprite.size(), (32, 32));
    }

    #[test]
    fn test_invalid_mass_spawns_nothing() {
        let mut scene = Scene::from_ron(ARENA).unwrap();
        scene.entities[1].mass = 0.0;
        let mut world = World::new();

        let err = scene.instantiate(&mut world).unwrap_err();
        assert!(matches!(err, SceneLoadError::InvalidEntity { ref name, .. } if name == "player"));
        assert!(world.is_empty());
    }

    #[test]
    fn test_parse_error() {
        let err = Scene::from_ron("Scene(name: ").unwrap_err();
        assert!(matches!(err, SceneLoadError::Parse(_)));
        assert!(format!("{}", err).starts_with("Parse error"));
    }

    #[test]
    fn test_missing_file() {
        let err = Scene::load("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, SceneLoadError::Io(_)));
    }

    #[test]
    fn test_color_is_written_as_tuple() {
        let sprite: SpriteTemplate =
            ron::from_str("Solid(width: 2, height: 3, color: (255, 1, 2, 3))").unwrap();
        assert_eq!(
            sprite,
            SpriteTemplate::Solid {
                width: 2,
                height: 3,
                color: [255, 1, 2, 3],
            }
        );
        let list = "Solid(width: 2, height: 3, color: [255, 1, 2, 3])";
        assert!(ron::from_str::<SpriteTemplate>(list).is_err());
    }

    #[test]
    fn test_solid_template_color() {
        let sprite = SpriteTemplate::Solid {
            width: 1,
            height: 1,
            color: [255, 1, 2, 3],
        }
        .build();
        let mut surface = crate::Surface::new(1, 1);
        sprite.draw(&mut surface, 0, 0);
        assert_eq!(surface.argb_at(0, 0), Some(0xFF01_0203));
    }
}
