//! Integration tests for arena loading
//!
//! These tests verify an arena file becomes a usable world:
//! 1. Parsing and instantiating templates
//! 2. The world handing drawables to a paint step
//! 3. Writes through one handle being seen through every other

use std::sync::Arc;

use rehab_core::{
    Drawable, EntityKind, InstanceRegistry, Scene, SceneLoadError, Surface, World, CLEAR_GREY,
};

const ARENA: &str = r#"
Scene(
    name: "SPARRING",
    width: 64,
    height: 48,
    entities: [
        EntityTemplate(
            name: "floor",
            kind: Prop,
            mass: 400.0,
            position: (0.0, 8.0),
            gravity: false,
            sprite: Solid(width: 64, height: 8, color: (255, 90, 90, 90)),
        ),
        EntityTemplate(
            name: "dummy",
            kind: Actor,
            mass: 62.0,
            position: (20.0, 24.0),
            sprite: Solid(width: 8, height: 16, color: (255, 220, 80, 60)),
            layer: Some(1),
        ),
    ],
)
"#;

// ==================== Loading Tests ====================

#[test]
fn test_arena_instantiates_into_world() {
    let scene = Scene::from_ron(ARENA).unwrap();
    let mut world = World::new();
    let keys = scene.instantiate(&mut world).unwrap();

    assert_eq!(keys.len(), 2);
    assert_eq!(world.entity_count(), 2);
    assert_eq!(world.iter_kind(EntityKind::Actor).count(), 1);

    let (_, dummy) = world.get_by_name("dummy").unwrap();
    let dummy = dummy.read();
    assert_eq!(dummy.position(), (20.0, 24.0));
    assert!(dummy.body.gravity_enabled());
    assert_eq!(dummy.layer, Some(1));

    let (_, floor) = world.get_by_name("floor").unwrap();
    assert!(!floor.read().body.gravity_enabled());
}

/// One bad template leaves the world empty
#[test]
fn test_invalid_mass_rejects_whole_arena() {
    let broken = ARENA.replace("mass: 62.0", "mass: -1.0");
    let scene = Scene::from_ron(&broken).unwrap();
    let mut world = World::new();

    let err = scene.instantiate(&mut world).unwrap_err();
    assert!(matches!(err, SceneLoadError::InvalidEntity { ref name, .. } if name == "dummy"));
    assert!(world.is_empty());
}

#[test]
fn test_missing_file() {
    let err = Scene::load("scenes/does_not_exist.ron").unwrap_err();
    assert!(matches!(err, SceneLoadError::Io(_)));
}

// ==================== Drawable Tests ====================

/// Painting the registry by hand, the way the frame pump does
#[test]
fn test_registry_drawables_paint() {
    let scene = Scene::from_ron(ARENA).unwrap();
    let mut world = World::new();
    scene.instantiate(&mut world).unwrap();

    let mut surface = Surface::new(scene.width, scene.height);
    surface.fill(CLEAR_GREY);
    for drawable in world.loaded_drawables() {
        let snap = drawable.snapshot();
        let top = surface.height() as f64 - snap.y;
        snap.sprite.draw(&mut surface, snap.x as i32, top as i32);
    }

    assert_eq!(surface.count_not(CLEAR_GREY), 64 * 8 + 8 * 16);
    // Floor covers the bottom 8 rows
    assert_eq!(surface.argb_at(0, 47), Some(0xFF5A_5A5A));
    // Dummy's top-left lands at (20, 48 - 24)
    assert_eq!(surface.argb_at(20, 24), Some(0xFFDC_503C));
    assert_eq!(surface.argb_at(20, 23), Some(CLEAR_GREY));
}

/// Handles from the world and from the registry see the same entity
#[test]
fn test_moves_visible_through_drawables() {
    let scene = Scene::from_ron(ARENA).unwrap();
    let mut world = World::new();
    scene.instantiate(&mut world).unwrap();

    let drawables = world.loaded_drawables();
    let (_, dummy) = world.get_by_name("dummy").unwrap();
    dummy.write().body.reposition(30.0, 40.0, false);

    let hinted: Vec<Arc<dyn Drawable>> = drawables
        .into_iter()
        .filter(|d| d.layer_hint() == Some(1))
        .collect();
    assert_eq!(hinted.len(), 1);
    assert_eq!(hinted[0].position(), (30.0, 40.0));
}
