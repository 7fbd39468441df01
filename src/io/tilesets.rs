//! Built-in demonstration tile sets for the command-line tool

use crate::spatial::grid::{X_MINUS, X_PLUS, Y_MINUS, Y_PLUS};
use crate::spatial::rotation::Direction;
use crate::spatial::tiles::{FaceLayout, FacePattern, Paint, TileDefinition};

/// Paint of open ground
pub const GROUND: Paint = 1;
/// Paint of open water
pub const WATER: Paint = 2;
/// Paint of a road running through the middle of a face
pub const ROAD: Paint = 3;

const SIDES: [Direction; 4] = [X_PLUS, Y_PLUS, X_MINUS, Y_MINUS];

/// Tile definitions plus how to draw them
#[derive(Clone, Debug)]
pub struct Tileset {
    /// Display name
    pub name: &'static str,
    /// Tile definitions, indexed by `TileId`
    pub definitions: Vec<TileDefinition>,
    /// RGBA colour per definition
    pub colors: Vec<[u8; 4]>,
    /// Character per definition for text output
    pub glyphs: Vec<char>,
}

fn uniform(paint: Paint) -> FacePattern {
    FacePattern::uniform(FaceLayout::Square, paint)
}

fn road_face() -> FacePattern {
    FacePattern::square([
        [GROUND, GROUND, GROUND],
        [GROUND, ROAD, GROUND],
        [GROUND, GROUND, GROUND],
    ])
}

/// Ground, water and the shore between them
pub fn stripes() -> Tileset {
    let shore_side = FacePattern::square([
        [GROUND, GROUND, WATER],
        [GROUND, GROUND, WATER],
        [GROUND, GROUND, WATER],
    ]);
    let definitions = vec![
        TileDefinition::new("ground").with_all_faces(&SIDES, &uniform(GROUND)),
        TileDefinition::new("water").with_all_faces(&SIDES, &uniform(WATER)),
        TileDefinition::new("shore")
            .with_face([0, 0, 0], X_MINUS, uniform(GROUND))
            .with_face([0, 0, 0], X_PLUS, uniform(WATER))
            .with_face([0, 0, 0], Y_PLUS, shore_side.clone())
            .with_face([0, 0, 0], Y_MINUS, shore_side.reflected())
            .with_weight(0.5),
    ];
    Tileset {
        name: "stripes",
        definitions,
        colors: vec![[96, 160, 64, 255], [48, 96, 192, 255], [224, 208, 144, 255]],
        glyphs: vec!['.', '~', ':'],
    }
}

/// Ground with straight roads, corners, junctions and crossings
pub fn roads() -> Tileset {
    let road = road_face();
    let ground = uniform(GROUND);
    let definitions = vec![
        TileDefinition::new("ground")
            .with_all_faces(&SIDES, &ground)
            .with_weight(4.0),
        TileDefinition::new("straight")
            .with_all_faces(&SIDES, &ground)
            .with_face([0, 0, 0], X_PLUS, road.clone())
            .with_face([0, 0, 0], X_MINUS, road.clone()),
        TileDefinition::new("corner")
            .with_all_faces(&SIDES, &ground)
            .with_face([0, 0, 0], X_PLUS, road.clone())
            .with_face([0, 0, 0], Y_PLUS, road.clone())
            .with_weight(0.5),
        TileDefinition::new("junction")
            .with_all_faces(&SIDES, &road)
            .with_face([0, 0, 0], Y_MINUS, ground)
            .with_weight(0.2),
        TileDefinition::new("crossing")
            .with_all_faces(&SIDES, &road)
            .with_weight(0.1),
    ];
    Tileset {
        name: "roads",
        definitions,
        colors: vec![
            [96, 160, 64, 255],
            [80, 80, 80, 255],
            [96, 96, 96, 255],
            [112, 112, 112, 255],
            [128, 128, 128, 255],
        ],
        glyphs: vec!['.', '=', '+', 'T', '#'],
    }
}

/// Roads and water crossed by a two-cell bridge
pub fn bridges() -> Tileset {
    let road = road_face();
    let ground = uniform(GROUND);
    let water = uniform(WATER);
    let definitions = vec![
        TileDefinition::new("ground")
            .with_all_faces(&SIDES, &ground)
            .with_weight(3.0),
        TileDefinition::new("water").with_all_faces(&SIDES, &water),
        TileDefinition::new("road")
            .with_all_faces(&SIDES, &ground)
            .with_face([0, 0, 0], X_PLUS, road.clone())
            .with_face([0, 0, 0], X_MINUS, road.clone())
            .with_weight(0.5),
        TileDefinition::new("bridge")
            .with_offsets([[0, 0, 0], [1, 0, 0]])
            .with_all_faces(&SIDES, &water)
            .with_face([0, 0, 0], X_MINUS, road.clone())
            .with_face([1, 0, 0], X_PLUS, road)
            .with_weight(0.5),
    ];
    Tileset {
        name: "bridges",
        definitions,
        colors: vec![
            [96, 160, 64, 255],
            [48, 96, 192, 255],
            [80, 80, 80, 255],
            [160, 112, 64, 255],
        ],
        glyphs: vec!['.', '~', '=', 'B'],
    }
}
