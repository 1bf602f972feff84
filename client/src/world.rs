/*!
City scene, lighting and the collision copy of the city.

The render scene is used as-is. Once it is spawned, every triangle mesh beneath it is
gathered in world space, lowered to the street level and indexed for collision.
*/

use bevy::{
    mesh::{Indices, PrimitiveTopology, VertexAttributeValues},
    prelude::*,
    scene::SceneInstanceReady,
    transform::helper::TransformHelper,
};
use shared::{
    collision::{SpatialIndex, StaticWorldGeometry},
    constants::WORLD_COLLISION_DROP,
};

use crate::{convert, viewer::Viewer};

const CITY_SCENE: &str = "models/gltf/beautiful_city.glb";

/// Sky/fog colour shared by the clear colour and the camera fog.
pub const SKY_COLOR: Color = Color::srgb_u8(0x88, 0xcc, 0xee);

#[derive(Component)]
pub struct City;

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(ClearColor(SKY_COLOR));
    app.insert_resource(AmbientLight {
        color: Color::srgb_u8(0x88, 0x88, 0xff),
        brightness: 400.0,
        ..default()
    });
    app.add_systems(Startup, setup);
}

fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
    info!("World setup");

    commands
        .spawn((
            Name::new("City"),
            City,
            SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(CITY_SCENE))),
        ))
        .observe(build_world_index);

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            color: Color::WHITE,
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(-5.0, 25.0, -1.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn build_world_index(
    ready: On<SceneInstanceReady>,
    children: Query<&Children>,
    mesh_query: Query<&Mesh3d>,
    meshes: Res<Assets<Mesh>>,
    transforms: TransformHelper,
    mut viewer: ResMut<Viewer>,
) {
    let mut geometry = StaticWorldGeometry::new();

    for entity in children.iter_descendants(ready.entity) {
        let Ok(mesh3d) = mesh_query.get(entity) else {
            continue;
        };
        let Some(mesh) = meshes.get(&mesh3d.0) else {
            warn!("City mesh {entity} not loaded; skipped for collision");
            continue;
        };
        let Ok(global) = transforms.compute_global_transform(entity) else {
            continue;
        };
        append_mesh(&mut geometry, mesh, &global, entity);
    }

    geometry.translate(&shared::Vec3::new(0.0, -WORLD_COLLISION_DROP, 0.0));
    info!(
        "City collision geometry gathered: {} triangles",
        geometry.triangle_count()
    );
    viewer.set_world(SpatialIndex::build(&geometry));
}

/// Append one mesh, transformed to world space. Bad meshes are logged and skipped.
fn append_mesh(
    geometry: &mut StaticWorldGeometry,
    mesh: &Mesh,
    global: &GlobalTransform,
    entity: Entity,
) {
    if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
        return;
    }
    let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute(Mesh::ATTRIBUTE_POSITION)
    else {
        return;
    };

    let points: Vec<_> = positions
        .iter()
        .map(|p| convert::to_point3(global.transform_point(Vec3::from_array(*p))))
        .collect();
    let indices: Option<Vec<u32>> = mesh.indices().map(|indices| match indices {
        Indices::U16(idx) => idx.iter().map(|&i| u32::from(i)).collect(),
        Indices::U32(idx) => idx.clone(),
    });

    if let Err(err) = geometry.push_mesh(&points, indices.as_deref()) {
        warn!("Skipping city mesh {entity} for collision: {err}");
    }
}
