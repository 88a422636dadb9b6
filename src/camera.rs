use bevy::prelude::*;
use bevy_pancam::{PanCam, PanCamPlugin};

use crate::{prelude::BG_COLOR, state::GameState};

pub struct CamPlugin;

impl Plugin for CamPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PanCamPlugin)
            .insert_resource(ClearColor(BG_COLOR))
            .add_systems(OnEnter(GameState::Load), spawn_cam);
    }
}

// Init
fn spawn_cam(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        // zoom only: left clicks belong to the board
        PanCam {
            grab_buttons: vec![],
            min_scale: 0.25,
            max_scale: 1.0,
            ..default()
        },
        OrthographicProjection {
            scaling_mode: bevy::render::camera::ScalingMode::WindowSize,
            near: -1000.0,
            far: 1000.0,
            ..OrthographicProjection::default_2d()
        },
        Msaa::Off,
    ));
}
