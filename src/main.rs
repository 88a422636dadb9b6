use bevy::{
    diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin},
    prelude::*,
    window::WindowResolution,
};
use interactive_life::{
    camera::CamPlugin, life::LifePlugin, prelude::WINDOW_SIZE_PX, state::GameState,
};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(ImagePlugin::default_nearest())
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Interactive Game of Life".into(),
                        resizable: false,
                        focused: true,
                        mode: bevy::window::WindowMode::Windowed,
                        resolution: WindowResolution::new(WINDOW_SIZE_PX.x, WINDOW_SIZE_PX.y),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins((FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin::default()))
        .init_state::<GameState>()
        .add_plugins((CamPlugin, LifePlugin))
        .run();
}
