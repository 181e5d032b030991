//! Application initialization and configuration

use bevy::prelude::*;
use bevy::winit::WinitSettings;

use crate::core::cli::CliArgs;
use crate::core::pointer::PointerPlugin;
use crate::core::state::{EditorDocument, EditorOverlay};
use crate::document::loader;
use crate::rendering::cameras::CameraPlugin;
use crate::rendering::overlay::{OverlayRenderPlugin, BACKGROUND_COLOR};
use crate::systems::OverlayInputPlugin;

/// Creates a fully configured Bevy GUI application ready to run
pub fn create_app(cli_args: CliArgs) -> Result<App, String> {
    cli_args.validate()?;

    let mut app = App::new();
    configure_app_settings(&mut app, cli_args);
    add_all_plugins(&mut app);
    Ok(app)
}

/// Sets up application resources and configuration
fn configure_app_settings(app: &mut App, cli_args: CliArgs) {
    app.init_resource::<EditorDocument>()
        .init_resource::<EditorOverlay>()
        .insert_resource(cli_args)
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(WinitSettings::desktop_app());
}

/// Adds all plugins to the application in logical groups
fn add_all_plugins(app: &mut App) {
    app.add_plugins(configure_default_plugins());
    app.add_plugins((
        CameraPlugin,
        PointerPlugin,
        OverlayInputPlugin,
        OverlayRenderPlugin,
    ));
    app.add_systems(Startup, load_document_startup);
}

/// Configure the default Bevy plugins with custom settings
fn configure_default_plugins() -> bevy::app::PluginGroupBuilder {
    DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(Window {
                title: "Freeplan Layout Editor".to_string(),
                ..default()
            }),
            ..default()
        })
        // Disable Bevy's default LogPlugin since we're using our own
        // custom logger
        .build()
        .disable::<bevy::log::LogPlugin>()
}

/// System to load the document description on startup
fn load_document_startup(
    cli_args: Res<CliArgs>,
    mut document: ResMut<EditorDocument>,
) {
    match loader::load_document(&cli_args.document_path) {
        Ok(description) => {
            info!(
                "loaded document '{}' from {}",
                description.title,
                cli_args.document_path.display()
            );
            document.title = description.title.clone();
            document.tree = loader::build_view_tree(&description);
        }
        Err(error) => {
            error!("failed to load document: {error:#}");
            error!(
                "the application will continue with an empty page; \
                 pass --document to load a description"
            );
        }
    }
}
