// A free-form layout override editor made with the Bevy game engine.

use clap::Parser;

use freeplan::core::app::create_app;
use freeplan::core::cli::CliArgs;
use freeplan::document::{loader, persistence};
use freeplan::editing::OverlayController;
use freeplan::utils::logger::init_custom_logger;
use freeplan::FreeplanResult;

fn main() {
    init_custom_logger();
    let cli_args = CliArgs::parse();

    if cli_args.print_layout {
        if let Err(error) = print_layout(&cli_args) {
            log::error!("failed to resolve layout: {error:#}");
            std::process::exit(1);
        }
        return;
    }

    match create_app(cli_args) {
        Ok(mut app) => {
            app.run();
        }
        Err(error) => {
            log::error!("{error}");
            std::process::exit(1);
        }
    }
}

/// Headless path: resolve base layout + persisted overrides and print the
/// effective region geometry
fn print_layout(cli_args: &CliArgs) -> FreeplanResult<()> {
    let description = loader::load_document(&cli_args.document_path)?;
    let mut tree = loader::build_view_tree(&description);
    let record = persistence::load_record(&cli_args.overrides_path)?;

    let mut overlay = OverlayController::default();
    overlay.enter(&mut tree, Some(&record));

    if !description.title.is_empty() {
        println!("{}", description.title);
    }
    let page = tree.page_size();
    println!("page {}x{}", page.width, page.height);
    for region in overlay.regions() {
        if let Some(rect) = overlay.effective_rect(&region.id) {
            println!(
                "{:<16} x={:<8.1} y={:<8.1} w={:<8.1} h={:.1}",
                region.id,
                rect.x0,
                rect.y0,
                rect.width(),
                rect.height()
            );
        }
    }
    Ok(())
}
