use clap::Parser;
use hearth::config;
use hearth::gui::app::AppModel;
use hearth::sys::runtime;
use radial::Theme;
use relm4::prelude::*;

#[derive(Parser, Debug)]
#[command(version, about = "Smart-home control panel", long_about = None)]
struct Args {
    /// Start in this theme instead of the configured one
    #[arg(long)]
    theme: Option<Theme>,

    /// Write the default config file if missing, print its path and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.write_config {
        let path = config::write_default_config()?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut config = config::load_or_default();
    if let Some(theme) = args.theme {
        config.theme = theme;
    }

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    // GTK would otherwise try to parse our flags
    let app = RelmApp::new("org.hearth.panel").with_args(Vec::new());
    app.run::<AppModel>((config, rx));
    Ok(())
}
