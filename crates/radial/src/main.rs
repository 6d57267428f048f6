use clap::{Parser, Subcommand};
use radial::{
    Accent, ControlProps, DEFAULT_SIZE, Detached, Frame, Layout, Point, PointerEvent,
    RadialControl, Range, Theme,
};

#[derive(Parser, Debug)]
#[command(name = "radial", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print the control as an SVG document
    Render {
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
        #[arg(long, allow_negative_numbers = true)]
        min: f64,
        #[arg(long, allow_negative_numbers = true)]
        max: f64,
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: f64,
        /// Named accent (cool, heat, media, amber) or #rrggbb
        #[arg(long, default_value = "cool")]
        accent: Accent,
        #[arg(long, default_value = "light")]
        theme: Theme,
        #[arg(long)]
        disabled: bool,
        /// Draw the frame as it looks mid-drag
        #[arg(long)]
        dragging: bool,
    },
    /// Print the value a click at (x, y) on the control would pick
    Pick {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        #[arg(long, allow_negative_numbers = true)]
        min: f64,
        #[arg(long, allow_negative_numbers = true)]
        max: f64,
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: f64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            value,
            min,
            max,
            size,
            accent,
            theme,
            disabled,
            dragging,
        } => {
            let props = ControlProps::new(value, Range::new(min, max)?, accent)
                .with_size(size)
                .with_disabled(disabled);
            let frame = Frame::new(&props, Layout::new(size)?, theme, dragging);
            println!("{}", frame.to_svg());
            Ok(())
        }
        Commands::Pick {
            x,
            y,
            min,
            max,
            size,
        } => {
            let props = ControlProps::new(min, Range::new(min, max)?, Accent::default())
                .with_size(size);
            let mut control = RadialControl::new(props)?;

            let mut picked = None;
            control.handle(
                &PointerEvent::Click(Point::new(x, y)),
                &Detached,
                &mut |v| picked = Some(v),
            );
            match picked {
                Some(v) => println!("{v}"),
                None => anyhow::bail!("({x}, {y}) lies outside the {size}x{size} control"),
            }
            Ok(())
        }
    }
}
