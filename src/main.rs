use imggrid::{
    compose,
    filter_from_name,
    parse_color,
    io::{ load_images, read_list, save_canvas },
    logging::init_logging,
    timer::Timer,
    window::PreviewWindow,
    GridResult,
    GridSpec,
    Overflow,
    DEFAULT_RESIZE,
};

use image::{ imageops::FilterType, Rgb };

use clap::{ ArgGroup, Parser };

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compose images into a rows x cols grid", long_about = None)]
#[command(group(ArgGroup::new("sink").required(true).multiple(true).args(["output", "preview"])))]
struct Args {
    /// Images in placement order, filled left to right, top to bottom.
    inputs: Vec<PathBuf>,
    /// Text file with one image path per line, appended after INPUTS.
    #[arg(long)]
    list: Option<PathBuf>,
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    rows: u32,
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    cols: u32,
    /// Square side every image is scaled to.
    #[arg(long, default_value_t = DEFAULT_RESIZE, value_parser = clap::value_parser!(u32).range(1..))]
    resize: u32,
    /// Keep images at their own size; they must all match.
    #[arg(long, conflicts_with = "resize")]
    no_resize: bool,
    /// nearest, triangle, catmullrom, gaussian or lanczos.
    #[arg(long, default_value = "catmullrom", value_parser = filter_from_name)]
    filter: FilterType,
    /// clip, wrap or reject images beyond rows * cols.
    #[arg(long, default_value_t = Overflow::Clip)]
    overflow: Overflow,
    /// Fill for empty cells as #rrggbb.
    #[arg(long, default_value = "#000000", value_parser = parse_color)]
    background: Rgb<u8>,
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Show the grid in a window.
    #[arg(long)]
    preview: bool,
    #[arg(short, long)]
    verbose: bool,
}

impl Args{
    fn grid_spec(&self) -> GridSpec{
        let spec = GridSpec::new(self.rows, self.cols)
            .with_filter(self.filter)
            .with_background(self.background)
            .with_overflow(self.overflow);
        if self.no_resize { spec.without_resize() } else { spec.with_resize(self.resize) }
    }
}

pub fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    run(args).vital("imggrid");
}

fn run(args: Args) -> GridResult<()>{
    let mut timer = Timer::new();

    let mut paths = args.inputs.clone();
    if let Some(list) = &args.list {
        paths.extend(read_list(list)?);
    }
    log::info!("composing {} images into {}x{}", paths.len(), args.rows, args.cols);

    let images = load_images(&paths)?;
    log::debug!("load: {}ms", timer.lap());

    let spec = args.grid_spec();
    let grid = compose(&images, &spec)?;
    log::debug!("compose: {}ms", timer.lap());

    if let Some(out) = &args.output {
        save_canvas(&grid, out)?;
        log::debug!("save: {}ms", timer.lap());
    }

    if args.preview {
        let (mut window, mut event_pump) =
            PreviewWindow::create(spec.rows, spec.cols, grid.width(), grid.height(), &timer)?;
        window.set_texture(&grid)?;
        window.run(&mut event_pump)?;
    }

    Ok(())
}

trait Vital<T> {
    fn vital(self, msg: &str) -> T;
}

impl<T, U: std::fmt::Display> Vital<T> for Result<T, U> {
    fn vital(self, msg: &str) -> T {
        match self {
            Ok(res) => res,
            Err(err) => {
                log::error!("{msg}: {err}");
                std::process::exit(1);
            },
        }
    }
}
