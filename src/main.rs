use anyhow::{Context, Result, anyhow};
use clap::Parser;
use furbin::command::{Command, HELP, parse_command, parse_location};
use furbin::plot::{MessagePanel, plot, plot_message};
use furbin::source::DEFAULT_REMOTE_URL;
use furbin::{ChartConfig, ChartEvent, ChartSession, DataSource, Page, SessionParams};
use plotters::prelude::*;
use regex::Regex;
use std::io::BufRead;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Parser)]
#[command(version, about = "hexbin density map of squirrel sightings by fur color")]
pub struct Args {
    #[clap(help = "data sources (files or http(s) URLs), tried in order; defaults to the config's list")]
    pub sources: Vec<String>,

    #[clap(long, help = "try the published remote dataset first", default_value = "false")]
    pub remote: bool,

    #[clap(short = 'c', long, help = "chart config in YAML")]
    pub config: Option<PathBuf>,

    #[clap(short = 'o', long, help = "output filename (.svg or .png)", default_value = "squirrels.svg")]
    pub output: PathBuf,

    #[clap(short = 'r', long, help = "hexagon radius in pixels")]
    pub radius: Option<f64>,

    #[clap(long, help = "padding around the data extent, as a fraction of its span")]
    pub padding: Option<f64>,

    #[clap(long, help = "do not preserve the data's aspect ratio", default_value = "false")]
    pub no_fit_aspect: bool,

    #[clap(short = 'x', long, help = "deselect a fur color (repeatable)")]
    pub exclude: Vec<String>,

    #[clap(short = 's', long, help = "select only fur colors matching this regex")]
    pub select: Option<String>,

    #[clap(long, help = "show the tooltip at LON,LAT", value_parser = parse_location, allow_hyphen_values = true)]
    pub hover: Option<(f64, f64)>,

    #[clap(short = 'i', long, help = "read filter commands from stdin after the first render", default_value = "false")]
    pub interactive: bool,
}

fn print_args(args: &[String]) {
    let args = args
        .iter()
        .map(|x| if x.contains(' ') { format!("\"{x}\"") } else { x.to_string() })
        .collect::<Vec<_>>();
    let args = args.join(" ");
    log::info!("args: {args}");
}

fn build_config(args: &Args) -> Result<ChartConfig> {
    let mut config = match &args.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };
    if let Some(radius) = args.radius {
        config.radius = radius;
    }
    if let Some(padding) = args.padding {
        config.padding = padding;
    }
    if args.no_fit_aspect {
        config.fit_aspect = false;
    }
    if !args.sources.is_empty() {
        config.sources = args.sources.clone();
    }
    if args.remote {
        config.sources.insert(0, DEFAULT_REMOTE_URL.to_string());
    }
    config.validate()?;
    Ok(config)
}

fn session_params(config: &ChartConfig) -> SessionParams {
    let (width, height) = config.plot_size();
    SessionParams {
        radius: config.radius,
        padding: config.padding,
        fit_aspect: config.fit_aspect,
        width: width as f64,
        height: height as f64,
    }
}

fn hover_at(session: &mut ChartSession, lon: f64, lat: f64) {
    let scales = session.scales();
    let (x, y) = (scales.x.map(lon), scales.y.map(lat));
    if !session.hover(x, y) {
        log::info!("hover ({lon}, {lat}): no hexagon");
        return;
    }
    let scene = session.scene();
    if let (Some(i), Some(tooltip)) = (scene.hovered, &scene.tooltip) {
        let (clon, clat) = session.scales().unproject(scene.active[i].x, scene.active[i].y);
        log::info!("hover ({lon}, {lat}): hexagon at ({clon:.5}, {clat:.5}), {}", tooltip.lines.join(", "));
    }
}

fn apply_initial_filter(session: &mut ChartSession, args: &Args, select: Option<&Regex>) -> Result<()> {
    if let Some(re) = select {
        if session.filter_mut().select_matching(re) {
            session.redraw();
        }
    }
    for color in &args.exclude {
        session.handle(&ChartEvent::Set(color.clone(), false))?;
    }
    if let Some((lon, lat)) = args.hover {
        hover_at(session, lon, lat);
    }
    Ok(())
}

fn print_status(session: &ChartSession) {
    let toggles = session
        .filter()
        .toggles()
        .iter()
        .map(|(name, s)| format!("[{}] {name}", if *s { 'x' } else { ' ' }))
        .collect::<Vec<_>>();
    println!("{}", toggles.join("  "));
    println!(
        "{} hexagons, color domain [0, {}]",
        session.scene().active.len(),
        session.color_domain_max()
    );
}

fn run_interactive(session: &mut ChartSession, config: &ChartConfig, output: &Path) -> Result<()> {
    eprintln!("{HELP}");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        let event = match cmd {
            Command::Toggle(c) => ChartEvent::Toggle(c),
            Command::Set(c, s) => ChartEvent::Set(c, s),
            Command::SelectAll => ChartEvent::SelectAll,
            Command::ClearAll => ChartEvent::ClearAll,
            Command::PointerOut => ChartEvent::PointerOut,
            Command::Hover(lon, lat) => {
                hover_at(session, lon, lat);
                continue;
            }
            Command::Render(path) => {
                plot(path.as_deref().unwrap_or(output), session, config)?;
                continue;
            }
            Command::Status => {
                print_status(session);
                continue;
            }
            Command::Help => {
                eprintln!("{HELP}");
                continue;
            }
            Command::Quit => break,
        };
        match session.handle(&event) {
            Ok(Some(r)) => log::info!(
                "redraw: {} hexagons (+{} ~{} -{}), selected {:?}",
                session.scene().active.len(),
                r.entered,
                r.updated,
                r.exited,
                session.filter().selected()
            ),
            Ok(None) => {}
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}

fn show_chart(page: &mut Page, args: &Args, select: Option<&Regex>, config: &ChartConfig) -> Result<()> {
    let session = page.session_mut().ok_or_else(|| anyhow!("no chart session after loading"))?;
    apply_initial_filter(session, args, select)?;
    plot(&args.output, session, config)?;
    page.attach()
}

fn run(args: &Args) -> Result<()> {
    let config = build_config(args)?;
    let select = match &args.select {
        Some(pattern) => Some(Regex::new(pattern).with_context(|| format!("invalid --select pattern {pattern:?}"))?),
        None => None,
    };
    let style = config.style()?;
    let sources = config.data_sources();

    let text_style = TextStyle::from((config.font_family.as_str(), config.font_size as f64).into_font()).color(&BLACK);
    plot_message(&args.output, &MessagePanel::loading(&text_style), &config)?;

    let mut page = Page::new();
    page.load(&sources, &session_params(&config), style.color_map)?;
    if let Some(e) = page.error() {
        let panel = MessagePanel::error(&e.to_string(), &e.attempts, &text_style);
        plot_message(&args.output, &panel, &config)?;
        let locations = e.locations().join(", ");
        return Err(anyhow!("{e}; tried: {locations}"));
    }

    // replace the loading panel
    if let Err(e) = show_chart(&mut page, args, select.as_ref(), &config) {
        plot_message(&args.output, &MessagePanel::failed(&format!("{e:#}"), &text_style), &config)?;
        return Err(e);
    }

    if args.interactive {
        let session = page.session_mut().ok_or_else(|| anyhow!("no chart session"))?;
        run_interactive(session, &config, &args.output)?;
    }
    Ok(())
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();
    print_args(&std::env::args().collect::<Vec<_>>());
    log::debug!("sources: {:?}", args.sources.iter().map(|x| DataSource::parse(x)).collect::<Vec<_>>());

    if let Err(e) = run(&args) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"[
        {"longitude": -73.97, "latitude": 40.78, "furColor": "Gray"},
        {"longitude": -73.97, "latitude": 40.78, "furColor": "Black"},
        {"longitude": -73.96, "latitude": 40.77, "furColor": "Gray"}
    ]"#;

    fn args(dir: &Path, extra: &[&str]) -> Args {
        let data = dir.join("squirrel_coords.json");
        std::fs::write(&data, DATA).unwrap();
        let output = dir.join("chart.svg");
        let mut argv = vec![
            "furbin".to_string(),
            data.display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ];
        argv.extend(extra.iter().map(|x| x.to_string()));
        Args::parse_from(argv)
    }

    #[test]
    fn test_renders_filtered_chart() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), &["-x", "Black", "--hover", "-73.97,40.78"]);
        run(&args).unwrap();
        let svg = std::fs::read_to_string(&args.output).unwrap();
        assert!(!svg.contains("Loading data"));
        assert!(svg.contains("Showing 2 of 3 sightings"));
        assert!(svg.contains("Total: 1 squirrels"));
    }

    #[test]
    fn test_unknown_color_replaces_loading_panel() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), &["-x", "White"]);
        assert!(run(&args).is_err());
        let svg = std::fs::read_to_string(&args.output).unwrap();
        assert!(!svg.contains("Loading data"));
        assert!(svg.contains("unknown fur color"));
    }

    #[test]
    fn test_bad_select_fails_before_loading() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), &["-s", "(Gray"]);
        assert!(run(&args).is_err());
        assert!(!args.output.exists());
    }

    #[test]
    fn test_missing_data_writes_error_panel() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("chart.svg");
        let missing = dir.path().join("missing.json");
        let args = Args::parse_from([
            "furbin".to_string(),
            missing.display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ]);
        assert!(run(&args).is_err());
        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains("Tried paths:"));
        assert!(!svg.contains("Loading data"));
    }
}
