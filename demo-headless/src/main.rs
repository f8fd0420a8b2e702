use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use flame_speed_core::{
    analyze, BurnerConfig, FlowRates, MarkOutcome, MarkingSession, PixelPoint,
};

/// Flame speed calculation demo with pre-marked points
#[derive(Parser, Debug)]
#[command(name = "flame-speed-demo")]
#[command(about = "Conical flame speed analysis from three marked points", long_about = None)]
struct Args {
    /// Left end of the base reference segment, pixels ("x,y")
    #[arg(long, value_parser = parse_point)]
    base_left: (f64, f64),

    /// Right end of the base reference segment, pixels ("x,y")
    #[arg(long, value_parser = parse_point)]
    base_right: (f64, f64),

    /// Flame tip, pixels ("x,y")
    #[arg(long, value_parser = parse_point)]
    apex: (f64, f64),

    /// Fuel flow rate (L/min)
    #[arg(short, long)]
    fuel: f64,

    /// Air flow rate (L/min)
    #[arg(short, long)]
    air: f64,

    /// Diluent / secondary reactant flow rate (L/min)
    #[arg(short, long, default_value_t = 0.0)]
    diluent: f64,

    /// Displayed canvas width the points were marked on (pixels)
    #[arg(long, default_value_t = 900.0)]
    canvas_width: f64,

    /// Displayed canvas height the points were marked on (pixels)
    #[arg(long, default_value_t = 600.0)]
    canvas_height: f64,

    /// Burner config JSON file (defaults to the methane/air reference rig)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Calibration distance between the base points (mm); overrides the config file
    #[arg(long)]
    calibration_mm: Option<f64>,

    /// Stoichiometric air/fuel ratio; overrides the config file
    #[arg(long)]
    stoich_ratio: Option<f64>,

    /// Burner nozzle inner diameter (mm); overrides the config file
    #[arg(long)]
    burner_diameter_mm: Option<f64>,

    /// Print the result as JSON instead of a text report
    #[arg(long)]
    json: bool,
}

/// Parse an "x,y" pixel pair.
fn parse_point(text: &str) -> Result<(f64, f64), String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got '{text}'"))?;
    let x: f64 = x
        .trim()
        .parse()
        .map_err(|_| format!("invalid x coordinate '{x}'"))?;
    let y: f64 = y
        .trim()
        .parse()
        .map_err(|_| format!("invalid y coordinate '{y}'"))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(format!("coordinates must be finite, got '{text}'"));
    }
    Ok((x, y))
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => BurnerConfig::load(path)?,
        None => BurnerConfig::default(),
    };
    if let Some(calibration_mm) = args.calibration_mm {
        config.calibration_mm = calibration_mm;
    }
    if let Some(stoich_ratio) = args.stoich_ratio {
        config.stoichiometric_air_fuel_ratio = stoich_ratio;
    }
    if let Some(burner_diameter_mm) = args.burner_diameter_mm {
        config.burner_inner_diameter_mm = burner_diameter_mm;
    }
    config.validate()?;

    // Feed the points through the marking session in click order, the same
    // path the GUI layer uses
    let mut session = MarkingSession::new();
    session.load_image(args.canvas_width, args.canvas_height);

    let marks = [args.base_left, args.base_right, args.apex];
    let mut triple = None;
    for (index, (x, y)) in marks.into_iter().enumerate() {
        match session.mark(PixelPoint::new(x, y))? {
            MarkOutcome::Accepted { .. } => println!("Point {}: ({x}, {y})", index + 1),
            MarkOutcome::Complete(complete) => {
                println!("Point {}: ({x}, {y})", index + 1);
                triple = Some(complete);
            }
        }
    }
    let triple = triple.ok_or("three points are required")?;

    let flows = FlowRates::new(args.fuel, args.air, args.diluent);
    let analysis = analyze(&triple, &flows, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("\nFuel:    {} L/min", flows.fuel_lpm);
    println!("Air:     {} L/min", flows.air_lpm);
    println!("Diluent: {} L/min", flows.diluent_lpm);
    println!();
    println!(
        "Semi apex angle:   {:.3} degrees",
        analysis.geometry.semi_apex_angle_deg
    );
    println!(
        "Flame height:      {:.2} mm",
        analysis.geometry.flame_height_mm
    );
    println!(
        "Equivalence ratio: {:.4}",
        analysis.speed.equivalence_ratio
    );
    println!(
        "Diluent fraction:  {:.2}%",
        100.0 * analysis.speed.diluent_mole_fraction
    );
    println!(
        "Unburned velocity: {:.4} m/s",
        analysis.speed.unburned_velocity_m_s
    );
    println!(
        "Flame speed:       S_L = {:.4} m/s",
        analysis.speed.laminar_flame_speed_m_s
    );

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    println!("=== Flame Speed Calculator ===\n");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
