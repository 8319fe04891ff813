#![allow(non_snake_case)]
use RustedLiMath::Utils::config::LiMathConfig;
use RustedLiMath::Utils::logger::init_logger;
use RustedLiMath::ode::constant_fitter::Condition;
use RustedLiMath::ode::ode_api::{first_ode, solve_ivp_first_order, solve_ivp_system, system_ode};
use log::{error, info};
use std::path::Path;

/// optional configuration in the working directory
const CONFIG_FILE: &str = "limath.toml";

fn run_examples() -> Result<(), Box<dyn std::error::Error>> {
    let general = first_ode(vec!["t", "2", "2 + t"])?;
    info!("general solution: {}", general);
    let y = solve_ivp_first_order(vec!["t", "2", "2 + t"], &[Condition::new(1.0, 0.0)])?;
    info!("y(1) = 0: y(t) = {}", y);

    let matrix = vec![vec![1.0, 0.0], vec![0.0, -3.0]];
    let general = system_ode(matrix.clone())?;
    info!("general solution of the system: {}", general);
    let (x, y) = solve_ivp_system(matrix, &[Condition::new(0.0, 0.0), Condition::new(0.0, 1.0)])?;
    info!("x(0) = 0, y(0) = 1: x(t) = {}, y(t) = {}", x, y);
    Ok(())
}

fn main() {
    let config = if Path::new(CONFIG_FILE).exists() {
        match LiMathConfig::from_file(CONFIG_FILE) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}: {}, falling back to defaults", CONFIG_FILE, e);
                LiMathConfig::default()
            }
        }
    } else {
        LiMathConfig::default()
    };
    if let Err(e) = init_logger(&config) {
        eprintln!("logger: {}", e);
    }
    if let Err(e) = run_examples() {
        error!("{}", e);
    }
}
