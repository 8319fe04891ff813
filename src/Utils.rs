//! different utility modules used throughout the project
/// run-time settings (plot size, sample counts, tolerance, log level) read from TOML
pub mod config;
/// logger start-up and CSV export of sample tables
pub mod logger;
/// plotters sinks: phase portraits, slope fields, f and f', cobweb GIFs, bifurcation diagrams
pub mod plots;
