use log::info;

use uvm_seat_checker::data_structs::app_config::CheckerConfig;
use uvm_seat_checker::seat_checker::SeatChecker;

// one pass over the watched courses; scheduling is left to cron / CI
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = CheckerConfig::load()?;
    info!("Watching {} course(s)", config.courses.len());

    let checker = SeatChecker::new(config)?;
    checker.run().await;

    Ok(())
}
