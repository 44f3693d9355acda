use flow_netmask::config::{Config, OutputFormat};
use flow_netmask::get_masked_records;
use flow_netmask::output::{print_csv, print_records};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default()).expect("Error initializing log4rs");
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let mut config = Config::from_env()?;
    if let Some(input) = std::env::args().nth(1) {
        config.input = input;
    }

    let masked = get_masked_records(&config)?;

    match config.output {
        OutputFormat::Csv => print_csv(&masked.records),
        OutputFormat::Terminal => print_records(&masked.records, &masked.keys),
    }

    Ok(())
}
