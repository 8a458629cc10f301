//! Fetches two months of hourly air temperature for one station in 30-day chunks.

use std::env;
use std::time::Instant;
use wisconet::{
    filter_fields, CollectionFrequency, ConnectionLimits, MeasureType, Units, Wisconet,
    WisconetError,
};

#[tokio::main]
async fn main() -> Result<(), WisconetError> {
    configure_polars_display();
    let client = Wisconet::new().await?;
    let station = client.require_station("ALTN")?;

    let fields = filter_fields(
        &station.fields().await?,
        &[
            CollectionFrequency::Min60.into(),
            MeasureType::AirTemp.into(),
            Units::Fahrenheit.into(),
        ],
    );
    println!("Fields: {:?}", fields);

    let started = Instant::now();
    let table = station
        .bulk_fetch()
        .start("2025-01-01T00:00:00")
        .end("2025-03-04T00:00:00")
        .fields(&fields)
        .limits(ConnectionLimits::new(3, 3))
        .call()
        .await?;

    match table {
        Some(table) => {
            println!("{} rows in {:?}", table.len(), started.elapsed());
            println!("{}", table.to_dataframe()?);
        }
        None => println!("No measures in range"),
    }
    Ok(())
}

fn configure_polars_display() {
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
