use wisconet::{LatLon, Wisconet, WisconetError};

#[tokio::main]
async fn main() -> Result<(), WisconetError> {
    let client = Wisconet::new().await?;
    let madison = LatLon(43.0731, -89.4012);

    for (station, meters) in client
        .nearest_stations()
        .location(madison)
        .max_distance_m(80_000.0)
        .limit(5)
        .call()
    {
        let info = station.station();
        println!(
            "{:<8} {:<30} {:>6.1} km  data since {}",
            info.station_id,
            info.station_name.as_deref().unwrap_or("-"),
            meters / 1000.0,
            info.earliest_api_date
        );
    }

    let names = client
        .get_station("arlington")
        .map(|s| s.station().station_id.clone());
    println!("'arlington' resolves to {:?}", names);
    Ok(())
}
