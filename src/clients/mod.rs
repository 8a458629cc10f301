pub mod station_client;
