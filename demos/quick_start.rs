//! Quick start: building, reading and converting incidents.
//!
//! Run with: cargo run --example quick_start

use incident::prelude::*;
use incident::args::Resolver;
use incident::IncidentArg;
use serde_json::json;

define_incident!(
    /// A port outside of the configured range.
    pub MysteriousPort
);

fn read_config(path: &str) -> Result<String, Incident> {
    std::fs::read_to_string(path).incident("Config", "unable to read configuration")
}

fn check_port(port: u16) -> Result<u16, MysteriousPort> {
    if port > 49151 {
        let args = [
            IncidentArg::from(json!({ "port": port })),
            IncidentArg::from(lazy_message!(data => "unexpected port {}", data["port"])),
        ];
        return Err(MysteriousPort::from_args(args).expect("data and message form a valid call"));
    }
    Ok(port)
}

fn main() {
    println!("Running Quick Start examples...");

    // 1. Positional arguments
    println!("\n1. Positional arguments:");
    let http = incident!("Http", json!({"status": 503}), "upstream unavailable");
    println!("Display: {}", http);
    println!("Data:    {}", json!(http.data()));

    // 2. Lazy messages are only formatted when read
    println!("\n2. Lazy message:");
    match check_port(50313) {
        Ok(port) => println!("Port {} accepted", port),
        Err(err) => {
            println!("State before read: {:?}", err.message_state());
            println!("Message:           {}", err.message());
            println!("State after read:  {:?}", err.message_state());
        }
    }

    // 3. Wrapping a foreign error
    println!("\n3. Wrapping a foreign error:");
    if let Err(err) = read_config("/definitely/missing/config.toml") {
        println!("Display: {}", err);
        println!("Chain:   {:#}", err);
        println!("Stack:\n{}", err.stack());
    }

    // 4. Arguments out of position are left unconsumed
    println!("\n4. Out-of-position arguments:");
    let skipped = incident!(json!({"port": 1}), "Late", "the name came after the data");
    println!("Name stays default: {}", skipped.name());

    // 5. Strict resolution reports a missing name instead of panicking
    println!("\n5. Strict resolution:");
    match Resolver::strict().build([IncidentArg::from("no name given")]) {
        Ok(incident) => println!("Unexpected success: {}", incident),
        Err(err) => println!("Rejected: {}", err),
    }
}
