//! Reporting incidents through `tracing`.
//!
//! Run with: cargo run --example tracing_report --features tracing

use incident::prelude::*;
use incident::tracing_ext::instrument_error;
use tracing::info_span;

fn fetch_invoice(id: u64) -> Result<String, Incident> {
    let _span = info_span!("fetch_invoice", id).entered();
    let result: Result<String, std::io::Error> =
        Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "billing service timed out"));
    result
        .incident_with(|| {
            Incident::builder()
                .name("Billing")
                .entry("invoice", id)
                .message(lazy_message!(data => "unable to fetch invoice {}", data["invoice"]))
        })
        .with_current_span()
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    if let Err(incident) = fetch_invoice(42) {
        incident.record();
        println!("span recorded in data: {}", incident.data()["span"]);
    }

    let _span = info_span!("parse_settings").entered();
    let incident = instrument_error("x".parse::<u8>().unwrap_err());
    incident.record();
}
