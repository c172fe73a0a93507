//! Causal chains: layered incidents, chain layouts and derived stacks.
//!
//! Run with: cargo run --example causal_chain

use incident::{define_incident, incident, ChainFormatConfig, Incident, IncidentArg, Link};
use serde_json::json;

define_incident!(pub ConnectionLost);
define_incident!(pub Network = "NetworkFailure");

fn connect(host: &str) -> Result<(), Network> {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset by peer");
    let lost = ConnectionLost::builder()
        .entry("host", host)
        .message(format!("lost connection to {}", host))
        .cause(io)
        .stackless()
        .build();
    let args = [IncidentArg::from(lost), IncidentArg::from("Unable to connect")];
    Err(Network::from_args(args).unwrap_or_else(|err| Network::new(format!("unable to connect ({})", err))))
}

fn main() {
    let Err(network) = connect("db-1.internal") else {
        return;
    };

    println!("=== Head line ===");
    println!("{}", network);

    println!("\n=== Default chain ===");
    println!("{:#}", network);

    println!("\n=== Arrows ===");
    println!("{}", network.fmt_chain().arrows());

    println!("\n=== Cascaded ===");
    println!("{}", network.fmt_chain().cascaded());

    println!("\n=== Custom layout ===");
    let config = ChainFormatConfig {
        separator: "\n".into(),
        item_prefix: Some("- ".into()),
        root_prefix: Some("* root: ".into()),
        ..Default::default()
    };
    println!("{}", network.fmt_chain().with_config(config));

    println!("\n=== Links ===");
    for link in network.chain() {
        match link {
            Link::Incident(incident) => println!("incident {:<16} data={}", incident.name(), json!(incident.data())),
            Link::Foreign(error) => println!("foreign  {:<16} {}", link.name(), error),
        }
    }

    println!("\n=== Root cause ===");
    println!("{}", network.root_cause());

    println!("\n=== Stack ===");
    println!("{}", network.stack());

    println!("\n=== Positional wrapping ===");
    let wrapped = incident!(network.clone().into_incident(), "Sync", "nightly sync aborted");
    println!("{:#}", wrapped);
    println!("kind check: {}", wrapped.cause().is_some_and(|cause| cause.is::<Incident>()));
}
