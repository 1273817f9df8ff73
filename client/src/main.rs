// ./natcheck-client --server-a stunserver2025.stunprotocol.org --server-b stun.cloudflare.com

use clap::{Arg, Command};
use log::debug;
use natcheck_rs::detect::full_nat_detection;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    env_logger::init();

    let app = Command::new(APP_NAME)
        .version(APP_VERSION)
        .about("probe nat mapping/filtering behavior via stun")
        .arg(
            Arg::new("server_a")
                .long("server-a")
                .required(true)
                .help("primary stun server, host or host:port"),
        )
        .arg(
            Arg::new("server_b")
                .long("server-b")
                .required(true)
                .help("second stun server, host or host:port"),
        )
        .get_matches();

    let server_a: &String = app.get_one("server_a").expect("wrong server-a");
    let server_b: &String = app.get_one("server_b").expect("wrong server-b");

    debug!("server_a: {}, server_b: {}", server_a, server_b);

    match full_nat_detection(server_a, server_b).await {
        Ok(result) => {
            println!("NAT Type: {}", result.detailed_type.legacy_name());
            println!("{}", result.detailed_type);
            println!("mapping A1: {}", result.mapping.mapping_a1);
            println!("mapping B1: {}", result.mapping.mapping_b1);
            println!("mapping A2: {}", result.mapping.mapping_a2);
            match result.filtering.other_address {
                Some(v) => println!("other address: {}", v),
                None => println!("other address: none"),
            }
        }
        Err(e) => {
            eprintln!("detect fail, {}", e);
            std::process::exit(1);
        }
    }
}
