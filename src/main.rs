use std::error::Error;
use subnet_sync::config::SyncConfig;
use subnet_sync::ipam::IpamClient;
use subnet_sync::output::print_report;
use subnet_sync::sdn::SdnClient;
use subnet_sync::{sync_plan, SubnetPlan};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default()).expect("Error initializing log4rs");
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let config = SyncConfig::from_env();
    let plan = SubnetPlan::builtin().expect("Error validating built-in subnet plan");

    let mut ipam = IpamClient::new(&config.ipam, config.accept_invalid_certs)?;
    ipam.login().await?;
    let mut sdn = SdnClient::new(&config.sdn, config.accept_invalid_certs)?;
    sdn.create_session().await?;

    let report = sync_plan(&ipam, &sdn, &plan).await?;
    print_report(&report);

    Ok(())
}
