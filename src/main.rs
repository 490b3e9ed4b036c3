use clap::Parser;
use supporters::api::Error;
use supporters::{SupportersView, ViewState};
use supporters_app::Args;

/// Lists the supporters of a community

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let service = supporters_app::build_service(&args)?;
    let request = supporters_app::request_descriptor(&args);

    let mut view = SupportersView::default();
    let ticket = view.begin();
    let result = service.aggregate(&request).await;
    view.apply(ticket, result);

    match view.state() {
        ViewState::Populated(aggregate) => {
            for member in &aggregate.members {
                println!("{}", member);
            }
            if let Some(stats) = &aggregate.stats {
                println!(
                    "balance: {:.2} {}\tyearly income: {:.2} {}\tbackers: {}",
                    stats.balance.minor_units as f64 / 100.0,
                    stats.balance.currency,
                    stats.yearly_income.minor_units as f64 / 100.0,
                    stats.yearly_income.currency,
                    stats.backers_count
                );
            }
        }
        ViewState::Empty => println!("No {} found for {}", request.mode, request.collective),
        ViewState::Failed(message) => {
            eprintln!("Failed to fetch supporters: {}", message);
            std::process::exit(1);
        }
        ViewState::Idle | ViewState::Loading => {}
    }

    Ok(())
}
