//! Scripted scenario runner.
//!
//! Plays the buyer agent against a mock seller across sample products
//! and easy/medium/hard budget scenarios, printing a one-line verdict
//! per match.
//!
//! # Environment Variables
//!
//! - `HF_API_KEY` — enables Hugging Face phrasing when set
//! - `MANDI_PERSONA` — persona config path (default: `personality_config.json`)
//! - `RUST_LOG` — log filter (e.g. `mandi=debug`)

use std::collections::HashMap;

use mandi::agent::BuyerAgent;
use mandi::llms::providers::huggingface::HuggingFaceCompletion;
use mandi::product::Product;
use mandi::simulation::run_single_simulation;

fn sample_products() -> Vec<Product> {
    vec![
        Product {
            name: "Alphonso Mangoes".to_string(),
            category: "Mangoes".to_string(),
            quantity: 100,
            quality_grade: "A".to_string(),
            origin: "Ratnagiri".to_string(),
            base_market_price: 180_000,
            attributes: HashMap::from([("export_grade".to_string(), serde_json::json!(true))]),
        },
        Product {
            name: "Kesar Mangoes".to_string(),
            category: "Mangoes".to_string(),
            quantity: 150,
            quality_grade: "B".to_string(),
            origin: "Gujarat".to_string(),
            base_market_price: 150_000,
            attributes: HashMap::from([("export_grade".to_string(), serde_json::json!(false))]),
        },
    ]
}

/// (budget multiplier, seller minimum multiplier) per scenario.
fn scenario_params(scenario: &str) -> (f64, f64) {
    match scenario {
        "easy" => (1.2, 0.8),
        "medium" => (1.0, 0.85),
        _ => (0.9, 0.82),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let persona_path =
        std::env::var("MANDI_PERSONA").unwrap_or_else(|_| "personality_config.json".to_string());
    let mut agent = BuyerAgent::new(&persona_path)?;

    if std::env::var("HF_API_KEY").is_ok() {
        match HuggingFaceCompletion::from_env() {
            Ok(model) => agent = agent.with_generator(Box::new(model)),
            Err(e) => log::warn!("Hugging Face init failed, running without phrasing: {e}"),
        }
    }

    for product in sample_products() {
        for scenario in ["easy", "medium", "hard"] {
            let (budget_mult, min_mult) = scenario_params(scenario);
            let buyer_budget = (product.base_market_price as f64 * budget_mult) as i64;
            let seller_min = (product.base_market_price as f64 * min_mult) as i64;

            println!(
                "\nTest: {} - {} scenario\nBudget: ₹{} | Market: ₹{}",
                product.name, scenario, buyer_budget, product.base_market_price,
            );

            let result =
                run_single_simulation(&mut agent, &product, buyer_budget, seller_min).await;
            if result.deal_made {
                println!(
                    "DEAL at ₹{} in {} rounds | Savings: ₹{}",
                    result.final_price.unwrap_or_default(),
                    result.rounds,
                    result.savings,
                );
            } else {
                println!("NO DEAL after {} rounds", result.rounds);
            }
        }
    }

    Ok(())
}
