//! Interactive negotiation CLI.
//!
//! The human plays the seller; the buyer agent answers each offer, with
//! optional Hugging Face phrasing when `HF_API_KEY` is set. Runs up to
//! ten rounds or until either side accepts.
//!
//! ```bash
//! cargo run --bin interactive_match
//! ```

use std::collections::HashMap;
use std::io::{self, Write};

use mandi::agent::BuyerAgent;
use mandi::decision::DealStatus;
use mandi::llms::providers::huggingface::HuggingFaceCompletion;
use mandi::product::Product;

fn read_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn pick_product() -> io::Result<Product> {
    println!("\nSelect a product to negotiate:");
    println!("1) Alphonso Mangoes (A grade, export)");
    println!("2) Kesar Mangoes (B grade)");
    let choice = read_line("Enter 1 or 2: ")?;
    let product = if choice == "1" {
        Product {
            name: "Alphonso Mangoes".to_string(),
            category: "Mangoes".to_string(),
            quantity: 100,
            quality_grade: "A".to_string(),
            origin: "Ratnagiri".to_string(),
            base_market_price: 180_000,
            attributes: HashMap::from([("export_grade".to_string(), serde_json::json!(true))]),
        }
    } else {
        Product {
            name: "Kesar Mangoes".to_string(),
            category: "Mangoes".to_string(),
            quantity: 150,
            quality_grade: "B".to_string(),
            origin: "Gujarat".to_string(),
            base_market_price: 150_000,
            attributes: HashMap::from([("export_grade".to_string(), serde_json::json!(false))]),
        }
    };
    Ok(product)
}

fn read_budget() -> io::Result<i64> {
    loop {
        let input = read_line("Enter BUYER budget (₹): ")?;
        match input.replace(',', "").parse::<i64>() {
            Ok(budget) if budget > 0 => return Ok(budget),
            _ => println!("Please enter a valid integer (e.g., 180000)."),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let persona_path =
        std::env::var("MANDI_PERSONA").unwrap_or_else(|_| "personality_config.json".to_string());
    let mut agent = BuyerAgent::new(&persona_path)?;

    match HuggingFaceCompletion::from_env() {
        Ok(model) => {
            println!("Using Hugging Face model for phrasing.");
            agent = agent.with_generator(Box::new(model));
        }
        Err(_) => {
            println!("HF_API_KEY not set. Running WITHOUT phrasing (logic still works).");
        }
    }

    let product = pick_product()?;
    println!(
        "\nProduct: {} | Market: ₹{}",
        product.name, product.base_market_price
    );
    let budget = read_budget()?;

    println!("\nYou are the SELLER. Enter a numeric offer each round (or 'q' to quit).");

    let mut seller_msg = format!(
        "Opening price ₹{}",
        (product.base_market_price as f64 * 1.5) as i64
    );
    println!("Seller (opening): {seller_msg}");

    for round_num in 1..=10 {
        let response = agent.negotiate(&product, budget, &seller_msg, round_num).await;
        println!("Buyer (R{round_num}): {}", response.message);
        if response.status == DealStatus::Accepted {
            println!(
                "Deal closed at ₹{} on round {round_num}",
                response.price.unwrap_or_default()
            );
            return Ok(());
        }

        let input = read_line("Your next SELLER offer (₹ number), or 'q' to quit: ")?;
        if matches!(input.to_lowercase().as_str(), "q" | "quit" | "exit") {
            println!("Exiting without a deal.");
            return Ok(());
        }
        seller_msg = match input.replace(',', "").parse::<i64>() {
            Ok(offer) => format!("I can sell for ₹{offer}"),
            Err(_) => {
                println!("Please enter a valid integer price.");
                "Give me your best price.".to_string()
            }
        };
    }

    println!("Reached 10 rounds without agreement. No deal.");
    Ok(())
}
