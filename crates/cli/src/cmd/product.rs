//! Single-product commands, routed through the event handler.

use std::path::Path;

use chrono::NaiveDate;
use mhdsync_core::events::{EventHandler, HandleOutcome, ProductEvent};
use mhdsync_core::sync::FieldSynchronizer;
use mhdsync_core::token;

use super::{clock, fail, load_config, open_store};

pub fn set_token(
    config: Option<&Path>,
    profile: Option<&str>,
    today: Option<NaiveDate>,
    product: &str,
    raw: Option<&str>,
) {
    let rc = load_config(config, profile);
    let store = open_store(&rc);
    let synchronizer = FieldSynchronizer::new(rc.fields.clone());
    let handler = EventHandler::new(&store, clock(today), &synchronizer);

    let token = raw.map(str::trim).filter(|t| !t.is_empty());
    if let Some(t) = token.filter(|t| token::decode(t).is_none()) {
        println!("Token '{t}' is not a valid MHD date; markers will be removed");
    }

    match handler.set_token(product, token) {
        Ok(outcome) => report(product, outcome),
        Err(e) => fail(1, format!("Failed to update {product}: {e}")),
    }
}

pub fn set_ean(config: Option<&Path>, profile: Option<&str>, product: &str, ean: Option<&str>) {
    let rc = load_config(config, profile);
    let store = open_store(&rc);
    let synchronizer = FieldSynchronizer::new(rc.fields.clone());
    let handler = EventHandler::new(&store, clock(None), &synchronizer);

    let ean = ean.map(str::trim).filter(|e| !e.is_empty());
    match handler.set_ean(product, ean) {
        Ok(outcome) => report(product, outcome),
        Err(e) => fail(1, format!("Failed to update {product}: {e}")),
    }
}

pub fn stock_comment(
    config: Option<&Path>,
    profile: Option<&str>,
    today: Option<NaiveDate>,
    product: &str,
    comment: &str,
) {
    let rc = load_config(config, profile);
    let store = open_store(&rc);
    let synchronizer = FieldSynchronizer::new(rc.fields.clone());
    let handler = EventHandler::new(&store, clock(today), &synchronizer);

    let event = ProductEvent::StockMovementCommented {
        product_id: product.to_string(),
        comment: comment.to_string(),
    };
    match handler.handle(&event) {
        Ok(outcome) => report(product, outcome),
        Err(e) => fail(1, format!("Failed to update {product}: {e}")),
    }
}

fn report(product: &str, outcome: HandleOutcome) {
    match outcome {
        HandleOutcome::Updated { variants } => {
            println!("Updated {variants} translation(s) of {product}");
        }
        HandleOutcome::Unchanged => println!("{product} is already up to date"),
        HandleOutcome::Ignored => println!("Comment is not an MHD token; nothing to do"),
        HandleOutcome::ProductMissing => fail(1, format!("Product not found: {product}")),
    }
}
