//! Lists products whose stored MHD date satisfies a rule.

use std::path::Path;

use mhdsync_core::rule::MhdDateRule;
use mhdsync_core::store::{ProductRecord, ProductStore};
use mhdsync_core::sync::FieldNames;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use super::{fail, load_config, open_store};
use crate::FilterArgs;

#[derive(Debug, Serialize, Tabled)]
struct MatchRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Number")]
    product_number: String,
    #[tabled(rename = "Token")]
    token: String,
    #[tabled(rename = "MHD")]
    mhd_date: String,
    #[tabled(rename = "Days")]
    days: String,
}

impl MatchRow {
    fn new(product: &ProductRecord, fields: &FieldNames) -> Self {
        let first = product.variants.first();
        let field = |key: &str| {
            first
                .and_then(|v| v.custom_fields.get(key))
                .map(|value| match value.as_str() {
                    Some(s) => s.to_string(),
                    None => value.to_string(),
                })
                .unwrap_or_default()
        };
        Self {
            id: product.id.clone(),
            product_number: product.product_number.clone(),
            token: product.manufacturer_number.clone().unwrap_or_default(),
            mhd_date: field(&fields.date),
            days: field(&fields.days),
        }
    }
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: &FilterArgs) {
    let rule = match MhdDateRule::parse(&args.operator, args.date.as_deref()) {
        Ok(rule) => rule,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let rc = load_config(config, profile);
    let store = open_store(&rc);

    let mut rows = Vec::new();
    let mut offset = 0;
    loop {
        let page = match store.fetch_page(offset, rc.sync.batch_size) {
            Ok(page) => page,
            Err(e) => fail(1, format!("Failed to read products: {e}")),
        };
        if page.is_empty() {
            break;
        }
        offset += page.len();

        for product in &page {
            let fields = product.variants.iter().map(|v| Some(&v.custom_fields));
            if rule.matches_any(fields, &rc.fields.date) {
                rows.push(MatchRow::new(product, &rc.fields));
            }
        }
    }
    tracing::debug!(operator = %rule.operator, matches = rows.len(), "filter finished");

    if args.json {
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(1, format!("Failed to serialize results: {e}")),
        }
    } else if rows.is_empty() {
        println!("(no products match)");
    } else {
        let table = Table::new(&rows).with(Style::rounded()).to_string();
        println!("{table}");
    }
}
