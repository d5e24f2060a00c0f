// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::inline;
use crate::models::TxKind;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let Some(kind) = inline(TxKind::parse(sub.get_one::<String>("kind").unwrap()))? else {
                return Ok(());
            };
            if let Some(id) = inline(store::insert_category(conn, name, kind))? {
                println!("Added category '{}' ({}) with id {}", name, kind.as_str(), id);
            }
        }
        Some(("list", sub)) => {
            let categories = store::list_categories(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &categories)? {
                let rows = categories
                    .iter()
                    .map(|c| vec![c.id.to_string(), c.name.clone(), c.kind.as_str().to_string()])
                    .collect();
                println!("{}", pretty_table(&["ID", "Nome", "Tipo"], rows));
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if inline(store::delete_category(conn, id))?.is_some() {
                println!("Removed category {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}
