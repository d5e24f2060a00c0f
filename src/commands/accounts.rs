// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::inline;
use crate::models::AccountKind;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = AccountKind::parse(sub.get_one::<String>("kind").unwrap());
            let Some(kind) = inline(kind)? else {
                return Ok(());
            };
            if let Some(id) = inline(store::insert_account(conn, name, kind))? {
                println!("Added account '{}' ({}) with id {}", name, kind.as_str(), id);
            }
        }
        Some(("list", sub)) => {
            let accounts = store::list_accounts(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                let rows = accounts
                    .iter()
                    .map(|a| vec![a.id.to_string(), a.name.clone(), a.kind.as_str().to_string()])
                    .collect();
                println!("{}", pretty_table(&["ID", "Nome", "Tipo"], rows));
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if inline(store::delete_account(conn, id))?.is_some() {
                println!("Removed account {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}
