// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use cashbook::directory::AuthOutcome;
use cashbook::error::LedgerError;
use cashbook::models::Session;
use cashbook::{cli, commands, db, directory};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();

    match matches.subcommand() {
        Some(("init", _)) => {
            directory::open_directory()?;
            println!("Data directory ready at {}", db::data_dir()?.display());
        }
        Some(("admin", sub)) => {
            let conn = directory::open_directory()?;
            commands::admin::handle(&conn, sub)?;
        }
        Some(("set-password", sub)) => set_password(&matches, sub)?,
        Some((name, sub)) => {
            let Some(session) = resolve_session(&matches)? else {
                return Ok(());
            };
            let conn = db::open_ledger(&session.ledger_path)?;
            match name {
                "account" => commands::accounts::handle(&conn, sub)?,
                "category" => commands::categories::handle(&conn, sub)?,
                "tx" => commands::transactions::handle(&conn, &session, sub)?,
                "report" => commands::reports::handle(&conn, sub)?,
                "export" => commands::exporter::handle(&conn, sub)?,
                _ => {
                    cli::build_cli().print_help()?;
                    println!();
                }
            }
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn set_password(matches: &clap::ArgMatches, sub: &clap::ArgMatches) -> Result<()> {
    let Some(user) = matches.get_one::<String>("user") else {
        eprintln!("set-password needs --user");
        return Ok(());
    };
    let conn = directory::open_directory()?;
    let new_password = sub.get_one::<String>("new-password").unwrap();
    let confirm = sub.get_one::<String>("confirm").unwrap();
    match directory::set_password(&conn, user, new_password, confirm) {
        Ok(()) => println!("Password set for '{}'", user.trim().to_lowercase()),
        Err(e @ (LedgerError::NotFound(_) | LedgerError::Validation(_))) => eprintln!("{}", e),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Resolve which ledger to open. `--ledger` bypasses the directory; otherwise
/// the tenant logs in with `--user`/`--password`. Denied logins print a
/// warning and end the run without an error status.
fn resolve_session(matches: &clap::ArgMatches) -> Result<Option<Session>> {
    if let Some(path) = matches.get_one::<String>("ledger") {
        return Ok(Some(Session {
            user: matches
                .get_one::<String>("user")
                .cloned()
                .unwrap_or_else(|| "local".to_string()),
            company: String::new(),
            ledger_path: db::ledger_path(path)?,
        }));
    }

    let (Some(user), Some(password)) = (
        matches.get_one::<String>("user"),
        matches.get_one::<String>("password"),
    ) else {
        eprintln!("Pass --user and --password, or --ledger to open a file directly");
        return Ok(None);
    };

    let conn = directory::open_directory()?;
    match directory::authenticate(&conn, user, password)? {
        AuthOutcome::Ok { company, db_name } => Ok(Some(Session {
            user: user.trim().to_lowercase(),
            company,
            ledger_path: db::ledger_path(&db_name)?,
        })),
        AuthOutcome::NotFound => {
            eprintln!("Unknown login '{}'", user);
            Ok(None)
        }
        AuthOutcome::Blocked => {
            eprintln!("Access blocked; contact the administrator");
            Ok(None)
        }
        AuthOutcome::FirstAccessRequired { company } => {
            eprintln!(
                "First access for {}: set a password with `cashbook --user {} set-password`",
                company, user
            );
            Ok(None)
        }
        AuthOutcome::WrongPassword => {
            eprintln!("Wrong password");
            Ok(None)
        }
    }
}
