// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn tx_filter_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("month").long("month").help("Filter by due month (YYYY-MM)"))
        .arg(Arg::new("kind").long("kind").help("entrada|saida"))
        .arg(
            Arg::new("status")
                .long("status")
                .help("planned|settled|overdue|due-soon|pending"),
        )
        .arg(Arg::new("account").long("account").help("Filter by account name"))
        .arg(Arg::new("category").long("category").help("Filter by category name"))
        .arg(Arg::new("search").long("search").help("Substring match on description"))
}

pub fn build_cli() -> Command {
    Command::new("cashbook")
        .about("Multi-tenant cash-flow bookkeeping: ledgers, payables/receivables and reports")
        .arg_required_else_help(true)
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Tenant login (resolved against the tenant directory)"),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .global(true)
                .help("Tenant password"),
        )
        .arg(
            Arg::new("ledger")
                .long("ledger")
                .global(true)
                .help("Open a ledger file directly, bypassing the tenant directory"),
        )
        .subcommand(Command::new("init").about("Initialize the data directory"))
        .subcommand(
            Command::new("set-password")
                .about("Complete first access for the tenant named by --user")
                .arg(Arg::new("new-password").long("new-password").required(true))
                .arg(Arg::new("confirm").long("confirm").required(true)),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts (banks, cash, cards)")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("checking|cash|credit-card|savings"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage income/expense categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("entrada|saida"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and manage transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("kind").long("kind").required(true).help("entrada|saida"))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("due").long("due").required(true).help("Due date (YYYY-MM-DD)"))
                        .arg(Arg::new("account").long("account").help("Account name"))
                        .arg(Arg::new("category").long("category").help("Category name"))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .default_value("previsto")
                                .help("previsto|realizado"),
                        ),
                )
                .subcommand(json_flags(tx_filter_args(Command::new("list"))))
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("due").long("due"))
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("status").long("status")),
                )
                .subcommand(
                    Command::new("settle")
                        .about("Mark as settled with today (or --date) as the operative date")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date").help("Settlement date (YYYY-MM-DD)")),
                )
                .subcommand(
                    Command::new("duplicate").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(json_flags(
                    Command::new("audit").about("Show the audit trail, newest first"),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Derived reports: KPIs, payables, receivables, cash flow")
                .subcommand(json_flags(
                    Command::new("summary")
                        .arg(Arg::new("month").long("month").help("YYYY-MM, defaults to current")),
                ))
                .subcommand(json_flags(report_view_args(Command::new("payables"))))
                .subcommand(json_flags(report_view_args(Command::new("receivables"))))
                .subcommand(json_flags(
                    Command::new("cashflow")
                        .arg(Arg::new("from").long("from").help("Start date (YYYY-MM-DD)"))
                        .arg(Arg::new("to").long("to").help("End date (YYYY-MM-DD)"))
                        .arg(
                            Arg::new("basis")
                                .long("basis")
                                .default_value("due")
                                .help("due|settled"),
                        ),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export the filtered, display-formatted view")
                .subcommand(
                    tx_filter_args(Command::new("transactions"))
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        ),
                )
                .subcommand(
                    Command::new("cashflow")
                        .arg(Arg::new("from").long("from").help("Start date (YYYY-MM-DD)"))
                        .arg(Arg::new("to").long("to").help("End date (YYYY-MM-DD)"))
                        .arg(
                            Arg::new("basis")
                                .long("basis")
                                .default_value("due")
                                .help("due|settled"),
                        )
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        ),
                ),
        )
        .subcommand(
            Command::new("admin")
                .about("Tenant provisioning, billing and access control")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("login").long("login").required(true))
                        .arg(Arg::new("company").long("company").required(true))
                        .arg(Arg::new("plan").long("plan").default_value("Starter"))
                        .arg(Arg::new("fee").long("fee").help("Monthly fee, defaults per plan"))
                        .arg(Arg::new("due").long("due").help("Next invoice due date (YYYY-MM-DD)")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("search").long("search"))
                        .arg(
                            Arg::new("include-blocked")
                                .long("include-blocked")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("only-overdue")
                                .long("only-overdue")
                                .action(ArgAction::SetTrue),
                        ),
                ))
                .subcommand(
                    Command::new("block")
                        .arg(Arg::new("login").long("login").required(true)),
                )
                .subcommand(
                    Command::new("unblock")
                        .arg(Arg::new("login").long("login").required(true)),
                )
                .subcommand(
                    Command::new("reset-password")
                        .about("Clear the password, re-entering the first-access state")
                        .arg(Arg::new("login").long("login").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("login").long("login").required(true)),
                )
                .subcommand(
                    Command::new("billing")
                        .arg(Arg::new("login").long("login").required(true))
                        .arg(Arg::new("plan").long("plan").required(true))
                        .arg(Arg::new("fee").long("fee"))
                        .arg(Arg::new("due").long("due").required(true)),
                ),
        )
}

fn report_view_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("month").long("month").help("YYYY-MM, defaults to current"))
        .arg(
            Arg::new("status")
                .long("status")
                .help("overdue|due-soon|pending|settled"),
        )
        .arg(Arg::new("category").long("category"))
        .arg(Arg::new("search").long("search"))
        .arg(
            Arg::new("sort")
                .long("sort")
                .default_value("due")
                .help("due|amount-desc|amount-asc"),
        )
}
